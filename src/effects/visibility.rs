use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::config::EffectsConfig;
use crate::dom::web::query_all;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    /// Fraction of the element that must be inside the viewport.
    pub threshold: f64,
    /// CSS margin applied to the viewport before intersecting.
    pub root_margin: String,
}

impl VisibilityOptions {
    /// Low threshold, firing a little before the element is fully on screen.
    pub fn fade_in(config: &EffectsConfig) -> Self {
        Self {
            threshold: config.fade_threshold,
            root_margin: config.fade_root_margin.clone(),
        }
    }

    pub fn counters(config: &EffectsConfig) -> Self {
        Self {
            threshold: config.counter_threshold,
            root_margin: "0px".to_string(),
        }
    }
}

/// What the detector should do with an element after reporting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterVisible {
    KeepWatching,
    StopWatching,
}

/// Reports elements as they become visible, using an `IntersectionObserver`.
pub struct VisibilityDetector {
    observer: IntersectionObserver,
    callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityDetector {
    pub fn new<F>(options: VisibilityOptions, mut on_visible: F) -> Result<Self, JsValue>
    where
        F: FnMut(HtmlElement) -> AfterVisible + 'static,
    {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                if let Ok(element) = entry.target().dyn_into::<HtmlElement>() {
                    if on_visible(element.clone()) == AfterVisible::StopWatching {
                        observer.unobserve(&element);
                    }
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self { observer, callback })
    }

    /// Starts watching every element matching `selector`; returns how many.
    pub fn observe_all(&self, document: &Document, selector: &str) -> Result<usize, JsValue> {
        let elements = query_all(document, selector)?;
        for element in &elements {
            self.observer.observe(element);
        }
        Ok(elements.len())
    }

    /// Keeps the detector running for the rest of the page's life.
    pub fn forget(self) {
        self.callback.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_fires_early_with_low_threshold() {
        let options = VisibilityOptions::fade_in(&EffectsConfig::default());
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.root_margin, "0px 0px -100px 0px");
    }

    #[test]
    fn counters_wait_for_half_visibility() {
        let options = VisibilityOptions::counters(&EffectsConfig::default());
        assert_eq!(options.threshold, 0.5);
        assert_eq!(options.root_margin, "0px");
    }
}
