use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, MouseEvent, Window};

use crate::config::EffectsConfig;
use crate::dom::surface::{Surface, Viewport};
use crate::dom::web::{by_id, listen, query_all};

pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

/// The element id an in-page link points at. A bare `#` points nowhere.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub struct AnchorNavigator<V: Viewport> {
    viewport: V,
    offset: f64,
}

impl<V: Viewport> AnchorNavigator<V> {
    pub fn new(viewport: V, config: &EffectsConfig) -> Self {
        Self {
            viewport,
            offset: config.anchor_offset,
        }
    }

    /// Where the page scrolls to so a section at `top` clears the fixed navbar.
    pub fn scroll_target(&self, top: f64) -> f64 {
        top - self.offset
    }

    /// Smooth-scrolls to the link's target. Returns whether the click was handled;
    /// links to ids that don't exist are left to the browser.
    pub fn follow<S, F>(&self, href: &str, resolve: F) -> bool
    where
        S: Surface,
        F: FnOnce(&str) -> Option<S>,
    {
        let Some(target) = fragment_id(href).and_then(resolve) else {
            return false;
        };
        self.viewport.smooth_scroll_to(self.scroll_target(target.top_offset()));
        true
    }
}

pub fn attach(document: &Document, window: &Window, config: &EffectsConfig) -> Result<usize, JsValue> {
    let navigator = Rc::new(AnchorNavigator::new(window.clone(), config));
    let links = query_all(document, ANCHOR_SELECTOR)?;

    for link in &links {
        let navigator = navigator.clone();
        let document = document.clone();
        let clicked = link.clone();
        listen(link, "click", move |event: MouseEvent| {
            let href = clicked.get_attribute("href").unwrap_or_default();
            if navigator.follow(&href, |id| by_id(&document, id)) {
                event.prevent_default();
            }
        })?;
    }

    Ok(links.len())
}
