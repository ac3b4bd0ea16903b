use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, EventTarget, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use super::surface::{Scheduler, Surface, Tick, Viewport};

impl Surface for HtmlElement {
    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn set_css(&self, property: &str, value: &str) {
        let _ = self.style().set_property(property, value);
    }

    fn css(&self, property: &str) -> Option<String> {
        self.style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn data_attr(&self, key: &str) -> Option<String> {
        self.dataset().get(key)
    }

    fn set_data_attr(&self, key: &str, value: &str) {
        let _ = self.dataset().set(key, value);
    }

    fn sibling_index(&self) -> Option<usize> {
        let parent = self.parent_element()?;
        let children = parent.children();
        let node: &web_sys::Node = self;
        (0..children.length())
            .position(|i| children.item(i).map_or(false, |child| child.is_same_node(Some(node))))
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn spawn_child(&self, tag: &str) -> Option<Self> {
        let document = self.owner_document()?;
        let child = document
            .create_element(tag)
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        self.append_child(&child).ok()?;
        Some(child)
    }

    fn detach(&self) {
        web_sys::Element::remove(self);
    }

    fn top_offset(&self) -> f64 {
        f64::from(self.offset_top())
    }

    fn height(&self) -> f64 {
        f64::from(self.offset_height())
    }
}

impl Viewport for Window {
    fn scroll_offset(&self) -> f64 {
        self.page_y_offset().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.scroll_to_with_scroll_to_options(&options);
    }
}

/// Timers backed by `setTimeout` / `setInterval`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut() -> Tick>) {
        let interval_handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
        let interval_handle_clone = interval_handle.clone();

        let interval = Interval::new(period_ms, move || {
            if interval_handle_clone.borrow().is_none() {
                return; // stopping
            }
            if tick() == Tick::Stop {
                if let Some(interval) = interval_handle_clone.borrow_mut().take() {
                    // Can't drop the interval while its own callback is running.
                    Timeout::new(0, move || drop(interval)).forget();
                }
            }
        });

        *interval_handle.borrow_mut() = Some(interval);
    }
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub fn query_one(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

/// Registers `handler` for `event` on `target` for the rest of the page's life.
/// Events that are not an `E` are ignored.
pub fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::wrap(Box::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    }) as Box<dyn FnMut(Event)>);

    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
