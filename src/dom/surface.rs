//! The slice of the browser the effects touch.
//!
//! Effects are written against these traits so they can run on real
//! `web_sys` handles in the page and on the in-memory doubles in tests.

/// An element whose classes, inline styles, text and data attributes can be changed.
pub trait Surface: Clone + 'static {
    fn add_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    /// Sets an inline style property. Custom properties (`--name`) are allowed.
    fn set_css(&self, property: &str, value: &str);
    fn css(&self, property: &str) -> Option<String>;

    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// `data-*` attribute, keyed by its dataset name (`animated` for `data-animated`).
    fn data_attr(&self, key: &str) -> Option<String>;
    fn set_data_attr(&self, key: &str, value: &str);

    /// Position among the parent's element children.
    fn sibling_index(&self) -> Option<usize>;

    /// First descendant matching `selector`.
    fn find(&self, selector: &str) -> Option<Self>;

    /// Creates a `tag` element and appends it as the last child.
    fn spawn_child(&self, tag: &str) -> Option<Self>;

    /// Removes the element from the document.
    fn detach(&self);

    fn top_offset(&self) -> f64;
    fn height(&self) -> f64;
}

/// The scrolling window.
pub trait Viewport {
    fn scroll_offset(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

/// One-shot and repeating timers.
pub trait Scheduler: Clone + 'static {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>);

    /// Runs `tick` every `period_ms` until it returns [`Tick::Stop`].
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut() -> Tick>);
}
