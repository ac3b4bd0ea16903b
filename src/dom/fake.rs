//! In-memory stand-ins for the page, driven by hand from tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::surface::{Scheduler, Surface, Tick, Viewport};

#[derive(Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    data: BTreeMap<String, String>,
    children: Vec<FakeElement>,
    parent: Weak<RefCell<Node>>,
    top: f64,
    height: f64,
}

#[derive(Clone, Default)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        write!(f, "<{} class=\"{}\">", node.tag, node.classes.join(" "))
    }
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        let element = Self::default();
        element.0.borrow_mut().tag = tag.to_string();
        element
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn at(self, top: f64, height: f64) -> Self {
        {
            let mut node = self.0.borrow_mut();
            node.top = top;
            node.height = height;
        }
        self
    }

    /// Appends `child` and hands it back.
    pub fn append(&self, child: FakeElement) -> FakeElement {
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        child
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.borrow().children.clone()
    }

    pub fn has_styles(&self) -> bool {
        !self.0.borrow().styles.is_empty()
    }

    fn matches(&self, selector: &str) -> bool {
        match selector.strip_prefix('.') {
            Some(class) => self.has_class(class),
            None => self.0.borrow().tag == selector,
        }
    }
}

impl Surface for FakeElement {
    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_css(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn css(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn data_attr(&self, key: &str) -> Option<String> {
        self.0.borrow().data.get(key).cloned()
    }

    fn set_data_attr(&self, key: &str, value: &str) {
        self.0
            .borrow_mut()
            .data
            .insert(key.to_string(), value.to_string());
    }

    fn sibling_index(&self) -> Option<usize> {
        let parent = self.0.borrow().parent.upgrade()?;
        let index = parent
            .borrow()
            .children
            .iter()
            .position(|child| Rc::ptr_eq(&child.0, &self.0));
        index
    }

    fn find(&self, selector: &str) -> Option<Self> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.find(selector) {
                return Some(found);
            }
        }
        None
    }

    fn spawn_child(&self, tag: &str) -> Option<Self> {
        Some(self.append(FakeElement::new(tag)))
    }

    fn detach(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn top_offset(&self) -> f64 {
        self.0.borrow().top
    }

    fn height(&self) -> f64 {
        self.0.borrow().height
    }
}

/// Records every smooth scroll instead of animating.
#[derive(Default)]
pub struct FakeViewport {
    offset: Cell<f64>,
    smooth_scrolls: RefCell<Vec<f64>>,
}

impl FakeViewport {
    pub fn smooth_scrolls(&self) -> Vec<f64> {
        self.smooth_scrolls.borrow().clone()
    }
}

impl Viewport for FakeViewport {
    fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.smooth_scrolls.borrow_mut().push(top);
        self.offset.set(top);
    }
}

enum Job {
    Once(Box<dyn FnOnce()>),
    Every { period: u32, tick: Box<dyn FnMut() -> Tick> },
}

struct Pending {
    due: u64,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    seq: u64,
    pending: Vec<Pending>,
}

impl ClockState {
    fn push(&mut self, due: u64, job: Job) {
        let seq = self.seq;
        self.seq += 1;
        self.pending.push(Pending { due, seq, job });
    }
}

/// A scheduler whose time only moves when `advance` is called.
/// Timers due at the same instant run in the order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<RefCell<ClockState>>);

impl ManualClock {
    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().pending.len()
    }

    pub fn advance(&self, ms: u64) {
        let until = self.now() + ms;
        loop {
            let next = {
                let mut state = self.0.borrow_mut();
                let index = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= until)
                    .min_by_key(|(_, pending)| (pending.due, pending.seq))
                    .map(|(index, _)| index);
                match index {
                    Some(index) => {
                        let pending = state.pending.swap_remove(index);
                        state.now = pending.due;
                        pending
                    }
                    None => {
                        state.now = until;
                        break;
                    }
                }
            };

            match next.job {
                Job::Once(task) => task(),
                Job::Every { period, mut tick } => {
                    if tick() == Tick::Continue {
                        let due = next.due + u64::from(period.max(1));
                        self.0.borrow_mut().push(due, Job::Every { period, tick });
                    }
                }
            }
        }
    }
}

impl Scheduler for ManualClock {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut state = self.0.borrow_mut();
        let due = state.now + u64::from(delay_ms);
        state.push(due, Job::Once(task));
    }

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut() -> Tick>) {
        let mut state = self.0.borrow_mut();
        let due = state.now + u64::from(period_ms.max(1));
        state.push(
            due,
            Job::Every {
                period: period_ms,
                tick,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_then_schedule_order() {
        let clock = ManualClock::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, name) in [(30, "c"), (10, "a"), (30, "d"), (20, "b")] {
            let log = log.clone();
            clock.after(delay, Box::new(move || log.borrow_mut().push(name)));
        }
        clock.advance(25);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        clock.advance(5);
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "d"]);
        assert_eq!(clock.now(), 30);
    }

    #[test]
    fn repeating_timer_stops_itself() {
        let clock = ManualClock::default();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        clock.every(
            16,
            Box::new(move || {
                counter.set(counter.get() + 1);
                if counter.get() == 3 {
                    Tick::Stop
                } else {
                    Tick::Continue
                }
            }),
        );

        clock.advance(1000);
        assert_eq!(ticks.get(), 3);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn detach_removes_from_parent() {
        let parent = FakeElement::new("div");
        let first = parent.append(FakeElement::new("span"));
        let second = parent.append(FakeElement::new("span"));

        assert_eq!(second.sibling_index(), Some(1));
        first.detach();
        assert_eq!(parent.children(), vec![second.clone()]);
        assert_eq!(second.sibling_index(), Some(0));
        assert_eq!(first.sibling_index(), None);
    }
}
