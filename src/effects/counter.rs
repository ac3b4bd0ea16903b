//! Statistic counters that count up from zero the first time they come into view.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::config::EffectsConfig;
use crate::dom::surface::{Scheduler, Surface, Tick};
use crate::effects::visibility::{AfterVisible, VisibilityDetector, VisibilityOptions};

pub const STAT_SELECTOR: &str = ".stat-item";
const NUMBER_SELECTOR: &str = ".stat-number";
const MARKER: &str = "animated";

/// Digits of `text` read as one number: `"1,200+"` is 1200, `"N/A"` is `None`.
pub fn parse_target(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Linear count from 0 to `target` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterTimeline {
    target: u64,
    duration_ms: u32,
}

impl CounterTimeline {
    pub fn new(target: u64, duration_ms: u32) -> Self {
        Self { target, duration_ms }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Value to display `elapsed_ms` into the count. Never exceeds the target.
    pub fn value_at(&self, elapsed_ms: u64) -> u64 {
        let duration = u64::from(self.duration_ms);
        if elapsed_ms >= duration {
            return self.target;
        }
        (u128::from(self.target) * u128::from(elapsed_ms) / u128::from(duration)) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    Unseen,
    Animating,
    Settled,
}

/// Count-up state for one `.stat-number` element.
pub struct StatCounter<S: Surface> {
    number: S,
    original: String,
    timeline: CounterTimeline,
    phase: Cell<CounterPhase>,
    ticks: Cell<u64>,
}

impl<S: Surface> StatCounter<S> {
    /// `None` when the element's text has no digits to count to.
    pub fn arm(number: S, duration_ms: u32) -> Option<Self> {
        let original = number.text();
        let target = parse_target(&original)?;
        Some(Self {
            number,
            original,
            timeline: CounterTimeline::new(target, duration_ms),
            phase: Cell::new(CounterPhase::Unseen),
            ticks: Cell::new(0),
        })
    }

    pub fn phase(&self) -> CounterPhase {
        self.phase.get()
    }

    pub fn begin(&self) {
        if self.phase.get() != CounterPhase::Unseen {
            return;
        }
        self.number.set_data_attr(MARKER, "true");
        self.number.set_text("0");
        self.phase.set(CounterPhase::Animating);
    }

    /// Advances one frame. Stops once the target is shown or the counter has settled.
    pub fn tick(&self, frame_ms: u32) -> Tick {
        if self.phase.get() != CounterPhase::Animating {
            return Tick::Stop;
        }

        let ticks = self.ticks.get() + 1;
        self.ticks.set(ticks);
        let value = self.timeline.value_at(ticks * u64::from(frame_ms));
        self.number.set_text(&value.to_string());

        if value >= self.timeline.target() {
            Tick::Stop
        } else {
            Tick::Continue
        }
    }

    /// Puts the original text back, suffix included.
    pub fn settle(&self) {
        if self.phase.get() != CounterPhase::Animating {
            return;
        }
        self.number.set_text(&self.original);
        self.phase.set(CounterPhase::Settled);
    }
}

pub struct CounterAnimator<T: Scheduler> {
    scheduler: T,
    start_delay_ms: u32,
    duration_ms: u32,
    frame_ms: u32,
}

impl<T: Scheduler> CounterAnimator<T> {
    pub fn new(config: &EffectsConfig, scheduler: T) -> Self {
        Self {
            scheduler,
            start_delay_ms: config.counter_start_delay_ms,
            duration_ms: config.counter_duration_ms,
            frame_ms: config.counter_frame_ms.max(1),
        }
    }

    /// Handles a stat item scrolling into view. The item is only ever looked at once.
    pub fn on_visible<S: Surface>(&self, stat_item: &S) -> AfterVisible {
        if let Some(number) = stat_item.find(NUMBER_SELECTOR) {
            self.start(number);
        }
        AfterVisible::StopWatching
    }

    fn start<S: Surface>(&self, number: S) {
        if number.data_attr(MARKER).is_some() {
            return;
        }
        let Some(counter) = StatCounter::arm(number, self.duration_ms) else {
            return;
        };
        let counter = Rc::new(counter);
        counter.begin();

        let scheduler = self.scheduler.clone();
        let frame_ms = self.frame_ms;
        let duration_ms = self.duration_ms;
        self.scheduler.after(
            self.start_delay_ms,
            Box::new(move || {
                let ticking = counter.clone();
                scheduler.every(frame_ms, Box::new(move || ticking.tick(frame_ms)));
                scheduler.after(duration_ms, Box::new(move || counter.settle()));
            }),
        );
    }
}

pub fn attach<T: Scheduler>(
    document: &Document,
    config: &EffectsConfig,
    scheduler: T,
) -> Result<usize, JsValue> {
    let animator = CounterAnimator::new(config, scheduler);
    let detector = VisibilityDetector::new(VisibilityOptions::counters(config), move |item| {
        animator.on_visible(&item)
    })?;
    let observed = detector.observe_all(document, STAT_SELECTOR)?;
    detector.forget();
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::{FakeElement, ManualClock};

    fn stat(text: &str) -> (FakeElement, FakeElement) {
        let item = FakeElement::new("div").with_class("stat-item");
        let number = item.append(FakeElement::new("span").with_class("stat-number").with_text(text));
        item.append(FakeElement::new("span").with_class("stat-label").with_text("Users"));
        (item, number)
    }

    fn animator(clock: &ManualClock) -> CounterAnimator<ManualClock> {
        CounterAnimator::new(&EffectsConfig::default(), clock.clone())
    }

    #[test]
    fn parse_target_keeps_only_digits() {
        assert_eq!(parse_target("1200+"), Some(1200));
        assert_eq!(parse_target("50k"), Some(50));
        assert_eq!(parse_target("1,500,000"), Some(1_500_000));
        assert_eq!(parse_target("24/7"), Some(247));
        assert_eq!(parse_target("N/A"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn timeline_is_linear_and_clamped() {
        let timeline = CounterTimeline::new(1200, 2000);
        assert_eq!(timeline.value_at(0), 0);
        assert_eq!(timeline.value_at(16), 9);
        assert_eq!(timeline.value_at(1000), 600);
        assert_eq!(timeline.value_at(1999), 1199);
        assert_eq!(timeline.value_at(2000), 1200);
        assert_eq!(timeline.value_at(60_000), 1200);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        assert_eq!(CounterTimeline::new(7, 0).value_at(0), 7);
    }

    #[test]
    fn counts_up_and_restores_suffix() {
        let clock = ManualClock::default();
        let (item, number) = stat("1200+");

        assert_eq!(animator(&clock).on_visible(&item), AfterVisible::StopWatching);
        assert_eq!(number.text(), "0");
        assert_eq!(number.data_attr("animated").as_deref(), Some("true"));

        clock.advance(200);
        assert_eq!(number.text(), "0");

        let mut frames = Vec::new();
        while clock.now() < 2200 {
            clock.advance(16);
            frames.push(number.text());
        }

        assert_eq!(number.text(), "1200+");
        assert_eq!(clock.pending(), 0);

        let shown: Vec<u64> = frames[..frames.len() - 1]
            .iter()
            .map(|frame| frame.parse().expect("numeric frame"))
            .collect();
        assert!(shown.iter().all(|&value| value <= 1200));
        assert!(shown.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(shown.len() > 100);
    }

    #[test]
    fn second_sighting_is_ignored() {
        let clock = ManualClock::default();
        let (item, number) = stat("350");
        let animator = animator(&clock);

        animator.on_visible(&item);
        clock.advance(1000);
        let midway = number.text();
        animator.on_visible(&item);
        assert_eq!(number.text(), midway);

        clock.advance(5000);
        assert_eq!(number.text(), "350");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn non_numeric_text_is_left_alone() {
        let clock = ManualClock::default();
        let (item, number) = stat("N/A");

        assert_eq!(animator(&clock).on_visible(&item), AfterVisible::StopWatching);
        clock.advance(5000);

        assert_eq!(number.text(), "N/A");
        assert_eq!(number.data_attr("animated"), None);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn item_without_number_is_skipped() {
        let clock = ManualClock::default();
        let item = FakeElement::new("div").with_class("stat-item").with_text("42");

        assert_eq!(animator(&clock).on_visible(&item), AfterVisible::StopWatching);
        assert_eq!(item.text(), "42");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn counter_phases_only_move_forward() {
        let number = FakeElement::new("span").with_text("10k");
        let counter = StatCounter::arm(number.clone(), 2000).expect("has digits");
        assert_eq!(counter.phase(), CounterPhase::Unseen);

        counter.settle();
        assert_eq!(counter.phase(), CounterPhase::Unseen);

        counter.begin();
        assert_eq!(counter.phase(), CounterPhase::Animating);
        assert_eq!(counter.tick(1000), Tick::Continue);
        assert_eq!(number.text(), "5");

        counter.settle();
        assert_eq!(counter.phase(), CounterPhase::Settled);
        assert_eq!(counter.tick(1000), Tick::Stop);
        assert_eq!(number.text(), "10k");

        counter.begin();
        assert_eq!(counter.phase(), CounterPhase::Settled);
    }
}
