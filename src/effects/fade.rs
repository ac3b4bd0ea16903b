use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::config::EffectsConfig;
use crate::dom::surface::Surface;
use crate::effects::visibility::{AfterVisible, VisibilityDetector, VisibilityOptions};

pub const TRACKED_SELECTOR: &str =
    ".about, .features, .community, .feature-card, .community-card, .stat-item";

const FADE_CLASS: &str = "fade-in";

// Grid items cascade in one after another.
const STAGGERED_CLASSES: [&str; 2] = ["feature-card", "community-card"];

pub struct FadeIn {
    stagger_step_ms: u32,
}

impl FadeIn {
    pub fn new(config: &EffectsConfig) -> Self {
        Self {
            stagger_step_ms: config.stagger_step_ms,
        }
    }

    pub fn stagger_delay_ms(&self, index: usize) -> u32 {
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.stagger_step_ms)
    }

    pub fn reveal<S: Surface>(&self, element: &S) -> AfterVisible {
        element.add_class(FADE_CLASS);

        if STAGGERED_CLASSES.iter().any(|class| element.has_class(class)) {
            let delay = self.stagger_delay_ms(element.sibling_index().unwrap_or(0));
            element.set_css("animation-delay", &format!("{}ms", delay));
        }

        AfterVisible::KeepWatching
    }
}

pub fn attach(document: &Document, config: &EffectsConfig) -> Result<usize, JsValue> {
    let fade = FadeIn::new(config);
    let detector = VisibilityDetector::new(VisibilityOptions::fade_in(config), move |element| {
        fade.reveal(&element)
    })?;
    let observed = detector.observe_all(document, TRACKED_SELECTOR)?;
    detector.forget();
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeElement;

    fn fade() -> FadeIn {
        FadeIn::new(&EffectsConfig::default())
    }

    #[test]
    fn sections_fade_without_delay() {
        let section = FakeElement::new("section").with_class("about");

        assert_eq!(fade().reveal(&section), AfterVisible::KeepWatching);
        assert!(section.has_class("fade-in"));
        assert_eq!(section.css("animation-delay"), None);
    }

    #[test]
    fn cards_are_staggered_by_position() {
        let grid = FakeElement::new("div").with_class("features-grid");
        let cards: Vec<_> = (0..3)
            .map(|_| grid.append(FakeElement::new("div").with_class("feature-card")))
            .collect();
        let community = FakeElement::new("div");
        community.append(FakeElement::new("h3"));
        let member = community.append(FakeElement::new("div").with_class("community-card"));

        let fade = fade();
        for card in cards.iter().rev() {
            fade.reveal(card);
        }
        fade.reveal(&member);

        assert_eq!(cards[0].css("animation-delay").as_deref(), Some("0ms"));
        assert_eq!(cards[1].css("animation-delay").as_deref(), Some("100ms"));
        assert_eq!(cards[2].css("animation-delay").as_deref(), Some("200ms"));
        assert_eq!(member.css("animation-delay").as_deref(), Some("100ms"));
    }

    #[test]
    fn revealing_again_changes_nothing() {
        let grid = FakeElement::new("div");
        grid.append(FakeElement::new("div").with_class("feature-card"));
        let card = grid.append(FakeElement::new("div").with_class("feature-card"));

        let fade = fade();
        fade.reveal(&card);
        fade.reveal(&card);

        assert!(card.has_class("fade-in"));
        assert_eq!(card.css("animation-delay").as_deref(), Some("100ms"));
    }

    #[test]
    fn detached_card_gets_no_offset() {
        let card = FakeElement::new("div").with_class("community-card");
        fade().reveal(&card);
        assert_eq!(card.css("animation-delay").as_deref(), Some("0ms"));
    }
}
