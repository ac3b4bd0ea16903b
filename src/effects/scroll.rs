use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, Event, HtmlElement, Window};

use crate::config::EffectsConfig;
use crate::dom::surface::{Surface, Viewport};
use crate::dom::web::{by_id, listen, query_all, query_one};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarLook {
    Flat,
    Elevated,
}

impl NavbarLook {
    pub fn for_offset(offset: f64, elevate_after: f64) -> Self {
        if offset > elevate_after {
            NavbarLook::Elevated
        } else {
            NavbarLook::Flat
        }
    }

    pub fn shadow(self) -> &'static str {
        match self {
            NavbarLook::Flat => "none",
            NavbarLook::Elevated => "0 4px 20px rgba(0, 0, 0, 0.3)",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            NavbarLook::Flat => "rgba(15, 15, 30, 0.8)",
            NavbarLook::Elevated => "rgba(15, 15, 30, 0.95)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroFrame {
    pub translate_y: f64,
    pub opacity: f64,
}

/// Where the hero content sits at `offset`, or `None` once the hero has scrolled away.
pub fn hero_parallax(offset: f64, hero_height: f64, speed: f64, min_opacity: f64) -> Option<HeroFrame> {
    if hero_height <= 0.0 || offset >= hero_height {
        return None;
    }
    Some(HeroFrame {
        translate_y: offset * speed,
        opacity: 1.0 - (offset / hero_height) * (1.0 - min_opacity),
    })
}

pub fn indicator_visible(offset: f64, hide_after: f64) -> bool {
    offset <= hide_after
}

/// Elements the scroll handler restyles. Any of them may be missing from the page.
pub struct ScrollTargets<S: Surface> {
    pub navbar: Option<S>,
    pub hero: Option<S>,
    pub hero_content: Option<S>,
    pub floating_cards: Vec<S>,
    pub indicator: Option<S>,
}

pub struct ScrollEffects<S: Surface> {
    targets: ScrollTargets<S>,
    elevate_after: f64,
    hide_indicator_after: f64,
    content_speed: f64,
    min_opacity: f64,
    card_base_speed: f64,
    card_speed_step: f64,
}

impl<S: Surface> ScrollEffects<S> {
    pub fn new(targets: ScrollTargets<S>, config: &EffectsConfig) -> Self {
        Self {
            targets,
            elevate_after: config.navbar_elevate_after,
            hide_indicator_after: config.indicator_hide_after,
            content_speed: config.hero_content_speed,
            min_opacity: config.hero_min_opacity,
            card_base_speed: config.card_base_speed,
            card_speed_step: config.card_speed_step,
        }
    }

    /// Deeper cards drift faster.
    pub fn card_speed(&self, index: usize) -> f64 {
        self.card_base_speed + self.card_speed_step * index as f64
    }

    /// Restyles everything from the scroll offset alone.
    pub fn apply(&self, offset: f64) {
        if let Some(navbar) = &self.targets.navbar {
            let look = NavbarLook::for_offset(offset, self.elevate_after);
            navbar.set_css("box-shadow", look.shadow());
            navbar.set_css("background", look.background());
        }

        let frame = self.targets.hero.as_ref().and_then(|hero| {
            hero_parallax(offset, hero.height(), self.content_speed, self.min_opacity)
        });
        if let Some(frame) = frame {
            if let Some(content) = &self.targets.hero_content {
                content.set_css("transform", &format!("translateY({}px)", frame.translate_y));
                content.set_css("opacity", &frame.opacity.to_string());
            }
            for (index, card) in self.targets.floating_cards.iter().enumerate() {
                let shift = offset * self.card_speed(index);
                card.set_css("transform", &format!("translateY({}px)", shift));
            }
        }

        if let Some(indicator) = &self.targets.indicator {
            if indicator_visible(offset, self.hide_indicator_after) {
                indicator.set_css("opacity", "1");
                indicator.set_css("pointer-events", "auto");
            } else {
                indicator.set_css("opacity", "0");
                indicator.set_css("pointer-events", "none");
            }
        }
    }
}

pub fn attach(document: &Document, window: &Window, config: &EffectsConfig) -> Result<usize, JsValue> {
    let targets = ScrollTargets::<HtmlElement> {
        navbar: by_id(document, "navbar"),
        hero: by_id(document, "hero"),
        hero_content: query_one(document, ".hero-content"),
        floating_cards: query_all(document, ".floating-card")?,
        indicator: by_id(document, "scroll-indicator"),
    };
    let styled = [&targets.navbar, &targets.hero_content, &targets.indicator]
        .iter()
        .filter(|target| target.is_some())
        .count()
        + targets.floating_cards.len();

    let effects = Rc::new(ScrollEffects::new(targets, config));
    let scrolling = window.clone();
    listen(window, "scroll", move |_: Event| {
        effects.apply(scrolling.scroll_offset());
    })?;

    Ok(styled)
}
