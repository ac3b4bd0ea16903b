use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for every page effect. The defaults are what the live page uses.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectsConfig {
    pub fade_threshold: f64,
    pub fade_root_margin: String,
    pub stagger_step_ms: u32,

    pub counter_threshold: f64,
    pub counter_start_delay_ms: u32,
    pub counter_duration_ms: u32,
    pub counter_frame_ms: u32,

    pub navbar_elevate_after: f64,
    pub indicator_hide_after: f64,
    pub hero_content_speed: f64,
    pub hero_min_opacity: f64,
    pub card_base_speed: f64,
    pub card_speed_step: f64,

    pub ripple_lifetime_ms: u32,
    pub anchor_offset: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            fade_threshold: 0.1,
            fade_root_margin: "0px 0px -100px 0px".to_string(),
            stagger_step_ms: 100,

            counter_threshold: 0.5,
            counter_start_delay_ms: 200,
            counter_duration_ms: 2000,
            counter_frame_ms: 16, // ~60fps

            navbar_elevate_after: 50.0,
            indicator_hide_after: 100.0,
            hero_content_speed: 0.3,
            hero_min_opacity: 0.2,
            card_base_speed: 0.1,
            card_speed_step: 0.05,

            ripple_lifetime_ms: 600,
            anchor_offset: 80.0, // navbar height
        }
    }
}
