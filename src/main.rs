use log::{debug, info, warn};
use wasm_bindgen::JsValue;
use web_sys::js_sys::Reflect;
use web_sys::{window, Document, Event, Window};

mod config;
mod dom {
    pub mod surface;
    pub mod web;
    #[cfg(test)]
    pub mod fake;
}
mod effects {
    pub mod visibility;
    pub mod fade;
    pub mod counter;
    pub mod scroll;
    pub mod pointer;
    pub mod anchor;
}

use config::EffectsConfig;
use dom::web::{listen, GlooScheduler};

/// Wires every effect onto the page. A group that fails to attach is logged
/// and skipped; the rest still run.
fn enhance_page(document: &Document, window: &Window, config: &EffectsConfig) {
    let scheduler = GlooScheduler;

    let attached = [
        report("fade-in", effects::fade::attach(document, config)),
        report("navbar and parallax", effects::scroll::attach(document, window, config)),
        report("smooth scroll", effects::anchor::attach(document, window, config)),
        report("counter", effects::counter::attach(document, config, scheduler)),
        report("pointer", effects::pointer::attach(document, window, config, scheduler)),
    ];

    let ok = attached.iter().filter(|ok| **ok).count();
    info!("Page effects ready ({}/{} groups attached)", ok, attached.len());
}

fn report(group: &str, result: Result<usize, JsValue>) -> bool {
    match result {
        Ok(count) => {
            debug!("Attached {} effects to {} elements", group, count);
            true
        }
        Err(err) => {
            gloo_console::error!(format!("Failed to attach {} effects", group), err);
            false
        }
    }
}

fn still_loading(document: &Document) -> bool {
    Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .map_or(false, |state| state == "loading")
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if console_log::init_with_level(config::log_level()).is_err() {
        gloo_console::warn!("Logger was already initialized");
    }

    let Some(window) = window() else {
        warn!("No window; page effects disabled");
        return;
    };
    let Some(document) = window.document() else {
        warn!("No document; page effects disabled");
        return;
    };

    let config = EffectsConfig::default();
    if still_loading(&document) {
        let loaded = document.clone();
        let result = listen(&document, "DOMContentLoaded", move |_: Event| {
            enhance_page(&loaded, &window, &config);
        });
        if let Err(err) = result {
            gloo_console::error!("Failed to wait for DOMContentLoaded", err);
        }
    } else {
        enhance_page(&document, &window, &config);
    }
}
