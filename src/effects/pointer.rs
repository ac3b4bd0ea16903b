use wasm_bindgen::JsValue;
use web_sys::{Document, MouseEvent, Window};

use crate::config::EffectsConfig;
use crate::dom::surface::{Scheduler, Surface};
use crate::dom::web::{listen, query_all, query_one};

const CARD_SELECTOR: &str = ".feature-card";
const BUTTON_SELECTOR: &str = ".btn-primary, .btn-secondary";

const TILT_HOVER: &str = "translateY(-10px) rotateX(5deg)";
const TILT_REST: &str = "translateY(0) rotateX(0)";

pub const RIPPLE_KEYFRAMES: &str = r#"
    @keyframes ripple {
        to {
            width: 200px;
            height: 200px;
            opacity: 0;
        }
    }
"#;

/// Two radial glows: one under the cursor, one mirrored across the centre.
/// `x` and `y` are the cursor position as fractions of the viewport.
pub fn gradient_css(x: f64, y: f64) -> String {
    format!(
        "radial-gradient(circle at {}% {}%, rgba(220, 20, 60, 0.3) 0%, transparent 50%), \
         radial-gradient(circle at {}% {}%, rgba(160, 13, 42, 0.3) 0%, transparent 50%)",
        x * 100.0,
        y * 100.0,
        (1.0 - x) * 100.0,
        (1.0 - y) * 100.0,
    )
}

pub fn fraction_of(position: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        position / extent
    } else {
        0.0
    }
}

pub fn tilt<S: Surface>(card: &S, hovering: bool) {
    card.set_css("transform", if hovering { TILT_HOVER } else { TILT_REST });
}

/// Drops an expanding circle at (`x`, `y`) inside `card` and removes it after `lifetime_ms`.
pub fn spawn_ripple<S: Surface, T: Scheduler>(
    card: &S,
    x: f64,
    y: f64,
    lifetime_ms: u32,
    scheduler: &T,
) -> Option<S> {
    let ripple = card.spawn_child("div")?;
    ripple.add_class("ripple");
    for (property, value) in [
        ("position", "absolute".to_string()),
        ("border-radius", "50%".to_string()),
        ("background", "rgba(220, 20, 60, 0.5)".to_string()),
        ("width", "20px".to_string()),
        ("height", "20px".to_string()),
        ("left", format!("{}px", x)),
        ("top", format!("{}px", y)),
        ("transform", "translate(-50%, -50%)".to_string()),
        ("animation", format!("ripple {}s ease-out", f64::from(lifetime_ms) / 1000.0)),
        ("pointer-events", "none".to_string()),
    ] {
        ripple.set_css(property, &value);
    }
    card.set_css("position", "relative");

    let expired = ripple.clone();
    scheduler.after(lifetime_ms, Box::new(move || expired.detach()));
    Some(ripple)
}

/// Exposes the pointer position inside the button to its CSS glow.
pub fn track_hover<S: Surface>(button: &S, x: f64, y: f64) {
    button.set_css("--mouse-x", &format!("{}px", x));
    button.set_css("--mouse-y", &format!("{}px", y));
}

pub fn inject_ripple_keyframes(document: &Document) -> Result<(), JsValue> {
    let Some(head) = document.head() else {
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_text_content(Some(RIPPLE_KEYFRAMES));
    head.append_child(&style)?;
    Ok(())
}

pub fn attach<T: Scheduler>(
    document: &Document,
    window: &Window,
    config: &EffectsConfig,
    scheduler: T,
) -> Result<usize, JsValue> {
    inject_ripple_keyframes(document)?;
    let mut wired = 0;

    if let Some(background) = query_one(document, ".hero-background") {
        let viewport = window.clone();
        listen(document, "mousemove", move |event: MouseEvent| {
            let width = viewport.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
            let height = viewport.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
            let x = fraction_of(f64::from(event.client_x()), width);
            let y = fraction_of(f64::from(event.client_y()), height);
            background.set_css("background-image", &gradient_css(x, y));
        })?;
        wired += 1;
    }

    for card in query_all(document, CARD_SELECTOR)? {
        let hovered = card.clone();
        listen(&card, "mouseenter", move |_: MouseEvent| tilt(&hovered, true))?;
        let left = card.clone();
        listen(&card, "mouseleave", move |_: MouseEvent| tilt(&left, false))?;

        let clicked = card.clone();
        let scheduler = scheduler.clone();
        let lifetime_ms = config.ripple_lifetime_ms;
        listen(&card, "click", move |event: MouseEvent| {
            let x = f64::from(event.offset_x());
            let y = f64::from(event.offset_y());
            spawn_ripple(&clicked, x, y, lifetime_ms, &scheduler);
        })?;
        wired += 1;
    }

    for button in query_all(document, BUTTON_SELECTOR)? {
        let hovered = button.clone();
        listen(&button, "mouseenter", move |event: MouseEvent| {
            let rect = hovered.get_bounding_client_rect();
            let x = f64::from(event.client_x()) - rect.left();
            let y = f64::from(event.client_y()) - rect.top();
            track_hover(&hovered, x, y);
        })?;
        wired += 1;
    }

    Ok(wired)
}
