//! Page entrance effects: staggered card fade-in, scroll reveal for game
//! cards, and background parallax.

use crate::config::Timings;
use crate::view::transition::Transition;

/// Card `index` fades up after `index × card_stagger_ms`.
pub fn card_entrance(timings: &Timings, index: usize) -> Transition {
    let delay = (index as u32).saturating_mul(timings.card_stagger_ms);
    Transition::new()
        .style("opacity", "0")
        .style("transform", "translateY(30px)")
        .wait(delay)
        .style("transition", "all 0.6s ease")
        .style("opacity", "1")
        .style("transform", "translateY(0)")
}

/// Initial state of a game card waiting to scroll into view.
pub fn scroll_hidden() -> Transition {
    Transition::new()
        .style("opacity", "0")
        .style("transform", "translateY(30px)")
        .style("transition", "all 0.6s ease")
}

/// Applied when a hidden game card intersects the viewport.
pub fn scroll_shown() -> Transition {
    Transition::new()
        .style("opacity", "1")
        .style("transform", "translateY(0)")
}

/// Fraction of a card that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// Transform for background shape `index` given the pointer position as a
/// fraction of the viewport (0.0–1.0 on each axis). Deeper shapes move more.
pub fn parallax_transform(index: usize, x_ratio: f64, y_ratio: f64) -> String {
    let speed = (index as f64 + 1.0) * 0.5;
    let x = (x_ratio - 0.5) * speed * 50.0;
    let y = (y_ratio - 0.5) * speed * 50.0;
    format!("translate({}px, {}px) rotate({}deg)", x, y, x)
}
