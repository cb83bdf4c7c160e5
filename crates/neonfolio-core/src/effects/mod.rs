//! Single-purpose page behaviors reacting to one event kind each.

pub mod anchor;
pub mod direction;
pub mod glitch;
pub mod navbar;
pub mod overlay;
pub mod parallax;
pub mod progress;
pub mod shortcuts;

pub use anchor::{ScrollRequest, SmoothScrollRouter};
pub use direction::{DirectionTracker, ScrollDirection, DIRECTION_ATTRIBUTE};
pub use glitch::TitleGlitch;
pub use navbar::NavbarToggle;
pub use overlay::OverlaySuppressor;
pub use parallax::{Parallax, ShapeOffset};
pub use progress::{scroll_percentage, ProgressBar};
pub use shortcuts::is_blocked_shortcut;

/// Format a number the way the browser serializes it into inline styles
pub(crate) fn css_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}
