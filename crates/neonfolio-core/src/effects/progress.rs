use crate::dom::{Document, ElementId, SelectorList};
use crate::viewport::Viewport;

use super::css_number;

/// Scrolled share of the scrollable range, in percent.
///
/// A page that cannot scroll reports 0 rather than dividing by zero.
pub fn scroll_percentage(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 {
        return 0.0;
    }
    scroll_top / range * 100.0
}

/// Keeps `.scroll-progress-bar` width in sync with the scroll offset
#[derive(Debug, Clone)]
pub struct ProgressBar {
    selector: SelectorList,
}

impl ProgressBar {
    pub fn new(selector: SelectorList) -> Self {
        Self { selector }
    }

    /// Returns the applied percentage, `None` when the page has no bar
    pub fn update(&self, doc: &mut Document, viewport: &Viewport) -> Option<f64> {
        let bar: ElementId = doc.query_selector(&self.selector)?;
        let pct = scroll_percentage(viewport.scroll_y, viewport.scroll_height, viewport.height);
        doc.set_style(bar, "width", &format!("{}%", css_number(pct)));
        Some(pct)
    }
}
