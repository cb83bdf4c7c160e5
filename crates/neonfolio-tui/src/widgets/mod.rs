mod log;
mod page_view;
mod progress;
mod shapes;
mod status_bar;

pub use log::MutationLogWidget;
pub use page_view::PageViewWidget;
pub use progress::ProgressWidget;
pub use shapes::ShapesWidget;
pub use status_bar::StatusBarWidget;

use unicode_width::UnicodeWidthChar;

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
