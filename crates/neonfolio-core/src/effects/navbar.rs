use crate::config::NavbarConfig;
use crate::dom::{Document, SelectorList};
use crate::Result;

/// Switches the navbar between its top-of-page and scrolled styles
#[derive(Debug, Clone)]
pub struct NavbarToggle {
    selector: SelectorList,
    config: NavbarConfig,
}

impl NavbarToggle {
    pub fn from_config(config: &NavbarConfig) -> Result<Self> {
        Ok(Self {
            selector: SelectorList::parse(&config.selector)?,
            config: config.clone(),
        })
    }

    /// Apply the style for `scroll_y`. Returns whether the scrolled style is
    /// active, or `None` when the page has no navbar.
    pub fn apply(&self, doc: &mut Document, scroll_y: f64) -> Option<bool> {
        let navbar = doc.query_selector(&self.selector)?;
        let scrolled = scroll_y > self.config.threshold_px;
        let (background, border) = if scrolled {
            (&self.config.scrolled_background, &self.config.scrolled_border)
        } else {
            (&self.config.top_background, &self.config.top_border)
        };
        doc.set_style(navbar, "background", background);
        doc.set_style(navbar, "border-bottom", border);
        Some(scrolled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    #[test]
    fn test_threshold_is_exclusive() {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append(body, ElementSpec::new("nav").class("navbar"));
        let toggle = NavbarToggle::from_config(&NavbarConfig::default()).unwrap();

        assert_eq!(toggle.apply(&mut doc, 50.0), Some(false));
        assert_eq!(doc.style(nav, "background"), Some("rgba(10, 10, 10, 0.95)"));
        assert_eq!(doc.style(nav, "border-bottom"), Some("1px solid var(--border-glow)"));

        assert_eq!(toggle.apply(&mut doc, 51.0), Some(true));
        assert_eq!(doc.style(nav, "background"), Some("rgba(10, 10, 10, 0.98)"));
        assert_eq!(doc.style(nav, "border-bottom"), Some("2px solid var(--primary-neon)"));
    }

    #[test]
    fn test_missing_navbar() {
        let mut doc = Document::new();
        let toggle = NavbarToggle::from_config(&NavbarConfig::default()).unwrap();
        assert_eq!(toggle.apply(&mut doc, 200.0), None);
    }
}
