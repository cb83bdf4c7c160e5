use crate::config::ParallaxConfig;
use crate::dom::{Document, ElementId, SelectorList};
use crate::viewport::Viewport;
use crate::Result;

use super::css_number;

/// Offset applied to one decorative shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeOffset {
    pub x: f64,
    pub y: f64,
    /// Degrees
    pub rotate: f64,
}

impl ShapeOffset {
    pub fn to_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}deg)",
            css_number(self.x),
            css_number(self.y),
            css_number(self.rotate)
        )
    }
}

/// Moves floating shapes against the pointer, deeper shapes faster
#[derive(Debug, Clone)]
pub struct Parallax {
    selector: SelectorList,
    speed_step: f64,
    rotate_factor: f64,
}

impl Parallax {
    pub fn from_config(config: &ParallaxConfig) -> Result<Self> {
        Ok(Self {
            selector: SelectorList::parse(&config.selector)?,
            speed_step: config.speed_step,
            rotate_factor: config.rotate_factor,
        })
    }

    /// Offset for the shape at `index` with the pointer at (`x`, `y`)
    pub fn offset(&self, index: usize, x: f64, y: f64, viewport: &Viewport) -> ShapeOffset {
        let speed = (index as f64 + 1.0) * self.speed_step;
        let dx = (x - viewport.width / 2.0) * speed;
        let dy = (y - viewport.height / 2.0) * speed;
        ShapeOffset {
            x: dx,
            y: dy,
            rotate: dx * self.rotate_factor,
        }
    }

    /// Write transforms for every shape; returns the shapes touched
    pub fn apply(&self, doc: &mut Document, x: f64, y: f64, viewport: &Viewport) -> Vec<ElementId> {
        let shapes = doc.query_selector_all(&self.selector);
        for (index, &shape) in shapes.iter().enumerate() {
            let transform = self.offset(index, x, y, viewport).to_transform();
            doc.set_style(shape, "transform", &transform);
        }
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    #[test]
    fn test_offsets_scale_with_index() {
        let parallax = Parallax::from_config(&ParallaxConfig::default()).unwrap();
        let viewport = Viewport::new(1000.0, 800.0);

        let first = parallax.offset(0, 700.0, 300.0, &viewport);
        assert!((first.x - 2.0).abs() < 1e-9);
        assert!((first.y + 1.0).abs() < 1e-9);
        assert!((first.rotate - 0.2).abs() < 1e-9);

        let third = parallax.offset(2, 700.0, 300.0, &viewport);
        assert!((third.x - 6.0).abs() < 1e-9);
        assert!((third.y + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_writes_transforms() {
        let mut doc = Document::new();
        let body = doc.body();
        let holder = doc.append(body, ElementSpec::new("div").class("floating-shapes"));
        let a = doc.append(holder, ElementSpec::new("div").class("shape"));
        let b = doc.append(holder, ElementSpec::new("div").class("shape"));
        // Outside the container: not a parallax shape
        let stray = doc.append(body, ElementSpec::new("div").class("shape"));

        let parallax = Parallax::from_config(&ParallaxConfig::default()).unwrap();
        let viewport = Viewport::new(1000.0, 800.0);
        let touched = parallax.apply(&mut doc, 500.0, 400.0, &viewport);

        assert_eq!(touched, vec![a, b]);
        assert_eq!(doc.style(a, "transform"), Some("translate(0px, 0px) rotate(0deg)"));
        assert!(doc.style(stray, "transform").is_none());

        parallax.apply(&mut doc, 600.0, 400.0, &viewport);
        assert_eq!(doc.style(b, "transform"), Some("translate(2px, 0px) rotate(0.2deg)"));
    }
}
