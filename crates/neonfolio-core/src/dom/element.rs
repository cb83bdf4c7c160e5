use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an element, assigned on insertion and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Layout box in document coordinates (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, `None` when the rects are disjoint.
    /// Edge-adjacent rects produce a zero-area intersection.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        if bottom < top || right < left {
            return None;
        }
        Some(Rect::new(top, left, right - left, bottom - top))
    }
}

/// A single element node
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) tag: String,
    pub(crate) html_id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) styles: BTreeMap<String, String>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) rect: Rect,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `id` attribute, if any
    pub fn html_id(&self) -> Option<&str> {
        self.html_id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute lookup; `id` and `class` resolve to their dedicated fields
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.html_id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "class" => None,
            _ => self.attributes.get(name).cloned(),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "id" => self.html_id.is_some(),
            "class" => !self.classes.is_empty(),
            _ => self.attributes.contains_key(name),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Short human label such as `section#about.fade-in`
    pub fn label(&self) -> String {
        let mut label = self.tag.clone();
        if let Some(id) = &self.html_id {
            label.push('#');
            label.push_str(id);
        }
        for class in &self.classes {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

/// Description of an element to insert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 0.0, 100.0, 100.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.top, 50.0);
        assert_eq!(i.height, 50.0);
        assert_eq!(i.area(), 5000.0);

        let far = Rect::new(300.0, 0.0, 10.0, 10.0);
        assert!(a.intersection(&far).is_none());

        // Edge-adjacent boxes still intersect with zero area
        let touching = Rect::new(100.0, 0.0, 100.0, 10.0);
        assert_eq!(a.intersection(&touching).unwrap().area(), 0.0);
    }

    #[test]
    fn test_spec_builder_and_label() {
        let spec = ElementSpec::new("section")
            .id("about")
            .class("fade-in")
            .attr("title", "About me");
        assert_eq!(spec.id.as_deref(), Some("about"));
        assert_eq!(spec.classes, vec!["fade-in".to_string()]);
        assert_eq!(spec.attributes.get("title").map(String::as_str), Some("About me"));
    }
}
