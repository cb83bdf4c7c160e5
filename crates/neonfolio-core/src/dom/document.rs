use serde::{Deserialize, Serialize};
use tracing::trace;

use super::element::{Element, ElementId, ElementSpec, Rect};
use super::selector::SelectorList;
use crate::{Error, Result};

/// A change applied to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    ClassAdded { element: ElementId, class: String },
    ClassRemoved { element: ElementId, class: String },
    AttributeSet { element: ElementId, name: String, value: String },
    AttributeRemoved { element: ElementId, name: String },
    StyleSet { element: ElementId, property: String, value: String },
    ChildInserted { parent: ElementId, child: ElementId },
}

impl Mutation {
    pub fn element(&self) -> ElementId {
        match self {
            Mutation::ClassAdded { element, .. }
            | Mutation::ClassRemoved { element, .. }
            | Mutation::AttributeSet { element, .. }
            | Mutation::AttributeRemoved { element, .. }
            | Mutation::StyleSet { element, .. } => *element,
            Mutation::ChildInserted { child, .. } => *child,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Mutation::ChildInserted { .. })
    }
}

/// In-memory element tree with a change journal.
///
/// Every setter is a no-op (and records nothing) when the value is unchanged,
/// so re-applying the same effect never produces journal entries.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    body: ElementId,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing `html` and `body`
    pub fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            root: ElementId(0),
            body: ElementId(0),
            journal: Vec::new(),
        };
        let root = doc.alloc(ElementSpec::new("html"), None);
        let body = doc.alloc(ElementSpec::new("body"), Some(root));
        doc.root = root;
        doc.body = body;
        doc
    }

    fn alloc(&mut self, spec: ElementSpec, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            id,
            tag: spec.tag.to_ascii_lowercase(),
            html_id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            styles: Default::default(),
            parent,
            children: Vec::new(),
            rect: spec.rect,
        });
        if let Some(parent) = parent {
            self.elements[parent.0 as usize].children.push(id);
        }
        id
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0 as usize)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(Element::parent)
    }

    /// Append a new element as the last child of `parent`.
    /// Falls back to `body` when `parent` does not exist.
    pub fn append(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let parent = if self.get(parent).is_some() { parent } else { self.body };
        let child = self.alloc(spec, Some(parent));
        self.journal.push(Mutation::ChildInserted { parent, child });
        child
    }

    /// Append under the element whose `id` attribute equals `parent_html_id`
    pub fn append_to_id(&mut self, parent_html_id: &str, spec: ElementSpec) -> Result<ElementId> {
        let parent = self
            .find_by_html_id(parent_html_id)
            .ok_or_else(|| Error::Other(format!("no element with id '{}'", parent_html_id)))?;
        Ok(self.append(parent, spec))
    }

    pub fn find_by_html_id(&self, html_id: &str) -> Option<ElementId> {
        self.iter().find(|e| e.html_id() == Some(html_id)).map(Element::id)
    }

    /// Elements in tree order (pre-order from the root)
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.tree_order().into_iter().filter_map(move |id| self.get(id))
    }

    fn tree_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        order
    }

    pub fn query_selector_all(&self, selector: &SelectorList) -> Vec<ElementId> {
        self.tree_order()
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    pub fn query_selector(&self, selector: &SelectorList) -> Option<ElementId> {
        self.tree_order()
            .into_iter()
            .find(|&id| selector.matches(self, id))
    }

    /// Parse and run a selector in one step
    pub fn select(&self, selector: &str) -> Result<Vec<ElementId>> {
        Ok(self.query_selector_all(&SelectorList::parse(selector)?))
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if element.has_class(class) {
            return;
        }
        element.classes.push(class.to_string());
        trace!(element = %id, class, "class added");
        self.journal.push(Mutation::ClassAdded {
            element: id,
            class: class.to_string(),
        });
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        let before = element.classes.len();
        element.classes.retain(|c| c != class);
        if element.classes.len() == before {
            return;
        }
        trace!(element = %id, class, "class removed");
        self.journal.push(Mutation::ClassRemoved {
            element: id,
            class: class.to_string(),
        });
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.get(id).and_then(|e| e.attribute(name))
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        match name {
            "id" => {
                if element.html_id.as_deref() == Some(value) {
                    return;
                }
                element.html_id = Some(value.to_string());
            }
            "class" => {
                let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                if element.classes == classes {
                    return;
                }
                element.classes = classes;
            }
            _ => {
                if element.attributes.get(name).map(String::as_str) == Some(value) {
                    return;
                }
                element.attributes.insert(name.to_string(), value.to_string());
            }
        }
        self.journal.push(Mutation::AttributeSet {
            element: id,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        let removed = match name {
            "id" => element.html_id.take().is_some(),
            "class" => !std::mem::take(&mut element.classes).is_empty(),
            _ => element.attributes.remove(name).is_some(),
        };
        if removed {
            self.journal.push(Mutation::AttributeRemoved {
                element: id,
                name: name.to_string(),
            });
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.style(property))
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if element.styles.get(property).map(String::as_str) == Some(value) {
            return;
        }
        element.styles.insert(property.to_string(), value.to_string());
        self.journal.push(Mutation::StyleSet {
            element: id,
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(Element::rect)
    }

    /// Lowest bottom edge of any laid-out element
    pub fn document_height(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.rect.bottom())
            .fold(0.0, f64::max)
    }

    /// Drain the change journal
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.journal.is_empty()
    }

    pub fn label(&self, id: ElementId) -> String {
        self.get(id)
            .map(Element::label)
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(doc.body()).unwrap().tag(), "body");
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
    }

    #[test]
    fn test_tree_order_query() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.append(body, ElementSpec::new("section").class("fade-in"));
        let second = doc.append(body, ElementSpec::new("section").class("fade-in"));
        // Inserted later but nested under the first section
        let nested = doc.append(first, ElementSpec::new("div").class("fade-in"));

        let found = doc.select(".fade-in").unwrap();
        assert_eq!(found, vec![first, nested, second]);
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut doc = Document::new();
        let body = doc.body();
        let el = doc.append(body, ElementSpec::new("div").attr("title", "hint"));
        doc.take_mutations();

        doc.add_class(el, "visible");
        doc.add_class(el, "visible");
        doc.set_style(el, "opacity", "0");
        doc.set_style(el, "opacity", "0");
        doc.remove_attribute(el, "title");
        doc.remove_attribute(el, "title");
        doc.remove_class(el, "missing");

        let mutations = doc.take_mutations();
        assert_eq!(mutations.len(), 3);
        assert!(doc.has_class(el, "visible"));
        assert_eq!(doc.style(el, "opacity"), Some("0"));
        assert!(doc.attribute(el, "title").is_none());
    }

    #[test]
    fn test_append_records_structural_change() {
        let mut doc = Document::new();
        let body = doc.body();
        let child = doc.append(body, ElementSpec::new("span"));
        let mutations = doc.take_mutations();
        assert_eq!(mutations, vec![Mutation::ChildInserted { parent: body, child }]);
        assert!(mutations[0].is_structural());
    }

    #[test]
    fn test_append_to_unknown_id_fails() {
        let mut doc = Document::new();
        assert!(doc.append_to_id("nope", ElementSpec::new("div")).is_err());
        let body = doc.body();
        doc.set_attribute(body, "id", "page");
        assert!(doc.append_to_id("page", ElementSpec::new("div")).is_ok());
    }

    #[test]
    fn test_document_height() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, ElementSpec::new("div").rect(Rect::new(0.0, 0.0, 10.0, 500.0)));
        doc.append(body, ElementSpec::new("div").rect(Rect::new(800.0, 0.0, 10.0, 400.0)));
        assert_eq!(doc.document_height(), 1200.0);
    }
}
