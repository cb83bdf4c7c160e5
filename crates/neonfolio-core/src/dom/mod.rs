mod document;
mod element;
pub mod selector;

pub use document::{Document, Mutation};
pub use element::{Element, ElementId, ElementSpec, Rect};
pub use selector::SelectorList;
