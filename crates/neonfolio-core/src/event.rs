use serde::{Deserialize, Serialize};

use crate::dom::{ElementId, ElementSpec};
use crate::task::RevealGroup;
use crate::viewport::IntersectionEntry;

/// A key press as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key name, e.g. `F12`, `u`, `I`
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Events a host dispatches into the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Document parsed; starts every feature
    DomContentLoaded,
    /// Document scrolled to `offset` by the user
    Scroll { offset: f64 },
    PointerMove { x: f64, y: f64 },
    /// Observer entries computed by the host instead of the built-in geometry
    Intersection {
        group: RevealGroup,
        entries: Vec<IntersectionEntry>,
    },
    Click { target: ElementId },
    KeyDown(KeyPress),
    Resize { width: f64, height: f64 },
    /// Structural change: append a new element (to `body` when no parent)
    InsertElement {
        parent: Option<ElementId>,
        spec: ElementSpec,
    },
    SetAttribute {
        target: ElementId,
        name: String,
        value: String,
    },
}

impl PageEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::DomContentLoaded => "loaded",
            PageEvent::Scroll { .. } => "scroll",
            PageEvent::PointerMove { .. } => "pointer_move",
            PageEvent::Intersection { .. } => "intersection",
            PageEvent::Click { .. } => "click",
            PageEvent::KeyDown(_) => "key_down",
            PageEvent::Resize { .. } => "resize",
            PageEvent::InsertElement { .. } => "insert",
            PageEvent::SetAttribute { .. } => "set_attribute",
        }
    }
}

/// What the page did with an event's default action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl DispatchOutcome {
    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: false,
        }
    }

    pub fn blocked() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: true,
        }
    }
}
