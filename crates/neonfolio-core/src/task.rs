use crate::dom::ElementId;

/// Which reveal observer owns a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealGroup {
    Sections,
    Cards,
}

impl RevealGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealGroup::Sections => "sections",
            RevealGroup::Cards => "cards",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    Show,
    Hide,
}

/// Deferred work carried by page timers
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Reveal {
        group: RevealGroup,
        element: ElementId,
        action: RevealAction,
    },
    /// Recompute scroll direction from the offset captured at scroll time
    SettleDirection { offset: f64 },
    ScanOverlays,
    Glitch,
    ResetGlitch,
    FadeIn,
    ScrollFrame,
}
