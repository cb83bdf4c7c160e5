//! Debounced show/hide of the `visible` class driven by intersection entries.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::config::{CardConfig, RevealConfig};
use crate::dom::{Document, ElementId};
use crate::task::{RevealAction, RevealGroup, Task};
use crate::timer::{TimerId, TimerQueue};
use crate::viewport::IntersectionEntry;

/// Class toggled on revealed elements
pub const VISIBLE_CLASS: &str = "visible";

/// How show/hide delays are chosen for an entry
#[derive(Debug, Clone, PartialEq)]
pub enum RevealPolicy {
    /// Same delays for every element
    Uniform { show: Duration, hide: Duration },
    /// Show delay grows with the entry's position in its batch
    Staggered {
        base: Duration,
        stagger: Duration,
        hide: Duration,
    },
}

impl RevealPolicy {
    pub fn delay(&self, action: RevealAction, batch_index: usize) -> Duration {
        match (self, action) {
            (RevealPolicy::Uniform { show, .. }, RevealAction::Show) => *show,
            (RevealPolicy::Uniform { hide, .. }, RevealAction::Hide) => *hide,
            (RevealPolicy::Staggered { base, stagger, .. }, RevealAction::Show) => {
                *base + *stagger * batch_index as u32
            }
            (RevealPolicy::Staggered { hide, .. }, RevealAction::Hide) => *hide,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevealScheduler {
    group: RevealGroup,
    policy: RevealPolicy,
    show_ratio: f64,
    hide_ratio: f64,
    /// At most one pending timer per element
    pending: HashMap<ElementId, TimerId>,
}

impl RevealScheduler {
    pub fn new(group: RevealGroup, policy: RevealPolicy, show_ratio: f64, hide_ratio: f64) -> Self {
        Self {
            group,
            policy,
            show_ratio,
            hide_ratio,
            pending: HashMap::new(),
        }
    }

    /// Scheduler for section content (`.fade-in`, `.slide-in-*`, `.scale-in`)
    pub fn sections(config: &RevealConfig) -> Self {
        Self::new(
            RevealGroup::Sections,
            RevealPolicy::Uniform {
                show: Duration::from_millis(config.show_delay_ms),
                hide: Duration::from_millis(config.hide_delay_ms),
            },
            config.show_ratio,
            config.hide_ratio,
        )
    }

    /// Staggered scheduler for certificate cards
    pub fn cards(config: &CardConfig, reveal: &RevealConfig) -> Self {
        Self::new(
            RevealGroup::Cards,
            RevealPolicy::Staggered {
                base: Duration::from_millis(config.base_delay_ms),
                stagger: Duration::from_millis(config.stagger_ms),
                hide: Duration::from_millis(config.hide_delay_ms),
            },
            reveal.show_ratio,
            reveal.hide_ratio,
        )
    }

    pub fn group(&self) -> RevealGroup {
        self.group
    }

    /// Classify one entry. `None` inside the hysteresis band.
    pub fn decide(&self, entry: &IntersectionEntry) -> Option<RevealAction> {
        if entry.is_intersecting && entry.ratio > self.show_ratio {
            Some(RevealAction::Show)
        } else if !entry.is_intersecting || entry.ratio < self.hide_ratio {
            Some(RevealAction::Hide)
        } else {
            None
        }
    }

    /// Handle one observer batch.
    ///
    /// Every entry first cancels the element's pending timer, then schedules a
    /// new one unless the ratio sits in the hysteresis band.
    pub fn handle(&mut self, entries: &[IntersectionEntry], timers: &mut TimerQueue<Task>) {
        for (index, entry) in entries.iter().enumerate() {
            if let Some(previous) = self.pending.remove(&entry.target) {
                timers.cancel(previous);
            }

            let Some(action) = self.decide(entry) else {
                debug!(
                    group = self.group.as_str(),
                    element = %entry.target,
                    ratio = entry.ratio,
                    "ratio in hysteresis band"
                );
                continue;
            };

            let delay = self.policy.delay(action, index);
            let timer = timers.schedule(
                delay,
                Task::Reveal {
                    group: self.group,
                    element: entry.target,
                    action,
                },
            );
            debug!(
                group = self.group.as_str(),
                element = %entry.target,
                ?action,
                delay_ms = delay.as_millis() as u64,
                "reveal scheduled"
            );
            self.pending.insert(entry.target, timer);
        }
    }

    /// Apply a fired reveal timer to the document
    pub fn complete(&mut self, timer: TimerId, element: ElementId, action: RevealAction, doc: &mut Document) {
        if self.pending.get(&element) == Some(&timer) {
            self.pending.remove(&element);
        }
        match action {
            RevealAction::Show => doc.add_class(element, VISIBLE_CLASS),
            RevealAction::Hide => doc.remove_class(element, VISIBLE_CLASS),
        }
    }

    /// Number of elements with a pending show or hide
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, element: ElementId) -> bool {
        self.pending.contains_key(&element)
    }
}
