//! Scroll-triggered reveal animations.
//!
//! A [`RevealController`] pairs an intersection observer with a debounced
//! [`RevealScheduler`]. The page owns two: one for section content and a
//! staggered one for certificate cards.

mod scheduler;

pub use scheduler::{RevealPolicy, RevealScheduler, VISIBLE_CLASS};

use tracing::debug;

use crate::dom::{Document, ElementId, SelectorList};
use crate::task::{RevealAction, RevealGroup, Task};
use crate::timer::{TimerId, TimerQueue};
use crate::viewport::{IntersectionEntry, IntersectionObserver, Viewport};

#[derive(Debug, Clone)]
pub struct RevealController {
    selector: SelectorList,
    observer: IntersectionObserver,
    scheduler: RevealScheduler,
}

impl RevealController {
    pub fn new(selector: SelectorList, observer: IntersectionObserver, scheduler: RevealScheduler) -> Self {
        Self {
            selector,
            observer,
            scheduler,
        }
    }

    pub fn group(&self) -> RevealGroup {
        self.scheduler.group()
    }

    /// Observe every element currently matching the selector.
    /// Returns how many targets are observed in total.
    pub fn register(&mut self, doc: &Document) -> usize {
        for id in doc.query_selector_all(&self.selector) {
            self.observer.observe(id);
        }
        debug!(
            group = self.group().as_str(),
            targets = self.observer.targets().len(),
            "reveal targets registered"
        );
        self.observer.targets().len()
    }

    pub fn targets(&self) -> &[ElementId] {
        self.observer.targets()
    }

    /// Recompute intersections and schedule for whatever changed
    pub fn evaluate(&mut self, doc: &Document, viewport: &Viewport, timers: &mut TimerQueue<Task>) {
        let entries = self.observer.take_records(doc, viewport);
        if !entries.is_empty() {
            self.deliver(&entries, timers);
        }
    }

    /// Feed entries computed by the host
    pub fn deliver(&mut self, entries: &[IntersectionEntry], timers: &mut TimerQueue<Task>) {
        let known: Vec<IntersectionEntry> = entries
            .iter()
            .filter(|e| self.observer.targets().contains(&e.target))
            .copied()
            .collect();
        self.scheduler.handle(&known, timers);
    }

    pub fn complete(&mut self, timer: TimerId, element: ElementId, action: RevealAction, doc: &mut Document) {
        self.scheduler.complete(timer, element, action, doc);
    }

    pub fn pending(&self) -> usize {
        self.scheduler.pending()
    }
}
