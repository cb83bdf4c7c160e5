//! Hides native hint overlays and strips tooltip attributes such as `title`.

use std::time::Duration;

use tracing::debug;

use crate::config::OverlayConfig;
use crate::dom::{Document, SelectorList};
use crate::task::Task;
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

#[derive(Debug, Clone)]
enum Rule {
    Hide(SelectorList),
    StripAttribute(SelectorList, String),
}

#[derive(Debug, Clone)]
pub struct OverlaySuppressor {
    rules: Vec<Rule>,
    interval: Duration,
    settle: Duration,
    interval_timer: Option<TimerId>,
    settle_timer: Option<TimerId>,
}

impl OverlaySuppressor {
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        let rules = config
            .selectors
            .iter()
            .map(|s| -> Result<Rule> {
                let selector = SelectorList::parse(s)?;
                let strip = selector
                    .bare_attribute()
                    .filter(|name| config.strip_attributes.iter().any(|a| a == name))
                    .map(str::to_string);
                Ok(match strip {
                    Some(name) => Rule::StripAttribute(selector, name),
                    None => Rule::Hide(selector),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            interval: Duration::from_millis(config.interval_ms),
            settle: Duration::from_millis(config.settle_ms),
            interval_timer: None,
            settle_timer: None,
        })
    }

    /// Arm the periodic rescan
    pub fn start(&mut self, timers: &mut TimerQueue<Task>) {
        if let Some(previous) = self.interval_timer.take() {
            timers.cancel(previous);
        }
        self.interval_timer = Some(timers.schedule_repeating(self.interval, Task::ScanOverlays));
    }

    /// Structural change: rescan once things settle
    pub fn on_structure_change(&mut self, timers: &mut TimerQueue<Task>) {
        if let Some(previous) = self.settle_timer.take() {
            timers.cancel(previous);
        }
        self.settle_timer = Some(timers.schedule(self.settle, Task::ScanOverlays));
    }

    /// Bookkeeping for a fired scan timer
    pub fn on_timer(&mut self, timer: TimerId) {
        if self.settle_timer == Some(timer) {
            self.settle_timer = None;
        }
    }

    /// Hide or strip every matching element. Returns how many matched.
    pub fn scan(&self, doc: &mut Document) -> usize {
        let mut matched = 0;
        for rule in &self.rules {
            match rule {
                Rule::Hide(selector) => {
                    for id in doc.query_selector_all(selector) {
                        doc.set_style(id, "display", "none");
                        doc.set_style(id, "visibility", "hidden");
                        doc.set_style(id, "opacity", "0");
                        matched += 1;
                    }
                }
                Rule::StripAttribute(selector, name) => {
                    for id in doc.query_selector_all(selector) {
                        doc.remove_attribute(id, name);
                        matched += 1;
                    }
                }
            }
        }
        if matched > 0 {
            debug!(matched, "overlay elements suppressed");
        }
        matched
    }
}
