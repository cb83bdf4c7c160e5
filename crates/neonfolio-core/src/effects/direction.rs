use std::time::Duration;

use serde::Serialize;
use tracing::trace;

use crate::dom::Document;
use crate::task::Task;
use crate::timer::{TimerId, TimerQueue};

/// Attribute on `body` exposing the settled direction to stylesheets
pub const DIRECTION_ATTRIBUTE: &str = "data-scroll-direction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}

/// Debounced scroll direction
#[derive(Debug, Clone)]
pub struct DirectionTracker {
    debounce: Duration,
    last_offset: f64,
    direction: ScrollDirection,
    pending: Option<TimerId>,
}

impl DirectionTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_offset: 0.0,
            direction: ScrollDirection::Down,
            pending: None,
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }

    /// Restart the debounce window for a scroll to `offset`
    pub fn on_scroll(&mut self, offset: f64, timers: &mut TimerQueue<Task>) {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        self.pending = Some(timers.schedule(self.debounce, Task::SettleDirection { offset }));
    }

    /// Apply a settled scroll offset and publish the direction on `body`
    pub fn settle(&mut self, timer: TimerId, offset: f64, doc: &mut Document) -> ScrollDirection {
        if self.pending == Some(timer) {
            self.pending = None;
        }
        self.direction = if offset > self.last_offset {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        self.last_offset = offset.max(0.0);
        trace!(offset, direction = self.direction.as_str(), "scroll direction settled");
        let body = doc.body();
        doc.set_attribute(body, DIRECTION_ATTRIBUTE, self.direction.as_str());
        self.direction
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle_all(tracker: &mut DirectionTracker, timers: &mut TimerQueue<Task>, doc: &mut Document, until: Duration) {
        while let Some(fired) = timers.pop_due(until) {
            if let Task::SettleDirection { offset } = fired.task {
                tracker.settle(fired.id, offset, doc);
            }
        }
    }

    #[test]
    fn test_down_then_up() {
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();
        let mut tracker = DirectionTracker::new(Duration::from_millis(10));

        tracker.on_scroll(50.0, &mut timers);
        settle_all(&mut tracker, &mut timers, &mut doc, Duration::from_millis(20));
        assert_eq!(tracker.direction(), ScrollDirection::Down);
        assert_eq!(doc.attribute(doc.body(), DIRECTION_ATTRIBUTE).as_deref(), Some("down"));

        tracker.on_scroll(30.0, &mut timers);
        settle_all(&mut tracker, &mut timers, &mut doc, Duration::from_millis(40));
        assert_eq!(tracker.direction(), ScrollDirection::Up);
        assert_eq!(doc.attribute(doc.body(), DIRECTION_ATTRIBUTE).as_deref(), Some("up"));
    }

    #[test]
    fn test_burst_settles_once_on_last_offset() {
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();
        let mut tracker = DirectionTracker::new(Duration::from_millis(10));

        for offset in [10.0, 20.0, 5.0] {
            tracker.on_scroll(offset, &mut timers);
        }
        assert_eq!(timers.pending(), 1);
        settle_all(&mut tracker, &mut timers, &mut doc, Duration::from_millis(10));
        assert_eq!(tracker.last_offset(), 5.0);
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_negative_offset_clamps_to_zero() {
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();
        let mut tracker = DirectionTracker::new(Duration::from_millis(10));

        tracker.on_scroll(-40.0, &mut timers);
        settle_all(&mut tracker, &mut timers, &mut doc, Duration::from_millis(10));
        assert_eq!(tracker.direction(), ScrollDirection::Up);
        assert_eq!(tracker.last_offset(), 0.0);
    }

    #[test]
    fn test_unchanged_offset_reads_as_up() {
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();
        let mut tracker = DirectionTracker::new(Duration::from_millis(10));
        tracker.on_scroll(0.0, &mut timers);
        settle_all(&mut tracker, &mut timers, &mut doc, Duration::from_millis(10));
        assert_eq!(tracker.direction(), ScrollDirection::Up);
    }
}
