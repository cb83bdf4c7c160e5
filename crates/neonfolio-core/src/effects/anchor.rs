//! In-page anchor navigation with animated scrolling.

use std::time::Duration;

use tracing::debug;

use crate::config::ScrollConfig;
use crate::dom::{Document, ElementId, SelectorList};
use crate::scroll::{frame_period, ScrollAnimator};
use crate::task::Task;
use crate::timer::{TimerId, TimerQueue};
use crate::viewport::Viewport;
use crate::Result;

/// What the page must do after an anchor click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Not an anchor, or its target does not exist
    None,
    /// Jump straight to this offset
    Jump(f64),
    /// An animation is running; frames will follow
    Animate,
}

#[derive(Debug, Clone)]
pub struct SmoothScrollRouter {
    anchors: SelectorList,
    animator: ScrollAnimator,
    frame: Duration,
    frame_timer: Option<TimerId>,
}

impl SmoothScrollRouter {
    pub fn new(config: &ScrollConfig) -> Result<Self> {
        Ok(Self {
            anchors: SelectorList::parse("a[href^=\"#\"]")?,
            animator: ScrollAnimator::new(config),
            frame: frame_period(config.animation_fps),
            frame_timer: None,
        })
    }

    /// Nearest anchor at or above the clicked element
    pub fn anchor_for(&self, doc: &Document, target: ElementId) -> Option<ElementId> {
        let mut current = Some(target);
        while let Some(id) = current {
            if self.anchors.matches(doc, id) {
                return Some(id);
            }
            current = doc.parent(id);
        }
        None
    }

    /// Element referenced by the anchor's `href` fragment
    fn resolve(&self, doc: &Document, anchor: ElementId) -> Option<ElementId> {
        let href = doc.attribute(anchor, "href")?;
        match SelectorList::parse(&href) {
            Ok(selector) => doc.query_selector(&selector),
            Err(err) => {
                debug!(%href, %err, "anchor href is not a valid selector");
                None
            }
        }
    }

    /// Route a click on `anchor`, scrolling its target to the top of the viewport
    pub fn navigate(
        &mut self,
        doc: &Document,
        anchor: ElementId,
        viewport: &Viewport,
        timers: &mut TimerQueue<Task>,
    ) -> ScrollRequest {
        let Some(target) = self.resolve(doc, anchor) else {
            return ScrollRequest::None;
        };
        let Some(rect) = doc.rect(target) else {
            return ScrollRequest::None;
        };

        if !self.animator.is_animating() {
            self.animator.sync(viewport.scroll_y);
        }
        let animating = self.animator.start(rect.top, viewport.max_scroll(), timers.now());
        debug!(
            target = %doc.label(target),
            from = viewport.scroll_y,
            to = self.animator.target(),
            "anchor navigation"
        );

        if animating {
            if self.frame_timer.is_none() {
                self.frame_timer = Some(timers.schedule_repeating(self.frame, Task::ScrollFrame));
            }
            ScrollRequest::Animate
        } else {
            self.stop_frames(timers);
            ScrollRequest::Jump(self.animator.offset())
        }
    }

    /// Advance one animation frame, returning the new offset.
    /// Frames stop once the animation completes.
    pub fn frame(&mut self, viewport: &Viewport, timers: &mut TimerQueue<Task>) -> f64 {
        let offset = self.animator.step(viewport.max_scroll(), timers.now());
        if !self.animator.is_animating() {
            self.stop_frames(timers);
        }
        offset
    }

    /// User scrolling takes over from a running animation
    pub fn interrupt(&mut self, offset: f64, timers: &mut TimerQueue<Task>) {
        self.animator.sync(offset);
        self.stop_frames(timers);
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    fn stop_frames(&mut self, timers: &mut TimerQueue<Task>) {
        if let Some(timer) = self.frame_timer.take() {
            timers.cancel(timer);
        }
    }
}
