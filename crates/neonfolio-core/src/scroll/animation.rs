//! Scroll offset animator used by anchor navigation.

use std::time::Duration;

use super::easing::EasingType;
use super::timing::Tween;
use crate::config::ScrollConfig;

/// Tracks the document offset and, while animating, the tween towards a target.
///
/// `start` begins (or retargets) an animation; `step` is called once per
/// animation frame and returns the offset to apply.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    smooth: bool,
    duration: Duration,
    easing: EasingType,
    offset: f64,
    tween: Option<Tween>,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl ScrollAnimator {
    pub fn new(config: &ScrollConfig) -> Self {
        let duration = Duration::from_millis(config.animation_duration_ms);
        Self {
            smooth: config.smooth_enabled && !duration.is_zero(),
            duration,
            easing: config.easing,
            offset: 0.0,
            tween: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Last offset produced
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Where the current animation ends, or the offset when idle
    pub fn target(&self) -> f64 {
        self.tween.map_or(self.offset, |t| t.to)
    }

    /// Adopt an offset set by someone else, abandoning any animation
    pub fn sync(&mut self, offset: f64) {
        self.tween = None;
        self.offset = offset;
    }

    /// Head for `target` (clamped to the scroll range). A running animation
    /// continues from wherever it currently is. Returns whether frames are needed.
    pub fn start(&mut self, target: f64, max_scroll: f64, now: Duration) -> bool {
        let target = target.clamp(0.0, max_scroll.max(0.0));
        if !self.smooth || (target - self.offset).abs() < f64::EPSILON {
            self.offset = target;
            self.tween = None;
            return false;
        }

        self.tween = Some(Tween {
            from: self.offset,
            to: target,
            start: now,
            duration: self.duration,
            easing: self.easing,
        });
        true
    }

    /// Offset for the frame at `now`
    pub fn step(&mut self, max_scroll: f64, now: Duration) -> f64 {
        let Some(tween) = self.tween else {
            return self.offset;
        };
        self.offset = tween.sample(now).min(max_scroll.max(0.0));
        if tween.is_finished(now) {
            self.tween = None;
        }
        self.offset
    }
}
