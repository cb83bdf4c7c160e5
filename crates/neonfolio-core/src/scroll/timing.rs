//! One eased transition between two scroll offsets on the virtual clock.

use std::time::Duration;

use super::easing::EasingType;

/// Animation frame period for `fps`; 0 means 60fps
pub fn frame_period(fps: u32) -> Duration {
    match fps {
        0 => Duration::from_millis(16),
        fps => Duration::from_millis((1000 / u64::from(fps)).max(1)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: Duration,
    pub duration: Duration,
    pub easing: EasingType,
}

impl Tween {
    /// Linear progress in [0, 1] at `now`
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }

    /// Eased offset at `now`; exactly `to` once finished
    pub fn sample(&self, now: Duration) -> f64 {
        if self.is_finished(now) {
            return self.to;
        }
        let eased = self.easing.ease(self.progress(now));
        self.from + (self.to - self.from) * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tween(easing: EasingType) -> Tween {
        Tween {
            from: 1000.0,
            to: 0.0,
            start: ms(500),
            duration: ms(200),
            easing,
        }
    }

    #[test]
    fn test_sample_linear() {
        let t = tween(EasingType::Linear);
        assert_eq!(t.sample(ms(0)), 1000.0);
        assert!((t.sample(ms(550)) - 750.0).abs() < 1e-9);
        assert!(!t.is_finished(ms(699)));
        assert_eq!(t.sample(ms(700)), 0.0);
        assert_eq!(t.sample(ms(9000)), 0.0);
    }

    #[test]
    fn test_zero_duration_is_finished() {
        let t = Tween {
            duration: Duration::ZERO,
            ..tween(EasingType::Cubic)
        };
        assert_eq!(t.progress(ms(500)), 1.0);
        assert_eq!(t.sample(ms(500)), 0.0);
    }

    #[test]
    fn test_frame_period() {
        assert_eq!(frame_period(60), ms(16));
        assert_eq!(frame_period(0), ms(16));
        assert_eq!(frame_period(30), ms(33));
        assert_eq!(frame_period(5000), ms(1));
    }
}
