//! Easing curves for anchor scrolling. All map [0, 1] onto [0, 1].

pub use crate::config::EasingType;

impl EasingType {
    /// Eased position for linear progress `t`; out-of-range input is clamped
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let rest = 1.0 - t;
        match self {
            // Hold the start until the very end, then snap
            EasingType::None => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - rest.powi(3),
            EasingType::Quintic => 1.0 - rest.powi(5),
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - 2.0_f64.powf(-10.0 * t),
        }
    }
}
