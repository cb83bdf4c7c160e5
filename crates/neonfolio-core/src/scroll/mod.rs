//! Smooth scrolling for in-page anchor navigation.
//!
//! `easing` holds the curves, `timing` a single [`Tween`] between two offsets,
//! and `animation` the [`ScrollAnimator`] that anchor clicks drive frame by frame.

pub mod animation;
pub mod easing;
pub mod timing;

pub use animation::ScrollAnimator;
pub use easing::EasingType;
pub use timing::{frame_period, Tween};
