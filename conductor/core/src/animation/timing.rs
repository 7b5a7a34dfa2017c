//! Easing Curves
//!
//! Easing functions for reel motion. Surfaces that interpolate on their own
//! (CSS transitions) use [`EasingFunction::css_timing_function`]; surfaces
//! that step frames themselves use [`EasingFunction::apply`].

use serde::{Deserialize, Serialize};

/// Easing functions for smooth animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EasingFunction {
    /// No easing (constant speed)
    Linear,

    /// Slow start, fast end
    EaseIn,

    /// Fast start, slow end
    #[default]
    EaseOut,

    /// Slow start and end
    EaseInOut,

    /// Cubic ease out, a longer settle than [`EasingFunction::EaseOut`]
    EaseOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Whether the curve slows down towards the end
    #[must_use]
    pub fn decelerates(self) -> bool {
        matches!(self, Self::EaseOut | Self::EaseOutCubic | Self::EaseInOut)
    }

    /// Equivalent CSS `transition-timing-function`
    #[must_use]
    pub fn css_timing_function(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::EaseOutCubic => "cubic-bezier(0.33, 1, 0.68, 1)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_linear() {
        assert!((EasingFunction::Linear.apply(0.0)).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(0.5) - 0.5).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_easing_boundaries() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::EaseOutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < 0.001, "{easing:?} at 0.0");
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{easing:?} at 1.0");
            assert!(easing.apply(-3.0).abs() < 0.001, "{easing:?} clamps below");
        }
    }

    #[test]
    fn test_ease_out_front_loads_motion() {
        assert!(EasingFunction::EaseOut.apply(0.5) > 0.5);
        assert!(EasingFunction::EaseOutCubic.apply(0.5) > EasingFunction::EaseOut.apply(0.5));
        assert!(EasingFunction::EaseOut.decelerates());
        assert!(!EasingFunction::EaseIn.decelerates());
    }

    #[test]
    fn test_css_names() {
        assert_eq!(EasingFunction::default().css_timing_function(), "ease-out");
        assert_eq!(EasingFunction::Linear.css_timing_function(), "linear");
    }
}
