use crate::core::geo::{LatLng, Point};

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Easing curves available to camera transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    Linear,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Interpolates in Web Mercator space so the path is a straight line on screen
    pub fn mercator_lat_lng(start: &LatLng, end: &LatLng, t: f64) -> LatLng {
        let from = start.to_mercator();
        let to = end.to_mercator();
        LatLng::from_mercator(from.lerp(&to, t))
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        assert_eq!(Interpolation::linear(0.0, 10.0, 0.5), 5.0);
        assert_eq!(Interpolation::linear(0.0, 10.0, 0.0), 0.0);
        assert_eq!(Interpolation::linear(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseOutQuad,
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseOutCubic,
            EasingFunction::EaseInOutCubic,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!(EasingFunction::EaseOutQuad.apply(0.5) > 0.5);
    }

    #[test]
    fn test_mercator_interpolation_endpoints() {
        let start = LatLng::new(10.0, 10.0);
        let end = LatLng::new(50.0, 20.0);

        let at_start = Interpolation::mercator_lat_lng(&start, &end, 0.0);
        let at_end = Interpolation::mercator_lat_lng(&start, &end, 1.0);

        assert!((at_start.lat - start.lat).abs() < 1e-9);
        assert!((at_end.lat - end.lat).abs() < 1e-9);
        assert!((at_end.lng - end.lng).abs() < 1e-9);
    }
}
