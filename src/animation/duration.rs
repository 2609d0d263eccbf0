//! Transition length as a function of how far the zoom level changes

use crate::core::config::DurationConfig;

/// Linear zoom-span → seconds model.
///
/// `min + |zoom_a - zoom_b| * (max - min) / max_zoom_span`. The result is not
/// clamped; callers needing a hard ceiling clamp the zoom span first.
pub fn duration_for(
    zoom_a: f64,
    zoom_b: f64,
    max_duration: f64,
    min_duration: f64,
    max_zoom_span: f64,
) -> f64 {
    min_duration + (zoom_a - zoom_b).abs() * (max_duration - min_duration) / max_zoom_span
}

/// Duration model bound to one [`DurationConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct DurationModel {
    config: DurationConfig,
}

impl DurationModel {
    pub fn new(config: DurationConfig) -> Self {
        Self { config }
    }

    /// Length of the move into a focused marker
    pub fn focus(&self, from_zoom: f64, to_zoom: f64) -> f64 {
        self.with_max(from_zoom, to_zoom, self.config.max_duration)
    }

    /// Length of the trip back after the popup closes
    pub fn return_trip(&self, from_zoom: f64, to_zoom: f64) -> f64 {
        self.with_max(from_zoom, to_zoom, self.config.return_max_duration)
    }

    fn with_max(&self, zoom_a: f64, zoom_b: f64, max_duration: f64) -> f64 {
        duration_for(
            zoom_a,
            zoom_b,
            max_duration,
            self.config.min_duration,
            self.config.max_zoom_span,
        )
    }

    pub fn config(&self) -> &DurationConfig {
        &self.config
    }
}

impl Default for DurationModel {
    fn default() -> Self {
        Self::new(DurationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_same_zoom_takes_min_duration() {
        assert!((DurationModel::default().focus(10.0, 10.0) - 0.05).abs() < EPS);
    }

    #[test]
    fn test_full_span_takes_max_duration() {
        assert!((DurationModel::default().focus(0.0, 17.0) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_half_span_is_midpoint() {
        let midpoint = (0.05 + 2.0) / 2.0;
        let duration = DurationModel::default().focus(8.0, 16.0);
        // 8 of 17 levels: just under the midpoint
        assert!((duration - midpoint).abs() < 0.1, "got {duration}");
        assert!((duration - (0.05 + 8.0 * 1.95 / 17.0)).abs() < EPS);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let model = DurationModel::default();
        assert_eq!(model.focus(4.0, 12.0), model.focus(12.0, 4.0));
    }

    #[test]
    fn test_return_trip_uses_shorter_cap() {
        let model = DurationModel::default();
        assert!((model.return_trip(0.0, 17.0) - 1.0).abs() < EPS);
        assert!(model.return_trip(6.0, 16.0) < model.focus(6.0, 16.0));
    }

    #[test]
    fn test_no_clamp_beyond_span() {
        assert!(duration_for(0.0, 19.0, 2.0, 0.05, 17.0) > 2.0);
    }
}
