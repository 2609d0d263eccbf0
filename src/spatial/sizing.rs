//! Cluster icon sizing
//!
//! Two sizing modes share one pixel band `[min_size, max_size]`:
//! population-weighted interpolation (a cluster holding every marker gets the
//! full size) and coarse small/medium/large buckets. The clustering radius
//! grows linearly with zoom over the same band.

use crate::core::{
    config::{ClusterSizeConfig, SizingMode},
    constants::{CLUSTER_LARGE_THRESHOLD, CLUSTER_MEDIUM_THRESHOLD},
    geo::Point,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse population class, also used as a CSS class on the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn for_count(child_count: usize) -> Self {
        if child_count < CLUSTER_MEDIUM_THRESHOLD {
            SizeClass::Small
        } else if child_count < CLUSTER_LARGE_THRESHOLD {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer needs to draw one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterIcon {
    /// Square icon edge in pixels
    pub size: f64,
    pub anchor: Point,
    pub class: SizeClass,
    pub child_count: usize,
    pub html: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterSizer {
    config: ClusterSizeConfig,
}

impl ClusterSizer {
    pub fn new(config: ClusterSizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterSizeConfig {
        &self.config
    }

    /// Icon edge in pixels for a cluster of `child_count` out of
    /// `total_marker_count` markers. Always inside the configured band.
    pub fn size(&self, child_count: usize, total_marker_count: usize) -> f64 {
        match self.config.mode {
            SizingMode::PopulationWeighted => {
                self.population_weighted(child_count, total_marker_count)
            }
            SizingMode::Bucketed => self.bucketed(child_count),
        }
    }

    /// Linear interpolation between the band edges by population share
    pub fn population_weighted(&self, child_count: usize, total_marker_count: usize) -> f64 {
        let (min, max) = (self.config.min_size, self.config.max_size);
        if total_marker_count == 0 || child_count >= total_marker_count {
            return max;
        }

        let count = child_count as f64;
        let total = total_marker_count as f64;
        ((min * (total - count) + max * count) / total).clamp(min, max)
    }

    pub fn bucketed(&self, child_count: usize) -> f64 {
        let (min, max) = (self.config.min_size, self.config.max_size);
        match SizeClass::for_count(child_count) {
            SizeClass::Small => min,
            SizeClass::Medium => (min + max) / 2.0,
            SizeClass::Large => max,
        }
    }

    /// Clustering radius in pixels for a zoom level.
    ///
    /// Grows from `min_size` at zoom 0 to `max_size` at `max_zoom_for_radius`
    /// and keeps growing past it.
    pub fn radius(&self, zoom: f64) -> f64 {
        let (min, max) = (self.config.min_size, self.config.max_size);
        if self.config.max_zoom_for_radius <= 0.0 {
            return max;
        }
        min + zoom * (max - min) / self.config.max_zoom_for_radius
    }

    /// Icon anchor: the rounded center of the square icon
    pub fn anchor(size: f64) -> Point {
        let half = (size / 2.0).round();
        Point::new(half, half)
    }

    /// Builds the icon for one cluster. `zoom` is carried for symmetry with
    /// [`ClusterSizer::radius`]; the size itself does not depend on it.
    pub fn icon(&self, child_count: usize, total_marker_count: usize, zoom: f64) -> ClusterIcon {
        let size = self.size(child_count, total_marker_count);
        let class = SizeClass::for_count(child_count);
        log::trace!(
            "cluster of {}/{} at zoom {:.1}: {:.2}px ({})",
            child_count,
            total_marker_count,
            zoom,
            size,
            class
        );

        ClusterIcon {
            size,
            anchor: Self::anchor(size),
            class,
            child_count,
            html: format!(
                r#"<div class="custom-cluster {class}" style="--cluster-size:{size}px" role="button" aria-label="{child_count} items">{child_count}</div>"#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> ClusterSizer {
        ClusterSizer::default()
    }

    #[test]
    fn test_whole_population_gets_max_size() {
        assert_eq!(sizer().size(100, 100), 50.0);
        assert_eq!(sizer().size(1, 1), 50.0);
    }

    #[test]
    fn test_single_marker_near_min_size() {
        let size = sizer().size(1, 100);
        assert!((size - 30.0) / 30.0 < 0.01, "got {size}");
        assert!(size >= 30.0);
    }

    #[test]
    fn test_size_monotone_in_count() {
        let sizer = sizer();
        let mut last = 0.0;
        for count in 1..=40 {
            let size = sizer.size(count, 40);
            assert!(size >= last);
            assert!((30.0..=50.0).contains(&size));
            last = size;
        }
    }

    #[test]
    fn test_degenerate_totals_stay_in_band() {
        let sizer = sizer();
        assert_eq!(sizer.size(0, 0), 50.0);
        assert_eq!(sizer.size(0, 10), 30.0);
        assert_eq!(sizer.size(12, 10), 50.0);
    }

    #[test]
    fn test_radius_follows_zoom() {
        let sizer = sizer();
        assert_eq!(sizer.radius(0.0), 30.0);
        assert_eq!(sizer.radius(17.0), 50.0);
        assert!((sizer.radius(8.5) - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_bucketed_mode() {
        let sizer = ClusterSizer::new(ClusterSizeConfig {
            mode: SizingMode::Bucketed,
            ..Default::default()
        });
        assert_eq!(sizer.size(2, 100), 30.0);
        assert_eq!(sizer.size(3, 100), 40.0);
        assert_eq!(sizer.size(9, 100), 40.0);
        assert_eq!(sizer.size(10, 100), 50.0);
    }

    #[test]
    fn test_icon_anchor_and_markup() {
        let icon = sizer().icon(5, 10, 12.0);
        assert_eq!(icon.size, 40.0);
        assert_eq!(icon.anchor, Point::new(20.0, 20.0));
        assert_eq!(icon.class, SizeClass::Medium);
        assert!(icon.html.contains("--cluster-size:40px"));
        assert!(icon.html.contains(r#"aria-label="5 items""#));

        let odd = sizer().icon(1, 3, 12.0);
        assert_eq!(odd.anchor.x, (odd.size / 2.0).round());
    }
}
