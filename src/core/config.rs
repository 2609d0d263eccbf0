//! Configuration for the focus camera, cluster icons and the map view
//!
//! Every section has defaults matching the constants in
//! [`crate::core::constants`], and every field may be omitted from a JSON
//! configuration file. Motion presets are resolved through [`MotionProfile`].

use crate::core::constants::*;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::{PhotoFocusError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoFocusConfig {
    pub reference: ReferencePoint,
    pub focus: FocusConfig,
    pub motion: MotionProfile,
    pub clusters: ClusterSizeConfig,
    pub clustering: ClusteringConfig,
    pub map: MapViewConfig,
}

impl PhotoFocusConfig {
    /// Parses a JSON configuration, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects values the camera and cluster maths cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.reference.position().is_finite() || !self.reference.position().is_valid() {
            return Err(PhotoFocusError::Config(format!(
                "reference point {:?} is not a valid coordinate",
                self.reference
            )));
        }
        if self.clusters.min_size > self.clusters.max_size {
            return Err(PhotoFocusError::Config(format!(
                "cluster min_size {} exceeds max_size {}",
                self.clusters.min_size, self.clusters.max_size
            )));
        }
        if self.clusters.max_zoom_for_radius <= 0.0 {
            return Err(PhotoFocusError::Config(
                "cluster max_zoom_for_radius must be positive".to_string(),
            ));
        }
        let durations = self.motion.resolve();
        if durations.max_zoom_span <= 0.0 {
            return Err(PhotoFocusError::Config(
                "max_zoom_span must be positive".to_string(),
            ));
        }
        if self.map.min_zoom > self.map.max_zoom {
            return Err(PhotoFocusError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.map.min_zoom, self.map.max_zoom
            )));
        }
        Ok(())
    }
}

/// Fixed location every marker distance is measured from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    lat: f64,
    lng: f64,
}

impl ReferencePoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE.0, DEFAULT_REFERENCE.1)
    }
}

/// Popup focus behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Minimum zoom a focused marker is shown at
    pub focus_zoom: f64,
    /// Gap between the popup and the top of the viewport, in pixels
    pub popup_padding: f64,
    /// Maximum drift from the focus anchor that still allows a return trip
    pub return_threshold_meters: f64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_zoom: FOCUS_ZOOM,
            popup_padding: POPUP_PADDING_PX,
            return_threshold_meters: RETURN_THRESHOLD_METERS,
        }
    }
}

/// Transition duration model parameters, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub min_duration: f64,
    pub max_duration: f64,
    pub return_max_duration: f64,
    pub max_zoom_span: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            min_duration: MIN_TRANSITION_SECS,
            max_duration: MAX_TRANSITION_SECS,
            return_max_duration: MAX_RETURN_TRANSITION_SECS,
            max_zoom_span: MAX_ZOOM_SPAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionProfile {
    #[default]
    Standard,
    /// Every transition completes instantly
    Reduced,
    Custom(DurationConfig),
}

impl MotionProfile {
    pub fn resolve(&self) -> DurationConfig {
        match self {
            Self::Standard => DurationConfig::default(),
            Self::Reduced => DurationConfig {
                min_duration: 0.0,
                max_duration: 0.0,
                return_max_duration: 0.0,
                max_zoom_span: MAX_ZOOM_SPAN,
            },
            Self::Custom(durations) => durations.clone(),
        }
    }
}

/// How cluster icons are scaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// Linear in the cluster's share of all markers
    #[default]
    PopulationWeighted,
    /// Three fixed sizes chosen by child count
    Bucketed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSizeConfig {
    pub min_size: f64,
    pub max_size: f64,
    pub max_zoom_for_radius: f64,
    pub mode: SizingMode,
}

impl Default for ClusterSizeConfig {
    fn default() -> Self {
        Self {
            min_size: CLUSTER_MIN_SIZE_PX,
            max_size: CLUSTER_MAX_SIZE_PX,
            max_zoom_for_radius: CLUSTER_MAX_ZOOM_FOR_RADIUS,
            mode: SizingMode::default(),
        }
    }
}

/// Configuration for grouping markers into clusters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// From this zoom upwards every marker is shown on its own
    pub disable_clustering_at_zoom: Option<f64>,
}

/// Initial view and panning limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: Option<LatLngBounds>,
    pub max_bounds_viscosity: f64,
    pub fit_padding: f64,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        let (south, west, north, east) = DEFAULT_MAX_BOUNDS;
        Self {
            min_zoom: 0.0,
            max_zoom: DEFAULT_MAX_ZOOM,
            max_bounds: Some(LatLngBounds::from_coords(south, west, north, east)),
            max_bounds_viscosity: DEFAULT_MAX_BOUNDS_VISCOSITY,
            fit_padding: FIT_BOUNDS_PADDING_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = PhotoFocusConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PhotoFocusConfig::default());
        assert_eq!(config.focus.focus_zoom, 16.0);
        assert_eq!(config.motion, MotionProfile::Standard);
        assert_eq!(config.reference.position(), LatLng::new(46.049698, 14.109393));
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "focus": { "focus_zoom": 14 },
            "clusters": { "mode": "bucketed" },
            "motion": "reduced"
        }"#;
        let config = PhotoFocusConfig::from_json_str(json).unwrap();

        assert_eq!(config.focus.focus_zoom, 14.0);
        assert_eq!(config.focus.popup_padding, POPUP_PADDING_PX);
        assert_eq!(config.clusters.mode, SizingMode::Bucketed);
        assert_eq!(config.motion.resolve().max_duration, 0.0);
    }

    #[test]
    fn test_custom_motion_profile() {
        let json = r#"{ "motion": { "custom": { "max_duration": 3.0 } } }"#;
        let durations = PhotoFocusConfig::from_json_str(json).unwrap().motion.resolve();

        assert_eq!(durations.max_duration, 3.0);
        assert_eq!(durations.min_duration, MIN_TRANSITION_SECS);
    }

    #[test]
    fn test_invalid_cluster_band_rejected() {
        let json = r#"{ "clusters": { "min_size": 60, "max_size": 50 } }"#;
        let err = PhotoFocusConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, PhotoFocusError::Config(_)));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = PhotoFocusConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PhotoFocusError::Serialization(_)));
    }
}
