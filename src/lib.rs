//! # photofocus
//!
//! Geotagged photo markers on a map, with a focused viewing experience.
//!
//! Markers are ranked by distance from a fixed reference point, grouped into
//! population-scaled clusters, and opening a marker's popup flies the camera
//! in so the popup is fully visible. Closing it flies back to where the user
//! was, unless they moved on. The camera works against any [`MapEngine`]; a
//! headless Web Mercator engine ([`Map`]) ships with the crate.

pub mod animation;
pub mod camera;
pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::PhotoFocusConfig,
    geo::{distance_km, LatLng, LatLngBounds, Point},
    map::{Map, MapEvent},
    viewport::{View, Viewport},
};

pub use camera::{CameraChoreographer, CameraState, CloseOutcome, FocusToken, ViewportState};

pub use traits::{FlyTo, MapEngine, TransitionId};

pub use data::{feed::MarkerRecord, ranking::RankingEngine};

pub use spatial::{clustering::Clustering, sizing::ClusterSizer};

pub use animation::duration::duration_for;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PhotoFocusError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PhotoFocusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Camera task is no longer running")]
    ChannelClosed,
}

/// Error type alias for convenience
pub type Error = PhotoFocusError;
