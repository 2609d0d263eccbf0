//! Prelude module for common photofocus types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use photofocus::prelude::*;`

pub use crate::core::{
    config::{
        ClusterSizeConfig, ClusteringConfig, DurationConfig, FocusConfig, MapViewConfig,
        MotionProfile, PhotoFocusConfig, ReferencePoint, SizingMode,
    },
    geo::{distance_km, LatLng, LatLngBounds, Point},
    map::{Map, MapEvent},
    viewport::{View, Viewport},
};

pub use crate::camera::{
    CameraChoreographer, CameraState, CloseOutcome, FocusSession, FocusToken, ViewportState,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::camera::{CameraHandle, CameraSnapshot};

pub use crate::animation::{duration_for, DurationModel, EasingFunction};

pub use crate::data::{
    fill_missing_cities, load_feed, resolve_feed, FeedReport, FeedSource, MarkerRecord,
    MediaKind, RankingEngine, ReverseGeocoder, SourceRecord,
};

pub use crate::spatial::{ClusterIcon, ClusterNode, ClusterSet, ClusterSizer, Clustering};

pub use crate::layers::{Marker, MarkerIcon};

pub use crate::ui::{Popup, PopupManager};

pub use crate::traits::{FlyTo, MapEngine, TransitionId};

pub use crate::{PhotoFocusError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
