//! Shared trait abstractions for the collaborators the camera drives
//!
//! The camera choreography never talks to a renderer directly. Anything that
//! can project coordinates and run a redirectable fly-to animation can host it:
//! the bundled headless [`crate::core::map::Map`], a GUI widget, or a bridge to
//! a browser map library.

use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one camera transition so completion notices can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition#{}", self.0)
    }
}

/// An animated camera move towards `center` at `zoom` lasting `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyTo {
    pub id: TransitionId,
    pub center: LatLng,
    pub zoom: f64,
    pub duration: f64,
}

/// Map engine contract consumed by the camera choreography
pub trait MapEngine {
    /// Projects a coordinate to world pixel space at `zoom`
    fn project(&self, lat_lng: &LatLng, zoom: f64) -> Point;

    /// Inverse of [`MapEngine::project`]
    fn unproject(&self, point: &Point, zoom: f64) -> LatLng;

    /// Starts an animated transition, redirecting any transition in flight
    fn fly_to(&mut self, request: FlyTo);

    /// Halts the transition in flight, leaving the view where it is
    fn stop(&mut self) {}

    /// Advances engine-driven animation by `delta_time` seconds and returns
    /// the transitions that ended. Engines animated by a host renderer report
    /// completion themselves and return nothing here.
    fn advance(&mut self, _delta_time: f64) -> Vec<TransitionId> {
        Vec::new()
    }

    /// Current zoom level
    fn zoom(&self) -> f64;

    /// Current view center
    fn center(&self) -> LatLng;

    /// Distance between two coordinates in meters
    fn distance(&self, a: &LatLng, b: &LatLng) -> f64 {
        a.distance_to(b)
    }

    /// Immediately fits the view around `bounds`, keeping `padding` pixels free
    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64);

    /// Whether [`MapEngine::fly_to`] reports completion later through
    /// `on_transition_end`. Fire-and-forget engines return `false`.
    fn reports_transition_end(&self) -> bool {
        true
    }
}
