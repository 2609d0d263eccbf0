//! Popup-driven camera choreography
//!
//! Opening a marker popup flies the camera in so the popup is fully visible;
//! closing it flies back to where the user was, but only if they left the
//! focused view alone. The choreographer owns the [`ViewportState`] and the
//! "current transition" slot, and drives any [`MapEngine`].

use crate::{
    animation::duration::DurationModel,
    camera::state::{CameraState, FocusSession, FocusToken, ViewportState},
    core::{
        config::{FocusConfig, PhotoFocusConfig},
        geo::{LatLng, LatLngBounds, Point},
        viewport::View,
    },
    traits::{FlyTo, MapEngine, TransitionId},
};
use serde::{Deserialize, Serialize};

/// What a popup close did to the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CloseOutcome {
    /// Flew back to the pre-focus view
    Returned(TransitionId),
    /// The user moved or zoomed past the focus; the camera stays put
    Stayed,
    /// No live session matched the token
    Ignored,
}

pub struct CameraChoreographer {
    focus: FocusConfig,
    durations: DurationModel,
    fit_padding: f64,
    state: CameraState,
    viewport: ViewportState,
    current_transition: Option<TransitionId>,
    next_token: u64,
    next_transition: u64,
}

impl CameraChoreographer {
    pub fn new(config: &PhotoFocusConfig, initial: View) -> Self {
        Self {
            focus: config.focus.clone(),
            durations: DurationModel::new(config.motion.resolve()),
            fit_padding: config.map.fit_padding,
            state: CameraState::Idle,
            viewport: ViewportState::new(initial),
            current_transition: None,
            next_token: 0,
            next_transition: 0,
        }
    }

    /// Creates a choreographer starting from the engine's current view
    pub fn for_engine<E: MapEngine>(config: &PhotoFocusConfig, engine: &E) -> Self {
        Self::new(config, View::new(engine.center(), engine.zoom()))
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn viewport_state(&self) -> &ViewportState {
        &self.viewport
    }

    /// Transition the choreographer is waiting on, if any
    pub fn current_transition(&self) -> Option<TransitionId> {
        self.current_transition
    }

    /// Center and zoom that show `marker` with a popup of `popup_height`
    /// pixels above it, never zooming out from `current_zoom`
    pub fn focus_target<E: MapEngine>(
        &self,
        engine: &E,
        marker: &LatLng,
        popup_height: f64,
        current_zoom: f64,
    ) -> View {
        let target_zoom = current_zoom.max(self.focus.focus_zoom);
        let shift = popup_height.max(0.0) / 2.0 + self.focus.popup_padding;

        let marker_px = engine.project(marker, target_zoom);
        let anchor_px = marker_px.subtract(&Point::new(0.0, shift));

        View::new(engine.unproject(&anchor_px, target_zoom), target_zoom)
    }

    /// Handles a marker popup becoming visible.
    ///
    /// Snapshots the current view, then flies to the focus anchor. A session
    /// or transition already in flight is replaced.
    pub fn on_popup_open<E: MapEngine>(
        &mut self,
        engine: &mut E,
        marker: LatLng,
        popup_height: f64,
    ) -> FocusToken {
        self.viewport.sync(View::new(engine.center(), engine.zoom()));
        let pre_focus = self.viewport.current();
        let target = self.focus_target(engine, &marker, popup_height, pre_focus.zoom);

        self.next_token += 1;
        let token = FocusToken(self.next_token);
        let session = FocusSession {
            token,
            marker,
            pre_focus,
            focus_anchor: target.center,
            target_zoom: target.zoom,
        };
        if let Some(replaced) = self.viewport.begin_focus(session) {
            log::debug!("{} replaces {} before it closed", token, replaced.token);
        }

        let duration = self.durations.focus(pre_focus.zoom, target.zoom);
        let id = self.issue(engine, target, duration);
        self.state = CameraState::Focusing;
        log::debug!(
            "{} opened at ({:.6}, {:.6}): zoom {:.2} -> {:.2} via {}",
            token,
            marker.lat,
            marker.lng,
            pre_focus.zoom,
            target.zoom,
            id
        );

        if !engine.reports_transition_end() {
            self.on_transition_end(id);
        }
        token
    }

    /// Handles a marker popup closing.
    ///
    /// Returns to the pre-focus view only when the camera is still near the
    /// focus anchor and not zoomed in past the focus zoom. Unmatched or
    /// repeated closes are ignored.
    pub fn on_popup_close<E: MapEngine>(&mut self, engine: &mut E, token: FocusToken) -> CloseOutcome {
        let Some(session) = self.viewport.take_focus(token) else {
            log::debug!("ignoring close for {}: no matching open", token);
            return CloseOutcome::Ignored;
        };

        self.viewport.sync(View::new(engine.center(), engine.zoom()));
        let current = self.viewport.current();
        let drift = engine.distance(&current.center, &session.focus_anchor);

        let eligible = drift < self.focus.return_threshold_meters
            && current.zoom <= self.focus.focus_zoom;

        if !eligible {
            log::debug!(
                "{} closed {:.0} m from its anchor at zoom {:.2}: keeping the view",
                token,
                drift,
                current.zoom
            );
            if self.current_transition.take().is_some() {
                engine.stop();
            }
            self.state = CameraState::Idle;
            return CloseOutcome::Stayed;
        }

        let duration = self
            .durations
            .return_trip(session.pre_focus.zoom, current.zoom);
        let id = self.issue(engine, session.pre_focus, duration);
        self.state = CameraState::Returning;
        log::debug!("{} closed: returning to zoom {:.2} via {}", token, session.pre_focus.zoom, id);

        if !engine.reports_transition_end() {
            self.on_transition_end(id);
        }
        CloseOutcome::Returned(id)
    }

    /// Advances an engine that animates itself and applies every transition
    /// that ended during the frame
    pub fn tick<E: MapEngine>(&mut self, engine: &mut E, delta_time: f64) -> CameraState {
        for id in engine.advance(delta_time) {
            self.on_transition_end(id);
        }
        self.state
    }

    /// Handles the engine finishing or abandoning a transition. Superseded
    /// ids are ignored.
    pub fn on_transition_end(&mut self, id: TransitionId) {
        if self.current_transition != Some(id) {
            log::debug!("ignoring end of superseded {}", id);
            return;
        }
        self.current_transition = None;
        self.state = match self.state {
            CameraState::Focusing => CameraState::Focused,
            CameraState::Returning => CameraState::Idle,
            other => other,
        };
    }

    /// Fits the view around all markers; no-op without markers.
    /// Used for the initial view and the "reset view" control.
    pub fn fit_to_markers<E: MapEngine>(
        &mut self,
        engine: &mut E,
        bounds: Option<&LatLngBounds>,
    ) -> bool {
        let Some(bounds) = bounds.filter(|b| b.is_valid()) else {
            return false;
        };
        engine.fit_bounds(bounds, self.fit_padding);
        self.viewport.sync(View::new(engine.center(), engine.zoom()));
        log::info!(
            "Fitted view to markers: center ({:.6}, {:.6}) zoom {:.2}",
            self.viewport.current_center.lat,
            self.viewport.current_center.lng,
            self.viewport.current_zoom
        );
        true
    }

    fn issue<E: MapEngine>(&mut self, engine: &mut E, target: View, duration: f64) -> TransitionId {
        self.next_transition += 1;
        let id = TransitionId(self.next_transition);
        self.current_transition = Some(id);
        engine.fly_to(FlyTo {
            id,
            center: target.center,
            zoom: target.zoom,
            duration,
        });
        id
    }
}
