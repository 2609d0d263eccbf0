use crate::core::{geo::LatLng, viewport::View};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pairs a popup close with the open that started the focus session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusToken(pub u64);

impl fmt::Display for FocusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "focus#{}", self.0)
    }
}

/// Camera choreography state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraState {
    /// No popup focused
    #[default]
    Idle,
    /// Transition in flight towards a marker
    Focusing,
    /// Transition complete, popup open
    Focused,
    /// Transition in flight back to the pre-focus view
    Returning,
}

/// One popup-open → popup-close cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub token: FocusToken,
    /// Marker whose popup opened
    pub marker: LatLng,
    /// View when the popup opened
    pub pre_focus: View,
    /// Center that keeps the popup fully on screen at `target_zoom`
    pub focus_anchor: LatLng,
    pub target_zoom: f64,
}

/// Current view plus at most one pre-focus snapshot.
///
/// There is no history: a new session overwrites the previous one, and a
/// session is consumed by the close that matches its token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub current_zoom: f64,
    pub current_center: LatLng,
    session: Option<FocusSession>,
}

impl ViewportState {
    pub fn new(current: View) -> Self {
        Self {
            current_zoom: current.zoom,
            current_center: current.center,
            session: None,
        }
    }

    /// Refreshes the current view from the engine
    pub fn sync(&mut self, current: View) {
        self.current_zoom = current.zoom;
        self.current_center = current.center;
    }

    pub fn current(&self) -> View {
        View::new(self.current_center, self.current_zoom)
    }

    /// Starts a session, returning the one it replaced
    pub fn begin_focus(&mut self, session: FocusSession) -> Option<FocusSession> {
        self.session.replace(session)
    }

    /// Ends the session if `token` is the live one
    pub fn take_focus(&mut self, token: FocusToken) -> Option<FocusSession> {
        match self.session {
            Some(session) if session.token == token => self.session.take(),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    pub fn pre_focus_zoom(&self) -> Option<f64> {
        self.session.map(|s| s.pre_focus.zoom)
    }

    pub fn pre_focus_center(&self) -> Option<LatLng> {
        self.session.map(|s| s.pre_focus.center)
    }

    pub fn focus_anchor(&self) -> Option<LatLng> {
        self.session.map(|s| s.focus_anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: u64) -> FocusSession {
        FocusSession {
            token: FocusToken(token),
            marker: LatLng::new(46.0, 14.0),
            pre_focus: View::new(LatLng::new(45.0, 13.0), 8.0 + token as f64),
            focus_anchor: LatLng::new(46.001, 14.0),
            target_zoom: 16.0,
        }
    }

    #[test]
    fn test_new_session_overwrites() {
        let mut state = ViewportState::new(View::new(LatLng::new(0.0, 0.0), 3.0));
        assert!(state.begin_focus(session(1)).is_none());

        let replaced = state.begin_focus(session(2)).unwrap();
        assert_eq!(replaced.token, FocusToken(1));
        assert_eq!(state.pre_focus_zoom(), Some(10.0));
    }

    #[test]
    fn test_take_focus_requires_matching_token() {
        let mut state = ViewportState::new(View::new(LatLng::new(0.0, 0.0), 3.0));
        state.begin_focus(session(2));

        assert!(state.take_focus(FocusToken(1)).is_none());
        assert!(state.session().is_some());

        assert_eq!(state.take_focus(FocusToken(2)).unwrap().token, FocusToken(2));
        assert!(state.take_focus(FocusToken(2)).is_none());
        assert!(state.focus_anchor().is_none());
    }
}
