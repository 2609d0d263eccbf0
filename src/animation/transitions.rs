use crate::animation::interpolation::{EasingFunction, Interpolation};
use crate::core::viewport::View;
use crate::traits::{FlyTo, TransitionId};
use instant::Instant;

/// State of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    NotStarted,
    Running,
    Completed,
    Cancelled,
}

/// A camera fly-to animation between two views
#[derive(Debug, Clone)]
pub struct Transition {
    pub id: TransitionId,
    /// Duration in seconds
    pub duration: f64,
    pub easing: EasingFunction,
    pub state: TransitionState,
    pub start_time: Option<Instant>,
    /// Elapsed animation time in seconds
    pub elapsed_time: f64,
    pub start_view: View,
    pub target_view: View,
    /// Current view (interpolated)
    pub current_view: View,
}

impl Transition {
    /// Create a transition from `start_view` towards the fly-to target
    pub fn fly_to(request: FlyTo, start_view: View) -> Self {
        Self {
            id: request.id,
            duration: request.duration.max(0.0),
            easing: EasingFunction::EaseInOutCubic,
            state: TransitionState::NotStarted,
            start_time: None,
            elapsed_time: 0.0,
            start_view,
            target_view: View::new(request.center, request.zoom),
            current_view: start_view,
        }
    }

    /// Start the transition
    pub fn start(&mut self) {
        if self.state == TransitionState::NotStarted {
            self.start_time = Some(Instant::now());
            self.state = TransitionState::Running;
            self.elapsed_time = 0.0;
        }
    }

    /// Stop the transition where it is
    pub fn stop(&mut self) {
        if !self.is_finished() {
            self.state = TransitionState::Cancelled;
        }
    }

    /// Advance by `delta_time` seconds; returns `true` while the view changed
    pub fn update(&mut self, delta_time: f64) -> bool {
        match self.state {
            TransitionState::NotStarted => {
                self.start();
                self.update(delta_time)
            }
            TransitionState::Running => {
                self.elapsed_time += delta_time;
                let eased_progress = self.easing.apply(self.progress());

                self.current_view = View::new(
                    Interpolation::mercator_lat_lng(
                        &self.start_view.center,
                        &self.target_view.center,
                        eased_progress,
                    ),
                    Interpolation::linear(self.start_view.zoom, self.target_view.zoom, eased_progress),
                );

                if self.progress() >= 1.0 {
                    self.complete();
                }
                true
            }
            _ => false,
        }
    }

    fn complete(&mut self) {
        self.state = TransitionState::Completed;
        self.current_view = self.target_view;
    }

    /// Check if the transition is finished
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            TransitionState::Completed | TransitionState::Cancelled
        )
    }

    /// Get the current progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed_time / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Outcome of one [`TransitionManager::update`] tick
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionFrame {
    pub view: View,
    /// Set on the tick the transition reached its target
    pub completed: Option<TransitionId>,
}

/// Holds the single camera transition in flight.
///
/// Starting a transition cancels the running one; nothing is queued, so two
/// camera moves never interleave.
#[derive(Debug, Default)]
pub struct TransitionManager {
    current_transition: Option<Transition>,
}

impl TransitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new transition, returning the id of the one it redirected
    pub fn start_transition(&mut self, mut transition: Transition) -> Option<TransitionId> {
        let redirected = match self.current_transition.take() {
            Some(mut current) if !current.is_finished() => {
                current.stop();
                log::debug!("{} redirected by {}", current.id, transition.id);
                Some(current.id)
            }
            _ => None,
        };

        transition.start();
        self.current_transition = Some(transition);
        redirected
    }

    /// Advance the transition in flight
    pub fn update(&mut self, delta_time: f64) -> Option<TransitionFrame> {
        let transition = self.current_transition.as_mut()?;
        if !transition.update(delta_time) {
            return None;
        }

        let frame = TransitionFrame {
            view: transition.current_view,
            completed: (transition.state == TransitionState::Completed).then_some(transition.id),
        };

        if transition.is_finished() {
            self.current_transition = None;
        }
        Some(frame)
    }

    /// Stop current transition, leaving the view where it is
    pub fn stop_current(&mut self) -> Option<TransitionId> {
        let mut transition = self.current_transition.take()?;
        transition.stop();
        Some(transition.id)
    }

    /// Check if there's an active transition
    pub fn has_active_transition(&self) -> bool {
        self.current_transition
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// Get reference to current transition
    pub fn current_transition(&self) -> Option<&Transition> {
        self.current_transition.as_ref()
    }
}
