pub mod duration;
pub mod interpolation;
pub mod transitions;

// Re-export commonly used types and functions for convenience
pub use duration::{duration_for, DurationModel};
pub use interpolation::{EasingFunction, Interpolatable, Interpolation};
pub use transitions::{Transition, TransitionFrame, TransitionManager, TransitionState};
