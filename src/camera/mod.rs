pub mod choreographer;
pub mod state;

#[cfg(feature = "tokio-runtime")]
pub mod actor;

pub use choreographer::{CameraChoreographer, CloseOutcome};
pub use state::{CameraState, FocusSession, FocusToken, ViewportState};

#[cfg(feature = "tokio-runtime")]
pub use actor::{spawn, CameraHandle, CameraSnapshot};
