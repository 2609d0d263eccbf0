//! Single owning task for the camera
//!
//! Hosts that deliver popup and animation events from several threads send
//! them through a [`CameraHandle`]; one task owns the choreographer and the
//! engine and applies commands in arrival order, so at most one camera
//! transition is ever in flight.

use crate::{
    camera::{
        choreographer::{CameraChoreographer, CloseOutcome},
        state::{CameraState, FocusSession, FocusToken},
    },
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::View,
    },
    traits::{MapEngine, TransitionId},
    PhotoFocusError, Result,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Point-in-time view of the camera owned by the actor
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSnapshot {
    pub state: CameraState,
    pub view: View,
    pub session: Option<FocusSession>,
    pub current_transition: Option<TransitionId>,
}

enum CameraCommand {
    PopupOpened {
        marker: LatLng,
        popup_height: f64,
        reply: oneshot::Sender<FocusToken>,
    },
    PopupClosed {
        token: FocusToken,
        reply: oneshot::Sender<CloseOutcome>,
    },
    TransitionEnded(TransitionId),
    Tick {
        delta_time: f64,
        reply: oneshot::Sender<CameraState>,
    },
    FitToMarkers {
        bounds: Option<LatLngBounds>,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<CameraSnapshot>,
    },
}

/// Cloneable sender side of the camera actor
#[derive(Clone)]
pub struct CameraHandle {
    commands: mpsc::Sender<CameraCommand>,
}

/// Spawns the camera task. The task ends when every handle is dropped and
/// hands the engine back through the join handle.
pub fn spawn<E>(
    choreographer: CameraChoreographer,
    engine: E,
    buffer: usize,
) -> (CameraHandle, JoinHandle<E>)
where
    E: MapEngine + Send + 'static,
{
    let (commands, receiver) = mpsc::channel(buffer.max(1));
    let task = tokio::spawn(run(choreographer, engine, receiver));
    (CameraHandle { commands }, task)
}

async fn run<E: MapEngine>(
    mut camera: CameraChoreographer,
    mut engine: E,
    mut commands: mpsc::Receiver<CameraCommand>,
) -> E {
    while let Some(command) = commands.recv().await {
        match command {
            CameraCommand::PopupOpened {
                marker,
                popup_height,
                reply,
            } => {
                let token = camera.on_popup_open(&mut engine, marker, popup_height);
                let _ = reply.send(token);
            }
            CameraCommand::PopupClosed { token, reply } => {
                let outcome = camera.on_popup_close(&mut engine, token);
                let _ = reply.send(outcome);
            }
            CameraCommand::TransitionEnded(id) => camera.on_transition_end(id),
            CameraCommand::Tick { delta_time, reply } => {
                let state = camera.tick(&mut engine, delta_time);
                let _ = reply.send(state);
            }
            CameraCommand::FitToMarkers { bounds, reply } => {
                let fitted = camera.fit_to_markers(&mut engine, bounds.as_ref());
                let _ = reply.send(fitted);
            }
            CameraCommand::Snapshot { reply } => {
                let _ = reply.send(CameraSnapshot {
                    state: camera.state(),
                    view: View::new(engine.center(), engine.zoom()),
                    session: camera.viewport_state().session().copied(),
                    current_transition: camera.current_transition(),
                });
            }
        }
    }
    log::debug!("camera actor stopped: all handles dropped");
    engine
}

impl CameraHandle {
    pub async fn popup_opened(&self, marker: LatLng, popup_height: f64) -> Result<FocusToken> {
        self.request(|reply| CameraCommand::PopupOpened {
            marker,
            popup_height,
            reply,
        })
        .await
    }

    pub async fn popup_closed(&self, token: FocusToken) -> Result<CloseOutcome> {
        self.request(|reply| CameraCommand::PopupClosed { token, reply })
            .await
    }

    /// Forwards an engine completion notice; does not wait for it to be applied
    pub async fn transition_ended(&self, id: TransitionId) -> Result<()> {
        self.commands
            .send(CameraCommand::TransitionEnded(id))
            .await
            .map_err(|_| PhotoFocusError::ChannelClosed)
    }

    /// Advances the owned engine by one frame; returns the camera state after it
    pub async fn tick(&self, delta_time: f64) -> Result<CameraState> {
        self.request(|reply| CameraCommand::Tick { delta_time, reply })
            .await
    }

    pub async fn fit_to_markers(&self, bounds: Option<LatLngBounds>) -> Result<bool> {
        self.request(|reply| CameraCommand::FitToMarkers { bounds, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<CameraSnapshot> {
        self.request(|reply| CameraCommand::Snapshot { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CameraCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| PhotoFocusError::ChannelClosed)?;
        response.await.map_err(|_| PhotoFocusError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::PhotoFocusConfig, geo::Point, map::Map};

    #[tokio::test]
    async fn test_actor_serializes_open_and_close() {
        let map = Map::new(LatLng::new(46.05, 14.5), 10.0, Point::new(1024.0, 768.0));
        let camera = CameraChoreographer::for_engine(&PhotoFocusConfig::default(), &map);
        let (handle, task) = spawn(camera, map, 8);

        let token = handle
            .popup_opened(LatLng::new(46.06, 14.52), 150.0)
            .await
            .unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, CameraState::Focusing);
        assert_eq!(snapshot.session.unwrap().token, token);

        let in_flight = snapshot.current_transition.unwrap();
        handle.transition_ended(in_flight).await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().state, CameraState::Focused);

        // The headless map has not been ticked, so the camera is still at the
        // pre-focus view, far from the anchor
        assert_eq!(handle.popup_closed(token).await.unwrap(), CloseOutcome::Stayed);
        assert_eq!(handle.popup_closed(token).await.unwrap(), CloseOutcome::Ignored);

        drop(handle);
        let map = task.await.unwrap();
        assert_eq!(map.flights().len(), 1);
    }

    #[tokio::test]
    async fn test_ticks_drive_owned_map_to_focus() {
        let map = Map::new(LatLng::new(46.05, 14.5), 10.0, Point::new(1024.0, 768.0));
        let camera = CameraChoreographer::for_engine(&PhotoFocusConfig::default(), &map);
        let (handle, task) = spawn(camera, map, 8);

        let token = handle
            .popup_opened(LatLng::new(46.06, 14.52), 150.0)
            .await
            .unwrap();

        let mut state = CameraState::Focusing;
        for _ in 0..120 {
            state = handle.tick(1.0 / 60.0).await.unwrap();
            if state == CameraState::Focused {
                break;
            }
        }
        assert_eq!(state, CameraState::Focused);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.view.zoom, 16.0);
        assert_eq!(snapshot.current_transition, None);

        assert!(matches!(
            handle.popup_closed(token).await.unwrap(),
            CloseOutcome::Returned(_)
        ));
        for _ in 0..120 {
            if handle.tick(1.0 / 60.0).await.unwrap() == CameraState::Idle {
                break;
            }
        }
        assert_eq!(handle.snapshot().await.unwrap().view.zoom, 10.0);

        drop(handle);
        assert_eq!(task.await.unwrap().flights().len(), 2);
    }
}
