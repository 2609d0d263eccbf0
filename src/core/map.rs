use crate::{
    animation::transitions::{Transition, TransitionManager},
    core::{
        config::MapViewConfig,
        geo::{LatLng, LatLngBounds, Point},
        viewport::{View, Viewport},
    },
    traits::{FlyTo, MapEngine, TransitionId},
};

/// Events emitted by [`Map::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The view changed during an animation frame
    ViewChanged { center: LatLng, zoom: f64 },
    /// A transition reached its target or was interrupted by user input
    MoveEnd { transition: TransitionId },
}

/// Headless map engine: a Web Mercator viewport driven by one redirectable
/// transition slot. Used by the demo binary and the integration tests, and
/// usable server-side wherever no renderer is attached.
#[derive(Debug)]
pub struct Map {
    viewport: Viewport,
    transitions: TransitionManager,
    flights: Vec<FlyTo>,
    /// Stopped transitions whose `MoveEnd` goes out on the next update
    interrupted: Vec<TransitionId>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::with_viewport(Viewport::new(center, zoom, size))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            transitions: TransitionManager::new(),
            flights: Vec::new(),
            interrupted: Vec::new(),
        }
    }

    /// Applies zoom limits and panning bounds from the configuration
    pub fn with_config(mut self, config: &MapViewConfig) -> Self {
        self.viewport.set_zoom_limits(config.min_zoom, config.max_zoom);
        self.viewport
            .set_max_bounds(config.max_bounds.clone(), Some(config.max_bounds_viscosity));
        self
    }

    /// Sets the view immediately, cancelling any animation
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.interrupt();
        self.viewport.set_view(View::new(center, zoom));
    }

    /// User drag: moves the view by a pixel offset and cancels any animation
    pub fn pan_by(&mut self, offset: Point) -> Point {
        self.interrupt();
        self.viewport.pan_by(offset)
    }

    /// User zoom around the current center, cancelling any animation
    pub fn zoom_to(&mut self, zoom: f64) {
        self.interrupt();
        self.viewport.set_zoom(zoom);
    }

    fn interrupt(&mut self) {
        if let Some(transition) = self.transitions.stop_current() {
            log::debug!("{} interrupted", transition);
            self.interrupted.push(transition);
        }
    }

    /// Advances the transition in flight by `delta_time` seconds
    pub fn update(&mut self, delta_time: f64) -> Vec<MapEvent> {
        let mut events: Vec<MapEvent> = self
            .interrupted
            .drain(..)
            .map(|transition| MapEvent::MoveEnd { transition })
            .collect();
        if let Some(frame) = self.transitions.update(delta_time) {
            self.viewport.set_view(frame.view);
            events.push(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom,
            });
            if let Some(transition) = frame.completed {
                log::debug!(
                    "{} finished at ({:.6}, {:.6}) zoom {:.2}",
                    transition,
                    self.viewport.center.lat,
                    self.viewport.center.lng,
                    self.viewport.zoom
                );
                events.push(MapEvent::MoveEnd { transition });
            }
        }
        events
    }

    /// Runs frames of `step` seconds until no transition is active
    pub fn run_until_idle(&mut self, step: f64) -> Vec<MapEvent> {
        let mut events = Vec::new();
        while self.transitions.has_active_transition() || !self.interrupted.is_empty() {
            events.extend(self.update(step));
        }
        events
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_animating(&self) -> bool {
        self.transitions.has_active_transition()
    }

    /// Every fly-to request received, oldest first
    pub fn flights(&self) -> &[FlyTo] {
        &self.flights
    }
}

impl MapEngine for Map {
    fn project(&self, lat_lng: &LatLng, zoom: f64) -> Point {
        self.viewport.project(lat_lng, Some(zoom))
    }

    fn unproject(&self, point: &Point, zoom: f64) -> LatLng {
        self.viewport.unproject(point, Some(zoom))
    }

    fn fly_to(&mut self, request: FlyTo) {
        log::debug!(
            "{} to ({:.6}, {:.6}) zoom {:.2} over {:.2}s",
            request.id,
            request.center.lat,
            request.center.lng,
            request.zoom,
            request.duration
        );
        self.flights.push(request);
        self.transitions
            .start_transition(Transition::fly_to(request, self.viewport.view()));
    }

    fn stop(&mut self) {
        self.interrupt();
    }

    fn advance(&mut self, delta_time: f64) -> Vec<TransitionId> {
        self.update(delta_time)
            .into_iter()
            .filter_map(|event| match event {
                MapEvent::MoveEnd { transition } => Some(transition),
                MapEvent::ViewChanged { .. } => None,
            })
            .collect()
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn center(&self) -> LatLng {
        self.viewport.center
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        self.interrupt();
        self.viewport.fit_bounds(bounds, padding);
    }
}
