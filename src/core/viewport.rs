use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Center and zoom: the part of a viewport a camera transition animates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub center: LatLng,
    pub zoom: f64,
}

impl View {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Maximum bounds for the map
    max_bounds: Option<LatLngBounds>,
    /// Viscosity for bounds enforcement (0.0 = loose, 1.0 = solid)
    max_bounds_viscosity: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 19.0),
            size,
            min_zoom: 0.0,
            max_zoom: 19.0,
            max_bounds: None,
            max_bounds_viscosity: 0.0,
        }
    }

    /// Sets the maximum bounds for the map
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>, viscosity: Option<f64>) {
        self.max_bounds = bounds;
        self.max_bounds_viscosity = viscosity.unwrap_or(0.0).clamp(0.0, 1.0);
    }

    /// Sets the center of the viewport with bounds checking
    pub fn set_center(&mut self, center: LatLng) {
        self.center = self.clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Current center and zoom
    pub fn view(&self) -> View {
        View::new(self.center, self.zoom)
    }

    /// Applies center and zoom together
    pub fn set_view(&mut self, view: View) {
        self.set_zoom(view.zoom);
        self.set_center(view.center);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));
        let mercator = lat_lng.to_mercator();
        let half_circumference = std::f64::consts::PI * 6378137.0;

        Point::new(
            (mercator.x + half_circumference) / (2.0 * half_circumference) * scale,
            (half_circumference - mercator.y) / (2.0 * half_circumference) * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));
        let half_circumference = std::f64::consts::PI * 6378137.0;

        let x = (pixel.x / scale) * (2.0 * half_circumference) - half_circumference;
        let y = half_circumference - (pixel.y / scale) * (2.0 * half_circumference);

        LatLng::from_mercator(Point::new(x, y))
    }

    /// Width of the whole world in pixels at `zoom`
    fn world_size(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let world = pixel.subtract(&self.size.multiply(0.5)).add(&origin);
        self.unproject(&world, None)
    }

    /// Moves the view by a pixel offset (positive x pans east, positive y pans south)
    /// and returns the offset that was actually applied after bounds limiting
    pub fn pan_by(&mut self, offset: Point) -> Point {
        let current = self.project(&self.center, None);
        let mut target = current.add(&offset);

        if let Some(bounds) = &self.max_bounds {
            if self.max_bounds_viscosity > 0.0 {
                target = self.limit_to_bounds(target, bounds);
            }
        }

        let new_center = self.unproject(&target, None);
        self.set_center(new_center);

        self.project(&self.center, None).subtract(&current)
    }

    /// Applies viscous resistance when the center is dragged outside `bounds`
    fn limit_to_bounds(&self, target: Point, bounds: &LatLngBounds) -> Point {
        let nw = self.project(
            &LatLng::new(
                LatLng::clamp_lat(bounds.north_east.lat),
                bounds.south_west.lng,
            ),
            None,
        );
        let se = self.project(
            &LatLng::new(
                LatLng::clamp_lat(bounds.south_west.lat),
                bounds.north_east.lng,
            ),
            None,
        );

        let viscous = |value: f64, threshold: f64| value - (value - threshold) * self.max_bounds_viscosity;

        let mut limited = target;
        if target.x < nw.x {
            limited.x = viscous(target.x, nw.x);
        } else if target.x > se.x {
            limited.x = viscous(target.x, se.x);
        }
        if target.y < nw.y {
            limited.y = viscous(target.y, nw.y);
        } else if target.y > se.y {
            limited.y = viscous(target.y, se.y);
        }
        limited
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Fits the viewport to contain the given bounds, returning the chosen zoom
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> f64 {
        let available = Point::new(
            (self.size.x - 2.0 * padding).max(0.0),
            (self.size.y - 2.0 * padding).max(0.0),
        );

        // Highest integer zoom at which the bounds still fit
        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom.ceil() as i32)..=(self.max_zoom.floor() as i32) {
            let zoom = test_zoom as f64;
            let nw = self.project(
                &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
                Some(zoom),
            );
            let se = self.project(
                &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
                Some(zoom),
            );

            if (se.x - nw.x).abs() <= available.x && (se.y - nw.y).abs() <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        self.set_zoom(best_zoom);
        self.set_center(bounds.center());
        self.zoom
    }

    /// Clamps center to world bounds or max_bounds if set
    fn clamp_center(&self, center: LatLng) -> LatLng {
        let (south, west, north, east) = match &self.max_bounds {
            Some(bounds) => (
                bounds.south_west.lat,
                bounds.south_west.lng,
                bounds.north_east.lat,
                bounds.north_east.lng,
            ),
            None => (-90.0, -180.0, 90.0, 180.0),
        };
        LatLng::new(
            LatLng::clamp_lat(center.lat.clamp(south, north)),
            center.lng.clamp(west, east),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
