use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean Earth radius used for all great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Web Mercator projection constants
const MERCATOR_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Haversine great-circle distance between two coordinates in kilometers.
///
/// Inputs are plain degrees and are not validated: `NaN` in, `NaN` out.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Great-circle distance to another coordinate in kilometers
    pub fn distance_km_to(&self, other: &LatLng) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }

    /// Great-circle distance to another coordinate in meters
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        self.distance_km_to(other) * 1000.0
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857) meters
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * MERCATOR_RADIUS;
        let lat = Self::clamp_lat(self.lat);
        let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * MERCATOR_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / MERCATOR_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds containing every point, `None` for an empty iterator
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(*first, *first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Corners are finite and ordered
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let ljubljana = LatLng::new(46.0569, 14.5058);
        let tokyo = LatLng::new(35.6762, 139.6503);

        assert_eq!(ljubljana.distance_km_to(&tokyo), tokyo.distance_km_to(&ljubljana));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(46.049698, 14.109393, 46.049698, 14.109393), 0.0);
    }

    #[test]
    fn test_known_distance() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let la = LatLng::new(34.0522, -118.2437);

        // Roughly 3936 km with a 6371 km sphere
        let distance = nyc.distance_km_to(&la);
        assert!((distance - 3936.0).abs() < 10.0, "got {distance}");
        assert!((nyc.distance_to(&la) - distance * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_mercator_round_trip() {
        let coord = LatLng::new(46.05, 14.11);
        let back = LatLng::from_mercator(coord.to_mercator());

        assert!((back.lat - coord.lat).abs() < 1e-9);
        assert!((back.lng - coord.lng).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(LatLngBounds::from_points(&Vec::<LatLng>::new()).is_none());

        let points = [LatLng::new(46.0, 14.0), LatLng::new(45.5, 15.0), LatLng::new(46.5, 13.5)];
        let bounds = LatLngBounds::from_points(&points).unwrap();

        assert_eq!(bounds.south_west, LatLng::new(45.5, 13.5));
        assert_eq!(bounds.north_east, LatLng::new(46.5, 15.0));
        assert!(bounds.is_valid());
        assert!(points.iter().all(|p| bounds.contains(p)));
    }
}
