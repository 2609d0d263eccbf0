//! Core constants for the focus camera, cluster icons and the marker feed.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Zoom level the camera moves to when a popup is focused (never zooms out).
pub const FOCUS_ZOOM: f64 = 16.0;

/// Extra pixels kept between the popup's top edge and the viewport.
pub const POPUP_PADDING_PX: f64 = 15.0;

/// Closing a popup only returns to the previous view if the camera is still
/// within this many meters of the focus anchor.
pub const RETURN_THRESHOLD_METERS: f64 = 200.0;

/// Shortest camera transition, used when the zoom does not change.
pub const MIN_TRANSITION_SECS: f64 = 0.05;

/// Transition length for a full `MAX_ZOOM_SPAN` zoom jump.
pub const MAX_TRANSITION_SECS: f64 = 2.0;

/// Cap used for the return trip after a popup closes.
pub const MAX_RETURN_TRANSITION_SECS: f64 = 1.0;

/// Zoom span over which transition durations are interpolated.
pub const MAX_ZOOM_SPAN: f64 = 17.0;

/// Smallest cluster icon edge in pixels.
pub const CLUSTER_MIN_SIZE_PX: f64 = 30.0;

/// Largest cluster icon edge in pixels.
pub const CLUSTER_MAX_SIZE_PX: f64 = 50.0;

/// Zoom at which the clustering radius reaches `CLUSTER_MAX_SIZE_PX`.
pub const CLUSTER_MAX_ZOOM_FOR_RADIUS: f64 = 17.0;

/// Child counts below this are drawn as small clusters in bucket mode.
pub const CLUSTER_MEDIUM_THRESHOLD: usize = 3;

/// Child counts from this upwards are drawn as large clusters in bucket mode.
pub const CLUSTER_LARGE_THRESHOLD: usize = 10;

/// Photo marker icon size in pixels.
pub const MARKER_ICON_SIZE: (u32, u32) = (48, 48);

/// Anchor inside the photo marker icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (24, 24);

/// Padding applied when fitting the view to all markers.
pub const FIT_BOUNDS_PADDING_PX: f64 = 50.0;

/// Fixed reference location distances are measured from.
pub const DEFAULT_REFERENCE: (f64, f64) = (46.049698, 14.109393);

/// Panning is limited to these bounds (south, west, north, east).
pub const DEFAULT_MAX_BOUNDS: (f64, f64, f64, f64) = (-95.0, -185.0, 95.0, 185.0);

/// Resistance applied when dragging past `DEFAULT_MAX_BOUNDS`.
pub const DEFAULT_MAX_BOUNDS_VISCOSITY: f64 = 0.9;

/// Highest zoom the bundled basemaps serve.
pub const DEFAULT_MAX_ZOOM: f64 = 19.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// File extensions treated as video media (lowercase, without the dot).
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// City shown when reverse geocoding fails.
pub const UNKNOWN_LOCATION: &str = "Unknown location";
