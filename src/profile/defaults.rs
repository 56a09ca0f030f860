//! Fixed layout conventions and default settings (drawing units)

/// Rows between the bottom and top grid lines
pub const GRID_ROWS: u32 = 30;

/// Every n-th horizontal line is drawn major
pub const MAJOR_ROW_EVERY: u32 = 5;

/// Distance the grid extends left of the insertion point
pub const GRID_LEFT_MARGIN: f64 = 25.0;

/// Raw lengths are padded up to a multiple of this
pub const LENGTH_ROUNDING: f64 = 25.0;

/// Padding added on top of the rounded length
pub const LENGTH_PADDING: f64 = 50.0;

/// Longest alignment a grid is built for
pub const MAX_GRID_LENGTH: f64 = 100_000.0;

/// Upper bound on vertical grid lines in one layout
pub const MAX_VERTICAL_LINES: f64 = 100_000.0;

/// Vertical lines at multiples of this offset are major
pub const MAJOR_VERTICAL_EVERY: f64 = 25.0;

pub const STATION_INTERVAL: f64 = 100.0;
pub const STATION_LABEL_GAP: f64 = 2.0;
pub const STATION_TEXT_HEIGHT: f64 = 2.5;

/// Elevation printed at the bottom grid line
pub const ELEVATION_BASE: i32 = -25;
pub const ELEVATION_STEP: i32 = 5;
pub const ELEVATION_LABEL_GAP: f64 = 5.0;
pub const ELEVATION_TEXT_HEIGHT: f64 = 3.5;

pub const DEFAULT_VERTICAL_SCALE: u32 = 4;

pub const LAYER_PROFILE: &str = "PROFILE";
pub const LAYER_TEXT: &str = "TEXT-2";
pub const LAYER_GRID_MINOR: &str = "BORDER2";
pub const LAYER_GRID_MAJOR: &str = "BORDER4";
pub const TEXT_STYLE: &str = "B";

/// Height of the size label placed beside each profile marker
pub const MARKER_TEXT_HEIGHT: f64 = 2.5;

pub const BORE_DEPTH: f64 = 14.0;
pub const DIVE_DISTANCE: f64 = 14.0;
pub const FILLET_RADIUS: f64 = 3.0;

/// Half the flat bottom of an obstruction detour
pub const DETOUR_HALF_WIDTH: f64 = 10.0;

/// Horizontal run of each detour ramp
pub const DETOUR_RAMP: f64 = 15.0;

/// Clearance kept under crossing utilities when the bore avoids them
pub const CROSSING_CLEARANCE: f64 = 2.0;
