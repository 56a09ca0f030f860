//! Station notation (`12+50`) and grid elevation labels (`-05`).

use crate::errors::GeometryError;
use crate::types;

/// Format a distance along the alignment as engineering station notation.
///
/// The distance is truncated to whole units: hundreds before the `+`, the
/// remainder as two digits after it.
pub fn format_station(distance: f64) -> Result<String, GeometryError> {
    let distance = types::non_negative("distance", distance)?;
    let whole = distance.trunc();
    if whole > u64::MAX as f64 {
        return Err(GeometryError::invalid(
            "distance",
            format!("{distance} is too large for station notation"),
        ));
    }
    let whole = whole as u64;
    Ok(format!("{}+{:02}", whole / 100, whole % 100))
}

/// Format an elevation label: sign for negatives, magnitude padded to two
/// digits.
pub fn format_elevation(elevation: i32) -> String {
    let sign = if elevation < 0 { "-" } else { "" };
    format!("{sign}{:02}", elevation.unsigned_abs())
}
