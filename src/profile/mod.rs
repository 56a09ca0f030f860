//! Profile-view layout: grid, crossings, markers and the bore path
//!
//! This module is organized into submodules:
//! - `defaults`: layout conventions, layer names, bore defaults
//! - `station`: station and elevation label formatting
//! - `linetype`: size/material code decoding
//! - `category`: utility categories, layer map, depth table
//! - `grid`: grid lines, labels, profile coordinate mapping
//! - `crossing`: crossing detection and marker placement
//! - `bore`: bore path synthesis

pub mod bore;
pub mod category;
pub mod crossing;
pub mod defaults;
pub mod grid;
pub mod linetype;
pub mod station;

pub use bore::{BorePathBuilder, BorePlan, Obstruction};
pub use category::{DepthTable, LayerCategoryMap, UtilityCategory};
pub use crossing::{Alignment, Candidate, Crossing, CrossingDetector, CrossingReport, ProfileObject};
pub use grid::{
    ElevationLabel, Grid, GridLabel, GridLayout, GridLine, LineStyle, Orientation, StationLabel,
    VerticalLinePolicy,
};
pub use linetype::{DecodedSize, decode};
pub use station::{format_elevation, format_station};
