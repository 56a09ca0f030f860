//! Profile grid layout: line set, label placement and the mapping from
//! (station, elevation) to drawing coordinates.
//!
//! Layouts are computed with the insertion point at the origin and moved into
//! place with [`GridLayout::placed_at`]. Line offsets are relative to the
//! grid's bottom-left corner, so only labels and the grid origin move.

use super::defaults::*;
use super::station::{format_elevation, format_station};
use crate::errors::GeometryError;
use crate::geometry::Polyline;
use crate::log::debug;
use crate::types::{self, BBox, HorizontalAlignment, Point2};
use glam::{DVec2, dvec2};

/// Placed grid. `vertical_scale > 0` and `length > 0` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    vertical_scale: u32,
    length: f64,
    insertion_point: Point2,
    horizontal_line_count: u32,
}

impl Grid {
    pub fn vertical_scale(&self) -> u32 {
        self.vertical_scale
    }

    /// Normalized grid length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Station zero on the bottom grid line
    pub fn insertion_point(&self) -> Point2 {
        self.insertion_point
    }

    /// Number of rows; the grid has one more horizontal line than this
    pub fn horizontal_line_count(&self) -> u32 {
        self.horizontal_line_count
    }

    fn scale(&self) -> f64 {
        f64::from(self.vertical_scale)
    }

    pub fn left(&self) -> f64 {
        self.insertion_point.x - GRID_LEFT_MARGIN
    }

    pub fn right(&self) -> f64 {
        self.left() + self.length
    }

    pub fn bottom(&self) -> f64 {
        self.insertion_point.y
    }

    pub fn top(&self) -> f64 {
        self.bottom() + self.height()
    }

    pub fn height(&self) -> f64 {
        self.scale() * f64::from(self.horizontal_line_count)
    }

    pub fn bounds(&self) -> BBox {
        BBox {
            min: dvec2(self.left(), self.bottom()),
            max: dvec2(self.right(), self.top()),
        }
    }

    /// X coordinate of a station
    pub fn station_x(&self, station: f64) -> f64 {
        self.insertion_point.x + station
    }

    /// Y coordinate of an elevation; one elevation unit per grid row
    pub fn elevation_y(&self, elevation: f64) -> f64 {
        self.bottom() + (elevation - f64::from(ELEVATION_BASE)) * self.scale()
    }

    /// Y coordinate of the grade line (elevation 0)
    pub fn grade_y(&self) -> f64 {
        self.elevation_y(0.0)
    }

    pub fn profile_point(&self, station: f64, elevation: f64) -> Point2 {
        dvec2(self.station_x(station), self.elevation_y(elevation))
    }

    /// Straight grade line from station 0 to `length`
    pub fn grade_line(&self, length: f64) -> Result<Polyline, GeometryError> {
        let length = types::positive("length", length)?;
        Polyline::from_points([self.profile_point(0.0, 0.0), self.profile_point(length, 0.0)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Style class of a grid line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Major,
    Minor,
}

impl LineStyle {
    pub fn layer(self) -> &'static str {
        match self {
            LineStyle::Major => LAYER_GRID_MAJOR,
            LineStyle::Minor => LAYER_GRID_MINOR,
        }
    }
}

/// One grid line; `offset` is measured from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub orientation: Orientation,
    pub offset: f64,
    pub style: LineStyle,
}

impl GridLine {
    /// Drawing-space endpoints on `grid`
    pub fn endpoints(&self, grid: &Grid) -> (Point2, Point2) {
        match self.orientation {
            Orientation::Horizontal => {
                let y = grid.bottom() + self.offset;
                (dvec2(grid.left(), y), dvec2(grid.right(), y))
            }
            Orientation::Vertical => {
                let x = grid.left() + self.offset;
                (dvec2(x, grid.bottom()), dvec2(x, grid.top()))
            }
        }
    }
}

/// Text placed around the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridLabel {
    pub text: String,
    pub anchor: Point2,
    pub alignment: HorizontalAlignment,
    pub height: f64,
}

pub type StationLabel = GridLabel;
pub type ElevationLabel = GridLabel;

/// Spacing of vertical grid lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalLinePolicy {
    pub interval: f64,
}

impl VerticalLinePolicy {
    pub const EVERY_5: Self = Self { interval: 5.0 };
    pub const EVERY_25: Self = Self { interval: 25.0 };
    pub const EVERY_100: Self = Self { interval: 100.0 };
}

impl Default for VerticalLinePolicy {
    fn default() -> Self {
        Self::EVERY_5
    }
}

/// Everything needed to draw a profile grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub grid: Grid,
    pub lines: Vec<GridLine>,
    pub station_labels: Vec<StationLabel>,
    pub elevation_labels: Vec<ElevationLabel>,
}

/// Pad a raw alignment length up to a multiple of 25 plus margin.
pub fn normalize_length(raw_length: f64) -> f64 {
    raw_length + (LENGTH_PADDING - raw_length % LENGTH_ROUNDING)
}

impl GridLayout {
    /// Layout with the default vertical line policy.
    pub fn build(vertical_scale: u32, raw_length: f64) -> Result<Self, GeometryError> {
        Self::build_with(vertical_scale, raw_length, VerticalLinePolicy::default())
    }

    pub fn build_with(
        vertical_scale: u32,
        raw_length: f64,
        policy: VerticalLinePolicy,
    ) -> Result<Self, GeometryError> {
        types::positive("vertical_scale", f64::from(vertical_scale))?;
        let raw_length = types::positive("raw_length", raw_length)?;
        let interval = types::positive("interval", policy.interval)?;
        if raw_length > MAX_GRID_LENGTH {
            return Err(GeometryError::invalid(
                "raw_length",
                format!("{raw_length} exceeds the maximum grid length {MAX_GRID_LENGTH}"),
            ));
        }

        let grid = Grid {
            vertical_scale,
            length: normalize_length(raw_length),
            insertion_point: Point2::ZERO,
            horizontal_line_count: GRID_ROWS,
        };
        debug!(raw_length, length = grid.length, vertical_scale, "building grid");

        let mut lines = Vec::new();
        for row in 0..=GRID_ROWS {
            lines.push(GridLine {
                orientation: Orientation::Horizontal,
                offset: f64::from(row) * grid.scale(),
                style: if row % MAJOR_ROW_EVERY == 0 {
                    LineStyle::Major
                } else {
                    LineStyle::Minor
                },
            });
        }

        let columns = (grid.length / interval + 1e-9).floor();
        if columns > MAX_VERTICAL_LINES {
            return Err(GeometryError::invalid(
                "interval",
                format!("{interval} would draw more than {MAX_VERTICAL_LINES} vertical lines"),
            ));
        }
        let columns = columns as u64;
        for i in 0..=columns {
            let offset = i as f64 * interval;
            let ratio = offset / MAJOR_VERTICAL_EVERY;
            let major = (ratio - ratio.round()).abs() < 1e-9;
            lines.push(GridLine {
                orientation: Orientation::Vertical,
                offset,
                style: if major { LineStyle::Major } else { LineStyle::Minor },
            });
        }

        let station_labels = station_labels(&grid)?;
        let elevation_labels = elevation_labels(&grid);

        Ok(Self {
            grid,
            lines,
            station_labels,
            elevation_labels,
        })
    }

    /// The same layout with station zero at `insertion`.
    pub fn placed_at(mut self, insertion: Point2) -> Self {
        let delta: DVec2 = insertion - self.grid.insertion_point;
        self.grid.insertion_point = insertion;
        for label in self
            .station_labels
            .iter_mut()
            .chain(self.elevation_labels.iter_mut())
        {
            label.anchor += delta;
        }
        self
    }

    pub fn lines_of(&self, orientation: Orientation) -> impl Iterator<Item = &GridLine> {
        self.lines.iter().filter(move |l| l.orientation == orientation)
    }
}

fn station_labels(grid: &Grid) -> Result<Vec<StationLabel>, GeometryError> {
    let mut labels = Vec::new();
    let y = grid.top() + STATION_LABEL_GAP;
    let count = ((grid.length - LENGTH_PADDING) / STATION_INTERVAL).floor().max(-1.0) as i64;
    for i in 0..=count {
        let station = i as f64 * STATION_INTERVAL;
        labels.push(GridLabel {
            text: format_station(station)?,
            anchor: dvec2(grid.station_x(station), y),
            alignment: HorizontalAlignment::Center,
            height: STATION_TEXT_HEIGHT,
        });
    }
    Ok(labels)
}

fn elevation_labels(grid: &Grid) -> Vec<ElevationLabel> {
    let majors = GRID_ROWS / MAJOR_ROW_EVERY;
    let mut labels = Vec::with_capacity(2 * (majors as usize + 1));
    let sides = [
        (grid.left() - ELEVATION_LABEL_GAP, HorizontalAlignment::Right),
        (grid.right() + ELEVATION_LABEL_GAP, HorizontalAlignment::Left),
    ];
    for (x, alignment) in sides {
        for k in 0..=majors {
            let elevation = ELEVATION_BASE + ELEVATION_STEP * k as i32;
            labels.push(GridLabel {
                text: format_elevation(elevation),
                anchor: dvec2(x, grid.elevation_y(f64::from(elevation))),
                alignment,
                height: ELEVATION_TEXT_HEIGHT,
            });
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_length() {
        assert_eq!(normalize_length(500.0), 550.0);
        assert_eq!(normalize_length(260.0), 300.0);
        assert_eq!(normalize_length(274.0), 300.0);
        assert_eq!(normalize_length(276.0), 325.0);
    }

    #[test]
    fn five_hundred_at_scale_four() {
        let layout = GridLayout::build(4, 500.0).unwrap();
        assert_eq!(layout.grid.horizontal_line_count(), 30);
        assert_eq!(layout.grid.length(), 550.0);
        assert_eq!(layout.lines_of(Orientation::Horizontal).count(), 31);

        let texts: Vec<&str> = layout.station_labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["0+00", "1+00", "2+00", "3+00", "4+00", "5+00"]);
    }

    #[test]
    fn horizontal_count_ignores_length() {
        for length in [10.0, 260.0, 5000.0] {
            let layout = GridLayout::build(4, length).unwrap();
            assert_eq!(layout.grid.horizontal_line_count(), 30);
            assert_eq!(layout.lines_of(Orientation::Horizontal).count(), 31);
        }
    }

    #[test]
    fn major_rows_every_fifth() {
        let layout = GridLayout::build(4, 100.0).unwrap();
        for line in layout.lines_of(Orientation::Horizontal) {
            let row = (line.offset / 4.0).round() as u32;
            let expect = if row % 5 == 0 { LineStyle::Major } else { LineStyle::Minor };
            assert_eq!(line.style, expect, "row {row}");
        }
    }

    #[test]
    fn vertical_lines_follow_policy() {
        let layout = GridLayout::build(4, 500.0).unwrap();
        let verticals: Vec<_> = layout.lines_of(Orientation::Vertical).collect();
        assert_eq!(verticals.len(), 111);
        let majors = verticals.iter().filter(|l| l.style == LineStyle::Major).count();
        assert_eq!(majors, 23);
        assert_eq!(verticals.last().unwrap().offset, 550.0);

        let sparse = GridLayout::build_with(4, 500.0, VerticalLinePolicy::EVERY_100).unwrap();
        let offsets: Vec<f64> = sparse.lines_of(Orientation::Vertical).map(|l| l.offset).collect();
        assert_eq!(offsets, [0.0, 100.0, 200.0, 300.0, 400.0, 500.0]);
        assert!(
            sparse
                .lines_of(Orientation::Vertical)
                .all(|l| l.style == LineStyle::Major)
        );
    }

    #[test]
    fn elevation_labels_mirror_on_both_sides() {
        let layout = GridLayout::build(4, 260.0).unwrap();
        let labels = &layout.elevation_labels;
        assert_eq!(labels.len(), 14);
        let (left, right) = labels.split_at(7);
        let texts: Vec<&str> = left.iter().map(|l| l.text.as_str()).collect();
        insta::assert_snapshot!(texts.join(" "), @"-25 -20 -15 -10 -05 00 05");
        for (l, r) in left.iter().zip(right) {
            assert_eq!(l.text, r.text);
            assert_eq!(l.anchor.y, r.anchor.y);
            assert_eq!(l.alignment, HorizontalAlignment::Right);
            assert_eq!(r.alignment, HorizontalAlignment::Left);
            assert_eq!(l.anchor.x, -30.0);
            assert_eq!(r.anchor.x, 280.0);
        }
        assert_eq!(left[0].anchor.y, 0.0);
        assert_eq!(left[6].anchor.y, 120.0);
    }

    #[test]
    fn station_labels_sit_above_the_grid() {
        let layout = GridLayout::build(4, 260.0).unwrap();
        assert_eq!(layout.station_labels.len(), 3);
        for (i, label) in layout.station_labels.iter().enumerate() {
            assert_eq!(label.anchor, dvec2(i as f64 * 100.0, 122.0));
            assert_eq!(label.alignment, HorizontalAlignment::Center);
            assert_eq!(label.height, STATION_TEXT_HEIGHT);
        }
    }

    #[test]
    fn coordinate_mapping() {
        let layout = GridLayout::build(4, 260.0).unwrap().placed_at(dvec2(1000.0, 500.0));
        let grid = layout.grid;
        assert_eq!(grid.left(), 975.0);
        assert_eq!(grid.right(), 1275.0);
        assert_eq!(grid.top(), 620.0);
        assert_eq!(grid.grade_y(), 600.0);
        assert_eq!(grid.profile_point(50.0, -10.0), dvec2(1050.0, 560.0));
        assert_eq!(layout.station_labels[1].anchor, dvec2(1100.0, 622.0));

        let line = GridLine {
            orientation: Orientation::Vertical,
            offset: 25.0,
            style: LineStyle::Major,
        };
        assert_eq!(line.endpoints(&grid), (dvec2(1000.0, 500.0), dvec2(1000.0, 620.0)));
    }

    #[test]
    fn grade_line_spans_requested_length() {
        let grid = GridLayout::build(4, 260.0).unwrap().placed_at(dvec2(0.0, 0.0)).grid;
        let grade = grid.grade_line(260.0).unwrap();
        assert_eq!(grade.start_point(), dvec2(0.0, 100.0));
        assert_eq!(grade.end_point(), dvec2(260.0, 100.0));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(GridLayout::build(0, 500.0).unwrap_err().is_invalid_argument());
        assert!(GridLayout::build(4, 0.0).unwrap_err().is_invalid_argument());
        assert!(GridLayout::build(4, -10.0).unwrap_err().is_invalid_argument());
        assert!(GridLayout::build(4, f64::NAN).unwrap_err().is_invalid_argument());
        let no_interval = VerticalLinePolicy { interval: 0.0 };
        assert!(
            GridLayout::build_with(4, 100.0, no_interval)
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn rejects_oversized_layouts() {
        assert!(GridLayout::build(4, 1e13).unwrap_err().is_invalid_argument());
        assert!(GridLayout::build(4, f64::INFINITY).unwrap_err().is_invalid_argument());
        let longest = GridLayout::build_with(4, MAX_GRID_LENGTH, VerticalLinePolicy::EVERY_100);
        assert!(longest.is_ok());

        let tiny_interval = VerticalLinePolicy { interval: 1e-6 };
        assert!(
            GridLayout::build_with(4, 500.0, tiny_interval)
                .unwrap_err()
                .is_invalid_argument()
        );
    }
}
