//! The profile-generation command: pick a running line, lay out the grid,
//! project crossing utilities and draw the bore path.

use glam::dvec2;

use crate::errors::{HostError, ProfileWarning, Result};
use crate::geometry::Polyline;
use crate::host::{Drawable, EntityFilter, EntityGeometry, Session};
use crate::log::{debug, info, warn};
use crate::profile::defaults::{LAYER_PROFILE, LAYER_TEXT, MARKER_TEXT_HEIGHT, TEXT_STYLE};
use crate::profile::{
    Alignment, BorePathBuilder, Candidate, Crossing, CrossingDetector, DepthTable, Grid,
    GridLabel, GridLayout, Obstruction, ProfileObject,
};
use crate::types::{self, HorizontalAlignment};

/// What one successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub grid: Grid,
    pub crossings: Vec<Crossing>,
    pub markers: Vec<ProfileObject>,
    pub bore_path: Polyline,
    /// Number of drawables appended
    pub drawn: usize,
    pub warnings: Vec<ProfileWarning>,
}

/// Run the whole profile command against the session's host.
///
/// All drawables of the run are committed together. On the first fatal
/// error the sink is rolled back and the error returned.
pub fn generate_profile(session: &mut Session<'_>) -> Result<ProfileReport> {
    match run(session).and_then(|report| {
        session.sink.commit()?;
        Ok(report)
    }) {
        Ok(report) => {
            info!(
                drawn = report.drawn,
                markers = report.markers.len(),
                warnings = report.warnings.len(),
                "profile generated"
            );
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, "profile generation failed, rolling back");
            session.sink.rollback();
            Err(e)
        }
    }
}

/// Appends drawables and counts them
struct Emitter<'s, 'h> {
    session: &'s mut Session<'h>,
    drawn: usize,
}

impl Emitter<'_, '_> {
    fn emit(&mut self, drawable: Drawable) -> Result<()> {
        self.session.sink.append(drawable)?;
        self.drawn += 1;
        Ok(())
    }

    fn polyline(&mut self, path: Polyline, layer: &str) -> Result<()> {
        self.emit(Drawable::Polyline {
            path,
            layer: layer.to_string(),
        })
    }

    fn label(&mut self, label: &GridLabel) -> Result<()> {
        self.emit(Drawable::Text {
            text: label.text.clone(),
            anchor: label.anchor,
            height: label.height,
            alignment: label.alignment,
            style: TEXT_STYLE.to_string(),
            layer: LAYER_TEXT.to_string(),
        })
    }
}

fn run(session: &mut Session<'_>) -> Result<ProfileReport> {
    let id = session
        .picker
        .prompt_for_entity("Select running line", &EntityFilter::polylines())
        .ok_or(HostError::Cancelled {
            what: "running line selection",
        })?;
    let record = session.picker.read_entity(id)?;
    let EntityGeometry::Polyline(curve) = record.geometry else {
        return Err(HostError::WrongEntityKind { id }.into());
    };
    let alignment = Alignment { id, curve };
    let length = alignment.curve.length();
    debug!(%id, length, "running line");

    let options = session.options.clone();
    let layout = GridLayout::build_with(options.vertical_scale, length, options.vertical_lines)?;
    let insertion = session
        .picker
        .prompt_for_point("Select insertion point")
        .ok_or(HostError::Cancelled {
            what: "insertion point",
        })?;
    let layout = layout.placed_at(types::flatten(insertion));
    let grid = layout.grid;

    let candidates = collect_candidates(session, &alignment)?;

    let mut out = Emitter { session, drawn: 0 };
    for line in &layout.lines {
        let (from, to) = line.endpoints(&grid);
        out.polyline(Polyline::from_points([from, to])?, line.style.layer())?;
    }
    for label in layout.station_labels.iter().chain(&layout.elevation_labels) {
        out.label(label)?;
    }

    let grade = grid.grade_line(length)?;
    out.polyline(grade.clone(), LAYER_PROFILE)?;

    let origin = dvec2(grid.station_x(0.0), grid.grade_y());
    let crossings =
        CrossingDetector::new(DepthTable).find_crossings(&alignment, &candidates, origin);
    let scale = f64::from(grid.vertical_scale());
    for marker in &crossings.markers {
        let radius = marker.nominal_size / 2.0;
        out.emit(Drawable::Ellipse {
            center: marker.center,
            radius_x: radius,
            radius_y: radius * scale,
            layer: LAYER_PROFILE.to_string(),
        })?;
        out.emit(Drawable::Text {
            text: marker.display_text.clone(),
            anchor: marker.center + dvec2(radius + 1.0, 0.0),
            height: MARKER_TEXT_HEIGHT,
            alignment: HorizontalAlignment::Left,
            style: TEXT_STYLE.to_string(),
            layer: LAYER_TEXT.to_string(),
        })?;
    }

    let mut obstructions = options.obstructions.clone();
    if options.avoid_crossings {
        obstructions.extend(crossings.markers.iter().map(|m| Obstruction {
            station: m.center.x - origin.x,
            depth: origin.y - m.center.y + m.nominal_size / 2.0,
            clearance: options.crossing_clearance,
        }));
    }
    let plan = BorePathBuilder::new().with_obstructions(obstructions).build(
        &grade,
        options.bore_depth,
        options.dive_distance,
        options.fillet_radius,
    )?;
    out.polyline(plan.path.clone(), LAYER_PROFILE)?;

    let drawn = out.drawn;
    let mut warnings = crossings.warnings;
    warnings.extend(plan.warnings);

    Ok(ProfileReport {
        grid,
        crossings: crossings.crossings,
        markers: crossings.markers,
        bore_path: plan.path,
        drawn,
        warnings,
    })
}

/// Utilities fenced along the running line's vertices, categorized by layer.
fn collect_candidates(session: &mut Session<'_>, alignment: &Alignment) -> Result<Vec<Candidate>> {
    let fence: Vec<_> = alignment.curve.points().collect();
    let Some(ids) = session.picker.select_by_fence(&fence, None) else {
        debug!("fence selected nothing");
        return Ok(Vec::new());
    };

    let mut candidates = Vec::with_capacity(ids.len());
    for id in ids {
        if id == alignment.id {
            continue;
        }
        let record = session.picker.read_entity(id)?;
        let EntityGeometry::Polyline(curve) = record.geometry else {
            debug!(%id, "fenced entity is not a polyline");
            continue;
        };
        candidates.push(Candidate {
            id,
            curve,
            category: session.options.layer_map.resolve(&record.layer),
            encoded_size: record.linetype,
        });
    }
    Ok(candidates)
}
