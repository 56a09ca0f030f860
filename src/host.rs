//! Boundary to the host CAD platform.
//!
//! The core never touches a drawing database directly. Input comes through
//! an [`EntityPicker`], output goes to a [`DrawingSink`] that batches appends
//! until `commit` or `rollback`. Both travel in a [`Session`] together with
//! the run's [`ProfileOptions`].

use crate::errors::HostError;
use crate::geometry::Polyline;
use crate::profile::defaults::{
    BORE_DEPTH, CROSSING_CLEARANCE, DEFAULT_VERTICAL_SCALE, DIVE_DISTANCE, FILLET_RADIUS,
};
use crate::profile::{LayerCategoryMap, Obstruction, VerticalLinePolicy};
use crate::types::{EntityId, HorizontalAlignment, Point2, Point3};

/// Restricts what an interactive pick or fence selection accepts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityFilter {
    pub polylines_only: bool,
    /// Accepted layer names (case-insensitive); empty accepts all
    pub layers: Vec<String>,
}

impl EntityFilter {
    pub fn polylines() -> Self {
        Self {
            polylines_only: true,
            layers: Vec::new(),
        }
    }

    pub fn accepts(&self, record: &EntityRecord) -> bool {
        if self.polylines_only && !matches!(record.geometry, EntityGeometry::Polyline(_)) {
            return false;
        }
        self.layers.is_empty()
            || self
                .layers
                .iter()
                .any(|l| l.eq_ignore_ascii_case(&record.layer))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityGeometry {
    Polyline(Polyline),
    /// Anything the core does not read, with the host's type name
    Other(String),
}

/// What the core reads back about a host entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub geometry: EntityGeometry,
    pub layer: String,
    /// Linetype name; carries the encoded size code for utilities
    pub linetype: String,
}

/// Output primitive handed to the host
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Polyline {
        path: Polyline,
        layer: String,
    },
    Text {
        text: String,
        anchor: Point2,
        height: f64,
        alignment: HorizontalAlignment,
        style: String,
        layer: String,
    },
    Ellipse {
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        layer: String,
    },
}

impl Drawable {
    pub fn layer(&self) -> &str {
        match self {
            Drawable::Polyline { layer, .. }
            | Drawable::Text { layer, .. }
            | Drawable::Ellipse { layer, .. } => layer,
        }
    }
}

/// Interactive input from the host
pub trait EntityPicker {
    /// Ask the user to pick one entity. `None` when cancelled.
    fn prompt_for_entity(&mut self, prompt: &str, filter: &EntityFilter) -> Option<EntityId>;

    /// Ask the user for a point. `None` when cancelled.
    fn prompt_for_point(&mut self, prompt: &str) -> Option<Point3>;

    /// Entities crossed by the fence through `fence`. `None` when nothing
    /// was selected.
    fn select_by_fence(
        &mut self,
        fence: &[Point2],
        filter: Option<&EntityFilter>,
    ) -> Option<Vec<EntityId>>;

    fn read_entity(&self, id: EntityId) -> Result<EntityRecord, HostError>;
}

/// Batched drawing output
pub trait DrawingSink {
    fn append(&mut self, drawable: Drawable) -> Result<(), HostError>;

    /// Keep everything appended since the last commit or rollback.
    fn commit(&mut self) -> Result<(), HostError>;

    /// Discard everything appended since the last commit or rollback.
    fn rollback(&mut self);
}

/// Settings for one profile run
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    pub vertical_scale: u32,
    pub vertical_lines: VerticalLinePolicy,
    pub bore_depth: f64,
    pub dive_distance: f64,
    pub fillet_radius: f64,
    /// Extra obstructions the bore must pass under
    pub obstructions: Vec<Obstruction>,
    /// Treat every placed marker as an obstruction
    pub avoid_crossings: bool,
    pub crossing_clearance: f64,
    pub layer_map: LayerCategoryMap,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            vertical_scale: DEFAULT_VERTICAL_SCALE,
            vertical_lines: VerticalLinePolicy::default(),
            bore_depth: BORE_DEPTH,
            dive_distance: DIVE_DISTANCE,
            fillet_radius: FILLET_RADIUS,
            obstructions: Vec::new(),
            avoid_crossings: false,
            crossing_clearance: CROSSING_CLEARANCE,
            layer_map: LayerCategoryMap::default(),
        }
    }
}

/// Everything a command needs from its caller
pub struct Session<'h> {
    pub picker: &'h mut dyn EntityPicker,
    pub sink: &'h mut dyn DrawingSink,
    pub options: ProfileOptions,
}

impl<'h> Session<'h> {
    pub fn new(picker: &'h mut dyn EntityPicker, sink: &'h mut dyn DrawingSink) -> Self {
        Self {
            picker,
            sink,
            options: ProfileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProfileOptions) -> Self {
        self.options = options;
        self
    }
}
