//! Utility categories, the layer-name map that resolves them, and the
//! burial depth table.

use std::collections::HashMap;
use std::fmt;

/// What kind of utility a candidate entity carries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UtilityCategory {
    Sewer,
    Water,
    Storm,
    /// Back of curb; recognized but not placed in the profile yet
    BackOfCurb,
    /// Any other layer, kept verbatim
    Other(String),
}

impl UtilityCategory {
    /// Canonical lower-case name
    pub fn name(&self) -> &str {
        match self {
            UtilityCategory::Sewer => "sewer",
            UtilityCategory::Water => "water",
            UtilityCategory::Storm => "storm",
            UtilityCategory::BackOfCurb => "boc",
            UtilityCategory::Other(name) => name,
        }
    }

    /// Built-in categories by case-insensitive name
    fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sewer" => Some(UtilityCategory::Sewer),
            "water" => Some(UtilityCategory::Water),
            "storm" => Some(UtilityCategory::Storm),
            "boc" => Some(UtilityCategory::BackOfCurb),
            _ => None,
        }
    }
}

impl fmt::Display for UtilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves free-text layer names to categories.
///
/// Lookups are case-insensitive. The four built-in names always resolve;
/// extra aliases can be registered by the host (e.g. `SAN-SEWER` → sewer).
#[derive(Debug, Clone, Default)]
pub struct LayerCategoryMap {
    aliases: HashMap<String, UtilityCategory>,
}

impl LayerCategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `layer` as another name for `category`.
    pub fn with_alias(mut self, layer: &str, category: UtilityCategory) -> Self {
        self.aliases.insert(layer.to_ascii_lowercase(), category);
        self
    }

    pub fn resolve(&self, layer: &str) -> UtilityCategory {
        let trimmed = layer.trim();
        if let Some(category) = UtilityCategory::builtin(trimmed) {
            return category;
        }
        match self.aliases.get(&trimmed.to_ascii_lowercase()) {
            Some(category) => category.clone(),
            None => UtilityCategory::Other(trimmed.to_string()),
        }
    }
}

/// Nominal burial depth per category
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthTable;

impl DepthTable {
    pub const SEWER: f64 = 40.0;
    pub const WATER: f64 = 16.0;
    pub const STORM: f64 = 12.0;

    /// Depth below grade; zero for categories without a projection offset.
    pub fn depth_of(&self, category: &UtilityCategory) -> f64 {
        match category {
            UtilityCategory::Sewer => Self::SEWER,
            UtilityCategory::Water => Self::WATER,
            UtilityCategory::Storm => Self::STORM,
            UtilityCategory::BackOfCurb | UtilityCategory::Other(_) => 0.0,
        }
    }

    /// Depth by case-insensitive category name
    pub fn depth_of_name(&self, name: &str) -> f64 {
        match UtilityCategory::builtin(name.trim()) {
            Some(category) => self.depth_of(&category),
            None => 0.0,
        }
    }
}
