//! Error and warning types with diagnostics using miette
//!
//! Fatal errors stop a profile run and surface the first failure to the user.
//! Warnings are collected per item (candidate, corner, detour) and reported
//! once the batch completes.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::{EntityId, NumericError};

/// Result alias used throughout the crate
pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors raised by the geometry and layout engine
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid argument `{name}`: {cause}")]
    #[diagnostic(code(bore_profile::geometry::invalid_numeric))]
    InvalidNumeric {
        name: &'static str,
        #[source]
        cause: NumericError,
    },

    #[error("invalid argument `{name}`: {reason}")]
    #[diagnostic(code(bore_profile::geometry::invalid_argument))]
    InvalidArgument { name: &'static str, reason: String },

    #[error("degenerate geometry: {0}")]
    #[diagnostic(
        code(bore_profile::geometry::degenerate),
        help("check for zero-length segments or an offset larger than an arc radius")
    )]
    DegenerateGeometry(String),

    #[error("geometry computation failed: {0}")]
    #[diagnostic(code(bore_profile::geometry::tooling_failure))]
    ToolingFailure(String),
}

impl GeometryError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GeometryError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        GeometryError::DegenerateGeometry(message.into())
    }

    /// True for the argument-validation variants
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            GeometryError::InvalidNumeric { .. } | GeometryError::InvalidArgument { .. }
        )
    }
}

// ============================================================================
// Host Errors
// ============================================================================

/// Errors reported by the host CAD collaborator
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("{what} cancelled")]
    #[diagnostic(code(bore_profile::host::cancelled))]
    Cancelled { what: &'static str },

    #[error("entity {id} is not a polyline")]
    #[diagnostic(
        code(bore_profile::host::wrong_entity_kind),
        help("select a polyline as the running line")
    )]
    WrongEntityKind { id: EntityId },

    #[error("host operation failed: {0}")]
    #[diagnostic(code(bore_profile::host::failed))]
    Failed(String),
}

// ============================================================================
// Top-level Errors
// ============================================================================

/// Fatal error of a profile-generation run
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Host(#[from] HostError),
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal per-item problems collected during a batch
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ProfileWarning {
    #[error("candidate {id} skipped")]
    #[diagnostic(code(bore_profile::crossing::candidate_skipped), severity(Warning))]
    CandidateSkipped {
        id: EntityId,
        #[source]
        cause: GeometryError,
    },

    #[error("candidate {id} crosses on `{category}`, which is not placed yet")]
    #[diagnostic(code(bore_profile::crossing::unsupported_category), severity(Warning))]
    UnsupportedCategory { id: EntityId, category: String },

    #[error("{corner} corner left sharp: a {radius} fillet does not fit")]
    #[diagnostic(
        code(bore_profile::bore::fillet_not_applied),
        severity(Warning),
        help("use a smaller fillet radius or a longer dive")
    )]
    FilletNotApplied { corner: String, radius: f64 },

    #[error("detour at station {station} skipped: {reason}")]
    #[diagnostic(code(bore_profile::bore::detour_skipped), severity(Warning))]
    DetourSkipped { station: f64, reason: String },
}
