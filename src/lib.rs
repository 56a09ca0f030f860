//! Profile-view construction for directional-bore planning.
//!
//! Given a plan-view running line and the utilities around it, this crate
//! lays out a scaled profile grid, finds where the utilities cross the
//! running line, projects a marker for each crossing to its burial depth and
//! builds a filleted bore path under the grade line.
//!
//! The host CAD platform stays behind the traits in [`host`]; everything
//! else is plain planar geometry on `glam::DVec2`.

use pest_derive::Parser;

pub mod command;
pub mod errors;
pub mod geometry;
pub mod host;
pub mod log;
pub mod profile;
pub mod types;

pub use command::{ProfileReport, generate_profile};
pub use errors::{GeometryError, HostError, ProfileError, ProfileWarning, Result};
pub use types::{EntityId, Point2, Point3};

/// Parser for encoded size codes (`8PVC`, `12 DIP`)
#[derive(Parser)]
#[grammar = "linetype.pest"]
pub struct LineTypeParser;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn parse_size_codes() {
        for input in ["8PVC", "12 DIP", "PVC-8", "", "Continuous"] {
            let result = LineTypeParser::parse(Rule::size_code, input);
            assert!(result.is_ok(), "Failed to parse {input:?}: {:?}", result.err());
        }
    }

    #[test]
    fn digit_and_letter_runs() {
        let pairs = LineTypeParser::parse(Rule::size_code, "8PVC-12").unwrap();
        let runs: Vec<(Rule, &str)> = pairs
            .flatten()
            .filter(|p| matches!(p.as_rule(), Rule::digits | Rule::letters))
            .map(|p| (p.as_rule(), p.as_str()))
            .collect();
        assert_eq!(
            runs,
            [(Rule::digits, "8"), (Rule::letters, "PVC"), (Rule::digits, "12")]
        );
    }
}
