//! Error types for site-map construction
//!
//! Load-time producer diagnostics are informational and live in the
//! [`LoadReport`](crate::report::LoadReport); the variants here are the
//! conditions that actually prevent the navigation subsystem from
//! starting.

use crate::check::DefectReport;
use navmap_tree::TreeError;

/// Errors raised while building or finishing the canonical map
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Aggregate validation failure carrying the full grouped report
    #[error("site map validation failed:\n{0}")]
    Validation(Box<DefectReport>),

    /// No entry producer contributed anything
    #[error("no entry producer contributed any pages")]
    NoSourcesLoaded,

    /// A page record must carry at least one path segment
    #[error("page record has an empty uri")]
    EmptyUri,

    /// A page record URI may not contain empty path segments
    #[error("page record uri '{0}' contains an empty segment")]
    EmptySegment(String),

    /// Underlying forest failure
    #[error(transparent)]
    Tree(#[from] TreeError),
}
