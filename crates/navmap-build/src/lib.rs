//! navmap build — canonical site-map construction
//!
//! Turns the output of external entry producers into a validated,
//! locked canonical map:
//! - **[`PageRecord`]**: transient declarative page description
//! - **[`EntryProducer`]** / **[`load_sources`]**: producer contract
//!   and combined diagnostic report
//! - **[`SiteMapBuilder`]**: merge with stub ancestors and
//!   overwrite-on-duplicate semantics
//! - **[`build_site_map`]**: finishing pass — redirect-loop detection,
//!   metadata validation, redirect access inheritance, lock-on-success
//!
//! # Example
//!
//! ```rust
//! use navmap_build::{FinishOptions, PageRecord, SiteMapBuilder, build_site_map};
//! use navmap_tree::{AccessControl, LabelKey, ViewRef};
//!
//! let mut builder = SiteMapBuilder::new();
//! builder.append(
//!     &PageRecord::new("home")
//!         .with_view(ViewRef::new("HomeView"))
//!         .with_label_key(LabelKey::new("label.home"))
//!         .with_access(AccessControl::Public),
//! )?;
//!
//! let map = build_site_map(builder, &FinishOptions::new())?;
//! assert!(map.is_locked());
//! # Ok::<(), navmap_build::BuildError>(())
//! ```

pub mod builder;
pub mod check;
pub mod error;
pub mod producer;
pub mod record;
pub mod report;

// Re-exports
pub use builder::SiteMapBuilder;
pub use check::{DefectReport, FinishOptions};
pub use error::BuildError;
pub use producer::{load_sources, EntryProducer};
pub use record::PageRecord;
pub use report::{DiagnosticEntry, LoadReport, Severity, SourceDiagnostics};

use navmap_tree::MasterSiteMap;
use std::sync::Arc;

/// Run the finishing pass over a builder's forest
///
/// Validates every node, repairs gaps from the configured defaults,
/// inherits redirect access control, then locks the forest. This is
/// the single point where construction fails fast — with the complete
/// defect report, maximizing diagnostic yield per run.
///
/// # Errors
/// [`BuildError::Validation`] when any defect or redirect loop exists.
pub fn build_site_map(
    builder: SiteMapBuilder,
    options: &FinishOptions,
) -> Result<Arc<MasterSiteMap>, BuildError> {
    check::finish(builder.into_forest(), options)
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for site-map construction
    pub use crate::{
        build_site_map, load_sources, BuildError, DefectReport, EntryProducer, FinishOptions,
        LoadReport, PageRecord, SiteMapBuilder, Severity, SourceDiagnostics,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
