//! Entry-producer contract
//!
//! Producers are the external mechanisms that discover pages (file
//! parsers, annotation scanners, declarative registration modules).
//! The core consumes them through [`EntryProducer`] and aggregates
//! their diagnostics into a [`LoadReport`]; it never interprets a
//! producer's internals.

use crate::builder::SiteMapBuilder;
use crate::error::BuildError;
use crate::record::PageRecord;
use crate::report::{LoadReport, SourceDiagnostics};

/// A source of page records and redirects
pub trait EntryProducer {
    /// Free-text label naming this source in reports
    fn source_label(&self) -> &str;

    /// Perform the load; `true` iff this producer contributed anything
    fn load(&mut self) -> bool;

    /// Drain the records produced by a successful load
    fn take_records(&mut self) -> Vec<PageRecord>;

    /// Drain declared redirect pairs (from-URI, to-URI)
    fn take_redirects(&mut self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Per-source diagnostics accumulated during the load
    fn diagnostics(&self) -> SourceDiagnostics;
}

/// Drive every producer and merge its output into the builder
///
/// A producer reporting "nothing loaded" is not itself fatal; the load
/// fails only when *no* producer contributed anything.
///
/// # Errors
/// [`BuildError::NoSourcesLoaded`] when every producer came back empty,
/// or any merge error from the builder.
pub fn load_sources(
    builder: &mut SiteMapBuilder,
    producers: &mut [Box<dyn EntryProducer>],
) -> Result<LoadReport, BuildError> {
    let mut report = LoadReport::new();
    let mut contributed = false;

    for producer in producers.iter_mut() {
        let loaded = producer.load();
        tracing::debug!(source = producer.source_label(), loaded, "producer ran");
        if loaded {
            contributed = true;
            for record in producer.take_records() {
                builder.append(&record)?;
            }
            for (from, to) in producer.take_redirects() {
                builder.add_redirect(from, to)?;
            }
        }
        report.add_source(producer.diagnostics());
    }

    if !contributed {
        return Err(BuildError::NoSourcesLoaded);
    }
    tracing::info!(sources = report.sections().len(), "all entry producers loaded");
    Ok(report)
}
