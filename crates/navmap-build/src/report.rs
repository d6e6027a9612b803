//! Load-time diagnostic report
//!
//! Entry producers expose categorized diagnostics grouped by a
//! free-text source label; [`LoadReport`] aggregates them into a
//! sectioned plain-text report for operational logging. The core does
//! not interpret the entries further.

use std::fmt::{self, Display, Formatter};

/// Severity of one diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Load-time failure for one entry; not fatal on its own
    Error,
    /// Suspicious but loadable input
    Warning,
    /// Informational note
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(label)
    }
}

/// One categorized diagnostic line
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    /// Severity category
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// Diagnostics contributed by one producer, under its source label
#[derive(Debug, Clone)]
pub struct SourceDiagnostics {
    source: String,
    entries: Vec<DiagnosticEntry>,
}

impl SourceDiagnostics {
    /// Create an empty set for a source label
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    /// Source label
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Record an error entry
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Record a warning entry
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    /// Record an info entry
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push(DiagnosticEntry {
            severity,
            message: message.into(),
        });
    }

    /// All entries in recording order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    /// Number of entries with the given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }
}

/// Combined load report across all sources
///
/// Rendered as plain text: summary counts first, then one section per
/// source in contribution order.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    sections: Vec<SourceDiagnostics>,
}

impl LoadReport {
    /// Create an empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one source's diagnostics
    pub fn add_source(&mut self, diagnostics: SourceDiagnostics) {
        self.sections.push(diagnostics);
    }

    /// Per-source sections in contribution order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[SourceDiagnostics] {
        &self.sections
    }

    /// Total entries of a severity across all sources
    #[must_use]
    pub fn total(&self, severity: Severity) -> usize {
        self.sections.iter().map(|s| s.count(severity)).sum()
    }
}

impl Display for LoadReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "site map load report")?;
        writeln!(
            f,
            "sources: {}, errors: {}, warnings: {}, infos: {}",
            self.sections.len(),
            self.total(Severity::Error),
            self.total(Severity::Warning),
            self.total(Severity::Info),
        )?;
        for section in &self.sections {
            writeln!(f, "\n--- {} ---", section.source())?;
            if section.entries().is_empty() {
                writeln!(f, "(no diagnostics)")?;
            }
            for entry in section.entries() {
                writeln!(f, "[{}] {}", entry.severity, entry.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sections_and_counts() {
        let mut annotations = SourceDiagnostics::new("annotations");
        annotations.error("bad access control on 'x'");
        annotations.info("12 pages scanned");
        let mut file = SourceDiagnostics::new("sitemap file");
        file.warning("duplicate uri 'a/b'");

        let mut report = LoadReport::new();
        report.add_source(annotations);
        report.add_source(file);

        assert_eq!(report.total(Severity::Error), 1);
        assert_eq!(report.total(Severity::Warning), 1);
        assert_eq!(report.total(Severity::Info), 1);

        let text = report.to_string();
        assert!(text.contains("--- annotations ---"));
        assert!(text.contains("--- sitemap file ---"));
        assert!(text.contains("[warning] duplicate uri 'a/b'"));
        assert!(text.contains("sources: 2, errors: 1, warnings: 1, infos: 1"));
    }

    #[test]
    fn test_empty_section_renders_placeholder() {
        let mut report = LoadReport::new();
        report.add_source(SourceDiagnostics::new("quiet"));
        assert!(report.to_string().contains("(no diagnostics)"));
    }
}
