//! Testing utilities for the navmap workspace
//!
//! Shared fixtures: an in-memory localizer, a configurable access gate
//! and a pre-canned entry producer.

#![allow(missing_docs)]

use navmap_build::{EntryProducer, PageRecord, SourceDiagnostics};
use navmap_tree::{LabelKey, PageNode};
use navmap_view::{AccessGate, Locale, Localizer, Principal, SortKey};
use std::collections::{HashMap, HashSet};

/// Localizer backed by a (locale, key) → message table.
///
/// Sort keys are the lowercased label bytes, which is locale-aware
/// enough for tests while staying deterministic.
#[derive(Debug, Default)]
pub struct MapLocalizer {
    messages: HashMap<(String, String), String>,
}

impl MapLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(
        mut self,
        locale: &str,
        key: &str,
        text: impl Into<String>,
    ) -> Self {
        self.messages
            .insert((locale.to_string(), key.to_string()), text.into());
        self
    }
}

impl Localizer for MapLocalizer {
    fn message(&self, key: &LabelKey, locale: &Locale) -> Option<String> {
        self.messages
            .get(&(locale.as_str().to_string(), key.as_str().to_string()))
            .cloned()
    }

    fn sort_key(&self, label: &str, _locale: &Locale) -> SortKey {
        SortKey::from_bytes(label.to_lowercase().into_bytes())
    }
}

/// Access gate driven by an allow-list of URIs.
#[derive(Debug)]
pub struct ListGate {
    allow: HashSet<String>,
    allow_all: bool,
}

impl ListGate {
    /// Gate that permits every page.
    pub fn allow_all() -> Self {
        Self {
            allow: HashSet::new(),
            allow_all: true,
        }
    }

    /// Gate that permits only the listed URIs.
    pub fn allowing<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: uris.into_iter().map(Into::into).collect(),
            allow_all: false,
        }
    }
}

impl AccessGate for ListGate {
    fn may_view(&self, _principal: &Principal, uri: &str, _node: &PageNode) -> bool {
        self.allow_all || self.allow.contains(uri)
    }
}

/// Entry producer with pre-canned records and redirects.
#[derive(Debug)]
pub struct StaticProducer {
    label: String,
    records: Vec<PageRecord>,
    redirects: Vec<(String, String)>,
    diagnostics: SourceDiagnostics,
    contributes: bool,
}

impl StaticProducer {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            records: Vec::new(),
            redirects: Vec::new(),
            diagnostics: SourceDiagnostics::new(label),
            contributes: false,
        }
    }

    pub fn with_record(mut self, record: PageRecord) -> Self {
        self.records.push(record);
        self.contributes = true;
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.push((from.to_string(), to.to_string()));
        self.contributes = true;
        self
    }

    pub fn with_warning(mut self, message: &str) -> Self {
        self.diagnostics.warning(message);
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.diagnostics.error(message);
        self
    }
}

impl EntryProducer for StaticProducer {
    fn source_label(&self) -> &str {
        &self.label
    }

    fn load(&mut self) -> bool {
        self.contributes
    }

    fn take_records(&mut self) -> Vec<PageRecord> {
        std::mem::take(&mut self.records)
    }

    fn take_redirects(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.redirects)
    }

    fn diagnostics(&self) -> SourceDiagnostics {
        self.diagnostics.clone()
    }
}

/// A complete page record: view, label key `label.<uri>` and public access.
pub fn public_record(uri: &str) -> PageRecord {
    PageRecord::new(uri)
        .with_view(navmap_tree::ViewRef::new(format!("{uri}-view")))
        .with_label_key(LabelKey::new(format!("label.{uri}")))
        .with_access(navmap_tree::AccessControl::Public)
}
