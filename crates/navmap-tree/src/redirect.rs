//! Redirect table
//!
//! Ordered from→to URI mapping with transitive chain resolution.
//! Storage is unconditional; cycle checking is the finisher's job, so
//! the chain walk here defends itself against a not-yet-validated
//! cyclic table instead of trusting it.

use indexmap::IndexMap;
use std::collections::HashSet;

/// Insertion-ordered mapping from source URI to target URI
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    entries: IndexMap<String, String>,
}

impl RedirectTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a redirect pair; a later entry for the same source wins
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// Single-hop lookup
    #[inline]
    #[must_use]
    pub fn redirect_for(&self, uri: &str) -> Option<&str> {
        self.entries.get(uri).map(String::as_str)
    }

    /// Follow the redirect chain to the last resolvable page
    ///
    /// Returns the input unchanged when no redirect exists for it. The
    /// walk keeps a visited set so a cyclic table terminates; on
    /// revisiting a URI the last page reached before the repeat is
    /// returned.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> String {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = uri;
        while let Some(next) = self.entries.get(current) {
            if !seen.insert(current) {
                break;
            }
            current = next;
        }
        current.to_string()
    }

    /// All pairs in insertion order
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Whether the table holds a redirect for `uri`
    #[inline]
    #[must_use]
    pub fn contains_source(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    /// Number of stored pairs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
