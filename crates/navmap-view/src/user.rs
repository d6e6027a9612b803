//! Per-user node
//!
//! Wraps a reference to exactly one canonical node (by id, read-only
//! from this side) and carries the locale-specific display label and
//! precomputed sort key. Locale changes replace label and sort key
//! without altering structure.

use crate::collaborate::SortKey;
use navmap_tree::{NodeId, NodeValue};

/// One node of a per-user view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNode {
    canonical: NodeId,
    uri: String,
    segment: String,
    label: String,
    sort_key: SortKey,
}

impl UserNode {
    /// Create a user node wrapping the canonical node at `uri`
    #[must_use]
    pub fn new(
        canonical: NodeId,
        uri: impl Into<String>,
        segment: impl Into<String>,
        label: impl Into<String>,
        sort_key: SortKey,
    ) -> Self {
        Self {
            canonical,
            uri: uri.into(),
            segment: segment.into(),
            label: label.into(),
            sort_key,
        }
    }

    /// Identity of the wrapped canonical node
    #[inline]
    #[must_use]
    pub fn canonical(&self) -> NodeId {
        self.canonical
    }

    /// Canonical URI of the wrapped node
    #[inline]
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Localized display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Locale-aware sort key derived from the label
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> &SortKey {
        &self.sort_key
    }

    /// Same node with a recomputed label and sort key
    #[inline]
    #[must_use]
    pub fn relabeled(mut self, label: impl Into<String>, sort_key: SortKey) -> Self {
        self.label = label.into();
        self.sort_key = sort_key;
        self
    }
}

impl NodeValue for UserNode {
    fn segment(&self) -> &str {
        &self.segment
    }
}
