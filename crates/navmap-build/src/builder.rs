//! Canonical map builder
//!
//! Merges [`PageRecord`]s into the canonical forest. Each record is
//! keyed by a full URI; missing ancestors are created as stub nodes,
//! and a record for an already-existing URI overwrites the node's value
//! while preserving its identity and edges — later entries win.

use crate::error::BuildError;
use crate::record::PageRecord;
use navmap_tree::uri;
use navmap_tree::{LabelKey, MasterSiteMap, NodeId, PageNode, StandardPageKey};
use std::collections::HashMap;

/// Builder merging declarative page entries into a canonical tree
#[derive(Debug)]
pub struct SiteMapBuilder {
    forest: MasterSiteMap,
    standard_keys: HashMap<LabelKey, StandardPageKey>,
}

impl Default for SiteMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteMapBuilder {
    /// Create a builder with the conventional standard-page label keys
    #[must_use]
    pub fn new() -> Self {
        let mut standard_keys = HashMap::new();
        for key in StandardPageKey::ALL {
            standard_keys.insert(key.default_label_key(), key);
        }
        Self {
            forest: MasterSiteMap::new(),
            standard_keys,
        }
    }

    /// Register (or re-map) the label key identifying a standard page
    #[must_use]
    pub fn with_standard_key(mut self, key: StandardPageKey, label: LabelKey) -> Self {
        self.standard_keys.retain(|_, v| *v != key);
        self.standard_keys.insert(label, key);
        self
    }

    /// Create an explicit application root (empty segment)
    ///
    /// Subsequent top-level pages attach under it instead of becoming
    /// independent roots.
    ///
    /// # Errors
    /// Any forest error from the insertion.
    pub fn with_app_root(self) -> Result<Self, BuildError> {
        if self.forest.node_for("").is_none() {
            self.forest.add_root(PageNode::stub("")?)?;
        }
        Ok(self)
    }

    /// Merge one record into the canonical tree
    ///
    /// Walks backward from the full path looking for an existing node
    /// at each shorter prefix; the gap between the match point and the
    /// final segment is filled with stub intermediate nodes, then the
    /// fully-populated final node is attached. An existing node at the
    /// full URI has its value replaced in place.
    ///
    /// # Errors
    /// [`BuildError::EmptyUri`] for a record without path segments,
    /// [`BuildError::EmptySegment`] for a URI with an empty interior or
    /// trailing segment, or any forest error from the insertion.
    pub fn append(&mut self, record: &PageRecord) -> Result<NodeId, BuildError> {
        let segments = uri::parse_segments(record.uri());
        let Some((last, ancestors)) = segments.split_last() else {
            return Err(BuildError::EmptyUri);
        };
        // An empty segment would alias its parent's URI in the index;
        // producers are external input, so reject rather than absorb.
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(BuildError::EmptySegment(record.uri().to_string()));
        }
        let full_uri = uri::join_segments(&segments);

        let id = if let Some(existing) = self.forest.node_for(&full_uri) {
            // Later entries for the same URI win; identity and edges stay.
            self.forest
                .replace_node(existing, record.to_page_node(last)?)?;
            tracing::debug!(uri = %full_uri, node = %existing, "overwrote existing node");
            existing
        } else {
            let insertion_point = self.find_insertion_point(&full_uri, ancestors.len());
            let mut parent = insertion_point.0;
            for segment in &ancestors[insertion_point.1..] {
                let stub = PageNode::stub(*segment)?;
                parent = Some(match parent {
                    Some(p) => self.forest.add_child(p, stub)?,
                    None => self.forest.add_root(stub)?,
                });
            }
            let node = record.to_page_node(last)?;
            let id = match parent {
                Some(p) => self.forest.add_child(p, node)?,
                None => self.forest.add_root(node)?,
            };
            tracing::debug!(uri = %full_uri, node = %id, "appended node");
            id
        };

        if let Some(key) = record.label_key().and_then(|k| self.standard_keys.get(k)) {
            self.forest.set_standard_page(*key, id)?;
            tracing::debug!(uri = %full_uri, standard_page = %key, "registered standard page");
        }
        Ok(id)
    }

    /// Store a redirect pair; existence checks are deferred to finish
    ///
    /// # Errors
    /// Any forest error (notably a locked forest).
    pub fn add_redirect(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<(), BuildError> {
        self.forest.add_redirect(from, to)?;
        Ok(())
    }

    /// The forest under construction
    #[inline]
    #[must_use]
    pub fn forest(&self) -> &MasterSiteMap {
        &self.forest
    }

    /// Take the forest out of the builder for finishing
    #[must_use]
    pub(crate) fn into_forest(self) -> MasterSiteMap {
        self.forest
    }

    /// Longest existing proper prefix of the record's URI
    ///
    /// Returns the matched node (or the application root / none) and
    /// the index of the first ancestor segment still missing.
    fn find_insertion_point(&self, full_uri: &str, ancestor_count: usize) -> (Option<NodeId>, usize) {
        for (i, prefix) in uri::prefixes(full_uri).iter().enumerate() {
            if let Some(id) = self.forest.node_for(prefix) {
                return (Some(id), ancestor_count - i);
            }
        }
        (self.forest.node_for(""), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmap_tree::{AccessControl, NodeValue, ViewRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_deep_uri_creates_stub_ancestors() {
        let mut builder = SiteMapBuilder::new();
        let c = builder.append(&PageRecord::new("a/b/c")).unwrap();
        let forest = builder.forest();

        assert_eq!(forest.node_count(), 3);
        assert_eq!(forest.uri_of(c).unwrap(), "a/b/c");
        let b = forest.parent_of(c).unwrap().unwrap();
        assert_eq!(forest.uri_of(b).unwrap(), "a/b");
        let a = forest.parent_of(b).unwrap().unwrap();
        assert_eq!(forest.uri_of(a).unwrap(), "a");
        assert_eq!(forest.parent_of(a).unwrap(), None);
        // intermediates are stubs
        assert_eq!(forest.get(b).unwrap().view(), None);
    }

    #[test]
    fn test_append_attaches_at_deepest_existing_prefix() {
        let mut builder = SiteMapBuilder::new();
        builder.append(&PageRecord::new("a/b")).unwrap();
        let d = builder.append(&PageRecord::new("a/b/c/d")).unwrap();
        let forest = builder.forest();
        assert_eq!(forest.node_count(), 4);
        let c = forest.parent_of(d).unwrap().unwrap();
        assert_eq!(forest.uri_of(c).unwrap(), "a/b/c");
        assert_eq!(forest.node_for("a/b"), forest.parent_of(c).unwrap());
    }

    #[test]
    fn test_duplicate_uri_overwrites_value_keeps_edges() {
        let mut builder = SiteMapBuilder::new();
        builder
            .append(&PageRecord::new("a/b").with_view(ViewRef::new("OldView")))
            .unwrap();
        let child = builder.append(&PageRecord::new("a/b/c")).unwrap();
        let b = builder
            .append(
                &PageRecord::new("a/b")
                    .with_view(ViewRef::new("NewView"))
                    .with_access(AccessControl::Public),
            )
            .unwrap();
        let forest = builder.forest();

        assert_eq!(forest.node_count(), 3);
        assert_eq!(forest.node_for("a/b"), Some(b));
        assert_eq!(forest.get(b).unwrap().view().unwrap().as_str(), "NewView");
        assert_eq!(forest.children_of(b).unwrap(), vec![child]);
        assert_eq!(forest.parent_of(child).unwrap(), Some(b));
    }

    #[test]
    fn test_empty_interior_segment_is_rejected() {
        let mut builder = SiteMapBuilder::new();
        builder
            .append(&PageRecord::new("a").with_view(ViewRef::new("AView")))
            .unwrap();
        let err = builder.append(&PageRecord::new("a//b")).unwrap_err();
        assert!(matches!(err, BuildError::EmptySegment(_)));

        // the real node keeps its index entry; nothing was created
        let forest = builder.forest();
        assert_eq!(forest.node_count(), 1);
        let a = forest.node_for("a").unwrap();
        assert_eq!(forest.get(a).unwrap().view().unwrap().as_str(), "AView");

        // a trailing slash parses to an empty final segment
        assert!(matches!(
            builder.append(&PageRecord::new("a/")),
            Err(BuildError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_empty_uri_record_is_rejected() {
        let mut builder = SiteMapBuilder::new();
        let err = builder.append(&PageRecord::new("")).unwrap_err();
        assert!(matches!(err, BuildError::EmptyUri));
    }

    #[test]
    fn test_standard_page_registered_by_label_key() {
        let mut builder = SiteMapBuilder::new();
        let login = builder
            .append(
                &PageRecord::new("public/login")
                    .with_label_key(StandardPageKey::LogIn.default_label_key()),
            )
            .unwrap();
        assert_eq!(
            builder.forest().standard_page(StandardPageKey::LogIn),
            Some(login)
        );
    }

    #[test]
    fn test_custom_standard_key_mapping() {
        let mut builder = SiteMapBuilder::new()
            .with_standard_key(StandardPageKey::LogIn, LabelKey::new("custom.signin"));
        let login = builder
            .append(&PageRecord::new("signin").with_label_key(LabelKey::new("custom.signin")))
            .unwrap();
        assert_eq!(
            builder.forest().standard_page(StandardPageKey::LogIn),
            Some(login)
        );
        // default key no longer maps
        builder
            .append(
                &PageRecord::new("other").with_label_key(StandardPageKey::LogIn.default_label_key()),
            )
            .unwrap();
        assert_eq!(
            builder.forest().standard_page(StandardPageKey::LogIn),
            Some(login)
        );
    }

    #[test]
    fn test_app_root_collects_top_level_pages() {
        let mut builder = SiteMapBuilder::new().with_app_root().unwrap();
        let home = builder.append(&PageRecord::new("home")).unwrap();
        let forest = builder.forest();
        let root = forest.node_for("").unwrap();
        assert_eq!(forest.parent_of(home).unwrap(), Some(root));
        assert_eq!(forest.uri_of(home).unwrap(), "home");
        assert_eq!(forest.get(home).unwrap().segment(), "home");
    }
}
