//! Transient page records emitted by entry producers
//!
//! A [`PageRecord`] describes one page, keyed by its full URI. Records
//! exist only while merging; the builder turns each into a canonical
//! node and discards it.

use navmap_tree::{AccessControl, LabelKey, PageNode, TreeError, ViewRef};
use serde::{Deserialize, Serialize};

/// Declarative description of one page, keyed by full URI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    uri: String,
    #[serde(default)]
    view: Option<ViewRef>,
    #[serde(default)]
    label_key: Option<LabelKey>,
    #[serde(default)]
    access: Option<AccessControl>,
    #[serde(default)]
    position_index: i32,
}

impl PageRecord {
    /// Create a record for the given full URI with no metadata
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            view: None,
            label_key: None,
            access: None,
            position_index: 0,
        }
    }

    /// Set the view reference
    #[inline]
    #[must_use]
    pub fn with_view(mut self, view: ViewRef) -> Self {
        self.view = Some(view);
        self
    }

    /// Set the localization key
    #[inline]
    #[must_use]
    pub fn with_label_key(mut self, key: LabelKey) -> Self {
        self.label_key = Some(key);
        self
    }

    /// Set the access-control classification
    #[inline]
    #[must_use]
    pub fn with_access(mut self, access: AccessControl) -> Self {
        self.access = Some(access);
        self
    }

    /// Set the position index
    #[inline]
    #[must_use]
    pub fn with_position_index(mut self, index: i32) -> Self {
        self.position_index = index;
        self
    }

    /// Full URI this record describes
    #[inline]
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Localization key, if any
    #[inline]
    #[must_use]
    pub fn label_key(&self) -> Option<&LabelKey> {
        self.label_key.as_ref()
    }

    /// Build the canonical node value for this record
    ///
    /// `segment` is the final path component of the record's URI.
    ///
    /// # Errors
    /// [`TreeError::SegmentContainsSlash`] if the segment is invalid.
    pub fn to_page_node(&self, segment: &str) -> Result<PageNode, TreeError> {
        let mut node = PageNode::stub(segment)?.with_position_index(self.position_index);
        if let Some(view) = &self.view {
            node = node.with_view(view.clone());
        }
        if let Some(key) = &self.label_key {
            node = node.with_label_key(key.clone());
        }
        if let Some(access) = &self.access {
            node = node.with_access(access.clone());
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmap_tree::NodeValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_page_node_carries_all_fields() {
        let record = PageRecord::new("public/login")
            .with_view(ViewRef::new("LoginView"))
            .with_label_key(LabelKey::new("nav.log-in"))
            .with_access(AccessControl::Guest)
            .with_position_index(3);
        let node = record.to_page_node("login").unwrap();
        assert_eq!(node.segment(), "login");
        assert_eq!(node.view().unwrap().as_str(), "LoginView");
        assert_eq!(node.label_key().unwrap().as_str(), "nav.log-in");
        assert_eq!(node.access(), Some(&AccessControl::Guest));
        assert_eq!(node.position_index(), 3);
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: PageRecord = serde_json::from_str(r#"{"uri": "private"}"#).unwrap();
        assert_eq!(record.uri(), "private");
        assert_eq!(record.label_key(), None);
        let node = record.to_page_node("private").unwrap();
        assert_eq!(node.position_index(), 0);
    }
}
