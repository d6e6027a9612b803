//! Node model for the canonical site map
//!
//! Provides [`NodeId`], the [`PageNode`] value type, access-control
//! classifications and the fixed set of [`StandardPageKey`] roles.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Stable integer identity of a node within one forest
///
/// Identities are allocated sequentially and never reused while the
/// forest lives, so a stale id held across a `remove_node` fails with
/// [`TreeError::NodeNotFound`] instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Create an id from its raw value
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle naming a view/component that renders a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRef(String);

impl ViewRef {
    /// Create a view reference
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Handle name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ViewRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque localization key, resolved to a display string by the
/// localization collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelKey(String);

impl LabelKey {
    /// Create a label key
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LabelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access-control classification of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessControl {
    /// Visible to everyone
    Public,
    /// Visible only to unauthenticated sessions
    Guest,
    /// Visible to any authenticated principal
    AuthenticatedUser,
    /// Visibility decided by a permission check on the page URI
    Permission,
    /// Visible to principals holding at least one of the named roles
    Roles(Vec<String>),
}

impl AccessControl {
    /// Build a `Roles` classification, rejecting an empty role list
    ///
    /// # Errors
    /// [`TreeError::EmptyRoles`] if no role names are given.
    pub fn roles<I, S>(names: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(TreeError::EmptyRoles);
        }
        Ok(Self::Roles(names))
    }

    /// Role names, when classification is `Roles`
    #[inline]
    #[must_use]
    pub fn role_names(&self) -> Option<&[String]> {
        match self {
            Self::Roles(names) => Some(names),
            _ => None,
        }
    }
}

/// Well-known navigational roles, addressable independent of normal
/// visibility filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardPageKey {
    /// Landing page for unauthenticated sessions
    PublicHome,
    /// Landing page after authentication
    PrivateHome,
    /// The login page
    LogIn,
    /// The logout page
    LogOut,
}

impl StandardPageKey {
    /// All well-known keys
    pub const ALL: [Self; 4] = [Self::PublicHome, Self::PrivateHome, Self::LogIn, Self::LogOut];

    /// Conventional label key registered for this role by default
    #[must_use]
    pub fn default_label_key(self) -> LabelKey {
        let key = match self {
            Self::PublicHome => "nav.public-home",
            Self::PrivateHome => "nav.private-home",
            Self::LogIn => "nav.log-in",
            Self::LogOut => "nav.log-out",
        };
        LabelKey::new(key)
    }
}

impl Display for StandardPageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PublicHome => "public-home",
            Self::PrivateHome => "private-home",
            Self::LogIn => "log-in",
            Self::LogOut => "log-out",
        };
        f.write_str(name)
    }
}

/// Minimal bound the generic forest places on its node values
pub trait NodeValue: Clone + fmt::Debug {
    /// Single path component of this node (no slashes); empty only for
    /// a node representing the application root
    fn segment(&self) -> &str;
}

/// Immutable value of one canonical page node
///
/// "Editing" a node means building a new value and swapping it in at
/// the same identity via [`Forest::replace_node`](crate::Forest::replace_node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    segment: String,
    view: Option<ViewRef>,
    label_key: Option<LabelKey>,
    access: Option<AccessControl>,
    position_index: i32,
}

impl PageNode {
    /// Create a node with the given URI segment and no metadata
    ///
    /// This is the shape of stub intermediate nodes created while
    /// merging records.
    ///
    /// # Errors
    /// [`TreeError::SegmentContainsSlash`] if the segment holds a `/`.
    pub fn stub(segment: impl Into<String>) -> Result<Self, TreeError> {
        let segment = segment.into();
        if segment.contains('/') {
            return Err(TreeError::SegmentContainsSlash(segment));
        }
        Ok(Self {
            segment,
            view: None,
            label_key: None,
            access: None,
            position_index: 0,
        })
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

    /// Set the position index; negative hides the node from navigation
    /// while keeping it reachable by direct link
    #[inline]
    #[must_use]
    pub fn with_position_index(mut self, index: i32) -> Self {
        self.position_index = index;
        self
    }

    /// View reference, if any
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<&ViewRef> {
        self.view.as_ref()
    }

    /// Localization key, if any
    #[inline]
    #[must_use]
    pub fn label_key(&self) -> Option<&LabelKey> {
        self.label_key.as_ref()
    }

    /// Access-control classification, if any
    #[inline]
    #[must_use]
    pub fn access(&self) -> Option<&AccessControl> {
        self.access.as_ref()
    }

    /// Position index among siblings
    #[inline]
    #[must_use]
    pub fn position_index(&self) -> i32 {
        self.position_index
    }

    /// Whether the node is hidden from navigation rendering
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.position_index < 0
    }
}

impl NodeValue for PageNode {
    fn segment(&self) -> &str {
        &self.segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roles_rejects_empty_list() {
        let err = AccessControl::roles(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, TreeError::EmptyRoles));

        let ok = AccessControl::roles(["admin"]).unwrap();
        assert_eq!(ok.role_names(), Some(&["admin".to_string()][..]));
    }

    #[test]
    fn test_stub_rejects_slash_in_segment() {
        let err = PageNode::stub("a/b").unwrap_err();
        assert!(matches!(err, TreeError::SegmentContainsSlash(_)));
    }

    #[test]
    fn test_empty_segment_is_permitted() {
        let root = PageNode::stub("").unwrap();
        assert_eq!(root.segment(), "");
    }

    #[test]
    fn test_negative_position_index_is_hidden() {
        let node = PageNode::stub("secret").unwrap().with_position_index(-1);
        assert!(node.is_hidden());
        assert!(!PageNode::stub("shown").unwrap().is_hidden());
    }
}
