//! Collaborator seams of the per-user view
//!
//! The view never renders, localizes or authorizes anything itself:
//! localization and authorization are pluggable collaborators, and the
//! session principal is an opaque handle delivered through
//! [`SessionEvent`]s.

use navmap_tree::{LabelKey, PageNode};
use std::fmt::{self, Debug, Display, Formatter};

/// Opaque locale tag, e.g. `"en-US"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from its tag
    #[inline]
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Locale tag
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Precomputed locale-aware sort key
///
/// Ordering sibling nodes compares these byte keys instead of
/// re-collating display labels on every comparison. Producing the key
/// is the localization collaborator's job; the core only stores and
/// compares it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SortKey(Vec<u8>);

impl SortKey {
    /// Wrap collated bytes
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Collated bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Localization collaborator
pub trait Localizer: Send + Sync + Debug {
    /// Display string for a localization key under a locale
    fn message(&self, key: &LabelKey, locale: &Locale) -> Option<String>;

    /// Locale-aware sort key for a display string
    fn sort_key(&self, label: &str, locale: &Locale) -> SortKey;
}

/// Authorization collaborator
pub trait AccessGate: Send + Sync + Debug {
    /// May the principal view the page at `uri`?
    ///
    /// The canonical node carries the access-control classification and
    /// role list the decision is based on.
    fn may_view(&self, principal: &Principal, uri: &str, node: &PageNode) -> bool;
}

/// Opaque principal handle for one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Principal {
    subject: Option<String>,
}

impl Principal {
    /// Unauthenticated principal
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated principal with a subject name
    #[inline]
    #[must_use]
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    /// Whether a subject is present
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    /// Subject name, if authenticated
    #[inline]
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// Session authentication state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A principal authenticated
    LoggedIn(Principal),
    /// The session's principal logged out
    LoggedOut,
}
