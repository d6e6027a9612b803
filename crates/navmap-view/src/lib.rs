//! navmap view — per-session derived site maps
//!
//! Derives a filtered, localized view from the locked canonical map
//! and keeps it synchronized with session and locale changes:
//! - **[`tree_copy`]** / **[`NodeModifier`]**: generic source→target
//!   tree copy driven by a pluggable per-node transform/filter
//! - **[`UserViewModifier`]**: the per-user filter chain (label
//!   presence, login-page suppression, authorization)
//! - **[`UserSiteMap`]**: session lifecycle, read API and change
//!   listeners
//! - **[`Localizer`]** / **[`AccessGate`]**: collaborator seams
//!
//! The canonical map is passed in as an explicit shared handle; there
//! is no ambient global state.

pub mod collaborate;
pub mod copy;
pub mod error;
pub mod modifier;
pub mod user;
pub mod view;

// Re-exports
pub use collaborate::{AccessGate, Locale, Localizer, Principal, SessionEvent, SortKey};
pub use copy::{tree_copy, CopyStats, NodeModifier};
pub use error::ViewError;
pub use modifier::UserViewModifier;
pub use user::UserNode;
pub use view::{ListenerId, UserSiteMap, ViewListener};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for per-user views
    pub use crate::{
        AccessGate, Locale, Localizer, Principal, SessionEvent, SortKey, UserNode, UserSiteMap,
        ViewError, ViewListener,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
