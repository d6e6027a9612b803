//! navmap tree — canonical site-map container
//!
//! Provides the building blocks every other navmap crate works with:
//! - **[`Forest`]**: generic multi-root tree with stable integer node
//!   identities, URI indexing and lock semantics
//! - **[`PageNode`]**: immutable value of one canonical page
//! - **[`RedirectTable`]**: ordered from→to URI mapping with chain
//!   resolution
//! - **[`StandardPageKey`]**: well-known navigational roles
//!
//! # Example
//!
//! ```rust
//! use navmap_tree::{Forest, PageNode};
//!
//! let forest = Forest::new();
//! let a = forest.add_root(PageNode::stub("a").unwrap()).unwrap();
//! let b = forest.add_child(a, PageNode::stub("b").unwrap()).unwrap();
//!
//! assert_eq!(forest.uri_of(b).unwrap(), "a/b");
//! assert_eq!(forest.node_for("a/b"), Some(b));
//! ```

pub mod error;
pub mod forest;
pub mod node;
pub mod redirect;
pub mod uri;

// Re-exports
pub use error::TreeError;
pub use forest::Forest;
pub use node::{AccessControl, LabelKey, NodeId, NodeValue, PageNode, StandardPageKey, ViewRef};
pub use redirect::RedirectTable;

/// Canonical site map: the process-wide, complete page hierarchy
pub type MasterSiteMap = Forest<PageNode>;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for tree operations
    pub use crate::{
        AccessControl, Forest, LabelKey, MasterSiteMap, NodeId, NodeValue, PageNode,
        StandardPageKey, TreeError, ViewRef,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
