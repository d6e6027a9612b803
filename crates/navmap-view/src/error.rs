//! Error types for per-user view derivation

use navmap_tree::TreeError;

/// Errors raised while deriving or maintaining a per-user view
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// A user view may only be derived from a locked canonical map
    #[error("canonical site map must be locked before deriving a user view")]
    MasterNotLocked,

    /// Underlying forest failure
    #[error(transparent)]
    Tree(#[from] TreeError),
}
