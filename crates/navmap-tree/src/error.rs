//! Error types for forest operations

use crate::node::NodeId;

/// Errors raised by forest and node operations
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Mutation attempted on a locked forest; locking is one-way and
    /// happens once validation succeeds
    #[error("forest is locked; mutation is no longer permitted")]
    Locked,

    /// The node id is not present in this forest
    #[error("node {0} not found in forest")]
    NodeNotFound(NodeId),

    /// Attaching a node under its own descendant would break the tree
    #[error("cannot attach {child} under its own descendant {parent}")]
    WouldCycle {
        /// The requested new parent
        parent: NodeId,
        /// The node being moved
        child: NodeId,
    },

    /// A URI segment may not contain a path separator
    #[error("segment contains '/': '{0}'")]
    SegmentContainsSlash(String),

    /// `AccessControl::Roles` requires at least one role name
    #[error("roles access control requires a non-empty role list")]
    EmptyRoles,
}
