//! Generic tree-copy engine
//!
//! Copies a source forest into a target forest of a possibly different
//! node type, driven by a pluggable [`NodeModifier`]. The traversal is
//! pre-order; a modifier returning `None` excludes the node *and its
//! entire subtree* — children of an excluded node are never visited.
//! After traversal the modifier's `finalize` hook runs once against
//! both forests.

use crate::error::ViewError;
use navmap_tree::{Forest, NodeId, NodeValue};

/// Per-node transform/filter strategy driving [`tree_copy`]
pub trait NodeModifier<S: NodeValue, T: NodeValue> {
    /// Build the target node for a source node, or `None` to exclude
    /// the source node and its whole subtree
    ///
    /// The returned node is attached by the engine under the copy of
    /// the source node's parent (or as a target root).
    fn create(&mut self, source: &Forest<S>, source_id: NodeId, value: &S) -> Option<T>;

    /// Post-copy extension hook, invoked once after traversal
    ///
    /// # Errors
    /// Implementations may fail; the engine propagates the error.
    fn finalize(&mut self, source: &Forest<S>, target: &Forest<T>) -> Result<(), ViewError> {
        let _ = (source, target);
        Ok(())
    }
}

/// Counters describing one copy run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Source nodes visited (excluded subtrees are not visited)
    pub visited: usize,
    /// Target nodes created and attached
    pub created: usize,
    /// Source nodes excluded by the modifier
    pub excluded: usize,
}

/// Copy `source` into `target` under the modifier's direction
///
/// # Errors
/// Any forest error during attachment, or a `finalize` failure.
pub fn tree_copy<S, T, M>(
    source: &Forest<S>,
    target: &Forest<T>,
    modifier: &mut M,
) -> Result<CopyStats, ViewError>
where
    S: NodeValue,
    T: NodeValue,
    M: NodeModifier<S, T>,
{
    let mut stats = CopyStats::default();
    // (source node, target parent) pairs; reversed pushes keep pre-order.
    let mut stack: Vec<(NodeId, Option<NodeId>)> = Vec::new();
    for &root in source.roots().iter().rev() {
        stack.push((root, None));
    }

    while let Some((source_id, target_parent)) = stack.pop() {
        let Some(value) = source.get(source_id) else {
            continue;
        };
        stats.visited += 1;
        match modifier.create(source, source_id, &value) {
            Some(created) => {
                let target_id = match target_parent {
                    Some(parent) => target.add_child(parent, created)?,
                    None => target.add_root(created)?,
                };
                stats.created += 1;
                for &child in source.children_of(source_id)?.iter().rev() {
                    stack.push((child, Some(target_id)));
                }
            }
            None => {
                stats.excluded += 1;
                // Excluded: the whole subtree is dropped.
            }
        }
    }

    modifier.finalize(source, target)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmap_tree::PageNode;
    use pretty_assertions::assert_eq;

    /// Identity copy that drops nodes whose segment starts with `skip`.
    #[derive(Debug, Default)]
    struct SkipPrefix {
        finalized: bool,
    }

    impl NodeModifier<PageNode, PageNode> for SkipPrefix {
        fn create(
            &mut self,
            _source: &Forest<PageNode>,
            _source_id: NodeId,
            value: &PageNode,
        ) -> Option<PageNode> {
            if value.segment().starts_with("skip") {
                None
            } else {
                Some(value.clone())
            }
        }

        fn finalize(
            &mut self,
            _source: &Forest<PageNode>,
            _target: &Forest<PageNode>,
        ) -> Result<(), ViewError> {
            self.finalized = true;
            Ok(())
        }
    }

    fn page(segment: &str) -> PageNode {
        PageNode::stub(segment).unwrap()
    }

    #[test]
    fn test_identity_copy_preserves_structure() {
        let source: Forest<PageNode> = Forest::new();
        let a = source.add_root(page("a")).unwrap();
        source.add_child(a, page("b")).unwrap();
        source.add_root(page("z")).unwrap();

        let target: Forest<PageNode> = Forest::new();
        let stats = tree_copy(&source, &target, &mut SkipPrefix::default()).unwrap();

        assert_eq!(stats.created, 3);
        assert_eq!(target.node_count(), 3);
        assert!(target.node_for("a/b").is_some());
        assert!(target.node_for("z").is_some());
        assert_eq!(target.roots().len(), 2);
    }

    #[test]
    fn test_exclusion_drops_whole_subtree() {
        let source: Forest<PageNode> = Forest::new();
        let a = source.add_root(page("a")).unwrap();
        let skipped = source.add_child(a, page("skipme")).unwrap();
        // eligible on its own, but under an excluded parent
        source.add_child(skipped, page("eligible")).unwrap();

        let target: Forest<PageNode> = Forest::new();
        let stats = tree_copy(&source, &target, &mut SkipPrefix::default()).unwrap();

        assert_eq!(target.node_count(), 1);
        assert!(target.node_for("a").is_some());
        assert!(target.node_for("a/eligible").is_none());
        assert!(target.node_for("eligible").is_none());
        // the excluded child's subtree was never visited
        assert_eq!(stats.visited, 2);
        assert_eq!(stats.excluded, 1);
    }

    #[test]
    fn test_finalize_runs_once_after_traversal() {
        let source: Forest<PageNode> = Forest::new();
        source.add_root(page("a")).unwrap();
        let target: Forest<PageNode> = Forest::new();
        let mut modifier = SkipPrefix::default();
        tree_copy(&source, &target, &mut modifier).unwrap();
        assert!(modifier.finalized);
    }
}
