//! Generic multi-root tree container
//!
//! [`Forest`] stores nodes in an arena addressed by stable [`NodeId`]s,
//! keeps parent/child links, a URI index, the standard-page index and
//! the redirect table, all behind one coarse `RwLock` per instance.
//! Replacing a node swaps the slot's value and leaves its edges
//! untouched, which is the only supported way to "edit" an immutable
//! node value.
//!
//! Once [`Forest::lock`] has been called every mutating operation fails
//! with [`TreeError::Locked`]. Canonical forests are locked after
//! validation; per-user forests are rebuilt wholesale and never locked.

use crate::error::TreeError;
use crate::node::{NodeId, NodeValue, StandardPageKey};
use crate::redirect::RedirectTable;
use crate::uri;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct ForestInner<T> {
    // Slot index == NodeId raw value; removed nodes leave tombstones so
    // ids are never reassigned.
    slots: Vec<Option<Slot<T>>>,
    roots: Vec<NodeId>,
    uri_index: HashMap<String, NodeId>,
    standard_pages: HashMap<StandardPageKey, NodeId>,
    redirects: RedirectTable,
    locked: bool,
}

/// Ordered collection of rooted trees sharing one node-identity space
#[derive(Debug)]
pub struct Forest<T: NodeValue> {
    inner: RwLock<ForestInner<T>>,
}

impl<T: NodeValue> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeValue> Forest<T> {
    /// Create an empty, unlocked forest
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ForestInner {
                slots: Vec::new(),
                roots: Vec::new(),
                uri_index: HashMap::new(),
                standard_pages: HashMap::new(),
                redirects: RedirectTable::new(),
                locked: false,
            }),
        }
    }

    /// Lock the forest; all further mutation attempts fail
    pub fn lock(&self) {
        self.inner.write().locked = true;
    }

    /// Whether the forest has been locked
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.read().locked
    }

    /// Add a new root node
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest.
    pub fn add_root(&self, value: T) -> Result<NodeId, TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        let id = inner.alloc(value, None);
        inner.roots.push(id);
        inner.index_subtree(id);
        Ok(id)
    }

    /// Create a new node and attach it under `parent`
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest,
    /// [`TreeError::NodeNotFound`] if `parent` is absent.
    pub fn add_child(&self, parent: NodeId, value: T) -> Result<NodeId, TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        inner.slot(parent)?;
        let id = inner.alloc(value, Some(parent));
        inner.slot_mut(parent)?.children.push(id);
        inner.index_subtree(id);
        Ok(id)
    }

    /// Attach an existing node under a new parent (move semantics)
    ///
    /// The node is first detached from wherever it currently sits, its
    /// subtree's URI-index and standard-page entries removed, then
    /// re-attached and re-indexed under the new parent.
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest,
    /// [`TreeError::NodeNotFound`] if either node is absent,
    /// [`TreeError::WouldCycle`] if `parent` lies inside `child`'s
    /// subtree.
    pub fn attach_child(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        inner.slot(parent)?;
        inner.slot(child)?;
        if parent == child || inner.collect_subtree(child).contains(&parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }
        inner.purge_subtree_indexes(child);
        inner.detach(child)?;
        inner.slot_mut(child)?.parent = Some(parent);
        inner.slot_mut(parent)?.children.push(child);
        inner.index_subtree(child);
        Ok(())
    }

    /// Remove a node and its entire subtree
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest,
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn remove_node(&self, id: NodeId) -> Result<(), TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        inner.slot(id)?;
        inner.purge_subtree_indexes(id);
        inner.detach(id)?;
        for node in inner.collect_subtree(id) {
            inner.slots[node.as_u64() as usize] = None;
        }
        Ok(())
    }

    /// Replace a node's value, preserving identity, edges and position
    ///
    /// If the new value changes the node's segment, the URIs of the
    /// node and its whole subtree are re-indexed.
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest,
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn replace_node(&self, id: NodeId, value: T) -> Result<(), TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        let segment_changed = inner.slot(id)?.value.segment() != value.segment();
        if segment_changed {
            inner.purge_subtree_indexes(id);
        }
        inner.slot_mut(id)?.value = value;
        if segment_changed {
            inner.index_subtree(id);
        }
        Ok(())
    }

    /// Parent of a node, `None` for roots
    ///
    /// # Errors
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.inner.read().slot(id)?.parent)
    }

    /// Children of a node, in attachment order
    ///
    /// # Errors
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn children_of(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        Ok(self.inner.read().slot(id)?.children.clone())
    }

    /// Number of direct children
    ///
    /// # Errors
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn child_count(&self, id: NodeId) -> Result<usize, TreeError> {
        Ok(self.inner.read().slot(id)?.children.len())
    }

    /// Root nodes in insertion order
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.inner.read().roots.clone()
    }

    /// All live node ids, pre-order from each root
    #[must_use]
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let inner = self.inner.read();
        let mut out = Vec::new();
        for &root in &inner.roots {
            out.extend(inner.collect_subtree(root));
        }
        out
    }

    /// Number of live nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.read().slots.iter().flatten().count()
    }

    /// Clone of a node's value
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<T> {
        self.inner
            .read()
            .slot(id)
            .ok()
            .map(|slot| slot.value.clone())
    }

    /// Whether the id refers to a live node
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.read().slot(id).is_ok()
    }

    /// Full URI of a node (ancestor segments joined with `/`)
    ///
    /// # Errors
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn uri_of(&self, id: NodeId) -> Result<String, TreeError> {
        let inner = self.inner.read();
        inner.slot(id)?;
        Ok(inner.uri_of(id))
    }

    // ---- URI index & resolver ----

    /// Exact URI lookup
    #[must_use]
    pub fn node_for(&self, uri: &str) -> Option<NodeId> {
        let normalized = uri::join_segments(&uri::parse_segments(uri));
        let inner = self.inner.read();
        inner.uri_index.get(normalized.as_str()).copied()
    }

    /// Nearest-ancestor URI lookup
    ///
    /// Progressively strips trailing segments until a match is found;
    /// `None` only when no prefix matches, including the empty-path
    /// root.
    #[must_use]
    pub fn node_nearest_for(&self, uri: &str) -> Option<NodeId> {
        let inner = self.inner.read();
        let mut segments = uri::parse_segments(uri);
        loop {
            let candidate = uri::join_segments(&segments);
            if let Some(&id) = inner.uri_index.get(candidate.as_str()) {
                return Some(id);
            }
            if segments.pop().is_none() {
                return None;
            }
        }
    }

    /// Walk from the roots, matching one segment per tree level
    ///
    /// On the first unmatched segment, either the chain accumulated so
    /// far is returned (`allow_partial`) or an empty result.
    #[must_use]
    pub fn node_chain_for_segments<S: AsRef<str>>(
        &self,
        segments: &[S],
        allow_partial: bool,
    ) -> Vec<NodeId> {
        let inner = self.inner.read();
        let mut chain = Vec::new();
        let mut level = inner.top_level();
        for segment in segments {
            let segment = segment.as_ref();
            let matched = level.iter().copied().find(|&id| {
                inner
                    .slot(id)
                    .map(|slot| slot.value.segment() == segment)
                    .unwrap_or(false)
            });
            match matched {
                Some(id) => {
                    chain.push(id);
                    level = inner
                        .slot(id)
                        .map(|slot| slot.children.clone())
                        .unwrap_or_default();
                }
                None => {
                    if !allow_partial {
                        chain.clear();
                    }
                    return chain;
                }
            }
        }
        chain
    }

    /// Parse a URI and delegate to [`Self::node_chain_for_segments`]
    #[must_use]
    pub fn node_chain_for_uri(&self, uri: &str, allow_partial: bool) -> Vec<NodeId> {
        self.node_chain_for_segments(&uri::parse_segments(uri), allow_partial)
    }

    // ---- Standard-page index ----

    /// Register a node under a well-known navigational role
    ///
    /// At most one node per role; a later registration replaces the
    /// earlier one.
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest,
    /// [`TreeError::NodeNotFound`] if the node is absent.
    pub fn set_standard_page(&self, key: StandardPageKey, id: NodeId) -> Result<(), TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        inner.slot(id)?;
        inner.standard_pages.insert(key, id);
        Ok(())
    }

    /// Node registered for a well-known role
    #[must_use]
    pub fn standard_page(&self, key: StandardPageKey) -> Option<NodeId> {
        self.inner.read().standard_pages.get(&key).copied()
    }

    /// All standard-page registrations
    #[must_use]
    pub fn standard_pages(&self) -> Vec<(StandardPageKey, NodeId)> {
        self.inner
            .read()
            .standard_pages
            .iter()
            .map(|(&k, &v)| (k, v))
            .collect()
    }

    // ---- Redirect table ----

    /// Store a redirect pair (no existence check against the map)
    ///
    /// # Errors
    /// [`TreeError::Locked`] on a locked forest.
    pub fn add_redirect(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<(), TreeError> {
        let mut inner = self.inner.write();
        inner.check_unlocked()?;
        inner.redirects.add(from, to);
        Ok(())
    }

    /// Single-hop redirect lookup
    #[must_use]
    pub fn redirect_for(&self, uri: &str) -> Option<String> {
        self.inner
            .read()
            .redirects
            .redirect_for(uri)
            .map(ToOwned::to_owned)
    }

    /// Follow the redirect chain to the last resolvable page
    #[must_use]
    pub fn resolve_redirects(&self, uri: &str) -> String {
        self.inner.read().redirects.resolve(uri)
    }

    /// All redirect pairs in insertion order
    #[must_use]
    pub fn redirects(&self) -> Vec<(String, String)> {
        self.inner.read().redirects.pairs()
    }
}

impl<T: NodeValue> ForestInner<T> {
    fn check_unlocked(&self) -> Result<(), TreeError> {
        if self.locked {
            return Err(TreeError::Locked);
        }
        Ok(())
    }

    fn slot(&self, id: NodeId) -> Result<&Slot<T>, TreeError> {
        self.slots
            .get(id.as_u64() as usize)
            .and_then(Option::as_ref)
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot<T>, TreeError> {
        self.slots
            .get_mut(id.as_u64() as usize)
            .and_then(Option::as_mut)
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn alloc(&mut self, value: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_raw(self.slots.len() as u64);
        self.slots.push(Some(Slot {
            value,
            parent,
            children: Vec::new(),
        }));
        id
    }

    /// Unlink a node from its parent's child list or the root list.
    fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        match self.slot(id)?.parent {
            Some(parent) => {
                let children = &mut self.slot_mut(parent)?.children;
                children.retain(|&c| c != id);
            }
            None => self.roots.retain(|&r| r != id),
        }
        self.slot_mut(id)?.parent = None;
        Ok(())
    }

    fn uri_of(&self, id: NodeId) -> String {
        let mut segments: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let Ok(slot) = self.slot(node) else { break };
            let segment = slot.value.segment();
            // An empty application-root segment contributes nothing to
            // descendant URIs.
            if !segment.is_empty() {
                segments.push(segment);
            }
            current = slot.parent;
        }
        segments.reverse();
        uri::join_segments(&segments)
    }

    fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Ok(slot) = self.slot(node) {
                out.push(node);
                for &child in slot.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    fn index_subtree(&mut self, id: NodeId) {
        for node in self.collect_subtree(id) {
            let uri = self.uri_of(node);
            self.uri_index.insert(uri, node);
        }
    }

    fn purge_subtree_indexes(&mut self, id: NodeId) {
        for node in self.collect_subtree(id) {
            let uri = self.uri_of(node);
            if self.uri_index.get(&uri) == Some(&node) {
                self.uri_index.remove(&uri);
            }
            self.standard_pages.retain(|_, &mut v| v != node);
        }
    }

    /// Top-level nodes for the chain walk: the roots, except that an
    /// empty-segment application root is transparent and stands in for
    /// its children.
    fn top_level(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            match self.slot(root) {
                Ok(slot) if slot.value.segment().is_empty() => {
                    out.extend(slot.children.iter().copied());
                }
                Ok(_) => out.push(root),
                Err(_) => {}
            }
        }
        out
    }
}
