//! Per-user view lifecycle
//!
//! [`UserSiteMap`] is the session-scoped derived tree: filtered by
//! authorization, localized for the session's locale, rebuilt wholesale
//! on every login/logout event and relabeled in place on locale change.
//! Listeners are notified synchronously after the triggering operation
//! completes; "structure changed" and "labels changed" are distinct
//! notifications.

use crate::collaborate::{AccessGate, Locale, Localizer, Principal, SessionEvent, SortKey};
use crate::copy::tree_copy;
use crate::error::ViewError;
use crate::modifier::UserViewModifier;
use crate::user::UserNode;
use navmap_tree::{Forest, MasterSiteMap, NodeId, StandardPageKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Observer of per-user view changes
pub trait ViewListener: Send + Sync {
    /// The tree was rebuilt; node identities are no longer valid
    fn structure_changed(&self) {}

    /// Labels and sort keys were recomputed; structure is unchanged
    fn labels_changed(&self) {}
}

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct ListenerSet {
    next: u64,
    entries: Vec<(ListenerId, Arc<dyn ViewListener>)>,
}

struct ViewState {
    forest: Forest<UserNode>,
    standard_pages: HashMap<StandardPageKey, UserNode>,
    principal: Principal,
    locale: Locale,
    loaded: bool,
}

/// Session-scoped, access-controlled, locale-aware view of the
/// canonical site map
///
/// Read operations on a view that has not been built yet do not fail;
/// they see an empty per-user forest.
pub struct UserSiteMap {
    master: Arc<MasterSiteMap>,
    localizer: Arc<dyn Localizer>,
    gate: Arc<dyn AccessGate>,
    state: RwLock<ViewState>,
    listeners: RwLock<ListenerSet>,
}

impl UserSiteMap {
    /// Create an unbuilt view over a locked canonical map
    ///
    /// # Errors
    /// [`ViewError::MasterNotLocked`] if the canonical map accepts
    /// further mutation.
    pub fn new(
        master: Arc<MasterSiteMap>,
        localizer: Arc<dyn Localizer>,
        gate: Arc<dyn AccessGate>,
        locale: Locale,
    ) -> Result<Self, ViewError> {
        if !master.is_locked() {
            return Err(ViewError::MasterNotLocked);
        }
        Ok(Self {
            master,
            localizer,
            gate,
            state: RwLock::new(ViewState {
                forest: Forest::new(),
                standard_pages: HashMap::new(),
                principal: Principal::anonymous(),
                locale,
                loaded: false,
            }),
            listeners: RwLock::new(ListenerSet::default()),
        })
    }

    /// The canonical map this view derives from
    #[inline]
    #[must_use]
    pub fn master(&self) -> &Arc<MasterSiteMap> {
        &self.master
    }

    /// Whether the view has been built and not since invalidated
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// Session locale currently in effect
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.state.read().locale.clone()
    }

    /// Principal currently in effect
    #[must_use]
    pub fn principal(&self) -> Principal {
        self.state.read().principal.clone()
    }

    /// Build the view if it is not already built
    ///
    /// No-op when already loaded (re-entrant rebuilds are guarded by
    /// the loaded flag); returns whether a rebuild ran.
    ///
    /// # Errors
    /// Any copy failure.
    pub fn build(&self) -> Result<bool, ViewError> {
        {
            let mut state = self.state.write();
            if state.loaded {
                return Ok(false);
            }
            self.rebuild_in_place(&mut state)?;
        }
        self.notify(|l| l.structure_changed());
        Ok(true)
    }

    /// Apply a login/logout event: replace the principal and rebuild
    ///
    /// The per-user tree and all its indexes are cleared and derived
    /// again from the canonical map, never patched incrementally.
    ///
    /// # Errors
    /// Any copy failure.
    pub fn handle_session_event(&self, event: &SessionEvent) -> Result<(), ViewError> {
        {
            let mut state = self.state.write();
            state.principal = match event {
                SessionEvent::LoggedIn(principal) => principal.clone(),
                SessionEvent::LoggedOut => Principal::anonymous(),
            };
            state.loaded = false;
            self.rebuild_in_place(&mut state)?;
        }
        self.notify(|l| l.structure_changed());
        Ok(())
    }

    /// Apply a locale change: recompute every label and sort key
    ///
    /// Structure is untouched; only "labels changed" is fired.
    ///
    /// # Errors
    /// Any forest failure during in-place replacement.
    pub fn locale_changed(&self, locale: Locale) -> Result<(), ViewError> {
        {
            let mut state = self.state.write();
            state.locale = locale;
            let locale = state.locale.clone();
            for id in state.forest.all_nodes() {
                if let Some(node) = state.forest.get(id) {
                    let (label, sort_key) = self.localize(&node, &locale);
                    state
                        .forest
                        .replace_node(id, node.relabeled(label, sort_key))?;
                }
            }
            let keys: Vec<StandardPageKey> = state.standard_pages.keys().copied().collect();
            for key in keys {
                if let Some(node) = state.standard_pages.get(&key).cloned() {
                    let (label, sort_key) = self.localize(&node, &locale);
                    state
                        .standard_pages
                        .insert(key, node.relabeled(label, sort_key));
                }
            }
            tracing::debug!(locale = %state.locale, "relabeled user view");
        }
        self.notify(|l| l.labels_changed());
        Ok(())
    }

    // ---- read API ----

    /// Exact URI lookup in the per-user tree
    #[must_use]
    pub fn node_for(&self, uri: &str) -> Option<NodeId> {
        self.state.read().forest.node_for(uri)
    }

    /// Nearest-ancestor URI lookup in the per-user tree
    #[must_use]
    pub fn node_nearest_for(&self, uri: &str) -> Option<NodeId> {
        self.state.read().forest.node_nearest_for(uri)
    }

    /// Segment-chain lookup in the per-user tree
    #[must_use]
    pub fn node_chain_for_uri(&self, uri: &str, allow_partial: bool) -> Vec<NodeId> {
        self.state.read().forest.node_chain_for_uri(uri, allow_partial)
    }

    /// Clone of a user node's value
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<UserNode> {
        self.state.read().forest.get(id)
    }

    /// Root nodes of the per-user tree
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.state.read().forest.roots()
    }

    /// Children of a per-user node
    ///
    /// # Errors
    /// [`navmap_tree::TreeError::NodeNotFound`] if the node is absent.
    pub fn children_of(&self, id: NodeId) -> Result<Vec<NodeId>, ViewError> {
        Ok(self.state.read().forest.children_of(id)?)
    }

    /// Number of nodes in the per-user tree
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.read().forest.node_count()
    }

    /// Localized label of a node
    #[must_use]
    pub fn label_of(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.label().to_string())
    }

    /// Sort key of a node
    #[must_use]
    pub fn sort_key_of(&self, id: NodeId) -> Option<SortKey> {
        self.get(id).map(|n| n.sort_key().clone())
    }

    /// Standard page by well-known role
    ///
    /// Present even when the page did not survive filtering, so
    /// well-known pages remain addressable.
    #[must_use]
    pub fn standard_page(&self, key: StandardPageKey) -> Option<UserNode> {
        self.state.read().standard_pages.get(&key).cloned()
    }

    /// Follow the view's redirect chain
    #[must_use]
    pub fn resolve_redirects(&self, uri: &str) -> String {
        self.state.read().forest.resolve_redirects(uri)
    }

    /// Redirect pairs that survived filtering
    #[must_use]
    pub fn redirects(&self) -> Vec<(String, String)> {
        self.state.read().forest.redirects()
    }

    // ---- listeners ----

    /// Register a change listener
    pub fn add_listener(&self, listener: Arc<dyn ViewListener>) -> ListenerId {
        let mut set = self.listeners.write();
        let id = ListenerId(set.next);
        set.next += 1;
        set.entries.push((id, listener));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut set = self.listeners.write();
        let before = set.entries.len();
        set.entries.retain(|(entry_id, _)| *entry_id != id);
        set.entries.len() != before
    }

    fn notify(&self, f: impl Fn(&dyn ViewListener)) {
        // Snapshot under the lock, call outside it, in line.
        let listeners: Vec<Arc<dyn ViewListener>> = self
            .listeners
            .read()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            f(&*listener);
        }
    }

    fn localize(&self, node: &UserNode, locale: &Locale) -> (String, SortKey) {
        let label = self
            .master
            .get(node.canonical())
            .and_then(|canonical| {
                canonical
                    .label_key()
                    .and_then(|key| self.localizer.message(key, locale))
            })
            .unwrap_or_else(|| node.label().to_string());
        let sort_key = self.localizer.sort_key(&label, locale);
        (label, sort_key)
    }

    fn rebuild_in_place(&self, state: &mut ViewState) -> Result<(), ViewError> {
        state.forest = Forest::new();
        state.standard_pages.clear();
        let mut modifier = UserViewModifier::new(
            &self.master,
            &*self.localizer,
            &*self.gate,
            &state.locale,
            &state.principal,
        );
        let stats = tree_copy(self.master.as_ref(), &state.forest, &mut modifier)?;
        state.standard_pages = modifier.into_standard_pages();
        state.loaded = true;
        tracing::info!(
            visited = stats.visited,
            created = stats.created,
            excluded = stats.excluded,
            "rebuilt user view"
        );
        Ok(())
    }
}
