//! Per-user node modifier
//!
//! The [`NodeModifier`] used to derive a session's view from the
//! canonical map. `create` applies three filters in order, short-
//! circuiting at the first exclusion: a node with no localization key
//! has nothing to display; the "log in" page is hidden from an already
//! authenticated principal; and the authorization collaborator has the
//! final word. The `finalize` hook carries over standard pages and the
//! redirects whose targets survived.

use crate::collaborate::{AccessGate, Locale, Localizer, Principal};
use crate::copy::NodeModifier;
use crate::error::ViewError;
use crate::user::UserNode;
use navmap_tree::{Forest, MasterSiteMap, NodeId, NodeValue, PageNode, StandardPageKey};
use std::collections::HashMap;

/// Filter/transform strategy producing [`UserNode`]s
#[derive(Debug)]
pub struct UserViewModifier<'a> {
    localizer: &'a dyn Localizer,
    gate: &'a dyn AccessGate,
    locale: &'a Locale,
    principal: &'a Principal,
    login_node: Option<NodeId>,
    standard_pages: HashMap<StandardPageKey, UserNode>,
}

impl<'a> UserViewModifier<'a> {
    /// Create a modifier for one session's rebuild
    #[must_use]
    pub fn new(
        master: &MasterSiteMap,
        localizer: &'a dyn Localizer,
        gate: &'a dyn AccessGate,
        locale: &'a Locale,
        principal: &'a Principal,
    ) -> Self {
        Self {
            localizer,
            gate,
            locale,
            principal,
            login_node: master.standard_page(StandardPageKey::LogIn),
            standard_pages: HashMap::new(),
        }
    }

    /// Standard pages collected by `finalize`, keyed by role
    ///
    /// Entries that did not survive filtering are present here even
    /// though they are absent from the target tree, keeping well-known
    /// pages addressable.
    #[must_use]
    pub fn into_standard_pages(self) -> HashMap<StandardPageKey, UserNode> {
        self.standard_pages
    }

    /// Localize a canonical node into a user node, no filters applied
    fn make_user_node(&self, id: NodeId, uri: &str, value: &PageNode) -> UserNode {
        let label = value
            .label_key()
            .and_then(|key| self.localizer.message(key, self.locale))
            .or_else(|| value.label_key().map(|key| key.as_str().to_string()))
            .unwrap_or_else(|| value.segment().to_string());
        let sort_key = self.localizer.sort_key(&label, self.locale);
        UserNode::new(id, uri, value.segment(), label, sort_key)
    }
}

impl NodeModifier<PageNode, UserNode> for UserViewModifier<'_> {
    fn create(
        &mut self,
        source: &Forest<PageNode>,
        source_id: NodeId,
        value: &PageNode,
    ) -> Option<UserNode> {
        // (a) nothing to display
        value.label_key()?;
        // (b) an authenticated principal has no use for the login page
        if self.principal.is_authenticated() && Some(source_id) == self.login_node {
            return None;
        }
        let uri = source.uri_of(source_id).ok()?;
        // (c) authorization has the final word
        if !self.gate.may_view(self.principal, &uri, value) {
            return None;
        }
        Some(self.make_user_node(source_id, &uri, value))
    }

    fn finalize(
        &mut self,
        source: &Forest<PageNode>,
        target: &Forest<UserNode>,
    ) -> Result<(), ViewError> {
        // Standard pages stay addressable regardless of filtering.
        for (key, master_id) in source.standard_pages() {
            let uri = source.uri_of(master_id)?;
            if let Some(target_id) = target.node_for(&uri) {
                target.set_standard_page(key, target_id)?;
                if let Some(node) = target.get(target_id) {
                    self.standard_pages.insert(key, node);
                }
            } else if let Some(value) = source.get(master_id) {
                self.standard_pages
                    .insert(key, self.make_user_node(master_id, &uri, &value));
            }
        }
        // Redirects to excluded targets are dropped.
        for (from, to) in source.redirects() {
            if target.node_for(&to).is_some() {
                target.add_redirect(from, to)?;
            }
        }
        Ok(())
    }
}
