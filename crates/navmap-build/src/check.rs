//! Finishing pass: structural validation and repair
//!
//! Runs after all entry producers have contributed. Defects are
//! accumulated, never thrown one at a time, so a single run reports
//! every missing view, label and access-control entry together with
//! every redirect loop. On success the forest is locked and handed out
//! as a shared handle.

use crate::error::BuildError;
use navmap_tree::{LabelKey, MasterSiteMap, NodeId, ViewRef};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Optional defaults applied instead of recording a defect
#[derive(Debug, Clone, Default)]
pub struct FinishOptions {
    default_view: Option<ViewRef>,
    default_label: Option<LabelKey>,
}

impl FinishOptions {
    /// No repairs; every gap becomes a defect
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill missing view references with this default
    #[inline]
    #[must_use]
    pub fn with_default_view(mut self, view: ViewRef) -> Self {
        self.default_view = Some(view);
        self
    }

    /// Fill missing localization keys with this default
    #[inline]
    #[must_use]
    pub fn with_default_label(mut self, label: LabelKey) -> Self {
        self.default_label = Some(label);
        self
    }
}

/// Grouped validation defects, rendered as a human-readable report
#[derive(Debug, Clone, Default)]
pub struct DefectReport {
    missing_views: Vec<String>,
    missing_labels: Vec<String>,
    missing_access: Vec<String>,
    redirect_loops: Vec<String>,
}

impl DefectReport {
    /// Whether any defect was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing_views.is_empty()
            && self.missing_labels.is_empty()
            && self.missing_access.is_empty()
            && self.redirect_loops.is_empty()
    }

    /// URIs missing a view reference
    #[inline]
    #[must_use]
    pub fn missing_views(&self) -> &[String] {
        &self.missing_views
    }

    /// URIs missing a localization key
    #[inline]
    #[must_use]
    pub fn missing_labels(&self) -> &[String] {
        &self.missing_labels
    }

    /// URIs missing an access-control classification
    #[inline]
    #[must_use]
    pub fn missing_access(&self) -> &[String] {
        &self.missing_access
    }

    /// Redirect edges rejected as loops
    #[inline]
    #[must_use]
    pub fn redirect_loops(&self) -> &[String] {
        &self.redirect_loops
    }

    fn section(f: &mut Formatter<'_>, title: &str, uris: &[String]) -> fmt::Result {
        if uris.is_empty() {
            return Ok(());
        }
        writeln!(f, "{title} ({}):", uris.len())?;
        for uri in uris {
            writeln!(f, "  - {uri}")?;
        }
        Ok(())
    }
}

impl Display for DefectReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Self::section(f, "pages without a view", &self.missing_views)?;
        Self::section(f, "pages without a label key", &self.missing_labels)?;
        Self::section(f, "pages without access control", &self.missing_access)?;
        Self::section(f, "redirect loops", &self.redirect_loops)?;
        Ok(())
    }
}

/// Validate the built forest, optionally repairing gaps, then lock it
///
/// # Errors
/// [`BuildError::Validation`] carrying the full grouped report when any
/// defect or redirect loop was recorded.
pub(crate) fn finish(
    forest: MasterSiteMap,
    options: &FinishOptions,
) -> Result<Arc<MasterSiteMap>, BuildError> {
    let mut report = DefectReport::default();

    check_redirect_loops(&forest, &mut report);

    let mut checked_ancestors: HashSet<String> = HashSet::new();
    for id in forest.all_nodes() {
        let uri = forest.uri_of(id)?;
        if uri.is_empty() {
            // The application root is a mount point, not a page.
            continue;
        }
        if forest.redirect_for(&uri).is_some() {
            inherit_redirect_access(&forest, id, &uri, &mut report, &mut checked_ancestors)?;
        } else {
            check_metadata(&forest, id, &uri, options, &mut report)?;
        }
    }

    if !report.is_empty() {
        return Err(BuildError::Validation(Box::new(report)));
    }

    forest.lock();
    tracing::info!(nodes = forest.node_count(), "site map validated and locked");
    Ok(Arc::new(forest))
}

/// Incrementally insert every redirect edge into a dependency graph,
/// rejecting and recording any edge whose insertion closes a cycle.
fn check_redirect_loops(forest: &MasterSiteMap, report: &mut DefectReport) {
    let mut intern: HashMap<String, u32> = HashMap::new();
    let mut next = 0u32;
    let mut graph: DiGraphMap<u32, ()> = DiGraphMap::new();

    for (from, to) in forest.redirects() {
        let a = *intern.entry(from.clone()).or_insert_with(|| {
            next += 1;
            next - 1
        });
        let b = *intern.entry(to.clone()).or_insert_with(|| {
            next += 1;
            next - 1
        });
        graph.add_edge(a, b, ());
        if is_cyclic_directed(&graph) {
            graph.remove_edge(a, b);
            report.redirect_loops.push(format!("{from} -> {to}"));
        }
    }
}

/// Require view + label + access on a non-redirected node, repairing
/// from the configured defaults where possible.
fn check_metadata(
    forest: &MasterSiteMap,
    id: NodeId,
    uri: &str,
    options: &FinishOptions,
    report: &mut DefectReport,
) -> Result<(), BuildError> {
    let Some(node) = forest.get(id) else {
        return Err(BuildError::Tree(navmap_tree::TreeError::NodeNotFound(id)));
    };
    let mut repaired = node.clone();
    let mut changed = false;

    if node.view().is_none() {
        match &options.default_view {
            Some(view) => {
                repaired = repaired.with_view(view.clone());
                changed = true;
                tracing::warn!(uri, "filled missing view from default");
            }
            None => report.missing_views.push(uri.to_string()),
        }
    }
    if node.label_key().is_none() {
        match &options.default_label {
            Some(label) => {
                repaired = repaired.with_label_key(label.clone());
                changed = true;
                tracing::warn!(uri, "filled missing label key from default");
            }
            None => report.missing_labels.push(uri.to_string()),
        }
    }
    if node.access().is_none() {
        report.missing_access.push(uri.to_string());
    }

    if changed {
        forest.replace_node(id, repaired)?;
    }
    Ok(())
}

/// A redirect source inherits the ultimate target's visibility rules,
/// and every ancestor of that target must still be renderable.
fn inherit_redirect_access(
    forest: &MasterSiteMap,
    id: NodeId,
    uri: &str,
    report: &mut DefectReport,
    checked_ancestors: &mut HashSet<String>,
) -> Result<(), BuildError> {
    let target_uri = forest.resolve_redirects(uri);
    let Some(target) = forest.node_for(&target_uri) else {
        // Dangling redirect target: the source keeps whatever metadata
        // it has; nothing to inherit.
        return Ok(());
    };

    if let Some(access) = forest.get(target).and_then(|t| t.access().cloned()) {
        if let Some(source) = forest.get(id) {
            forest.replace_node(id, source.with_access(access))?;
        }
    }

    // A redirect from a parent URI to a descendant must still let
    // navigation render the intermediate ancestors.
    let mut current = forest.parent_of(target)?;
    while let Some(ancestor) = current {
        let ancestor_uri = forest.uri_of(ancestor)?;
        if !ancestor_uri.is_empty() && checked_ancestors.insert(ancestor_uri.clone()) {
            let missing = forest
                .get(ancestor)
                .is_some_and(|a| a.label_key().is_none());
            if missing
                && forest.redirect_for(&ancestor_uri).is_none()
                && !report.missing_labels.contains(&ancestor_uri)
            {
                report.missing_labels.push(ancestor_uri);
            }
        }
        current = forest.parent_of(ancestor)?;
    }
    Ok(())
}
