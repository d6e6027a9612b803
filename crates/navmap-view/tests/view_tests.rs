//! Per-user view tests: filtering, lifecycle, locale and listeners

use navmap_build::{build_site_map, FinishOptions, PageRecord, SiteMapBuilder};
use navmap_test_utils::{public_record, ListGate, MapLocalizer};
use navmap_tree::{AccessControl, LabelKey, MasterSiteMap, StandardPageKey, ViewRef};
use navmap_view::{
    Locale, Principal, SessionEvent, UserSiteMap, ViewError, ViewListener,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct CountingListener {
    structure: AtomicUsize,
    labels: AtomicUsize,
}

impl ViewListener for CountingListener {
    fn structure_changed(&self) {
        self.structure.fetch_add(1, Ordering::SeqCst);
    }

    fn labels_changed(&self) {
        self.labels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Small canonical map: public home, guest login,
/// permission-gated private area.
fn example_master() -> Arc<MasterSiteMap> {
    let mut builder = SiteMapBuilder::new();
    builder
        .append(
            &PageRecord::new("public")
                .with_view(ViewRef::new("public-home"))
                .with_label_key(LabelKey::new("label.public"))
                .with_access(AccessControl::Public),
        )
        .unwrap();
    builder
        .append(
            &PageRecord::new("public/login")
                .with_view(ViewRef::new("login-view"))
                .with_label_key(StandardPageKey::LogIn.default_label_key())
                .with_access(AccessControl::Guest),
        )
        .unwrap();
    builder
        .append(
            &PageRecord::new("private")
                .with_label_key(LabelKey::new("label.private"))
                .with_access(AccessControl::Permission),
        )
        .unwrap();
    let options = FinishOptions::new().with_default_view(ViewRef::new("default-view"));
    build_site_map(builder, &options).unwrap()
}

fn english_localizer() -> Arc<MapLocalizer> {
    Arc::new(
        MapLocalizer::new()
            .with_message("en", "label.public", "Home")
            .with_message("en", "nav.log-in", "Log in")
            .with_message("en", "label.private", "Private")
            .with_message("de", "label.public", "Startseite")
            .with_message("de", "nav.log-in", "Anmelden")
            .with_message("de", "label.private", "Privat"),
    )
}

#[test]
fn test_requires_locked_master() {
    let unlocked = Arc::new(MasterSiteMap::new());
    let result = UserSiteMap::new(
        unlocked,
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    );
    assert!(matches!(result, Err(ViewError::MasterNotLocked)));
}

#[test]
fn test_example_end_to_end_filtering() {
    let view = UserSiteMap::new(
        example_master(),
        english_localizer(),
        Arc::new(ListGate::allowing(["public", "public/login"])),
        Locale::new("en"),
    )
    .unwrap();
    view.build().unwrap();

    // exactly "public" and "public/login"; "private" is excluded
    assert_eq!(view.node_count(), 2);
    assert!(view.node_for("public").is_some());
    assert!(view.node_for("public/login").is_some());
    assert!(view.node_for("private").is_none());

    let home = view.node_for("public").unwrap();
    assert_eq!(view.label_of(home).as_deref(), Some("Home"));
}

#[test]
fn test_node_without_label_key_is_excluded_with_subtree() {
    // A redirect source legitimately carries no label key in a
    // validated master; the view has nothing to display for it.
    let mut builder = SiteMapBuilder::new();
    builder.append(&public_record("public")).unwrap();
    builder.append(&PageRecord::new("old")).unwrap();
    builder.add_redirect("old", "public").unwrap();
    // eligible on its own, but lives under the excluded node
    builder.append(&public_record("old/archive")).unwrap();
    let master = build_site_map(builder, &FinishOptions::new()).unwrap();

    let view = UserSiteMap::new(
        master,
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();
    view.build().unwrap();

    assert!(view.node_for("old").is_none());
    assert!(view.node_for("old/archive").is_none());
    assert_eq!(view.node_count(), 1);
    assert!(view.node_for("public").is_some());
}

#[test]
fn test_authenticated_principal_does_not_see_login_page() {
    let master = example_master();
    let view = UserSiteMap::new(
        master,
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();

    view.handle_session_event(&SessionEvent::LoggedIn(Principal::authenticated("eve")))
        .unwrap();
    assert!(view.node_for("public/login").is_none());
    assert!(view.node_for("public").is_some());
    // still addressable as a standard page
    let login = view.standard_page(StandardPageKey::LogIn).unwrap();
    assert_eq!(login.uri(), "public/login");

    view.handle_session_event(&SessionEvent::LoggedOut).unwrap();
    assert!(view.node_for("public/login").is_some());
}

#[test]
fn test_unbuilt_view_reads_see_an_empty_forest() {
    let view = UserSiteMap::new(
        example_master(),
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();

    assert!(!view.is_loaded());
    assert_eq!(view.node_count(), 0);
    assert!(view.node_for("public").is_none());
    assert!(view.roots().is_empty());
    assert!(view.standard_page(StandardPageKey::LogIn).is_none());
    assert!(view.redirects().is_empty());
}

#[test]
fn test_build_is_idempotent_until_invalidated() {
    let view = UserSiteMap::new(
        example_master(),
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();
    assert!(!view.is_loaded());
    assert!(view.build().unwrap());
    assert!(view.is_loaded());
    // no invalidating event: no-op
    assert!(!view.build().unwrap());
}

#[test]
fn test_locale_change_relabels_without_structure_change() {
    let view = UserSiteMap::new(
        example_master(),
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();
    view.build().unwrap();

    let listener = Arc::new(CountingListener::default());
    view.add_listener(listener.clone());

    let home = view.node_for("public").unwrap();
    let count_before = view.node_count();
    let children_before = view.children_of(home).unwrap();
    assert_eq!(view.label_of(home).as_deref(), Some("Home"));
    let key_before = view.sort_key_of(home).unwrap();

    view.locale_changed(Locale::new("de")).unwrap();

    assert_eq!(view.label_of(home).as_deref(), Some("Startseite"));
    assert_ne!(view.sort_key_of(home).unwrap(), key_before);
    assert_eq!(view.node_count(), count_before);
    assert_eq!(view.children_of(home).unwrap(), children_before);
    assert_eq!(listener.labels.load(Ordering::SeqCst), 1);
    assert_eq!(listener.structure.load(Ordering::SeqCst), 0);
}

#[test]
fn test_session_event_rebuilds_and_notifies_structure() {
    let view = UserSiteMap::new(
        example_master(),
        english_localizer(),
        Arc::new(ListGate::allow_all()),
        Locale::new("en"),
    )
    .unwrap();
    let listener = Arc::new(CountingListener::default());
    let id = view.add_listener(listener.clone());

    view.handle_session_event(&SessionEvent::LoggedIn(Principal::authenticated("eve")))
        .unwrap();
    assert_eq!(listener.structure.load(Ordering::SeqCst), 1);

    assert!(view.remove_listener(id));
    assert!(!view.remove_listener(id));
    view.handle_session_event(&SessionEvent::LoggedOut).unwrap();
    // removed: no further delivery
    assert_eq!(listener.structure.load(Ordering::SeqCst), 1);
}

#[test]
fn test_redirects_to_surviving_targets_are_copied() {
    let mut builder = SiteMapBuilder::new();
    builder.append(&public_record("public")).unwrap();
    builder.append(&public_record("private")).unwrap();
    builder.append(&PageRecord::new("a")).unwrap();
    builder.append(&PageRecord::new("b")).unwrap();
    builder.add_redirect("a", "public").unwrap();
    builder.add_redirect("b", "private").unwrap();
    let master = build_site_map(builder, &FinishOptions::new()).unwrap();

    let view = UserSiteMap::new(
        master,
        english_localizer(),
        Arc::new(ListGate::allowing(["public"])),
        Locale::new("en"),
    )
    .unwrap();
    view.build().unwrap();

    assert_eq!(view.resolve_redirects("a"), "public");
    // target excluded: the redirect is dropped
    assert_eq!(view.resolve_redirects("b"), "b");
    assert_eq!(view.redirects().len(), 1);
}
