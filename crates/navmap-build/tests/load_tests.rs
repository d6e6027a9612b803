//! Load-time tests: producers, diagnostics report, end-to-end build

use navmap_build::{
    build_site_map, load_sources, BuildError, EntryProducer, FinishOptions, Severity,
    SiteMapBuilder,
};
use navmap_test_utils::{public_record, StaticProducer};
use navmap_tree::StandardPageKey;

#[test]
fn test_load_sources_merges_all_producers() {
    let mut builder = SiteMapBuilder::new();
    let mut producers: Vec<Box<dyn EntryProducer>> = vec![
        Box::new(
            StaticProducer::new("annotations")
                .with_record(public_record("public"))
                .with_record(public_record("public/news")),
        ),
        Box::new(
            StaticProducer::new("sitemap file")
                .with_record(public_record("private"))
                .with_redirect("start", "public")
                .with_warning("line 7: trailing whitespace"),
        ),
    ];

    let report = load_sources(&mut builder, &mut producers).unwrap();
    assert_eq!(report.sections().len(), 2);
    assert_eq!(report.total(Severity::Warning), 1);

    let forest = builder.forest();
    assert!(forest.node_for("public/news").is_some());
    assert!(forest.node_for("private").is_some());
    assert_eq!(forest.redirect_for("start").as_deref(), Some("public"));

    let text = report.to_string();
    assert!(text.contains("--- annotations ---"));
    assert!(text.contains("[warning] line 7: trailing whitespace"));
}

#[test]
fn test_empty_producer_is_not_fatal_alone() {
    let mut builder = SiteMapBuilder::new();
    let mut producers: Vec<Box<dyn EntryProducer>> = vec![
        Box::new(StaticProducer::new("empty").with_error("file not found")),
        Box::new(StaticProducer::new("pages").with_record(public_record("home"))),
    ];
    let report = load_sources(&mut builder, &mut producers).unwrap();
    assert_eq!(report.total(Severity::Error), 1);
    assert_eq!(builder.forest().node_count(), 1);
}

#[test]
fn test_no_sources_loaded_fails_the_build() {
    let mut builder = SiteMapBuilder::new();
    let mut producers: Vec<Box<dyn EntryProducer>> =
        vec![Box::new(StaticProducer::new("empty"))];
    let err = load_sources(&mut builder, &mut producers).unwrap_err();
    assert!(matches!(err, BuildError::NoSourcesLoaded));
}

#[test]
fn test_end_to_end_build_locks_and_indexes() {
    let mut builder = SiteMapBuilder::new();
    let mut producers: Vec<Box<dyn EntryProducer>> = vec![Box::new(
        StaticProducer::new("pages")
            .with_record(public_record("public"))
            .with_record(
                public_record("public/login")
                    .with_label_key(StandardPageKey::LogIn.default_label_key()),
            )
            .with_redirect("", "public"),
    )];
    load_sources(&mut builder, &mut producers).unwrap();

    let map = build_site_map(builder, &FinishOptions::new()).unwrap();
    assert!(map.is_locked());
    assert!(map.standard_page(StandardPageKey::LogIn).is_some());
    assert_eq!(map.resolve_redirects(""), "public");
    // locked: late mutation fails loudly
    assert!(map.add_redirect("x", "y").is_err());
}
