use tagsync_core::{
    SyncError,
    catalog::InMemoryCatalog,
    context::{FailurePolicy, RunOptions},
    reconcile::run_pipeline,
    report::{Conflict, Phase},
};
use tagsync_model::{CanonicalTag, LocalTag, MediaKind};

fn canonical(name: &str, aliases: &[&str]) -> CanonicalTag {
    CanonicalTag::new(name)
        .unwrap()
        .with_aliases(aliases.iter().copied())
}

struct Seeded {
    catalog: InMemoryCatalog,
    restraints: LocalTag,
    scenes: Vec<String>,
    gallery: String,
    performer: String,
    marker: String,
}

/// "Bondage" sits on "Restraints", which tags a spread of media.
fn restraints_catalog() -> Seeded {
    let catalog = InMemoryCatalog::default();
    catalog.seed_tag("BDSM", &[]);
    let restraints = catalog.seed_tag("Restraints", &["Bondage"]);
    let rope = catalog.seed_tag("Rope", &[]);
    let scenes = vec![
        catalog.seed_scene("First", &[&restraints]),
        catalog.seed_scene("Second", &[&restraints, &rope]),
    ];
    let gallery = catalog.seed_gallery("Set", &[&restraints]);
    let performer = catalog.seed_performer("Jane", &[&restraints]);
    let marker = catalog.seed_marker("Tie", 12.0, &scenes[0], &rope, &[&restraints]);
    Seeded {
        catalog,
        restraints,
        scenes,
        gallery,
        performer,
        marker,
    }
}

fn bdsm() -> Vec<CanonicalTag> {
    vec![canonical("BDSM", &["Bondage"])]
}

#[tokio::test]
async fn missing_canonical_tag_is_created_with_aliases() {
    let catalog = InMemoryCatalog::default();
    let tags = vec![
        canonical("BDSM", &["Bondage", "Discipline"]),
        canonical("Feet", &[]),
    ];

    let outcome = run_pipeline(&catalog, RunOptions::default(), &tags)
        .await
        .unwrap();

    let created = catalog.tag_named("BDSM").unwrap();
    assert_eq!(created.aliases, vec!["Bondage", "Discipline"]);
    assert_eq!(outcome.stats.tag_created, 2);
    assert_eq!(outcome.stats.alias_created, 2);
    assert!(outcome.report.is_clean());
}

#[tokio::test]
async fn separate_alias_tag_is_merged_with_its_scenes() {
    let catalog = InMemoryCatalog::default();
    let bdsm_tag = catalog.seed_tag("BDSM", &[]);
    let bondage = catalog.seed_tag("Bondage", &[]);
    let scenes: Vec<String> = ["One", "Two", "Three"]
        .into_iter()
        .map(|title| catalog.seed_scene(title, &[&bondage]))
        .collect();

    let outcome = run_pipeline(&catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();

    assert_eq!(outcome.stats.tag_merged, 1);
    assert!(catalog.tag_named("Bondage").is_none());
    assert!(catalog.tag_named("BDSM").unwrap().has_alias("Bondage"));
    for id in &scenes {
        let scene = catalog.media(MediaKind::Scene, id).unwrap();
        assert!(scene.has_tag(&bdsm_tag.id));
    }

    let rerun = run_pipeline(&catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();
    assert_eq!(rerun.stats.mutations(), 0);
}

#[tokio::test]
async fn existing_alias_needs_no_work() {
    let catalog = InMemoryCatalog::default();
    catalog.seed_tag("Feet", &["Foot Fetish"]);

    let outcome = run_pipeline(
        &catalog,
        RunOptions::default(),
        &[canonical("Feet", &["Foot Fetish"])],
    )
    .await
    .unwrap();

    assert_eq!(outcome.stats.mutations(), 0);
    assert_eq!(catalog.writes(), 0);
}

#[tokio::test]
async fn alias_migration_tags_every_media_kind_before_detaching() {
    let seeded = restraints_catalog();
    let catalog = &seeded.catalog;
    let bdsm_tag = catalog.tag_named("BDSM").unwrap();

    let outcome = run_pipeline(catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();

    assert_eq!(outcome.stats.alias_migrated, 1);
    assert_eq!(outcome.stats.media_updated, 5);
    let mut media: Vec<(MediaKind, &String)> = seeded
        .scenes
        .iter()
        .map(|id| (MediaKind::Scene, id))
        .collect();
    media.push((MediaKind::Gallery, &seeded.gallery));
    media.push((MediaKind::Performer, &seeded.performer));
    media.push((MediaKind::Marker, &seeded.marker));
    for (kind, id) in media {
        let item = catalog.media(kind, id).unwrap();
        assert!(item.has_tag(&bdsm_tag.id), "{kind} {id} missing BDSM");
        assert!(
            item.has_tag(&seeded.restraints.id),
            "{kind} {id} lost Restraints"
        );
    }

    assert!(catalog.tag_named("BDSM").unwrap().has_alias("Bondage"));
    assert!(catalog.tag_named("Restraints").unwrap().aliases.is_empty());
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let seeded = restraints_catalog();
    let tags = vec![
        canonical("BDSM", &["Bondage", "Discipline"]),
        canonical("Rope", &["Shibari"]),
        canonical("Kissing", &[]),
    ];

    run_pipeline(&seeded.catalog, RunOptions::default(), &tags)
        .await
        .unwrap();
    let before = seeded.catalog.snapshot();
    let writes = seeded.catalog.writes();

    let rerun = run_pipeline(&seeded.catalog, RunOptions::default(), &tags)
        .await
        .unwrap();

    assert_eq!(rerun.stats.mutations(), 0);
    assert_eq!(seeded.catalog.writes(), writes);
    assert_eq!(seeded.catalog.snapshot(), before);
}

#[tokio::test]
async fn interrupted_migration_converges_on_rerun() {
    let interrupted = restraints_catalog();
    interrupted
        .catalog
        .fail_next_tag_update(&interrupted.restraints.id);

    let first = run_pipeline(&interrupted.catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();
    assert_eq!(first.stats.failures, 1);
    assert_eq!(first.report.failures_in(Phase::Aliases).count(), 1);
    assert!(
        interrupted
            .catalog
            .tag_named("Restraints")
            .unwrap()
            .has_alias("Bondage")
    );
    let bdsm_tag = interrupted.catalog.tag_named("BDSM").unwrap();
    for id in &interrupted.scenes {
        let scene = interrupted.catalog.media(MediaKind::Scene, id).unwrap();
        assert!(scene.has_tag(&bdsm_tag.id));
    }

    let second = run_pipeline(&interrupted.catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();
    assert!(second.report.is_clean());
    assert_eq!(second.stats.media_updated, 0);

    let uninterrupted = restraints_catalog();
    run_pipeline(&uninterrupted.catalog, RunOptions::default(), &bdsm())
        .await
        .unwrap();
    assert_eq!(
        interrupted.catalog.snapshot(),
        uninterrupted.catalog.snapshot()
    );
}

#[tokio::test]
async fn aliases_resolve_to_a_single_tag() {
    let seeded = restraints_catalog();
    let tags = vec![
        canonical("BDSM", &["Bondage", "Restraint Play"]),
        canonical("Rope", &["Bondage Rope"]),
    ];

    run_pipeline(&seeded.catalog, RunOptions::default(), &tags)
        .await
        .unwrap();

    let all = seeded.catalog.tags();
    for alias in ["Bondage", "Restraint Play", "Bondage Rope"] {
        let owners = all.iter().filter(|tag| tag.answers_to(alias)).count();
        assert_eq!(owners, 1, "{alias} owned by {owners} tags");
    }
}

#[tokio::test]
async fn skipping_merge_reports_name_conflict() {
    let catalog = InMemoryCatalog::default();
    catalog.seed_tag("BDSM", &[]);
    catalog.seed_tag("Bondage", &[]);
    let options = RunOptions {
        merge_tags: false,
        ..RunOptions::default()
    };

    let outcome = run_pipeline(&catalog, options, &bdsm()).await.unwrap();

    assert!(catalog.tag_named("Bondage").is_some());
    assert_eq!(
        outcome.report.conflicts,
        vec![Conflict::AliasIsTagName {
            canonical: "BDSM".into(),
            alias: "Bondage".into(),
            tag: "Bondage".into(),
        }]
    );
}

#[tokio::test]
async fn refused_merge_is_reported_once() {
    let catalog = InMemoryCatalog::default();
    catalog.seed_tag("Lingerie", &[]);
    catalog.seed_tag("Stockings", &[]);
    let tags = vec![canonical("Lingerie", &["Stockings"]), canonical("Stockings", &[])];

    let outcome = run_pipeline(&catalog, RunOptions::default(), &tags)
        .await
        .unwrap();

    assert_eq!(outcome.stats.conflicts, 1);
    assert_eq!(
        outcome.report.conflicts,
        vec![Conflict::AliasIsCanonicalTag {
            canonical: "Lingerie".into(),
            alias: "Stockings".into(),
        }]
    );
    assert!(catalog.tag_named("Stockings").is_some());
}

#[tokio::test]
async fn abort_policy_stops_at_first_failure() {
    let seeded = restraints_catalog();
    seeded.catalog.fail_next_tag_update(&seeded.restraints.id);
    let options = RunOptions {
        failure_policy: FailurePolicy::Abort,
        ..RunOptions::default()
    };
    let tags = vec![canonical("BDSM", &["Bondage"]), canonical("Rope", &["Shibari"])];

    let err = run_pipeline(&seeded.catalog, options, &tags)
        .await
        .unwrap_err();

    match err {
        SyncError::Aborted { item, phase, .. } => {
            assert_eq!(item, "BDSM");
            assert_eq!(phase, Phase::Aliases);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!seeded.catalog.tag_named("Rope").unwrap().has_alias("Shibari"));
}

#[tokio::test]
async fn continue_policy_processes_remaining_tags() {
    let seeded = restraints_catalog();
    seeded.catalog.fail_next_tag_update(&seeded.restraints.id);
    let tags = vec![canonical("BDSM", &["Bondage"]), canonical("Rope", &["Shibari"])];

    let outcome = run_pipeline(&seeded.catalog, RunOptions::default(), &tags)
        .await
        .unwrap();

    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].item, "BDSM");
    assert!(seeded.catalog.tag_named("Rope").unwrap().has_alias("Shibari"));
}
