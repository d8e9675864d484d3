//! DiffService running over the real SQLite store.

use std::num::NonZeroUsize;
use std::sync::Arc;
use strata_core::cache::shared_diff_cache;
use strata_core::errors::ExErrorKind;
use strata_core::model::SpecStatus;
use strata_core::source::{SnapshotResolver, SpecProjector};
use strata_engine::{DiffService, SqliteSource};
use strata_store::AutoGenerateFilter;

const SEED: &str = r#"
schema_version: 1
specs:
  - id: hall
    name: Grand Hall
    architecturalStyle: Victorian
    height: { stories: 3 }
    status: existing
    yearCompleted: 1882
  - id: station
    name: Union Station
    architecturalStyle: Beaux-Arts
    yearCompleted: 1904
  - id: granary
    name: Granary
    yearConstructed: 1860
snapshots:
  - id: s1890
    year: 1890
    specRefs: [hall, granary]
  - id: s1920
    year: 1920
    label: Interwar
    specRefs: [hall, station, station]
"#;

async fn seeded_source() -> (tempfile::TempDir, SqliteSource) {
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.yaml");
    std::fs::write(&seed_path, SEED).unwrap();

    let source = SqliteSource::open(dir.path().join("strata.db")).unwrap();
    source.import_seed(seed_path).await.unwrap();
    (dir, source)
}

fn service(source: &SqliteSource) -> DiffService {
    let source = Arc::new(source.clone());
    DiffService::new(
        source.clone(),
        source,
        shared_diff_cache(NonZeroUsize::new(8).unwrap()),
    )
}

#[tokio::test]
async fn test_diff_over_sqlite() {
    let (_dir, source) = seeded_source().await;
    let svc = service(&source);

    let diff = svc.diff("s1890", "s1920").await.unwrap();

    assert_eq!(diff.from.count, 2);
    assert_eq!(diff.to.count, 3);
    assert_eq!(diff.summary.added, 1);
    assert_eq!(diff.summary.removed, 1);
    assert_eq!(diff.summary.unchanged, 1);
    assert_eq!(diff.summary.changed, 0);
    assert_eq!(diff.added_specs[0].name, "Union Station");
    assert_eq!(diff.added_specs[0].year_completed, Some(1904));
    assert_eq!(diff.removed_specs[0].id, "granary");

    assert!(svc.diff("s1890", "s1920").await.unwrap().cached);
}

#[tokio::test]
async fn test_missing_snapshot_over_sqlite() {
    let (_dir, source) = seeded_source().await;
    let svc = service(&source);

    let err = svc.diff("s1890", "s2000").await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolver_and_projector() {
    let (_dir, source) = seeded_source().await;

    let resolved = source.resolve("s1920").await.unwrap().unwrap();
    assert_eq!(resolved.label.as_deref(), Some("Interwar"));
    assert_eq!(resolved.specs[0].status, Some(SpecStatus::Existing));

    assert!(source.resolve("nope").await.unwrap().is_none());

    let projections = source
        .fetch_minimal(&["hall".to_string(), "nope".to_string()])
        .await
        .unwrap();
    assert_eq!(projections.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_one_connection() {
    let (_dir, source) = seeded_source().await;

    let calls = (0..16).map(|i| {
        let source = source.clone();
        async move {
            let id = if i % 2 == 0 { "s1890" } else { "s1920" };
            let ids = vec!["hall".to_string()];
            let joined = futures::try_join!(source.resolve(id), source.fetch_minimal(&ids));
            joined
        }
    });
    let results = futures::future::try_join_all(calls).await.unwrap();

    assert_eq!(results.len(), 16);
    for (resolved, projections) in results {
        assert!(resolved.is_some());
        assert_eq!(projections[0].id, "hall");
    }
}

#[tokio::test]
async fn test_counts_and_auto_generate() {
    let (_dir, source) = seeded_source().await;

    let counts = source.counts().await.unwrap();
    assert_eq!(counts.building_specs, 3);
    assert_eq!(counts.reconstruction_snapshots, 2);

    let generated = source
        .auto_generate(AutoGenerateFilter::new(1900))
        .await
        .unwrap();
    assert_eq!(generated.count, 2);

    let listed = source.list_snapshots(Some(1900)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, generated.id);
    assert_eq!(listed[0].label.as_deref(), Some("Auto 1900"));

    let json = serde_json::to_value(source.counts().await.unwrap()).unwrap();
    assert_eq!(json["reconstructionSnapshots"], 3);
}
