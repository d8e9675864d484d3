//! DiffService behavior against counting in-memory collaborators.

mod common;

use common::{service, snapshot, spec, CountingStore};
use strata_core::diff::model::{FieldChange, TrackedValue};
use strata_core::errors::ExErrorKind;
use strata_core::logging_facility::test_capture::init_test_capture;
use strata_core_types::schema::{EVENT_END, EVENT_END_ERROR};
use strata_core_types::{RequestContext, TraceId};
use strata_engine::DiffRequest;

fn era_store() -> std::sync::Arc<CountingStore> {
    let store = CountingStore::new();
    store.add_snapshot(snapshot("A", 1900, vec![spec("1"), spec("2")]));
    store.add_snapshot(snapshot("B", 1950, vec![spec("2"), spec("3")]));
    store
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_validation_happens_before_any_access() {
    let store = era_store();
    let svc = service(&store, 10);
    let ctx = RequestContext::new();

    // Entries under keys with an empty side: a lookup made before
    // validation would hit them and bump their recency.
    let seeded = svc.diff("A", "B").await.unwrap();
    {
        let mut cache = svc.cache().lock().unwrap();
        cache.set("", "B", seeded.clone());
        cache.set("A", "", seeded);
    }
    let keys_before = svc.cache_stats().keys;
    assert_eq!(keys_before, vec!["A|B", "|B", "A|"]);
    let resolves_before = store.resolves();
    let fetches_before = store.fetches();

    let requests = [
        DiffRequest {
            from: None,
            to: Some("B".into()),
        },
        DiffRequest {
            from: Some("A".into()),
            to: None,
        },
        DiffRequest::default(),
        DiffRequest::new("", "B"),
        DiffRequest::new("A", ""),
    ];

    for request in &requests {
        let err = svc.compute(request, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert_eq!(err.message(), "from and to snapshot IDs required");
    }

    assert_eq!(store.resolves(), resolves_before);
    assert_eq!(store.fetches(), fetches_before);
    assert_eq!(svc.cache_stats().keys, keys_before);
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_second_call_is_served_from_cache() {
    let store = era_store();
    let svc = service(&store, 10);

    let first = svc.diff("A", "B").await.unwrap();
    let resolves_after_first = store.resolves();
    let second = svc.diff("A", "B").await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(store.resolves(), resolves_after_first);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.added_specs, second.added_specs);
    assert_eq!(first.removed_specs, second.removed_specs);
    assert_eq!(first.changed_specs, second.changed_specs);

    let cache = svc.cache().lock().unwrap();
    let stored = cache.peek("A", "B").unwrap();
    assert!(!stored.data.cached, "stored copy keeps cached: false");
}

#[tokio::test]
async fn test_reverse_pair_is_a_separate_entry() {
    let store = era_store();
    let svc = service(&store, 10);

    let ab = svc.diff("A", "B").await.unwrap();
    let ba = svc.diff("B", "A").await.unwrap();

    assert!(!ba.cached);
    assert_eq!(ab.added_specs[0].id, "3");
    assert_eq!(ab.removed_specs[0].id, "1");
    assert_eq!(ba.added_specs[0].id, "1");
    assert_eq!(ba.removed_specs[0].id, "3");
    assert_eq!(svc.cache_stats().keys, vec!["A|B", "B|A"]);
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let store = era_store();
    let svc = service(&store, 10);

    let err = svc.diff("A", "missing").await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.message(), "Snapshot(s) not found");
    assert_eq!(err.entity_id(), Some("missing"));
    assert_eq!(svc.cache_stats().size, 0);

    store.add_snapshot(snapshot("missing", 2000, vec![]));
    assert!(svc.diff("A", "missing").await.is_ok());
}

#[tokio::test]
async fn test_infrastructure_error_propagates_and_is_not_cached() {
    let store = era_store();
    let svc = service(&store, 10);
    store.fail_with(Some(ExErrorKind::Persistence));

    let err = svc.diff("A", "B").await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.kind().is_infrastructure());
    assert_eq!(svc.cache_stats().size, 0);

    store.fail_with(None);
    let ok = svc.diff("A", "B").await.unwrap();
    assert!(!ok.cached);
}

#[tokio::test]
async fn test_projection_failure_is_not_cached() {
    let store = era_store();
    let svc = service(&store, 10);
    store.fail_projection_with(Some(ExErrorKind::Timeout));

    let err = svc.diff("A", "B").await.unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Timeout);
    assert_eq!(store.resolves(), 2);
    assert_eq!(svc.cache_stats().size, 0);
}

#[tokio::test]
async fn test_lru_eviction_through_service() {
    let store = era_store();
    store.add_snapshot(snapshot("C", 2000, vec![spec("4")]));
    let svc = service(&store, 2);

    svc.diff("A", "B").await.unwrap();
    svc.diff("B", "C").await.unwrap();
    assert!(svc.diff("A", "B").await.unwrap().cached);
    svc.diff("A", "C").await.unwrap();

    assert_eq!(svc.cache_stats().keys, vec!["A|B", "A|C"]);
    assert!(!svc.diff("B", "C").await.unwrap().cached);
}

#[tokio::test]
async fn test_clear_cache_forces_recompute() {
    let store = era_store();
    let svc = service(&store, 10);

    svc.diff("A", "B").await.unwrap();
    svc.clear_cache();

    assert_eq!(svc.cache_stats().size, 0);
    assert!(!svc.diff("A", "B").await.unwrap().cached);
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_projector_skipped_for_empty_lists() {
    let store = era_store();
    let svc = service(&store, 10);

    let diff = svc.diff("A", "A").await.unwrap();

    assert_eq!(diff.summary.unchanged, 2);
    assert_eq!(store.fetches(), 0);
}

#[tokio::test]
async fn test_projections_follow_membership_order() {
    let store = CountingStore::new();
    store.add_snapshot(snapshot("empty", 1900, vec![]));
    store.add_snapshot(snapshot(
        "full",
        1950,
        vec![spec("c"), spec("a"), spec("b")],
    ));
    let svc = service(&store, 10);

    let diff = svc.diff("empty", "full").await.unwrap();
    let ids: Vec<&str> = diff.added_specs.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(store.fetches(), 1);
    assert_eq!(
        store.fetched_ids.lock().unwrap()[0],
        vec!["c".to_string(), "a".to_string(), "b".to_string()]
    );
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_reconstruction_era_scenario() {
    let store = CountingStore::new();
    store.add_snapshot(snapshot(
        "s-1890",
        1890,
        vec![spec("spec-a").with_stories(3).with_style("Victorian")],
    ));
    store.add_snapshot(
        snapshot(
            "s-1920",
            1920,
            vec![
                spec("spec-a").with_stories(5).with_style("Gothic Revival"),
                spec("spec-b"),
            ],
        )
        .with_label("Interwar"),
    );
    let svc = service(&store, 10);

    let diff = svc.diff("s-1890", "s-1920").await.unwrap();

    assert_eq!(diff.summary.added, 1);
    assert_eq!(diff.summary.removed, 0);
    assert_eq!(diff.summary.unchanged, 1);
    assert_eq!(diff.summary.changed, 1);
    assert_eq!(diff.added_specs[0].id, "spec-b");
    assert_eq!(diff.to.label.as_deref(), Some("Interwar"));

    let changes = &diff.changed_specs[0].changes;
    assert_eq!(
        changes["height.stories"],
        FieldChange {
            from: Some(TrackedValue::Count(3)),
            to: Some(TrackedValue::Count(5)),
        }
    );
    assert_eq!(
        changes["architecturalStyle"],
        FieldChange {
            from: Some("Victorian".into()),
            to: Some("Gothic Revival".into()),
        }
    );
}

// ---------------------------------------------------------------------------
// Logging and context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_logs_cache_hit_and_errors() {
    let capture = init_test_capture();
    let store = era_store();
    let svc = service(&store, 10);
    let ctx = RequestContext::new().with_trace_id(TraceId::new());

    svc.compute(&DiffRequest::new("A", "B"), &ctx).await.unwrap();
    svc.compute(&DiffRequest::new("A", "B"), &ctx).await.unwrap();
    let err = svc
        .compute(&DiffRequest::new("A", "nope"), &ctx)
        .await
        .unwrap_err();

    assert_eq!(err.request_id(), Some(&ctx.request_id));
    assert_eq!(err.trace_id(), ctx.trace_id.as_ref());

    let events: Vec<_> = capture
        .events_for_op("snapshot_diff")
        .into_iter()
        .filter(|e| e.field("request_id") == Some(ctx.request_id.as_str()))
        .collect();

    let hits: Vec<Option<&str>> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .map(|e| e.field("cache_hit"))
        .collect();
    assert_eq!(hits, vec![Some("false"), Some("true")]);

    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.field("err.code"), Some("ERR_NOT_FOUND"));
}
