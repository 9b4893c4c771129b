//! Snapshot round-trip tests through the public API.

use fwb_persistence::{
    CompositionSnapshot, SessionSnapshot, decode_snapshot, encode_snapshot, load_snapshot_async,
    save_snapshot_async,
};
use indexmap::IndexMap;
use proptest::prelude::*;
use tempfile::tempdir;

fn snapshot_strategy() -> impl Strategy<Value = SessionSnapshot> {
    (
        prop::collection::vec(("[a-z][a-z0-9_]{0,8}", any::<String>()), 0..5),
        prop::option::of(prop_oneof!["[a-z]{1,6}", Just("composed".to_string())]),
        any::<String>(),
        any::<String>(),
        any::<String>(),
    )
        .prop_map(|(services, selected_service, printed, query, query_plan)| {
            SessionSnapshot {
                services: services.into_iter().collect::<IndexMap<_, _>>(),
                selected_service,
                composition: CompositionSnapshot { printed },
                query,
                query_plan,
                ..SessionSnapshot::default()
            }
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(snapshot in snapshot_strategy()) {
        let blob = encode_snapshot(&snapshot).unwrap();
        let decoded = decode_snapshot(&blob).unwrap();
        prop_assert_eq!(decoded, snapshot);
    }
}

#[tokio::test]
async fn async_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Workbench-1.federationworkbench");

    let mut snapshot = SessionSnapshot::new();
    snapshot.services.insert(
        "accounts".to_string(),
        "type Query { me: User }\ntype User @key(fields: \"id\") { id: ID! }".to_string(),
    );
    snapshot.query = "{ me { id } }".to_string();

    save_snapshot_async(snapshot.clone(), path.clone())
        .await
        .unwrap();
    let loaded = load_snapshot_async(path).await.unwrap();

    assert_eq!(loaded.services, snapshot.services);
    assert_eq!(loaded.query, snapshot.query);
    assert!(loaded.saved_at().is_some());
}
