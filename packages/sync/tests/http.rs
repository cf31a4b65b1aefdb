use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outbreak_core::{
    resolve, BlockReader, BlockValue, FieldKind, IdentitySpeciesTable, Outbreak, OutbreakStore,
    SlotIndex,
};
use outbreak_sync::{HttpBlockExecutor, Session, SyncEngine};

fn slot(n: i64) -> SlotIndex {
    SlotIndex::new(n).unwrap()
}

#[tokio::test]
async fn test_read_block() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks/outbreak/2/max_spawns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": {"type": "i32", "value": 5}})),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let value = tokio::task::spawn_blocking(move || {
        let mut executor = HttpBlockExecutor::new(&uri).unwrap();
        executor
            .read_block(resolve(slot(2), FieldKind::MaxSpawns))
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(value, Some(BlockValue::I32(5)));
}

#[tokio::test]
async fn test_absent_block_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks/outbreak/1/center_pos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let uri = server.uri();
    let value = tokio::task::spawn_blocking(move || {
        let mut executor = HttpBlockExecutor::new(&uri).unwrap();
        executor
            .read_block(resolve(slot(1), FieldKind::CenterPosition))
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(value, None);
}

#[tokio::test]
async fn test_confirmed_write_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blocks/outbreak/1/max_spawns"))
        .and(body_json(json!({
            "value": {"type": "i32", "value": 7},
            "expected": {"type": "i32", "value": 5}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"written": true})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (store, connected) = tokio::task::spawn_blocking(move || {
        let mut store =
            OutbreakStore::from_records([Outbreak::new(slot(1)).with_spawns(5, 0)]);
        let mut session = Session::connect(HttpBlockExecutor::new(&uri).unwrap(), uri);
        let table = IdentitySpeciesTable::new();
        SyncEngine::new(&mut store, &mut session, &table)
            .set_max_spawns(slot(1), 7)
            .unwrap();
        (store, session.is_connected())
    })
    .await
    .unwrap();

    assert!(connected);
    assert_eq!(store.slot(slot(1)).max_spawns(), 7);
}

#[tokio::test]
async fn test_refused_write_disconnects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blocks/outbreak/1/max_spawns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"written": false})))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (store, connected, rejected) = tokio::task::spawn_blocking(move || {
        let mut store =
            OutbreakStore::from_records([Outbreak::new(slot(1)).with_spawns(5, 0)]);
        let mut session = Session::connect(HttpBlockExecutor::new(&uri).unwrap(), uri);
        let table = IdentitySpeciesTable::new();
        let result = SyncEngine::new(&mut store, &mut session, &table).set_max_spawns(slot(1), 7);
        let rejected = matches!(result, Err(e) if e.is_disconnect());
        (store, session.is_connected(), rejected)
    })
    .await
    .unwrap();

    assert!(rejected);
    assert!(!connected);
    assert_eq!(store.slot(slot(1)).max_spawns(), 7);
}

#[tokio::test]
async fn test_server_error_disconnects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blocks/outbreak/3/found"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (reason, connected) = tokio::task::spawn_blocking(move || {
        let mut store = OutbreakStore::new();
        let mut session = Session::connect(HttpBlockExecutor::new(&uri).unwrap(), uri);
        let table = IdentitySpeciesTable::new();
        let result = SyncEngine::new(&mut store, &mut session, &table).set_found(slot(3), true);
        let reason = match result {
            Err(outbreak_core::Error::RemoteRejected { reason, .. }) => reason,
            other => panic!("unexpected result: {other:?}"),
        };
        (reason, session.is_connected())
    })
    .await
    .unwrap();

    assert!(reason.contains("500"), "{reason}");
    assert!(!connected);
}

#[tokio::test]
async fn test_threaded_session_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let uri = server.uri();
    let store = tokio::task::spawn_blocking(move || {
        let executor = HttpBlockExecutor::new(&uri).unwrap();
        let mut session = Session::spawn(executor, uri, None).unwrap();
        session.load_store().unwrap()
    })
    .await
    .unwrap();

    assert_eq!(store, OutbreakStore::new());
}
