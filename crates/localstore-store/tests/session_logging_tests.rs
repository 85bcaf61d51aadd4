// Session operations emit canonical start/end/end_error events tagged with
// the session id.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use localstore_core::logging_facility::test_capture::init_test_capture;
use localstore_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ITEM_COUNT, FIELD_ITEM_ID,
    FIELD_SNAPSHOT_BYTES, FIELD_SNAPSHOT_DIGEST,
};
use localstore_store::{LocalStoreSession, MemoryStorage};

fn has_event(events: &[localstore_core::logging_facility::CapturedEvent], op: &str, event: &str) -> bool {
    events
        .iter()
        .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event))
}

#[test]
fn test_lifecycle_emits_start_and_end_events() {
    let capture = init_test_capture();

    let (mut session, _) = LocalStoreSession::open(MemoryStorage::new(), "sqlite-db").unwrap();
    session.insert("logged").unwrap();
    session.persist().unwrap();
    session.reset().unwrap();

    let events = capture.events_for_session(session.session_id().as_str());
    for op in ["initialize", "insert", "persist", "reset"] {
        assert!(has_event(&events, op, EVENT_START), "missing start for {}", op);
        assert!(has_event(&events, op, EVENT_END), "missing end for {}", op);
    }

    let persist_end = events
        .iter()
        .find(|e| e.op.as_deref() == Some("persist") && e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(persist_end.field(FIELD_SNAPSHOT_DIGEST).map(str::len), Some(64));
    assert!(persist_end.field(FIELD_SNAPSHOT_BYTES).is_some());

    let insert_end = events
        .iter()
        .find(|e| e.op.as_deref() == Some("insert") && e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(insert_end.field(FIELD_ITEM_ID), Some("1"));
    assert_eq!(insert_end.field(FIELD_ITEM_COUNT), Some("1"));
}

#[test]
fn test_failures_emit_end_error_with_code() {
    let capture = init_test_capture();

    let mut session = LocalStoreSession::new(MemoryStorage::new());
    let _ = session.persist();

    let events = capture.events_for_session(session.session_id().as_str());
    let error = events
        .iter()
        .find(|e| e.op.as_deref() == Some("persist") && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event for persist");
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_NOT_READY"));
}

#[test]
fn test_query_failure_is_logged() {
    let capture = init_test_capture();

    let (session, _) = LocalStoreSession::open(MemoryStorage::new(), "sqlite-db").unwrap();
    let _ = session.query("SELECT nope FROM nowhere", &[]);

    let events = capture.events_for_session(session.session_id().as_str());
    let error = events
        .iter()
        .find(|e| e.op.as_deref() == Some("query") && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event for query");
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_QUERY_FAILURE"));
}
