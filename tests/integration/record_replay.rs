//! Record two frames, merge them into a snapshot, and replay it on a fresh page.

use std::sync::Arc;

use super::common::ScriptedSite;
use statesnap::assemble::{CaptureOptions, FrameCapture, SnapshotAssembler};
use statesnap::loader;
use statesnap::net::FetchInit;
use statesnap::replay::{self, MISS_STATUS};
use statesnap::{PageContext, PageMode, Snapshot};

const ITEMS: &str = "https://a.test/api/items";
const SAVE: &str = "https://a.test/api/save";
const WIDGET: &str = "https://cdn.test/widget.json";

fn site() -> ScriptedSite {
    ScriptedSite::new(&[
        (ITEMS, 200, "[1,2,3]"),
        (SAVE, 201, "{\"ok\":true}"),
        (WIDGET, 200, "{\"w\":1}"),
    ])
}

/// Frames hand their captures over as JSON.
fn over_the_wire(capture: FrameCapture) -> FrameCapture {
    let raw = serde_json::to_string(&capture).unwrap();
    serde_json::from_str(&raw).unwrap()
}

async fn record_snapshot() -> Snapshot {
    let live = site();

    let mut top = PageContext::new("https://a.test/app", live.primitives());
    top.local_storage_mut()
        .insert("token".into(), "abc".into());
    loader::arm(&mut top);
    assert!(loader::activate(&mut top));

    top.fetch(ITEMS, FetchInit::default()).await.unwrap();
    let xhr = top.xhr();
    xhr.open("POST", SAVE);
    xhr.send(Some("x=1".into())).unwrap();
    xhr.completion().await;
    assert!(top.send_beacon("https://a.test/metrics", None));

    let mut child = PageContext::new("https://cdn.test/frame", live.primitives());
    loader::arm(&mut child);
    loader::activate(&mut child);
    child.fetch(WIDGET, FetchInit::default()).await.unwrap();
    child.fetch(ITEMS, FetchInit::default()).await.unwrap();

    SnapshotAssembler::new("https://a.test/app")
        .description(Some("checkout".into()))
        .frame(over_the_wire(top.capture(&CaptureOptions::default())))
        .frame(over_the_wire(child.capture(&CaptureOptions::default())))
        .assemble()
}

#[tokio::test]
async fn recorded_frames_merge_into_one_snapshot() {
    let snapshot = record_snapshot().await;

    let methods: Vec<_> = snapshot
        .network_logs
        .iter()
        .map(|e| (e.method.as_str(), e.url.as_str()))
        .collect();
    // The child's repeat of ITEMS collapses into the top frame's slot.
    assert_eq!(
        methods,
        vec![
            ("GET", ITEMS),
            ("POST", SAVE),
            ("BEACON", "https://a.test/metrics"),
            ("GET", WIDGET),
        ]
    );
    assert_eq!(
        snapshot.local_storage.get("token").map(String::as_str),
        Some("abc")
    );
    assert_eq!(
        snapshot
            .session_storage
            .get(loader::RECORDING_FLAG_KEY)
            .map(String::as_str),
        Some("true")
    );
}

#[tokio::test]
async fn replay_serves_recorded_traffic_without_touching_the_site() {
    let snapshot = Arc::new(record_snapshot().await);

    let offline = site();
    let mut page = PageContext::new("https://a.test/app", offline.primitives());
    let session = replay::install(&mut page, snapshot, None).unwrap();
    assert_eq!(page.mode(), PageMode::Replay);
    assert_eq!(
        page.local_storage().get("token").map(String::as_str),
        Some("abc")
    );

    let items = page
        .fetch("/api/items?cb=42", FetchInit::default())
        .await
        .unwrap();
    assert_eq!(items.status, 200);
    assert_eq!(items.text(), "[1,2,3]");

    let xhr = page.xhr();
    xhr.open("POST", "/api/save");
    xhr.send(Some("x=1".into())).unwrap();
    xhr.completion().await;
    assert_eq!(xhr.status(), 201);
    assert_eq!(xhr.response_text(), "{\"ok\":true}");

    let changed = page.xhr();
    changed.open("POST", "/api/save");
    changed.send(Some("x=2".into())).unwrap();
    changed.completion().await;
    assert_eq!(changed.status(), MISS_STATUS);

    let unknown = page
        .fetch("https://a.test/api/unknown", FetchInit::default())
        .await
        .unwrap();
    assert_eq!(unknown.status, MISS_STATUS);

    assert_eq!(offline.calls(), 0);
    assert_eq!(session.hits(), 2);
    assert_eq!(session.misses(), 2);
}

#[tokio::test]
async fn snapshot_survives_a_file_round_trip() {
    let snapshot = record_snapshot().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.json");

    snapshot.write_json_to_path(&path).unwrap();
    let read = Snapshot::read_json_from_path(&path).unwrap();
    assert_eq!(read, snapshot);
}

#[tokio::test]
async fn reload_resumes_recording_with_an_empty_log() {
    let live = site();
    let mut page = PageContext::new("https://a.test/app", live.primitives());
    loader::arm(&mut page);
    loader::activate(&mut page);
    page.fetch(ITEMS, FetchInit::default()).await.unwrap();

    page.navigate("https://a.test/app");
    assert!(page.is_recording());
    assert!(page.network_log().is_empty());

    page.fetch(WIDGET, FetchInit::default()).await.unwrap();
    let log = page.network_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].url, WIDGET);
}
