//! Binary-level tests: every subcommand runs against files in a temp dir.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn statesnap(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("statesnap").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn write_frames(dir: &Path) {
    let top = json!({
        "ls": {"token": "abc"},
        "ss": {},
        "logs": [
            {"method": "GET", "url": "https://a.test/api/items", "status": 200, "responseBody": "[1]", "timestamp": 10},
            {"method": "POST", "url": "https://a.test/api/save", "requestBody": "x=1", "status": 201, "responseBody": "saved", "timestamp": 11}
        ],
        "html": null
    });
    let child = json!({
        "ls": {"token": "ignored"},
        "ss": {},
        "logs": [
            {"method": "GET", "url": "https://a.test/api/items", "status": 200, "responseBody": "[1,2]", "timestamp": 20},
            {"method": "GET"}
        ],
        "html": null
    });
    std::fs::write(dir.join("top.json"), top.to_string()).unwrap();
    std::fs::write(dir.join("child.json"), child.to_string()).unwrap();
}

fn assemble(dir: &TempDir) -> std::path::PathBuf {
    write_frames(dir.path());
    let snap = dir.path().join("snap.json");
    statesnap(dir.path())
        .arg("assemble")
        .arg(dir.path().join("top.json"))
        .arg(dir.path().join("child.json"))
        .args(["--url", "https://a.test/app", "--description", "checkout", "-o"])
        .arg(&snap)
        .assert()
        .success()
        .stdout(predicate::str::contains("assembled 2 entries"));
    snap
}

#[test]
fn assemble_then_inspect() {
    let dir = TempDir::new().unwrap();
    let snap = assemble(&dir);

    statesnap(dir.path())
        .arg("inspect")
        .arg(&snap)
        .assert()
        .success()
        .stdout(predicate::str::contains("url: https://a.test/app"))
        .stdout(predicate::str::contains("description: checkout"))
        .stdout(predicate::str::contains("entries: 2"))
        .stdout(predicate::str::contains("POST 201 https://a.test/api/save"));
}

#[test]
fn match_reports_newest_duplicate_and_misses() {
    let dir = TempDir::new().unwrap();
    let snap = assemble(&dir);

    statesnap(dir.path())
        .arg("match")
        .arg(&snap)
        .args(["GET", "/api/items?cb=7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1,2]"));

    statesnap(dir.path())
        .arg("match")
        .arg(&snap)
        .args(["POST", "https://a.test/api/save", "--body", "x=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("404"))
        .stdout(predicate::str::contains("No recorded state for this request"));
}

#[test]
fn replay_serves_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let snap = assemble(&dir);

    statesnap(dir.path())
        .arg("replay")
        .arg(&snap)
        .args(["https://a.test/api/items", "https://a.test/api/gone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200 https://a.test/api/items [1,2]"))
        .stdout(predicate::str::contains("404 https://a.test/api/gone"))
        .stderr(predicate::str::contains("hits: 1 misses: 1"));
}

#[test]
fn missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    statesnap(dir.path())
        .arg("inspect")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("snapshot not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn record_writes_frame_capture() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[9]"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("frame.json");
    let page = format!("{}/app", server.uri());
    let items = format!("{}/api/items", server.uri());

    statesnap(dir.path())
        .arg("record")
        .arg(&page)
        .args(["--fetch", &items, "--local", "theme=dark", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded 1 entries"));

    let frame: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(frame["ls"]["theme"], "dark");
    assert_eq!(frame["logs"][0]["url"], items.as_str());
    assert_eq!(frame["logs"][0]["responseBody"], "[9]");
    assert_eq!(frame["ss"]["__STATESNAP_RECORDING"], "true");
}
