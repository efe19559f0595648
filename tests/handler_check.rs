mod common;

use axum_test::TestServer;
use serde_json::json;
use std::time::Duration;

async fn target_server() -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ok")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn test_check_mixed_batch() {
    let target = target_server().await;
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let ok = format!("{}/ok", target.url());
    let missing = format!("{}/missing", target.url());

    let response = server
        .post("/links")
        .json(&json!({ "links": [ok, missing, "#anchor"] }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["links_num"], 1);
    assert_eq!(json["links"][ok.as_str()], "available");
    assert_eq!(json["links"][missing.as_str()], "not available");
    assert_eq!(json["links"]["#anchor"], "not available");
    assert_eq!(json["links"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_bare_host_is_probed_over_http() {
    let target = target_server().await;
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let bare = format!("{}/ok", target.host_with_port());

    let response = server
        .post("/links")
        .json(&json!({ "links": [bare] }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["links"][bare.as_str()], "available");
}

#[tokio::test]
async fn test_sequential_checks_get_increasing_numbers() {
    let target = target_server().await;
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();
    let ok = format!("{}/ok", target.url());

    for expected in 1..=3 {
        let response = server
            .post("/links")
            .json(&json!({ "links": [ok] }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["links_num"], expected);
    }
}

#[tokio::test]
async fn test_duplicate_links_collapse() {
    let target = target_server().await;
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();
    let ok = format!("{}/ok", target.url());

    let response = server
        .post("/links")
        .json(&json!({ "links": [ok, ok, ok] }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["links"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_links_rejected() {
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let response = server.post("/links").json(&json!({ "links": [] })).await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(app.store.snapshot().await.next_id, 1);
}

#[tokio::test]
async fn test_blank_link_rejected() {
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let response = server
        .post("/links")
        .json(&json!({ "links": ["example.com", ""] }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_too_many_links_rejected() {
    let app = common::create_test_app_with(Duration::from_secs(5), 2).await;
    let server = TestServer::new(app.router()).unwrap();

    let response = server
        .post("/links")
        .json(&json!({ "links": ["a.com", "b.com", "c.com"] }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["max"], 2);
    assert_eq!(json["error"]["details"]["got"], 3);
}

#[tokio::test]
async fn test_slow_link_reported_at_deadline() {
    let slow = common::spawn_slow_target(Duration::from_secs(10)).await;
    let target = target_server().await;
    let app = common::create_test_app_with(Duration::from_millis(300), 1000).await;
    let server = TestServer::new(app.router()).unwrap();

    let slow_url = format!("http://{slow}/");
    let ok = format!("{}/ok", target.url());

    let started = std::time::Instant::now();
    let response = server
        .post("/links")
        .json(&json!({ "links": [slow_url, ok] }))
        .await;

    response.assert_status_ok();
    assert!(started.elapsed() < Duration::from_secs(3));

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["links"][slow_url.as_str()], "not available");
    assert_eq!(json["links"][ok.as_str()], "available");
}

#[tokio::test]
async fn test_checked_link_set_is_persisted() {
    let target = target_server().await;
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();
    let ok = format!("{}/ok", target.url());

    server
        .post("/links")
        .json(&json!({ "links": [ok, "#top"] }))
        .await
        .assert_status_ok();
    app.store.flush().await.unwrap();

    let raw = tokio::fs::read_to_string(app.snapshot_path()).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["nextId"], 2);
    assert_eq!(json["linkSets"]["1"]["identity"], 1);
    assert_eq!(json["linkSets"]["1"]["links"][ok.as_str()], "available");
    assert_eq!(json["linkSets"]["1"]["links"]["#top"], "not available");
    assert!(json["linkSets"]["1"]["timestamp"].is_string());
}
