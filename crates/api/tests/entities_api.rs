use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::json;

use depot_core::EntityId;
use depot_infra::InMemoryEntityRepository;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) against the in-memory backend and
        // bind to an ephemeral port.
        let repository = Arc::new(InMemoryEntityRepository::new());
        let app = depot_api::app::build_app(repository);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_entity(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(format!("{base_url}/entities/"))
        .json(&body)
        .send()
        .await
        .unwrap();

    let status = res.status();
    (status, res.json().await.unwrap())
}

fn timestamp(value: &serde_json::Value, field: &str) -> DateTime<Utc> {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} missing from {value}"))
        .parse()
        .unwrap_or_else(|_| panic!("{field} is not an RFC 3339 timestamp"))
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn create_round_trips_data_and_assigns_server_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = create_entity(
        &client,
        &srv.base_url,
        json!({
            "kind": "freelearning.org/Project",
            "version": "1.0.0",
            "data": { "name": "Test Project" },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "freelearning.org/Project");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["data"], json!({ "name": "Test Project" }));
    assert!(body["id"].as_str().unwrap().parse::<EntityId>().is_ok());
    assert_eq!(timestamp(&body, "created_at"), timestamp(&body, "updated_at"));
}

#[tokio::test]
async fn create_rejects_malformed_kind() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for kind in ["Project", "freelearning.org/project", "no-slash"] {
        let (status, body) = create_entity(
            &client,
            &srv.base_url,
            json!({ "kind": kind, "version": "1.0.0", "data": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "kind '{kind}' should be rejected");
        assert!(body["error"].as_str().unwrap().contains("kind"));
    }
}

#[tokio::test]
async fn create_rejects_malformed_version() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for version in ["1.0", "v1.0.0", "1.0.0-beta"] {
        let (status, body) = create_entity(
            &client,
            &srv.base_url,
            json!({ "kind": "a.b/Widget", "version": version, "data": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "version '{version}' should be rejected");
        assert!(body["error"].as_str().unwrap().contains("version"));
    }
}

#[tokio::test]
async fn create_requires_all_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("data"));
}

#[tokio::test]
async fn create_rejects_non_object_data() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": [1, 2, 3] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("data"));
}

#[tokio::test]
async fn get_returns_created_entity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": { "n": 1 } }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/entities/{id}", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, created);
}

#[tokio::test]
async fn get_missing_entity_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/entities/{}", srv.base_url, EntityId::new()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Entity not found" }));
}

#[tokio::test]
async fn get_with_malformed_id_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/entities/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn partial_update_preserves_absent_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": { "name": "unchanged" } }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    // Timestamps have finite resolution; give the clock room so the
    // strictly-greater assertion below is deterministic.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let res = client
        .put(format!("{}/entities/{id}", srv.base_url))
        .json(&json!({ "version": "2.0.0" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["version"], "2.0.0");
    assert_eq!(body["kind"], created["kind"]);
    assert_eq!(body["data"], json!({ "name": "unchanged" }));
    assert_eq!(timestamp(&body, "created_at"), timestamp(&created, "created_at"));
    assert!(timestamp(&body, "updated_at") > timestamp(&created, "updated_at"));
}

#[tokio::test]
async fn update_with_empty_body_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": {} }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/entities/{id}", srv.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No fields to update" }));
}

#[tokio::test]
async fn update_missing_entity_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/entities/{}", srv.base_url, EntityId::new()))
        .json(&json!({ "kind": "a.b/Widget", "version": "3.0.0", "data": { "x": 1 } }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Entity not found" }));
}

#[tokio::test]
async fn update_rejects_invalid_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_entity(
        &client,
        &srv.base_url,
        json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": {} }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/entities/{id}", srv.base_url))
        .json(&json!({ "version": "2.0" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        let (status, body) = create_entity(
            &client,
            &srv.base_url,
            json!({ "kind": "a.b/Widget", "version": "1.0.0", "data": { "name": name } }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let res = client
        .get(format!("{}/entities/", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let listed: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();

    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn empty_store_lists_an_empty_array() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/entities/", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}
