//! End-to-end tests over HTTP
//!
//! Drives the full router (middleware included) through `axum_test::TestServer`
//! backed by the in-memory store.

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tasklist::{
    app,
    auth::{jwt::TokenCodec, password::KeyedDigestHasher},
    db::{MemoryStore, SequenceIdGenerator},
    types::Identity,
    AppState, TaskListConfig,
};

const SECRET: &[u8] = b"api-test-secret-that-is-at-least-32-bytes";
const LIFETIME_SECS: i64 = 3600;

fn create_test_codec() -> TokenCodec {
    TokenCodec::new(SECRET, LIFETIME_SECS, "tasklist")
}

fn create_test_server() -> TestServer {
    let state = AppState::new(
        TaskListConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(KeyedDigestHasher::new("pepper")),
        Arc::new(SequenceIdGenerator::starting_after(0)),
        create_test_codec(),
    );
    TestServer::new(app(state)).expect("Failed to create test server")
}

async fn register(server: &TestServer, name: &str, password: &str) -> Value {
    let response = server
        .post("/register")
        .json(&json!({ "name": name, "password": password }))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn login(server: &TestServer, name: &str, password: &str) -> Value {
    let response = server
        .post("/login")
        .json(&json!({ "name": name, "password": password }))
        .await;
    response.assert_status_ok();
    response.json()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers `name` and returns a session token for it.
async fn session(server: &TestServer, name: &str) -> String {
    register(server, name, "pw").await;
    let body = login(server, name, "pw").await;
    body["data"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn test_health() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_register_then_login() {
    let server = create_test_server();

    let body = register(&server, "alice", "pw1").await;
    assert_eq!(body, json!({ "code": 0, "msg": "registered" }));

    let body = login(&server, "alice", "pw1").await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["msg"], "success");

    let token = body["data"].as_str().unwrap();
    let identity = create_test_codec().verify(token, Utc::now()).unwrap();
    assert_eq!(identity.name, "alice");
}

#[tokio::test]
async fn test_register_accepts_display_name() {
    let server = create_test_server();

    let response = server
        .post("/register")
        .json(&json!({ "name": "alice", "password": "pw1", "display_name": "Alice A." }))
        .await;

    assert_eq!(response.json::<Value>()["code"], 0);
}

#[tokio::test]
async fn test_duplicate_register() {
    let server = create_test_server();
    register(&server, "alice", "pw1").await;

    let body = register(&server, "alice", "other").await;

    assert_eq!(body, json!({ "code": 1, "msg": "registration failed" }));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = create_test_server();
    register(&server, "alice", "pw1").await;

    let wrong_password = login(&server, "alice", "pw2").await;
    let unknown_name = login(&server, "mallory", "pw1").await;

    assert_eq!(wrong_password, unknown_name);
    assert_eq!(wrong_password["code"], 1);
    assert_eq!(wrong_password["msg"], "invalid name or password");
    assert!(wrong_password.get("data").is_none());
}

#[tokio::test]
async fn test_missing_field_is_invalid_parameters() {
    let server = create_test_server();

    let response = server.post("/register").json(&json!({ "name": "alice" })).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "code": 1, "msg": "invalid parameters" })
    );
}

#[tokio::test]
async fn test_non_json_body_is_invalid_parameters() {
    let server = create_test_server();

    let response = server.post("/login").text("name=alice&password=pw").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["msg"], "invalid parameters");
}

#[tokio::test]
async fn test_empty_password_is_invalid_parameters() {
    let server = create_test_server();

    let body = register(&server, "alice", "").await;

    assert_eq!(body["code"], 1);
    assert_eq!(body["msg"], "invalid parameters");
}

#[tokio::test]
async fn test_protected_route_without_header() {
    let server = create_test_server();

    let response = server.get("/api/v1/todo").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "code": 1, "msg": "empty bearer token in request header" })
    );
}

#[tokio::test]
async fn test_protected_route_with_malformed_header() {
    let server = create_test_server();

    for value in ["Basic abc", "Bearer", "Bearertoken"] {
        let response = server
            .get("/api/v1/todo")
            .add_header("Authorization", value)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["msg"],
            "malformed bearer authorization header",
            "header value {value:?}"
        );
    }
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer("not-a-token"))
        .await;

    assert_eq!(
        response.json::<Value>(),
        json!({ "code": 1, "msg": "invalid token" })
    );
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let server = create_test_server();
    register(&server, "alice", "pw").await;

    let stale = create_test_codec()
        .issue(
            &Identity {
                user_id: 1,
                name: "alice".to_string(),
            },
            Utc::now() - Duration::seconds(LIFETIME_SECS + 5),
        )
        .unwrap();

    let response = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer(&stale))
        .await;

    assert_eq!(
        response.json::<Value>(),
        json!({ "code": 1, "msg": "invalid token" })
    );
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let server = create_test_server();

    let forged = TokenCodec::new(b"some-other-secret-that-is-32-bytes-long", 60, "tasklist")
        .issue(
            &Identity {
                user_id: 1,
                name: "alice".to_string(),
            },
            Utc::now(),
        )
        .unwrap();

    let response = server
        .get("/api/v1/me")
        .add_header("Authorization", bearer(&forged))
        .await;

    assert_eq!(response.json::<Value>()["msg"], "invalid token");
}

#[tokio::test]
async fn test_me_returns_bound_identity() {
    let server = create_test_server();
    let token = session(&server, "alice").await;

    let response = server
        .get("/api/v1/me")
        .add_header("Authorization", bearer(&token))
        .await;

    let body: Value = response.json();
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["name"], "alice");
    assert_eq!(body["data"]["user_id"], 1);
}

#[tokio::test]
async fn test_task_crud() {
    let server = create_test_server();
    let token = session(&server, "alice").await;

    let created: Value = server
        .post("/api/v1/todo")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "buy milk" }))
        .await
        .json();
    assert_eq!(created["code"], 0);
    assert_eq!(created["data"]["title"], "buy milk");
    assert_eq!(created["data"]["status"], false);
    let id = created["data"]["id"].as_i64().unwrap();

    let updated: Value = server
        .put("/api/v1/todo")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "id": id, "status": true }))
        .await
        .json();
    assert_eq!(updated, json!({ "code": 0, "msg": "success" }));

    let listed: Value = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["status"], true);

    let deleted: Value = server
        .delete(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(deleted["code"], 0);

    let listed: Value = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn test_tasks_are_owner_scoped() {
    let server = create_test_server();
    let alice = session(&server, "alice").await;
    let bob = session(&server, "bob").await;

    let created: Value = server
        .post("/api/v1/todo")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "title": "alice only" }))
        .await
        .json();
    let id = created["data"]["id"].as_i64().unwrap();

    let bob_list: Value = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(bob_list["data"], json!([]));

    let bob_update: Value = server
        .put("/api/v1/todo")
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "id": id, "status": true }))
        .await
        .json();
    let missing_update: Value = server
        .put("/api/v1/todo")
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "id": id + 1000, "status": true }))
        .await
        .json();
    assert_eq!(bob_update, json!({ "code": 1, "msg": "invalid parameters" }));
    assert_eq!(bob_update, missing_update);

    let bob_delete: Value = server
        .delete(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(bob_delete["code"], 1);

    let alice_list: Value = server
        .get("/api/v1/todo")
        .add_header("Authorization", bearer(&alice))
        .await
        .json();
    assert_eq!(alice_list["data"][0]["status"], false);
}

#[tokio::test]
async fn test_delete_with_non_numeric_id() {
    let server = create_test_server();
    let token = session(&server, "alice").await;

    let body: Value = server
        .delete("/api/v1/todo/abc")
        .add_header("Authorization", bearer(&token))
        .await
        .json();

    assert_eq!(body, json!({ "code": 1, "msg": "invalid parameters" }));
}

#[tokio::test]
async fn test_blank_title_rejected() {
    let server = create_test_server();
    let token = session(&server, "alice").await;

    let body: Value = server
        .post("/api/v1/todo")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "   " }))
        .await
        .json();

    assert_eq!(body["msg"], "invalid parameters");
}

#[tokio::test]
async fn test_get_single_task() {
    let server = create_test_server();
    let alice = session(&server, "alice").await;
    let bob = session(&server, "bob").await;

    let created: Value = server
        .post("/api/v1/todo")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "title": "buy milk" }))
        .await
        .json();
    let id = created["data"]["id"].as_i64().unwrap();

    let fetched: Value = server
        .get(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&alice))
        .await
        .json();
    assert_eq!(fetched, created);

    let foreign: Value = server
        .get(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert_eq!(foreign, json!({ "code": 1, "msg": "invalid parameters" }));

    server
        .delete(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&alice))
        .await;
    let deleted: Value = server
        .get(&format!("/api/v1/todo/{}", id))
        .add_header("Authorization", bearer(&alice))
        .await
        .json();
    assert_eq!(deleted, json!({ "code": 1, "msg": "invalid parameters" }));
}
