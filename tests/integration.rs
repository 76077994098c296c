//! Integration tests for the GSA API.
//!
//! Each test spins up the full router on an ephemeral port, backed by a
//! fresh in-memory document store, and drives it over HTTP with reqwest.

use gsa_api::{
    auth::{AppState, TokenIssuer},
    config::Config,
    routes,
    storage::{DocumentStore, MemoryStore},
};
use serde_json::{json, Value};
use std::sync::Arc;

const TEST_SECRET: &str = "integration-test-secret-0123456789";

fn test_config() -> Config {
    Config {
        redis_url: "redis://127.0.0.1:6379".to_string(),
        db_name: "test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        token_ttl_secs: 86_400,
        // Minimum bcrypt cost keeps the suite fast
        bcrypt_cost: 4,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origins: vec!["*".to_string()],
        max_body_bytes: 1_048_576,
    }
}

struct TestServer {
    base_url: String,
    store: MemoryStore,
    client: reqwest::Client,
}

/// Spin up a test server and return its base URL plus the backing store.
async fn spawn_test_server() -> TestServer {
    let store = MemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()), test_config());
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}/api", addr),
        store,
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(t) = token {
            req = req.header("Authorization", format!("Bearer {}", t));
        }
        req.send().await.expect("Failed to send request")
    }

    async fn put(&self, path: &str, body: Value, token: &str) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.delete(self.url(path));
        if let Some(t) = token {
            req = req.header("Authorization", format!("Bearer {}", t));
        }
        req.send().await.expect("Failed to send request")
    }

    async fn get_json(&self, path: &str) -> Value {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn verify(&self, token: &str) -> reqwest::Response {
        self.client
            .get(self.url("/auth/verify"))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap()
    }

    /// Register an admin and return its token.
    async fn register(&self, username: &str, password: &str) -> String {
        let resp = self
            .post(
                "/auth/register",
                json!({ "username": username, "password": password }),
                None,
            )
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

fn event_body(title: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": "..",
        "date": date,
        "time": "18:00",
        "location": "Hall"
    })
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let server = spawn_test_server().await;

    let resp = server
        .post(
            "/auth/register",
            json!({ "username": "admin", "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let registered: Value = resp.json().await.unwrap();
    assert_eq!(registered["username"], "admin");
    let register_token = registered["token"].as_str().unwrap().to_string();
    assert!(!register_token.is_empty());

    let resp = server
        .post(
            "/auth/login",
            json!({ "username": "admin", "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let logged_in: Value = resp.json().await.unwrap();
    assert_eq!(logged_in["username"], "admin");
    let login_token = logged_in["token"].as_str().unwrap().to_string();

    // Both responses have the same shape
    let keys = |v: &Value| {
        let mut k: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        k.sort();
        k
    };
    assert_eq!(keys(&registered), keys(&logged_in));

    // Both tokens pass the guard
    for token in [&register_token, &login_token] {
        let resp = server.verify(token).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["valid"], true);
        assert_eq!(body["username"], "admin");
    }
}

#[tokio::test]
async fn test_password_hash_never_stored_in_plaintext() {
    let server = spawn_test_server().await;
    server.register("admin", "pw123").await;

    let stored = server.store.get("admins", "admin").await.unwrap().unwrap();
    assert!(!stored.contains("pw123"));
    let doc: Value = serde_json::from_str(&stored).unwrap();
    assert!(doc["password_hash"].as_str().unwrap().starts_with("$2"));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let server = spawn_test_server().await;
    server.register("admin", "pw123").await;

    let resp = server
        .post(
            "/auth/register",
            json!({ "username": "admin", "password": "different" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Username already exists");

    // Original password still works
    let resp = server
        .post(
            "/auth/login",
            json!({ "username": "admin", "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_concurrent_registration_single_winner() {
    let server = spawn_test_server().await;
    let body = json!({ "username": "racer", "password": "pw123" });

    let (a, b, c) = tokio::join!(
        server.post("/auth/register", body.clone(), None),
        server.post("/auth/register", body.clone(), None),
        server.post("/auth/register", body.clone(), None),
    );

    let mut statuses = vec![a.status().as_u16(), b.status().as_u16(), c.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 400, 400]);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = spawn_test_server().await;
    server.register("admin", "pw123").await;

    let resp = server
        .post(
            "/auth/login",
            json!({ "username": "admin", "password": "wrong" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
    let wrong_password: Value = resp.json().await.unwrap();

    let resp = server
        .post(
            "/auth/login",
            json!({ "username": "nobody", "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
    let unknown_user: Value = resp.json().await.unwrap();

    // No hint about which check failed
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_validation() {
    let server = spawn_test_server().await;

    let resp = server
        .post(
            "/auth/register",
            json!({ "username": "a", "password": "pw123" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "username");

    let resp = server
        .post("/auth/register", json!({ "username": "admin" }), None)
        .await;
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "body");
    assert!(body["detail"].as_str().unwrap().contains("password"));

    // Nothing was persisted
    assert!(server.store.get("admins", "admin").await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let server = spawn_test_server().await;
    server.register("admin", "pw123").await;

    let issuer = TokenIssuer::new(TEST_SECRET.as_bytes(), 86_400);
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let stale = issuer.issue_at("admin", now - 86_400 - 5).unwrap();

    let resp = server.verify(&stale).await;
    assert_eq!(resp.status(), 401);

    let resp = server
        .post("/events", event_body("Late", "2025-01-01"), Some(&stale))
        .await;
    assert_eq!(resp.status(), 401);
    assert!(server.get_json("/events").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    // Swap one character in the middle of the signature segment
    let sig_start = token.rfind('.').unwrap() + 1;
    let pos = sig_start + 5;
    let original = token.as_bytes()[pos];
    let replacement = if original == b'A' { 'B' } else { 'A' };
    let mut tampered = token.clone();
    tampered.replace_range(pos..pos + 1, &replacement.to_string());
    assert_ne!(tampered, token);

    let resp = server.verify(&tampered).await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid or expired token");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let server = spawn_test_server().await;
    let forged = TokenIssuer::new(b"some-other-secret-0123456789abcdef", 86_400)
        .issue("admin")
        .unwrap();

    let resp = server.verify(&forged).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_token_valid_without_account_recheck() {
    // Tokens are stateless: a valid signature for a never-registered name passes
    let server = spawn_test_server().await;
    let token = TokenIssuer::new(TEST_SECRET.as_bytes(), 86_400)
        .issue("ghost")
        .unwrap();

    let resp = server.verify(&token).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["username"], "ghost");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_create_event_requires_token() {
    let server = spawn_test_server().await;

    let resp = server
        .post("/events", event_body("Meetup", "2025-01-01"), None)
        .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid or expired token");

    let resp = server
        .post(
            "/events",
            event_body("Meetup", "2025-01-01"),
            Some("not-a-token"),
        )
        .await;
    assert_eq!(resp.status(), 401);

    // Guard runs before the body is parsed
    let resp = server
        .client
        .post(server.url("/events"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Nothing reached the store
    assert!(server.store.list("events").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_event_with_token() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let mut body = event_body("Meetup", "2025-01-01");
    body["id"] = json!("caller-chosen-id");

    let resp = server.post("/events", body.clone(), Some(&token)).await;
    assert_eq!(resp.status(), 200);
    let first: Value = resp.json().await.unwrap();
    let first_id = first["id"].as_str().unwrap().to_string();
    assert!(!first_id.is_empty());
    assert_ne!(first_id, "caller-chosen-id");
    assert_eq!(first["title"], "Meetup");
    assert_eq!(first["event_type"], "general");

    let resp = server.post("/events", body, Some(&token)).await;
    let second: Value = resp.json().await.unwrap();
    assert_ne!(second["id"], first["id"]);

    let events = server.get_json("/events").await;
    let ids: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&first_id.as_str()));
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn test_events_sorted_by_date() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    for (title, date) in [
        ("Spring", "2025-03-14"),
        ("Winter", "2024-12-01"),
        ("Fall", "2025-10-01"),
        ("New Year", "2025-01-01"),
    ] {
        let resp = server
            .post("/events", event_body(title, date), Some(&token))
            .await;
        assert_eq!(resp.status(), 200);
    }

    let events = server.get_json("/events").await;
    let dates: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-12-01", "2025-01-01", "2025-03-14", "2025-10-01"]
    );
}

#[tokio::test]
async fn test_padded_dates_cannot_break_ordering() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server
        .post("/events", event_body("Feb", "2025-02-01"), Some(&token))
        .await;
    assert_eq!(resp.status(), 200);

    for (title, date) in [
        ("Mar", "2025- 3-01"),
        ("Jan", "+2025-1-01"),
        ("Mar2", " 2025-3-01"),
        ("Dec2024", "+2024-12-1"),
    ] {
        let resp = server
            .post("/events", event_body(title, date), Some(&token))
            .await;
        assert_eq!(resp.status(), 422, "{} should be rejected", date);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["field"], "date");
    }

    for (title, date) in [("Mar", "2025-03-01"), ("Dec2024", "2024-12-01")] {
        let resp = server
            .post("/events", event_body(title, date), Some(&token))
            .await;
        assert_eq!(resp.status(), 200);
    }

    let events = server.get_json("/events").await;
    let titles: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dec2024", "Feb", "Mar"]);
}

#[tokio::test]
async fn test_event_invalid_date_rejected() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server
        .post("/events", event_body("Meetup", "Jan 1st"), Some(&token))
        .await;
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "date");
    assert!(server.store.list("events").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server
        .post("/events", event_body("Meetup", "2025-01-01"), Some(&token))
        .await;
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = server
        .put(
            &format!("/events/{}", id),
            json!({ "location": "Library", "event_type": "social" }),
            &token,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Meetup");
    assert_eq!(updated["location"], "Library");
    assert_eq!(updated["event_type"], "social");

    // Delete requires a token
    let resp = server.delete(&format!("/events/{}", id), None).await;
    assert_eq!(resp.status(), 401);

    let resp = server.delete(&format!("/events/{}", id), Some(&token)).await;
    assert_eq!(resp.status(), 200);

    let resp = server.delete(&format!("/events/{}", id), Some(&token)).await;
    assert_eq!(resp.status(), 404);

    let resp = server
        .put(&format!("/events/{}", id), json!({ "title": "Gone" }), &token)
        .await;
    assert_eq!(resp.status(), 404);

    assert!(server.get_json("/events").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_id_rejected() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server.delete("/events/short", Some(&token)).await;
    assert_eq!(resp.status(), 400);
}

// ============================================================================
// Officer & Gallery Tests
// ============================================================================

#[tokio::test]
async fn test_officers_sorted_by_order() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    for (name, order) in [("Treasurer", 3), ("President", 1), ("Secretary", 2)] {
        let resp = server
            .post(
                "/officers",
                json!({
                    "name": name,
                    "role": name,
                    "bio": "",
                    "image_url": "https://img.example/o.jpg",
                    "order": order
                }),
                Some(&token),
            )
            .await;
        assert_eq!(resp.status(), 200);
    }

    let officers = server.get_json("/officers").await;
    let names: Vec<&str> = officers
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["President", "Secretary", "Treasurer"]);
}

#[tokio::test]
async fn test_officer_update_and_delete() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server
        .post(
            "/officers",
            json!({ "name": "Ada", "role": "President", "bio": "", "image_url": "" }),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["order"], 0);

    let resp = server
        .put(
            &format!("/officers/{}", id),
            json!({
                "name": "Ada",
                "role": "Vice President",
                "bio": "Math",
                "image_url": "",
                "email": "ada@example.edu",
                "order": 2
            }),
            &token,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["role"], "Vice President");

    let resp = server.delete(&format!("/officers/{}", id), Some(&token)).await;
    assert_eq!(resp.status(), 200);
    assert!(server.get_json("/officers").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_officer_requires_token() {
    let server = spawn_test_server().await;
    let resp = server
        .post(
            "/officers",
            json!({ "name": "Ada", "role": "President", "bio": "", "image_url": "" }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
    assert!(server.store.list("officers").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gallery_create_list_delete() {
    let server = spawn_test_server().await;
    let token = server.register("admin", "pw123").await;

    let resp = server
        .post(
            "/gallery",
            json!({ "url": "https://img.example/b.jpg", "caption": "B", "order": 2 }),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);

    let mut ids = Vec::new();
    for (caption, order) in [("B", 2), ("A", 1)] {
        let resp = server
            .post(
                "/gallery",
                json!({ "url": "https://img.example/x.jpg", "caption": caption, "order": order }),
                Some(&token),
            )
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let images = server.get_json("/gallery").await;
    let captions: Vec<&str> = images
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["caption"].as_str().unwrap())
        .collect();
    assert_eq!(captions, vec!["A", "B"]);

    let resp = server
        .delete(&format!("/gallery/{}", ids[0]), Some(&token))
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(server.get_json("/gallery").await.as_array().unwrap().len(), 1);
}

// ============================================================================
// Misc Tests
// ============================================================================

#[tokio::test]
async fn test_root_and_seed() {
    let server = spawn_test_server().await;

    let info = server.get_json("/").await;
    assert_eq!(info["message"], "GSA API");
    assert!(info["version"].is_string());

    let resp = server.post("/seed", json!({}), None).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Database seeded successfully");

    // Seeding writes nothing
    assert!(server.get_json("/events").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let server = spawn_test_server().await;

    let resp = server.client.get(server.url("/events")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
}
