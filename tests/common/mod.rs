use reqwest::header;
use sea_orm::{ConnectOptions, Database};
use serde_json::json;
use std::sync::Arc;

use printforge::api::create_api_router;
use printforge::entities::{seed_database, setup_schema};

/// Boots the full router over an in-memory database on an ephemeral port
/// and returns the base url, e.g. `http://127.0.0.1:54321`.
pub async fn spawn_app() -> String {
    // Pin the seeded admin credentials for the whole suite.
    std::env::set_var("ADMIN_PASSWORD", "change_this_password");

    // A single pooled connection keeps every handler on the same in-memory
    // database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    setup_schema(&db).await;

    let shared_db = Arc::new(db);
    seed_database(shared_db.clone()).await;

    let app = create_api_router(shared_db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server crashed");
    });

    format!("http://{}", addr)
}

/// Registers a fresh account and returns its bearer token.
#[allow(dead_code)]
pub async fn register_and_login(client: &reqwest::Client, base: &str, email: &str) -> String {
    let payload = json!({
        "email": email,
        "password": "Muzion15",
        "name": "Test User"
    });

    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse register response JSON");

    body["token"]
        .as_str()
        .expect("Token not found in register response")
        .to_owned()
}

/// Logs in as the seeded admin account and returns its bearer token.
#[allow(dead_code)]
pub async fn admin_token(client: &reqwest::Client, base: &str) -> String {
    let payload = json!({
        "email": "admin@printforge.dev",
        "password": "change_this_password"
    });

    let response = client
        .post(format!("{base}/api/auth/login"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send admin login request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse admin login response JSON");

    body["token"]
        .as_str()
        .expect("Token not found in admin login response")
        .to_owned()
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("Failed to create Authorization header"),
    );
    headers
}

#[allow(dead_code)]
pub fn assert_close(value: f64, expected: f64) {
    assert!(
        (value - expected).abs() < 1e-3,
        "expected {expected}, got {value}"
    );
}
