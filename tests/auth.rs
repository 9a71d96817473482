mod common;

use reqwest::{Client, StatusCode};
use serde_json::json;

use common::{bearer, spawn_app};

// Test if the server is running and responds to a health check
#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success(), "Health check failed");
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["status"].as_str(), Some("ok"));
}

#[tokio::test]
async fn test_register_login_me() {
    let base = spawn_app().await;
    let client = Client::new();

    // Step 1: Register a new account
    let payload = json!({
        "email": "john.doe@example.com",
        "password": "Muzion15",
        "name": "John Doe"
    });

    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse register response JSON");
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"].as_str(), Some("john.doe@example.com"));

    // Step 2: Log in with the same credentials
    let login_payload = json!({
        "email": "john.doe@example.com",
        "password": "Muzion15"
    });

    let response = client
        .post(format!("{base}/api/auth/login"))
        .json(&login_payload)
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login response JSON");
    let token = body["token"].as_str().expect("Token not found");

    // Step 3: The token resolves to the profile
    let response = client
        .get(format!("{base}/api/auth/me"))
        .headers(bearer(token))
        .send()
        .await
        .expect("Failed to send me request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse me response JSON");
    assert_eq!(body["email"].as_str(), Some("john.doe@example.com"));
    assert_eq!(body["name"].as_str(), Some("John Doe"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let base = spawn_app().await;
    let client = Client::new();

    let payload = json!({
        "email": "taken@example.com",
        "password": "Muzion15",
        "name": "First"
    });

    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send second register request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_payload() {
    let base = spawn_app().await;
    let client = Client::new();

    // Bad email
    let payload = json!({
        "email": "not-an-email",
        "password": "Muzion15",
        "name": "John"
    });
    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Short password
    let payload = json!({
        "email": "short@example.com",
        "password": "short",
        "name": "John"
    });
    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let base = spawn_app().await;
    let client = Client::new();

    common::register_and_login(&client, &base, "victim@example.com").await;

    let payload = json!({
        "email": "victim@example.com",
        "password": "WrongPassword"
    });

    let response = client
        .post(format!("{base}/api/auth/login"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/api/auth/me"))
        .headers(bearer("definitely-not-a-jwt"))
        .send()
        .await
        .expect("Failed to send me request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_authorization_header() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to send me request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
