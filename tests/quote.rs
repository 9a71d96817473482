mod common;

use reqwest::{Client, StatusCode};
use serde_json::json;

use common::{assert_close, spawn_app};

#[tokio::test]
async fn test_materials_table_is_published() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/api/materials"))
        .send()
        .await
        .expect("Failed to send materials request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse materials response JSON");
    let materials = body.as_array().expect("materials array");
    assert_eq!(materials.len(), 5);

    let pla = materials
        .iter()
        .find(|material| material["name"].as_str() == Some("PLA"))
        .expect("PLA entry");
    assert_close(pla["multiplier"].as_f64().expect("multiplier"), 1.0);

    let response = client
        .get(format!("{base}/api/colors"))
        .send()
        .await
        .expect("Failed to send colors request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse colors response JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn test_quote_matches_worked_example() {
    let base = spawn_app().await;
    let client = Client::new();

    // 15 * 1.3 * 1.2 * 2 = 46.80
    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({
            "material": "PETG",
            "infill": 20,
            "quantity": 2
        }))
        .send()
        .await
        .expect("Failed to send quote request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse quote response JSON");
    assert_close(body["price"].as_f64().expect("price"), 46.8);
    assert_close(body["multiplier"].as_f64().expect("multiplier"), 1.3);
    assert_close(body["base_price"].as_f64().expect("base price"), 15.0);
}

#[tokio::test]
async fn test_quote_clamps_zero_quantity() {
    let base = spawn_app().await;
    let client = Client::new();

    // PLA at minimum infill for a single piece: 15 * 1.0 * 1.1 = 16.50
    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({
            "material": "PLA",
            "infill": 10,
            "quantity": 0
        }))
        .send()
        .await
        .expect("Failed to send quote request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse quote response JSON");
    assert_eq!(body["quantity"].as_u64(), Some(1));
    assert_close(body["price"].as_f64().expect("price"), 16.5);
}

#[tokio::test]
async fn test_quote_rejects_unknown_material() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({
            "material": "Adamantium",
            "infill": 20,
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send quote request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_rejects_invalid_infill() {
    let base = spawn_app().await;
    let client = Client::new();

    // Below range
    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({ "material": "PLA", "infill": 5, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send quote request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Above range
    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({ "material": "PLA", "infill": 105, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send quote request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Off the 5% grid
    let response = client
        .post(format!("{base}/api/quote"))
        .json(&json!({ "material": "PLA", "infill": 42, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send quote request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_price_grows_with_each_input() {
    let base = spawn_app().await;
    let client = Client::new();

    async fn price(client: &Client, base: &str, material: &str, infill: u32, quantity: u32) -> f64 {
        let response = client
            .post(format!("{base}/api/quote"))
            .json(&json!({ "material": material, "infill": infill, "quantity": quantity }))
            .send()
            .await
            .expect("Failed to send quote request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .json::<serde_json::Value>()
            .await
            .expect("Failed to parse quote response JSON");
        body["price"].as_f64().expect("price")
    }

    let baseline = price(&client, &base, "PLA", 20, 1).await;
    assert!(price(&client, &base, "PLA", 20, 3).await > baseline);
    assert!(price(&client, &base, "PLA", 60, 1).await > baseline);
    assert!(price(&client, &base, "Resin", 20, 1).await > baseline);
}
