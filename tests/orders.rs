mod common;

use reqwest::{Client, StatusCode};
use serde_json::json;

use common::{admin_token, assert_close, bearer, spawn_app};

#[tokio::test]
async fn test_guest_order_pays_shipping_below_threshold() {
    let base = spawn_app().await;
    let client = Client::new();

    // One 19.99 phone stand: 19.99 + 5.99 shipping
    let payload = json!({
        "items": [
            { "product_id": 4, "material": "PLA", "color": "Black", "quantity": 1 }
        ],
        "customer": {
            "name": "Jane Doe",
            "email": "jane@example.com",
            "address": "2 Nozzle Street",
            "phone": "555-0101"
        }
    });

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send order request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    assert_eq!(order["status"].as_str(), Some("pending"));
    assert_close(order["subtotal"].as_f64().expect("subtotal"), 19.99);
    assert_close(order["shipping"].as_f64().expect("shipping"), 5.99);
    assert_close(order["total"].as_f64().expect("total"), 25.98);
    assert_eq!(order["customer_name"].as_str(), Some("Jane Doe"));
}

#[tokio::test]
async fn test_guest_order_ships_free_above_threshold() {
    let base = spawn_app().await;
    let client = Client::new();

    let payload = json!({
        "items": [
            { "product_id": 1, "material": "PLA", "color": "White", "quantity": 2 }
        ]
    });

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send order request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    assert_close(order["subtotal"].as_f64().expect("subtotal"), 99.98);
    assert_close(order["shipping"].as_f64().expect("shipping"), 0.0);
    assert_close(order["total"].as_f64().expect("total"), 99.98);
}

#[tokio::test]
async fn test_order_total_ignores_client_prices_for_catalog_items() {
    let base = spawn_app().await;
    let client = Client::new();

    // The payload lies about the price; the stored order must not.
    let payload = json!({
        "items": [
            { "product_id": 1, "quantity": 1, "price": 0.01 }
        ]
    });

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send order request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    assert_close(order["subtotal"].as_f64().expect("subtotal"), 49.99);
    assert_close(
        order["items"][0]["unit_price"].as_f64().expect("unit price"),
        49.99,
    );
}

#[tokio::test]
async fn test_order_requires_items() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_rejects_unknown_product_and_zero_quantity() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [ { "product_id": 999, "quantity": 1 } ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [ { "product_id": 1, "quantity": 0 } ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_item_requires_positive_price() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [ { "name": "Custom Print: widget.stl", "quantity": 1 } ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A quoted custom line is accepted as-is
    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [
                {
                    "name": "Custom Print: widget.stl",
                    "material": "PETG",
                    "color": "Black",
                    "quantity": 2,
                    "price": 23.40
                }
            ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    assert_close(order["subtotal"].as_f64().expect("subtotal"), 46.8);
}

#[tokio::test]
async fn test_get_order_by_id() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [
                { "product_id": 3, "material": "Resin", "color": "Gray", "quantity": 2 }
            ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    let id = created["id"].as_i64().expect("order id");

    let response = client
        .get(format!("{base}/api/orders/{id}"))
        .send()
        .await
        .expect("Failed to send get order request");
    assert_eq!(response.status(), StatusCode::OK);
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");

    assert_eq!(order["id"].as_i64(), Some(id));
    let items = order["items"].as_array().expect("order items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"].as_str(), Some("Fantasy Warrior Miniature"));
    assert_eq!(items[0]["quantity"].as_u64(), Some(2));
}

#[tokio::test]
async fn test_get_missing_order_is_404() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{base}/api/orders/424242"))
        .send()
        .await
        .expect("Failed to send get order request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_lists_orders_and_updates_status() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "items": [ { "product_id": 2, "quantity": 1 } ]
        }))
        .send()
        .await
        .expect("Failed to send order request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    let id = created["id"].as_i64().expect("order id");

    let token = admin_token(&client, &base).await;

    // Step 1: The new order shows up in the pending list
    let response = client
        .get(format!("{base}/api/admin/orders?status=pending"))
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send list request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse list response JSON");
    assert!(body
        .as_array()
        .expect("orders array")
        .iter()
        .any(|order| order["id"].as_i64() == Some(id)));

    // Step 2: Move it along
    let response = client
        .patch(format!("{base}/api/admin/orders/{id}"))
        .headers(bearer(&token))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{base}/api/orders/{id}"))
        .send()
        .await
        .expect("Failed to send get order request");
    let order = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse order response JSON");
    assert_eq!(order["status"].as_str(), Some("shipped"));

    // Step 3: Garbage statuses are rejected
    let response = client
        .patch(format!("{base}/api/admin/orders/{id}"))
        .headers(bearer(&token))
        .json(&json!({ "status": "teleported" }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Step 4: Unknown orders are a 404
    let response = client
        .patch(format!("{base}/api/admin/orders/424242"))
        .headers(bearer(&token))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("Failed to send patch request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
