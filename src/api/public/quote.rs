use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::pricing::{self, BASE_PRICE, COLORS, MATERIALS};

pub fn quote_router() -> Router {
    Router::new()
        .route("/materials", get(get_materials))
        .route("/colors", get(get_colors))
        .route("/quote", post(create_quote))
}

async fn get_materials() -> impl IntoResponse {
    Json(MATERIALS)
}

async fn get_colors() -> impl IntoResponse {
    Json(COLORS)
}

async fn create_quote(Json(payload): Json<QuoteRequest>) -> impl IntoResponse {
    if let Some(err) = payload.validate().err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Invalid quote request: {}", err)
            })),
        );
    }

    if !pricing::infill_is_valid(payload.infill) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Infill must be between 10 and 100 in steps of 5"
            })),
        );
    }

    let material = match pricing::find_material(&payload.material) {
        Some(material) => material,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Unknown material: {}", payload.material)
                })),
            );
        }
    };

    let quantity = payload.quantity.max(1);
    let price = pricing::quote_price(material.multiplier, payload.infill, quantity);

    (
        StatusCode::OK,
        Json(json!({
            "base_price": BASE_PRICE,
            "material": material.name,
            "multiplier": material.multiplier,
            "infill": payload.infill,
            "quantity": quantity,
            "price": price
        })),
    )
}

#[derive(Deserialize, Validate, Debug)]
struct QuoteRequest {
    material: String,
    #[validate(range(min = 10, max = 100))]
    infill: u32,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
