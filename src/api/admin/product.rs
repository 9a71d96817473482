use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::product::{self, Entity as ProductEntity, StringList};

pub fn admin_product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/:id",
            axum::routing::patch(patch_product).delete(delete_product),
        )
        .layer(Extension(db))
}

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> impl IntoResponse {
    if let Some(err) = payload.validate().err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Invalid product: {}", err)
            })),
        );
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let new_product = product::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        image: Set(payload.image),
        materials: Set(StringList(payload.materials)),
        colors: Set(StringList(payload.colors)),
        print_time: Set(payload.print_time),
        rating: Set(payload.rating),
        reviews: Set(payload.reviews),
        in_stock: Set(payload.in_stock.unwrap_or(true)),
        featured: Set(payload.featured.unwrap_or(false)),
        ..Default::default()
    };

    let inserted = match ProductEntity::insert(new_product).exec(&txn).await {
        Ok(inserted) => inserted,
        Err(_) => {
            let _ = txn.rollback().await;
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Product already exists"
                })),
            );
        }
    };

    let created = match ProductEntity::find_by_id(inserted.last_insert_id).one(&txn).await {
        Ok(Some(created)) => created,
        _ => {
            let _ = txn.rollback().await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    match txn.commit().await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!(created)),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

async fn patch_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProductPayload>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(prod)) => {
            let mut prod: product::ActiveModel = prod.into();

            if let Some(name) = payload.name {
                prod.name = Set(name);
            }

            if let Some(description) = payload.description {
                prod.description = Set(description);
            }

            if let Some(price) = payload.price {
                if price <= 0.0 {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Price should be greater than 0"
                        })),
                    );
                }
                prod.price = Set(price);
            }

            if let Some(category) = payload.category {
                prod.category = Set(category);
            }

            if let Some(image) = payload.image {
                prod.image = Set(image);
            }

            if let Some(materials) = payload.materials {
                prod.materials = Set(StringList(materials));
            }

            if let Some(colors) = payload.colors {
                prod.colors = Set(StringList(colors));
            }

            if let Some(print_time) = payload.print_time {
                prod.print_time = Set(print_time);
            }

            if let Some(in_stock) = payload.in_stock {
                prod.in_stock = Set(in_stock);
            }

            if let Some(featured) = payload.featured {
                prod.featured = Set(featured);
            }

            match prod.update(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource patched successfully"
                        })),
                    )
                }
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to patch this resource"
                        })),
                    )
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        ),
    }
}

async fn delete_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(prod)) => {
            let prod: product::ActiveModel = prod.into();
            match prod.delete(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource deleted successfully"
                        })),
                    )
                }
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to delete this resource"
                        })),
                    )
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        ),
    }
}

#[derive(Deserialize, Validate, Clone, Debug)]
struct CreateProduct {
    #[validate(length(min = 1, max = 120))]
    name: String,
    #[serde(default)]
    description: String,
    #[validate(range(min = 0.01))]
    price: f32,
    category: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    materials: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default)]
    print_time: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    rating: f32,
    #[serde(default)]
    reviews: i32,
    in_stock: Option<bool>,
    featured: Option<bool>,
}

#[derive(Deserialize)]
struct PatchProductPayload {
    name: Option<String>,
    description: Option<String>,
    price: Option<f32>,
    category: Option<String>,
    image: Option<String>,
    materials: Option<Vec<String>>,
    colors: Option<Vec<String>>,
    print_time: Option<String>,
    in_stock: Option<bool>,
    featured: Option<bool>,
}
