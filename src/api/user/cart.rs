use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::public::order::{load_order, CustomerPayload};
use crate::entities::{
    cart::{self, Entity as CartEntity},
    order::{self, Entity as OrderEntity, Status},
    order_item::{self, Entity as OrderItemEntity},
    product,
};
use crate::middleware::auth::Claims;
use crate::pricing;

pub fn cart_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_product).delete(clear_cart))
        .route("/cart/custom", post(add_custom_print))
        .route("/cart/checkout", post(checkout))
        .route("/cart/:id", patch(patch_entry).delete(remove_entry))
        .layer(Extension(db))
}

async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };

    match CartEntity::find()
        .filter(cart::Column::UserId.eq(claims.user_id))
        .order_by_asc(cart::Column::Id)
        .all(&txn)
        .await
    {
        Ok(entries) => (StatusCode::OK, Json(CartResponse::new(entries))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn add_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddProduct>,
) -> impl IntoResponse {
    if payload.quantity == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Quantity should be greater than 0"
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

    let product = match product::Entity::find_by_id(payload.product_id).one(&txn).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("No product with {} id was found", payload.product_id)
                })),
            );
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            );
        }
    };

    if !product.in_stock {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Product is out of stock"
            })),
        );
    }

    if !product.materials.contains(&payload.material) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Material {} is not offered for this product", payload.material)
            })),
        );
    }

    if !product.colors.contains(&payload.color) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Color {} is not offered for this product", payload.color)
            })),
        );
    }

    // Same (product, material, color) merges into the existing line.
    let existing = CartEntity::find()
        .filter(cart::Column::UserId.eq(claims.user_id))
        .filter(cart::Column::ProductId.eq(payload.product_id))
        .filter(cart::Column::Material.eq(&*payload.material))
        .filter(cart::Column::Color.eq(&*payload.color))
        .filter(cart::Column::IsCustom.eq(false))
        .one(&txn)
        .await;

    if let Ok(Some(entry)) = existing {
        let merged = entry.quantity + payload.quantity;
        let mut entry: cart::ActiveModel = entry.into();
        entry.quantity = Set(merged);
        return match entry.update(&txn).await {
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
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
            }
        };
    }

    let new_entry = cart::ActiveModel {
        user_id: Set(claims.user_id),
        product_id: Set(Some(product.id)),
        name: Set(product.name.clone()),
        material: Set(payload.material),
        color: Set(payload.color),
        unit_price: Set(product.price),
        quantity: Set(payload.quantity),
        is_custom: Set(false),
        ..Default::default()
    };

    match CartEntity::insert(new_entry).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Added successfully"
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
        },
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    }
}

async fn add_custom_print(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddCustomPrint>,
) -> impl IntoResponse {
    if payload.file_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Please upload a file first"
            })),
        );
    }

    if let Some(err) = payload.validate().err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Invalid custom print: {}", err)
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

    if !pricing::COLORS.iter().any(|color| color.name == payload.color) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Unknown color: {}", payload.color)
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

    // Custom uploads never merge; every quote gets its own line. The line
    // stores the single-unit quote so subtotal stays unit_price * quantity.
    let new_entry = cart::ActiveModel {
        user_id: Set(claims.user_id),
        product_id: Set(None),
        name: Set(format!("Custom Print: {}", payload.file_name.trim())),
        material: Set(payload.material),
        color: Set(payload.color),
        unit_price: Set(pricing::quote_price(material.multiplier, payload.infill, 1)),
        quantity: Set(payload.quantity.max(1)),
        is_custom: Set(true),
        ..Default::default()
    };

    match CartEntity::insert(new_entry).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Custom print added to cart"
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
        },
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    }
}

async fn patch_entry(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCart>,
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

    match CartEntity::find_by_id(id)
        .filter(cart::Column::UserId.eq(claims.user_id))
        .one(&txn)
        .await
    {
        Ok(Some(entry)) => {
            let mut entry: cart::ActiveModel = entry.into();

            // Dropping the quantity to zero removes the line.
            let result: Result<(), DbErr> = match payload.quantity {
                0 => entry.delete(&txn).await.map(|_| ()),
                quantity => {
                    entry.quantity = Set(quantity);
                    entry.update(&txn).await.map(|_| ())
                }
            };
            match result {
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
                        StatusCode::INTERNAL_SERVER_ERROR,
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
                "error": format!("No related entry with {} id was found.", id)
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

async fn remove_entry(
    Path(id): Path<i32>,
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    // Removal is idempotent: deleting an already-gone line is still a 200.
    match CartEntity::delete_many()
        .filter(cart::Column::Id.eq(id))
        .filter(cart::Column::UserId.eq(claims.user_id))
        .exec(&*db)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "message": "Resource deleted successfully"
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

async fn clear_cart(
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match CartEntity::delete_many()
        .filter(cart::Column::UserId.eq(claims.user_id))
        .exec(&*db)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "message": "Cart cleared"
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

async fn checkout(
    Extension(claims): Extension<Claims>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CheckoutPayload>,
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

    let entries = match CartEntity::find()
        .filter(cart::Column::UserId.eq(claims.user_id))
        .order_by_asc(cart::Column::Id)
        .all(&txn)
        .await
    {
        Ok(entries) => entries,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            );
        }
    };

    if entries.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Cart is empty"
            })),
        );
    }

    let subtotal: f32 = entries.iter().map(cart::Model::subtotal).sum();
    let shipping = pricing::shipping_fee(subtotal);
    let customer = payload.customer.unwrap_or_default();

    let new_order = order::ActiveModel {
        status: Set(Status::Pending),
        user_id: Set(Some(claims.user_id)),
        customer_name: Set(customer.name),
        customer_email: Set(customer.email),
        customer_address: Set(customer.address),
        customer_phone: Set(customer.phone),
        subtotal: Set(subtotal),
        shipping: Set(shipping),
        total: Set(subtotal + shipping),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let order_id = match OrderEntity::insert(new_order).exec(&txn).await {
        Ok(inserted) => inserted.last_insert_id,
        Err(_) => {
            let _ = txn.rollback().await;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let lines: Vec<order_item::ActiveModel> = entries
        .iter()
        .map(|entry| order_item::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(entry.product_id),
            name: Set(entry.name.clone()),
            material: Set(Some(entry.material.clone())),
            color: Set(Some(entry.color.clone())),
            unit_price: Set(entry.unit_price),
            quantity: Set(entry.quantity),
            ..Default::default()
        })
        .collect();

    if OrderItemEntity::insert_many(lines).exec(&txn).await.is_err() {
        let _ = txn.rollback().await;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        );
    }

    if CartEntity::delete_many()
        .filter(cart::Column::UserId.eq(claims.user_id))
        .exec(&txn)
        .await
        .is_err()
    {
        let _ = txn.rollback().await;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        );
    }

    let response = match load_order(&txn, order_id).await {
        Ok(Some(response)) => response,
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
        Ok(_) => (StatusCode::CREATED, Json(response)),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

#[derive(Serialize)]
struct CartResponse {
    items: Vec<cart::Model>,
    total_items: u32,
    subtotal: f32,
    shipping: f32,
    total: f32,
}

impl CartResponse {
    fn new(items: Vec<cart::Model>) -> CartResponse {
        let total_items = items.iter().map(|item| item.quantity).sum();
        let subtotal: f32 = items.iter().map(cart::Model::subtotal).sum();
        let shipping = if items.is_empty() {
            0.0
        } else {
            pricing::shipping_fee(subtotal)
        };

        CartResponse {
            total_items,
            subtotal,
            shipping,
            total: subtotal + shipping,
            items,
        }
    }
}

#[derive(Deserialize, Debug)]
struct AddProduct {
    product_id: i32,
    material: String,
    color: String,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

#[derive(Deserialize, Validate, Debug)]
struct AddCustomPrint {
    file_name: String,
    material: String,
    color: String,
    #[validate(range(min = 10, max = 100))]
    infill: u32,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

#[derive(Deserialize)]
struct PatchCart {
    quantity: u32,
}

#[derive(Deserialize, Default)]
struct CheckoutPayload {
    customer: Option<CustomerPayload>,
}

fn default_quantity() -> u32 {
    1
}
