use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    order::{self, Entity as OrderEntity, Status},
    order_item::{self, Entity as OrderItemEntity},
    product::Entity as ProductEntity,
};
use crate::pricing;

pub fn order_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .layer(Extension(db))
}

async fn create_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateOrder>,
) -> impl IntoResponse {
    if payload.items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Order must have items"
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

    // Unit prices come from the catalog for known products; only custom
    // print lines carry a client-side (quoted) price. Totals are always
    // recomputed here.
    let mut lines: Vec<order_item::ActiveModel> = Vec::with_capacity(payload.items.len());
    let mut subtotal: f32 = 0.0;

    for item in &payload.items {
        if item.quantity == 0 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Quantity should be greater than 0"
                })),
            );
        }

        let (name, unit_price) = match item.product_id {
            Some(product_id) => match ProductEntity::find_by_id(product_id).one(&txn).await {
                Ok(Some(product)) => (product.name, product.price),
                Ok(None) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": format!("No product with {} id was found", product_id)
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
            },
            None => {
                let price = match item.price {
                    Some(price) if price > 0.0 => price,
                    _ => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": "Custom items must include a positive price"
                            })),
                        );
                    }
                };
                let name = item
                    .name
                    .clone()
                    .unwrap_or_else(|| "Custom Print".to_owned());
                (name, price)
            }
        };

        subtotal += unit_price * item.quantity as f32;
        lines.push(order_item::ActiveModel {
            product_id: Set(item.product_id),
            name: Set(name),
            material: Set(item.material.clone()),
            color: Set(item.color.clone()),
            unit_price: Set(unit_price),
            quantity: Set(item.quantity),
            ..Default::default()
        });
    }

    let shipping = pricing::shipping_fee(subtotal);
    let customer = payload.customer.unwrap_or_default();

    let new_order = order::ActiveModel {
        status: Set(Status::Pending),
        user_id: Set(None),
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

    for line in &mut lines {
        line.order_id = Set(order_id);
    }

    if OrderItemEntity::insert_many(lines).exec(&txn).await.is_err() {
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

async fn get_order(
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

    match load_order(&txn, id).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not found"
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

/// Order plus its line items, serialized the way the storefront expects.
pub(crate) async fn load_order<C: sea_orm::ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<serde_json::Value>, sea_orm::DbErr> {
    let order = match OrderEntity::find_by_id(id).one(conn).await? {
        Some(order) => order,
        None => return Ok(None),
    };

    let items = OrderItemEntity::find()
        .filter(order_item::Column::OrderId.eq(id))
        .order_by_asc(order_item::Column::Id)
        .all(conn)
        .await?;

    let mut value = serde_json::to_value(&order).unwrap_or_else(|_| json!({}));
    value["items"] = json!(items);
    Ok(Some(value))
}

#[derive(Deserialize, Debug)]
struct CreateOrder {
    items: Vec<OrderItemPayload>,
    customer: Option<CustomerPayload>,
}

#[derive(Deserialize, Debug)]
struct OrderItemPayload {
    product_id: Option<i32>,
    name: Option<String>,
    material: Option<String>,
    color: Option<String>,
    #[serde(default = "default_quantity")]
    quantity: u32,
    price: Option<f32>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}
