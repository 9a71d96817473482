pub mod assets;
pub mod auth;
pub mod order;
pub mod product;
pub mod quote;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use assets::assets_router;
use auth::auth_router;
use order::order_router;
use product::product_router;
use quote::quote_router;

pub fn public_api_router(db: Arc<DatabaseConnection>) -> Router {
    let auth_router = auth_router(db.clone());
    let product_router = product_router(db.clone());
    let order_router = order_router(db.clone());

    Router::new()
        .merge(auth_router)
        .merge(product_router)
        .merge(order_router)
        .merge(quote_router())
        .merge(assets_router())
}
