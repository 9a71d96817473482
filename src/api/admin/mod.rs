pub mod order;
pub mod product;
pub mod upload;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use order::admin_order_router;
use product::admin_product_router;
use upload::upload_router;

use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};

pub fn admin_api_router(db: Arc<DatabaseConnection>) -> Router {
    let admin_product_router = admin_product_router(db.clone());
    let admin_order_router = admin_order_router(db.clone());
    let upload_router = upload_router();

    Router::new()
        .merge(admin_product_router)
        .merge(admin_order_router)
        .merge(upload_router)
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Role::Admin,
            },
            auth_middleware,
        ))
}
