use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;

use printforge::api::create_api_router;
use printforge::entities::{seed_database, setup_schema};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db: DatabaseConnection = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    setup_schema(&db).await;

    let shared_db = Arc::new(db);

    seed_database(shared_db.clone()).await;

    let app = create_api_router(shared_db);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind listener");
    info!(port, "printforge backend listening");
    axum::serve(listener, app).await.expect("Server error");
}
