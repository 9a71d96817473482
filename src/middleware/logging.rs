use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();

    match response.extensions().get::<Result<(), ApiError>>() {
        Some(Ok(())) | None => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request"
        ),
        Some(Err(cause)) => error!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            cause = %cause,
            "Failed to process request"
        ),
    }

    response
}

/// Handler-side failure cause, carried to the logging middleware through the
/// response extensions. Clients only ever see the JSON error body.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    General(String),
    #[error("Failed to validate: {0}")]
    ValidationFail(String),
}

pub fn to_response<T: IntoResponse>(
    response: T,
    ext: Result<(), ApiError>,
) -> Response {
    let mut response = response.into_response();

    response.extensions_mut().insert(ext);

    response
}
