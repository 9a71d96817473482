use axum::{
    extract::Path,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::middleware::logging::{to_response, ApiError};

// Plain file names only, so a path can never escape the asset directories.
static FILE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("file name regex"));

pub fn assets_router() -> Router {
    Router::new()
        .route("/assets/:file_name", get(serve_asset))
        .route("/uploads/:file_name", get(serve_upload))
}

async fn serve_asset(Path(file_name): Path<String>) -> Response {
    stream_file("./assets", &file_name).await
}

async fn serve_upload(Path(file_name): Path<String>) -> Response {
    stream_file("./uploads", &file_name).await
}

async fn stream_file(directory: &str, file_name: &str) -> Response {
    if !FILE_NAME_REGEX.is_match(file_name) {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid file name. It should contain only Latin letters, numbers, '.', '-', or '_'."
                })),
            ),
            Err(ApiError::ValidationFail("Regex match failed".to_owned())),
        );
    }

    let path = format!("{}/{}", directory, file_name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(err) => {
            return to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "Not found"
                    })),
                ),
                Err(ApiError::General(err.to_string())),
            );
        }
    };

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    to_response((headers, body), Ok(()))
}
