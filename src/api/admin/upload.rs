use axum::{
    extract::Multipart,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde_json::json;
use tokio::fs as tokio_fs;
use uuid::Uuid;

use crate::middleware::logging::{to_response, ApiError};

const UPLOAD_DIR: &str = "./uploads";
const FILE_SIZE_LIMIT: usize = 5 * 1024 * 1024;

pub fn upload_router() -> Router {
    Router::new().route("/images", post(upload))
}

async fn upload(mut multipart: Multipart) -> Response {
    let field = match multipart.next_field().await.unwrap_or(None) {
        Some(field) => field,
        None => {
            let tmp = "Multipart field is missing";
            return to_response(
                (StatusCode::BAD_REQUEST, Json(json!({ "error": tmp }))),
                Err(ApiError::General(tmp.to_owned())),
            );
        }
    };

    let content_type = match field.content_type() {
        Some(content_type) => content_type.to_owned(),
        None => {
            let tmp = "Content type is not set.";
            return to_response(
                (StatusCode::BAD_REQUEST, Json(json!({ "error": tmp }))),
                Err(ApiError::General(tmp.to_owned())),
            );
        }
    };

    let extension = match content_type.as_str() {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        _ => {
            let tmp = "Unsupported content type.";
            return to_response(
                (StatusCode::BAD_REQUEST, Json(json!({ "error": tmp }))),
                Err(ApiError::General(tmp.to_owned())),
            );
        }
    };

    let data = match field.bytes().await {
        Ok(data) => data,
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to read file bytes."
                    })),
                ),
                Err(ApiError::General(format!("Multipart error: {err}"))),
            );
        }
    };

    if data.len() > FILE_SIZE_LIMIT {
        let tmp = "Payload too large";
        return to_response(
            (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "error": tmp }))),
            Err(ApiError::General(tmp.to_owned())),
        );
    }

    if tokio_fs::create_dir_all(UPLOAD_DIR).await.is_err() {
        let tmp = "Failed to prepare upload directory";
        return to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": tmp })),
            ),
            Err(ApiError::General(tmp.to_owned())),
        );
    }

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    match tokio_fs::write(format!("{}/{}", UPLOAD_DIR, file_name), data).await {
        Ok(_) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "File uploaded successfully.",
                    "file": file_name
                })),
            ),
            Ok(()),
        ),
        Err(err) => to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to upload file to the server"
                })),
            ),
            Err(ApiError::General(err.to_string())),
        ),
    }
}
