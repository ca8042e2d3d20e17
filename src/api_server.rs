// Axum HTTP layer for the docx generation service.
//
// The HTTP surface only marshals bytes in and out: handlers read the raw body,
// call the pure normalize/render pipeline, and translate its errors into
// status codes. No state is shared between requests.

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::normalizer::{normalize, NormalizeError};
use crate::renderer::{render, RenderError, DOCX_MIME};

// ============================================================================
// Router
// ============================================================================

pub fn create_router() -> Router {
    Router::new()
        // Health check
        .route("/", get(health_check))
        // Document generation
        .route("/generate-docx", post(generate_docx))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> &'static str {
    "Docx Generator is running!"
}

async fn generate_docx(body: Bytes) -> Result<Response, AppError> {
    let request = normalize(&body)?;

    tracing::info!(
        "generating document '{}' for '{}' ({} sections)",
        request.title,
        request.student_name,
        request.content.len()
    );

    let doc = render(&request)?;

    tracing::debug!("serialized {} bytes as {}", doc.bytes.len(), doc.filename);

    let headers = [
        (header::CONTENT_TYPE, DOCX_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.filename),
        ),
    ];

    Ok((headers, doc.bytes).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
