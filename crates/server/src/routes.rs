//! Receipt validation endpoints

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{AppError, Result};
use crate::response::{ApprovalStamp, ValidationResponse};
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/validate", post(validate_receipt))
        // Enforced while the multipart stream is read, so oversize uploads
        // surface as `AppError::Multipart` and get the JSON error body.
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Validate an uploaded receipt photo against the minimum spend.
async fn validate_receipt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ValidationResponse>> {
    let data = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(AppError::MissingFile);
        };
        if field.name() == Some("file") {
            tracing::debug!(
                filename = ?field.file_name(),
                content_type = ?field.content_type(),
                "Received receipt upload"
            );
            break field.bytes().await?;
        }
    };

    if data.is_empty() {
        return Err(AppError::MissingFile);
    }

    tracing::info!("Starting OCR for {} byte upload", data.len());
    let report = state.pipeline().process_bytes(&data).await?;

    Ok(Json(ValidationResponse::from_decision(
        &report.decision,
        state.minimum(),
        ApprovalStamp::now,
    )))
}
