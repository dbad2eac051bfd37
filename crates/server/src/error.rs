//! Error types for the validation endpoint

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cupom_ocr::PipelineError;
use thiserror::Error;

use crate::response::ValidationResponse;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file field in upload")]
    MissingFile,

    #[error("Malformed multipart upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Receipt processing failed: {0}")]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFile => {
                tracing::warn!("No file field found in multipart upload");
                (StatusCode::BAD_REQUEST, "Nenhum arquivo enviado.")
            }
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("Upload exceeds body limit: {}", e);
                (StatusCode::PAYLOAD_TOO_LARGE, UPLOAD_TOO_LARGE)
            }
            AppError::Multipart(e) => {
                tracing::error!("Failed to read multipart upload: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
            }
            AppError::Pipeline(e) => {
                tracing::error!("Receipt pipeline error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
            }
        };

        (status, Json(ValidationResponse::failure(message))).into_response()
    }
}

const PROCESSING_FAILED: &str = "Erro ao processar a imagem da nota fiscal.";
const UPLOAD_TOO_LARGE: &str = "Arquivo muito grande para processamento.";
