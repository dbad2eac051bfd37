use std::sync::Arc;
use std::time::Duration;

use cupom_core::ValidationDecision;
use thiserror::Error;

use crate::extract::Extractor;
use crate::preprocess::{self, PreprocessOptions};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::Extraction;

const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(30);
const PREVIEW_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("OCR did not finish within {0:?}")]
    Timeout(Duration),
    #[error("OCR worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// The result of a single receipt validation run.
#[derive(Debug)]
pub struct ValidationReport {
    /// Raw OCR text output.
    pub ocr_text: String,
    pub extraction: Extraction,
    pub decision: ValidationDecision,
}

/// Orchestrates: preprocess → OCR → extract → decide.
pub struct ReceiptPipeline<R: OcrBackend + 'static> {
    recognizer: Arc<R>,
    extractor: Arc<Extractor>,
    preprocess: PreprocessOptions,
    ocr_timeout: Duration,
}

impl<R: OcrBackend + 'static> ReceiptPipeline<R> {
    pub fn new(recognizer: R, extractor: Arc<Extractor>) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            extractor,
            preprocess: PreprocessOptions::default(),
            ocr_timeout: DEFAULT_OCR_TIMEOUT,
        }
    }

    pub fn with_preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Process an uploaded image (camera capture or gallery file).
    ///
    /// Preprocessing and OCR run on the blocking pool. On timeout the blocking
    /// task is detached, not cancelled; it finishes in the background.
    pub async fn process_bytes(&self, data: &[u8]) -> Result<ValidationReport, PipelineError> {
        let ocr_text = self.recognize(data.to_vec()).await?;

        tracing::debug!(
            preview = %ocr_text.chars().take(PREVIEW_CHARS).collect::<String>(),
            "OCR raw text"
        );

        let extraction = self.extractor.extract_detailed(&ocr_text);
        let decision = self.extractor.decide(&extraction.result);

        tracing::info!(
            store = %extraction.result.store_name,
            value = %extraction.result.value,
            tier = ?extraction.tier,
            outcome = %decision,
            "Receipt extracted"
        );

        Ok(ValidationReport { ocr_text, extraction, decision })
    }

    async fn recognize(&self, data: Vec<u8>) -> Result<String, PipelineError> {
        let recognizer = Arc::clone(&self.recognizer);
        let options = self.preprocess;

        let job = tokio::task::spawn_blocking(move || -> Result<String, PipelineError> {
            let image_bytes = preprocess::prepare_for_ocr_from_bytes(&data, options)?;
            Ok(recognizer.recognize(&image_bytes)?)
        });

        match tokio::time::timeout(self.ocr_timeout, job).await {
            Ok(joined) => joined?,
            Err(_) => {
                tracing::warn!(timeout = ?self.ocr_timeout, "OCR timed out");
                Err(PipelineError::Timeout(self.ocr_timeout))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
