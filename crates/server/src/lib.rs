//! HTTP front end for receipt minimum-spend validation.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

use cupom_ocr::{Extractor, OcrBackend, ReceiptPipeline};
use std::sync::Arc;

pub use config::Config;
pub use routes::router;
pub use state::AppState;

/// Wire the pipeline described by `config` around the given OCR engine.
pub fn build_state(config: &Config, recognizer: Box<dyn OcrBackend>) -> anyhow::Result<AppState> {
    let extractor = Extractor::new(config.extraction()?)?;
    let pipeline = ReceiptPipeline::new(recognizer, Arc::new(extractor))
        .with_preprocess(config.ocr.preprocess)
        .with_ocr_timeout(config.ocr.timeout);
    Ok(AppState::new(pipeline))
}

/// The OCR engine this binary was built with.
#[cfg(feature = "tesseract")]
pub fn default_recognizer(config: &Config) -> Box<dyn OcrBackend> {
    use cupom_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    Box::new(TesseractRecognizer::new(config.ocr.data_path.clone(), &config.ocr.lang))
}

/// The OCR engine this binary was built with.
#[cfg(not(feature = "tesseract"))]
pub fn default_recognizer(_config: &Config) -> Box<dyn OcrBackend> {
    tracing::warn!("Built without the `tesseract` feature; every upload will fail OCR");
    Box::new(cupom_ocr::UnavailableRecognizer)
}
