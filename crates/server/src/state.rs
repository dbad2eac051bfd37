use std::sync::Arc;

use cupom_core::Money;
use cupom_ocr::{OcrBackend, ReceiptPipeline};

pub type DynPipeline = ReceiptPipeline<Box<dyn OcrBackend>>;

/// Shared across handlers; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<DynPipeline>,
}

impl AppState {
    pub fn new(pipeline: DynPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }

    pub fn pipeline(&self) -> &DynPipeline {
        &self.pipeline
    }

    pub fn minimum(&self) -> Money {
        self.pipeline.extractor().minimum()
    }
}
