pub mod amount;
pub mod config;
pub mod extract;
pub mod lines;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod store;
pub mod types;

pub use amount::{Tier, ValueExtractor};
pub use config::{ConfigError, ExtractionConfig};
pub use extract::Extractor;
pub use pipeline::{PipelineError, ReceiptPipeline, ValidationReport};
pub use preprocess::{prepare_for_ocr_from_bytes, PreprocessError, PreprocessOptions};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use store::StoreNameResolver;
pub use types::Extraction;
