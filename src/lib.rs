pub mod config;
pub mod logging;
pub mod models;
pub mod pipeline;

pub use logging::init_tracing;
pub use models::MedicalRecord;
pub use pipeline::extraction::{decode_text, ExtractionError, PdfTextSource, PlainTextSource};
pub use pipeline::processor::{process_file, process_pdf, process_text};
pub use pipeline::structuring::{ConfigError, FormConfig, FormStructurer, Vocabulary};
