pub mod text_only;
pub mod types;

pub use text_only::*;
pub use types::*;

use thiserror::Error;

/// Failures of the stage that turns a document into text. These are the
/// only errors the pipeline surfaces; structuring itself cannot fail.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
