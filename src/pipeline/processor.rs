//! Document processing entry points: text source → form structurer.
//!
//! The PDF-to-text step stays behind `PdfTextSource` so every path here is
//! testable with a mock source. Only that step can fail; once text exists
//! the structurer always produces a record.

use std::path::Path;

use crate::models::MedicalRecord;
use crate::pipeline::extraction::{decode_text, ExtractionError, PdfTextSource};
use crate::pipeline::structuring::FormStructurer;

/// Run the text source over `pdf_bytes`, then structure the result.
/// Source errors propagate unchanged.
pub fn process_pdf<S: PdfTextSource + ?Sized>(
    source: &S,
    structurer: &FormStructurer,
    pdf_bytes: &[u8],
) -> Result<MedicalRecord, ExtractionError> {
    tracing::info!(input_bytes = pdf_bytes.len(), "Processing: starting extraction");

    let text = source.extract_text(pdf_bytes).map_err(|e| {
        tracing::warn!(error = %e, "Processing: extraction failed");
        e
    })?;

    tracing::info!(
        text_length = text.chars().count(),
        "Processing: starting structuring"
    );
    Ok(structurer.structure(&text))
}

/// Structure already-extracted OCR text given as raw bytes.
pub fn process_text(
    structurer: &FormStructurer,
    bytes: &[u8],
) -> Result<MedicalRecord, ExtractionError> {
    let text = decode_text(bytes)?;
    Ok(structurer.structure(&text))
}

/// Read a document from disk and run it through `process_pdf`.
pub fn process_file<S: PdfTextSource + ?Sized>(
    source: &S,
    structurer: &FormStructurer,
    path: &Path,
) -> Result<MedicalRecord, ExtractionError> {
    let bytes = std::fs::read(path)?;
    process_pdf(source, structurer, &bytes)
}
