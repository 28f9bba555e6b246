//! Text-only source: documents that already are OCR text (sidecar `.txt`
//! exports, fixtures). No PDF parsing involved.

use super::types::PdfTextSource;
use super::ExtractionError;

const UTF8_BOM: char = '\u{FEFF}';

/// Decode raw bytes as UTF-8 text, dropping a leading byte-order mark.
/// Invalid UTF-8 is an `Encoding` error; nothing is replaced lossily.
pub fn decode_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        tracing::warn!(valid_up_to = e.valid_up_to(), "Input is not valid UTF-8");
        ExtractionError::Encoding(e.to_string())
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}

/// Treats the "PDF" bytes as already-extracted UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl PdfTextSource for PlainTextSource {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        if pdf_bytes.starts_with(b"%PDF-") {
            tracing::warn!("PlainTextSource received a binary PDF");
            return Err(ExtractionError::UnsupportedFormat);
        }

        let text = decode_text(pdf_bytes)?;
        tracing::debug!(text_length = text.len(), "PlainTextSource: text decoded");
        Ok(text)
    }
}
