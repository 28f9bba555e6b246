use super::ExtractionError;

/// PDF-to-text abstraction (allows mocking for tests).
///
/// Implementations run OCR or read the text layer; the structurer only ever
/// sees the returned string.
pub trait PdfTextSource {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError>;
}

impl<S: PdfTextSource + ?Sized> PdfTextSource for &S {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        (**self).extract_text(pdf_bytes)
    }
}

impl<S: PdfTextSource + ?Sized> PdfTextSource for Box<S> {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        (**self).extract_text(pdf_bytes)
    }
}
