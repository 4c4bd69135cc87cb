//! Text extraction: turns uploaded document bytes into plain text.
//!
//! PDF input runs through a degrading chain of strategies, short-circuiting
//! on the first non-empty result:
//!   1. lopdf per-page structured extraction (failed pages are skipped)
//!   2. pdf-extract whole-document parse (catches lopdf-specific failures)
//!   3. rasterize every page via pdfium and OCR each image with tesseract
//!
//! Each stage runs to completion before falling to the next; stages are
//! never mixed within one document. DOCX has a single reliable structured
//! representation and no fallback chain.
//!
//! Total failure returns the empty string, never an error; "no text" is a
//! first-class outcome the request layer maps to a user-facing error.

mod docx;
mod ocr;
mod pdf;

use tracing::{info, warn};

/// Declared format of an uploaded document, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps a filename to a format. Unknown or missing extensions are
    /// treated as PDF, matching the upload form's behavior.
    pub fn from_filename(name: &str) -> Self {
        match name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "docx" => DocumentFormat::Docx,
            _ => DocumentFormat::Pdf,
        }
    }
}

/// Stateless extractor carrying only deployment configuration for the
/// rasterizer stage.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    pdfium_lib_path: Option<String>,
}

impl TextExtractor {
    pub fn new(pdfium_lib_path: Option<String>) -> Self {
        Self { pdfium_lib_path }
    }

    /// Extracts plain text from document bytes.
    ///
    /// Never fails for a supported format: returns an empty string when
    /// every strategy is exhausted.
    pub fn extract(&self, bytes: &[u8], format: DocumentFormat) -> String {
        match format {
            DocumentFormat::Pdf => self.extract_pdf(bytes),
            DocumentFormat::Docx => match docx::extract_paragraphs(bytes) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!("DOCX extraction failed: {e}");
                    String::new()
                }
            },
        }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> String {
        // Stage 1: structured per-page extraction, tolerant of bad pages.
        match pdf::extract_per_page(bytes) {
            Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
            Ok(_) => info!("lopdf extraction yielded no text, trying pdf-extract"),
            Err(e) => warn!("lopdf extraction failed: {e}"),
        }

        // Stage 2: independent whole-document parser.
        match pdf::extract_whole_document(bytes) {
            Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
            Ok(_) => info!("pdf-extract yielded no text, document may be scanned"),
            Err(e) => warn!("pdf-extract failed: {e}"),
        }

        // Stage 3: rasterize and OCR. The document is likely image-based.
        match ocr::ocr_pdf(bytes, self.pdfium_lib_path.as_deref()) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("OCR yielded no text; all extraction strategies exhausted");
                String::new()
            }
            Err(e) => {
                warn!("OCR stage failed: {e}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("resume.pdf"),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("resume.DOCX"),
            DocumentFormat::Docx
        );
        // Unknown and missing extensions default to PDF.
        assert_eq!(
            DocumentFormat::from_filename("resume.txt"),
            DocumentFormat::Pdf
        );
        assert_eq!(DocumentFormat::from_filename("resume"), DocumentFormat::Pdf);
    }

    #[test]
    fn test_garbage_pdf_bytes_yield_empty_text() {
        // All three stages fail on non-PDF bytes; the contract is an empty
        // string, not an error.
        let extractor = TextExtractor::default();
        let text = extractor.extract(b"this is not a pdf", DocumentFormat::Pdf);
        assert_eq!(text, "");
    }

    #[test]
    fn test_garbage_docx_bytes_yield_empty_text() {
        let extractor = TextExtractor::default();
        let text = extractor.extract(b"this is not a zip archive", DocumentFormat::Docx);
        assert_eq!(text, "");
    }
}
