//! Structured PDF text extraction, stages 1 and 2 of the chain.

use tracing::warn;

/// Stage 1: per-page extraction with lopdf.
///
/// A page whose text layer fails to parse is logged and skipped; the loop
/// continues so a single corrupt page does not abort the document.
pub(crate) fn extract_per_page(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let doc = lopdf::Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
    page_numbers.sort_unstable();

    let mut text = String::new();
    for number in page_numbers {
        match doc.extract_text(&[number]) {
            Ok(page_text) => {
                if !page_text.trim().is_empty() {
                    text.push_str(page_text.trim_end());
                    text.push('\n');
                }
            }
            Err(e) => {
                warn!("skipping page {number}: text extraction failed: {e}");
            }
        }
    }

    Ok(text)
}

/// Stage 2: whole-document extraction with the pdf-extract parser.
///
/// Independent of lopdf's content-stream handling, so it recovers some
/// malformed PDFs the per-page stage cannot read at all.
pub(crate) fn extract_whole_document(bytes: &[u8]) -> Result<String, pdf_extract::OutputError> {
    pdf_extract::extract_text_from_mem(bytes)
}
