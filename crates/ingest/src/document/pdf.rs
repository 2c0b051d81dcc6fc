use std::panic::{self, AssertUnwindSafe};

use super::{ExtractionError, PageContent};

/// Extract per-page text from PDF bytes.
///
/// Returns the container's page count and the pages that produced text.
/// Scanned/image PDFs yield an empty page list, not an error.
pub fn extract_pdf(bytes: &[u8]) -> Result<(usize, Vec<PageContent>), ExtractionError> {
    // Open the container first so corrupt input is reported as such.
    let doc = pdf_extract::Document::load_mem(bytes).map_err(|e| {
        let msg = e.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("encrypt") || lower.contains("decrypt") || lower.contains("password") {
            ExtractionError::Encrypted
        } else {
            ExtractionError::Corrupt(msg)
        }
    })?;
    let page_count = doc.get_pages().len();
    let encrypted = doc.trailer.get(b"Encrypt").is_ok();

    let page_texts = extract_pages(bytes, encrypted)?;

    let pages: Vec<PageContent> = page_texts
        .iter()
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect();

    if pages.is_empty() {
        tracing::info!(page_count, "PDF opened but contains no extractable text");
    } else {
        tracing::debug!(page_count, text_pages = pages.len(), "PDF text extracted");
    }
    Ok((page_count, pages))
}

/// Run pdf-extract page by page.
///
/// pdf-extract panics on some malformed content streams (e.g. a font missing
/// from the page resources); that is reported as a corrupt document.
fn extract_pages(bytes: &[u8], encrypted: bool) -> Result<Vec<String>, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(_)) if encrypted => Err(ExtractionError::Encrypted),
        Ok(Err(e)) => Err(ExtractionError::PdfError(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "text extraction aborted".to_string());
            tracing::warn!(%reason, "PDF text extraction panicked");
            Err(ExtractionError::Corrupt(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{extract_text, ExtractionError};
    use crate::fixtures::{blank_pdf, missing_font_pdf, text_pdf};

    #[test]
    fn extracts_single_page_text() {
        let bytes = text_pdf(&["Either party may terminate this agreement"]);
        let doc = extract_text(&bytes, "contract.pdf").unwrap();
        assert_eq!(doc.page_count, 1);
        assert!(!doc.is_empty());
        assert!(doc.full_text().contains("terminate this agreement"));
    }

    #[test]
    fn concatenates_pages_in_document_order() {
        let bytes = text_pdf(&["Alpha clause", "Middle clause", "Omega clause"]);
        let doc = extract_text(&bytes, "multi.pdf").unwrap();
        assert_eq!(doc.page_count, 3);

        let text = doc.full_text();
        let alpha = text.find("Alpha").unwrap();
        let middle = text.find("Middle").unwrap();
        let omega = text.find("Omega").unwrap();
        assert!(alpha < middle && middle < omega);
    }

    #[test]
    fn pages_are_separated_in_full_text() {
        let bytes = text_pdf(&["Alpha", "Omega"]);
        let doc = extract_text(&bytes, "two.pdf").unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].page_number, 2);
        assert_eq!(doc.full_text(), "Alpha\nOmega");
    }

    #[test]
    fn missing_font_resource_is_corrupt_not_a_panic() {
        let bytes = missing_font_pdf("Either party may terminate");
        let err = extract_text(&bytes, "broken.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Corrupt(_)));
    }

    #[test]
    fn image_only_pdf_is_empty_not_error() {
        let bytes = blank_pdf(2);
        let doc = extract_text(&bytes, "scan.pdf").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.full_text(), "");
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn corrupt_bytes_are_an_extraction_error() {
        let err = extract_pdf(b"%PDF-1.4\nthis is not really a pdf").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Corrupt(_) | ExtractionError::Encrypted
        ));
    }

    #[test]
    fn garbage_with_pdf_name_is_corrupt() {
        let err = extract_text(b"\x00\x01\x02garbage", "fake.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Corrupt(_)));
    }
}
