mod pdf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0} (only PDF documents are accepted)")]
    UnsupportedType(String),
    #[error("could not open PDF: {0}")]
    Corrupt(String),
    #[error("PDF is encrypted or password-protected")]
    Encrypted,
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
}

/// A single uploaded file, owned by one analysis request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// The extracted text content, trimmed.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// Pages in the PDF container, including ones without text.
    pub page_count: usize,
    /// Pages that yielded text, in document order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated, one page per line block.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    /// No page yielded any text (likely a scanned or image-only PDF).
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Some text came out, but so little that the layout is probably off.
    pub fn is_sparse(&self, threshold: usize) -> bool {
        !self.is_empty() && self.total_chars() < threshold
    }
}

/// Returns true if the filename or the leading bytes identify a PDF.
pub fn is_pdf(filename: &str, head: &[u8]) -> bool {
    let ext = filename.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    ext.as_deref() == Some("pdf") || head.starts_with(b"%PDF-")
}

/// Extract text from an uploaded PDF.
///
/// An empty page list is a valid result, distinct from any error.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    if !is_pdf(filename, bytes) {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(ExtractionError::UnsupportedType(ext));
    }

    let (page_count, pages) = pdf::extract_pdf(bytes)?;

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        page_count,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pages: &[&str]) -> ExtractedDocument {
        ExtractedDocument {
            filename: "t.pdf".into(),
            page_count: pages.len(),
            pages: pages
                .iter()
                .enumerate()
                .map(|(i, t)| PageContent {
                    page_number: i + 1,
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn full_text_joins_pages_in_order() {
        let d = doc(&["first page", "second page"]);
        assert_eq!(d.full_text(), "first page\nsecond page");
        assert_eq!(d.total_chars(), 21);
    }

    #[test]
    fn empty_and_sparse_flags() {
        let empty = doc(&[]);
        assert!(empty.is_empty());
        assert!(!empty.is_sparse(50));

        let short = doc(&["Page 1"]);
        assert!(short.is_sparse(50));
        assert!(!short.is_sparse(3));
    }

    #[test]
    fn detects_pdf_by_extension_or_magic() {
        assert!(is_pdf("Contract.PDF", b""));
        assert!(is_pdf("upload", b"%PDF-1.7\n"));
        assert!(!is_pdf("notes.txt", b"hello"));
        assert!(!is_pdf("noext", b"hello"));
    }

    #[test]
    fn rejects_non_pdf_uploads() {
        let err = extract_text(b"plain words", "notes.txt").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "txt"));
    }
}
