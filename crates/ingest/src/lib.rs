pub mod clauses;
pub mod document;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use clauses::{detect_clauses, ClauseCategory, ClauseMatch, ClauseTable};
pub use document::{extract_text, ExtractedDocument, ExtractionError, PageContent, UploadedDocument};
