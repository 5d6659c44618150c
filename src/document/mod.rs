//! Document-access boundary — upload staging and report text extraction.

pub mod pdf;
pub mod staging;

pub use pdf::PdfReportExtractor;
pub use staging::StagedReport;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("document contains no extractable text")]
    EmptyContent,

    #[error("PDF parsing failed: {0}")]
    Parsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text extraction over a document reference.
///
/// The pipeline resolves every document through this seam, which lets
/// tests substitute in-memory reports for real files.
pub trait ReportExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError>;
}

/// Magic-byte check: every PDF starts with `%PDF-`.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.len() >= 5 && &bytes[0..5] == b"%PDF-"
}
