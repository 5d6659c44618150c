//! PDF text extraction using the pdf-extract crate.
//! Handles digital PDFs with embedded text layers.

use std::path::Path;

use super::{DocumentError, ReportExtractor};

pub struct PdfReportExtractor;

impl ReportExtractor for PdfReportExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| DocumentError::Parsing(e.to_string()))?;

        let report = normalize_report_text(pages);
        if report.trim().is_empty() {
            return Err(DocumentError::EmptyContent);
        }

        Ok(report)
    }
}

/// Join pages and collapse blank-line runs so lab tables read contiguously.
fn normalize_report_text(pages: Vec<String>) -> String {
    let mut report = String::new();
    for page in pages {
        let mut content = page;
        while content.contains("\n\n") {
            content = content.replace("\n\n", "\n");
        }
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            report.push_str(trimmed);
            report.push('\n');
        }
    }
    report
}
