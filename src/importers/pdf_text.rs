// PDF text extraction behind a trait so readers can be tested without real PDFs

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::error::StatementError;

/// Source of plain text for a statement file
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Extracts the text layer of a PDF with `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        debug!("Extracting text from {:?}", path);
        let text = pdf_extract::extract_text(path).map_err(|e| StatementError::ExtractionError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(text)
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary
pub fn text_sample(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
