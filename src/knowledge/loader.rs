use anyhow::{Context, Result};
use std::path::Path;

/// Page separator used in plain text documents
const FORM_FEED: char = '\x0c';

/// Extract per-page text from a document
/// Pages without extractable text come back as empty strings.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Document not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf_pages(path),
        "txt" | "md" | "text" => extract_text_pages(path),
        other => anyhow::bail!(
            "Unsupported document type '{}' for {} (expected pdf, txt or md)",
            other,
            path.display()
        ),
    }
}

fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    pdf_extract::extract_text_by_pages(path)
        .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {}", path.display(), e))
}

fn extract_text_pages(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content.split(FORM_FEED).map(|p| p.to_string()).collect())
}
