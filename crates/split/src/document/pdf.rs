use super::ExtractionError;

/// Extract page texts from PDF bytes.
///
/// `pdf-extract` returns the whole document as one string with form
/// feed characters (`\x0C`) between pages. A PDF that yields no text
/// (scanned/image-only) degrades to zero pages — the caller treats
/// that as an empty document, not a failure.
pub(crate) fn extract_pdf(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    if text.trim().is_empty() {
        tracing::warn!("PDF produced no extractable text (scanned or image-only?)");
        return Ok(Vec::new());
    }

    let pages: Vec<String> = if text.contains('\x0C') {
        text.split('\x0C')
            .map(str::trim)
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![text.trim().to_string()]
    };

    Ok(pages)
}
