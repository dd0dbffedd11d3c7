use anyhow::Result;

/// Pulls plain text out of an uploaded PDF. An `Ok` empty string means the
/// document carried no extractable text, which callers report separately
/// from a read failure.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("PDF extraction failed: {e}"))?;
    Ok(text.trim().to_string())
}
