/// Decode plain text, falling back to lossy UTF-8 conversion.
pub(crate) fn extract_txt(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
        .trim()
        .to_string()
}
