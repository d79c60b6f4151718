/// Decode source code bytes.
///
/// Parsing happens in the structural segmenter; the reader only decodes
/// and preserves the source byte-for-byte apart from a trailing trim.
pub(crate) fn extract_code(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
        .trim_end()
        .to_string()
}
