//! Payload rendering as hex plus best-effort ASCII.

/// Marker for zero-length payloads. Consumers rely on the payload text
/// never being empty.
pub const NO_PAYLOAD: &str = "No payload";

/// Render payload bytes for display.
///
/// Non-empty payloads always get an uppercase, space-separated hex line.
/// An ASCII line is added when the bytes look like single-byte text: CR,
/// LF, and TAB are escaped to `\r`, `\n`, `\t`, bytes above 0x7F decode
/// to `?`, and any remaining control character disqualifies the text
/// form. This is a best-effort classification, not a correctness
/// guarantee; high-bit bytes are not separately validated.
pub fn render(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return NO_PAYLOAD.to_string();
    }

    let hex = bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");

    let ascii: String = bytes
        .iter()
        .map(|&b| match b {
            b'\r' => "\\r".to_string(),
            b'\n' => "\\n".to_string(),
            b'\t' => "\\t".to_string(),
            // Single-byte ASCII decode: anything past 0x7F becomes '?'
            b if b >= 0x80 => "?".to_string(),
            _ => (b as char).to_string(),
        })
        .collect();

    // CR, LF, and TAB were escaped above; any control character left in
    // the text interpretation means the payload is probably not text.
    if ascii.chars().any(|c| c.is_control()) {
        format!("Hex: {}", hex)
    } else {
        format!("ASCII: {}\nHex: {}", ascii, hex)
    }
}
