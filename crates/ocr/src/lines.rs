/// Split raw OCR text into trimmed, non-empty lines, top to bottom.
///
/// Accepts `\n`, `\r\n` and bare `\r` breaks. Case and punctuation are left alone.
pub fn normalize(raw: &str) -> Vec<&str> {
    raw.split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
