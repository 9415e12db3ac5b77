use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// Line that opens the description block of a hotfix document
pub static DESCRIPTION_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)beschreibung").expect("Failed to compile description marker regex")
});

/// Separates the changelog id from the hotfix part of a mapping line
pub const MAPPING_MARKER: &str = ".hf";

pub const RTF_PARAGRAPH: &str = "\\par";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a text input file, see [`decode_text`].
pub fn read_text_file(path: &Path) -> io::Result<String> {
    fs::read(path).map(|bytes| decode_text(&bytes))
}

/// Decodes file content as UTF-8 without a leading byte order mark.
/// Invalid sequences become U+FFFD instead of failing the run.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Id of a hotfix file name or list line: everything before the first `.`,
/// unless the `.` leads the text.
pub fn extract_hotfix_id(name: &str) -> &str {
    match name.find('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hotfix_id() {
        assert_eq!(extract_hotfix_id("hf0042.rtf"), "hf0042");
        assert_eq!(extract_hotfix_id("hf0042.backup.rtf"), "hf0042");
        assert_eq!(extract_hotfix_id("hf0042"), "hf0042");
        assert_eq!(extract_hotfix_id(".hidden"), ".hidden");
    }

    #[test]
    fn test_decode_text_strips_bom_and_replaces_invalid_bytes() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFid1.hf0001.sql"), "id1.hf0001.sql");
        assert_eq!(decode_text(b"stra\xDFe"), "stra\u{FFFD}e");
        assert_eq!(decode_text(b"a\xEF\xBB\xBFb"), "a\u{FEFF}b");
    }

    #[test]
    fn test_description_marker_ignores_case() {
        assert!(DESCRIPTION_MARKER_PATTERN.is_match(r"\b BESCHREIBUNG:\b0\par"));
        assert!(DESCRIPTION_MARKER_PATTERN.is_match("Kurzbeschreibung"));
        assert!(!DESCRIPTION_MARKER_PATTERN.is_match("Description"));
    }
}
