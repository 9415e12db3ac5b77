use crate::error::ResultExt;
use crate::types::{HotfixMapping, Result};
use crate::utils::{MAPPING_MARKER, read_text_file};
use std::path::Path;
use tracing::{debug, warn};

/// Reads the mapping file that links changelog entry ids to hotfix ids.
pub fn read_mapping(path: &Path) -> Result<HotfixMapping> {
    let content = read_text_file(path).with_path_context("Failed to read mapping file", path)?;
    let mapping = parse_mapping(&content)?;
    debug!(count = mapping.len(), path = %path.display(), "read hotfix mapping");
    Ok(mapping)
}

/// Parses `<changelog id>.hf<hotfix id>.<ext>` lines.
///
/// The hotfix id is the text between the marker and the last `.`, so
/// `foo123.hf0042.sql` maps `foo123` to `0042`. Hotfix files must be named
/// by that bare id (`0042.rtf`, not `hf0042.rtf`) for the entry to match.
///
/// Lines without the `.hf` marker are logged and skipped; a changelog id
/// mapped twice is an error.
pub fn parse_mapping(content: &str) -> Result<HotfixMapping> {
    let mut mapping = HotfixMapping::new();

    for (index, line) in content.lines().enumerate() {
        let line_num = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_mapping_line(line) {
            Some((changelog_id, hotfix_id)) => {
                mapping.insert(changelog_id, hotfix_id, line_num)?;
            }
            None => warn!(line = line_num, content = line, "Failed to find hotfix in mapping line"),
        }
    }

    Ok(mapping)
}

/// Splits a single mapping line into (changelog id, hotfix id).
pub fn parse_mapping_line(line: &str) -> Option<(&str, &str)> {
    let index = line.find(MAPPING_MARKER).filter(|&index| index > 0)?;

    let changelog_id = &line[..index];
    let rest = &line[index + MAPPING_MARKER.len()..];
    let hotfix_id = rest.rfind('.').map_or(rest, |end| &rest[..end]);

    Some((changelog_id, hotfix_id))
}
