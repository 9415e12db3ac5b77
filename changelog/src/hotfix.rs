use crate::error::{ChangelogError, ResultExt};
use crate::types::{HotfixRecord, Result, sort_hotfixes};
use crate::utils::{DESCRIPTION_MARKER_PATTERN, RTF_PARAGRAPH, extract_hotfix_id, read_text_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use unicode_normalization::UnicodeNormalization;

pub trait HotfixSource {
    /// Reads every hotfix of the source, sorted by id ignoring case
    fn read(&self) -> Result<Vec<HotfixRecord>>;
}

/// A text file listing one hotfix file name per line
#[derive(Debug, Clone)]
pub struct ListFileSource {
    path: PathBuf,
}

impl ListFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str) -> Vec<HotfixRecord> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| HotfixRecord::new(extract_hotfix_id(line), String::new()))
            .collect()
    }
}

impl HotfixSource for ListFileSource {
    fn read(&self) -> Result<Vec<HotfixRecord>> {
        let content =
            read_text_file(&self.path).with_path_context("Failed to read hotfix list", &self.path)?;

        let mut hotfixes = Self::parse(&content);
        sort_hotfixes(&mut hotfixes);
        debug!(count = hotfixes.len(), path = %self.path.display(), "read hotfix list");
        Ok(hotfixes)
    }
}

/// A folder holding one description document per hotfix
#[derive(Debug, Clone)]
pub struct FolderSource {
    path: PathBuf,
}

impl FolderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(path: &Path) -> Result<HotfixRecord> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content =
            read_text_file(path).with_path_context("Failed to read hotfix document", path)?;

        let comment = parse_description(&content);
        trace!(file = %name, comment_lines = comment.lines().count(), "parsed hotfix document");
        Ok(HotfixRecord::new(extract_hotfix_id(&name), comment))
    }
}

impl HotfixSource for FolderSource {
    fn read(&self) -> Result<Vec<HotfixRecord>> {
        let entries =
            fs::read_dir(&self.path).with_path_context("Failed to list hotfix folder", &self.path)?;

        let mut hotfixes = Vec::new();
        for entry in entries {
            let entry = entry.with_path_context("Failed to list hotfix folder", &self.path)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            hotfixes.push(Self::read_document(&path)?);
        }

        sort_hotfixes(&mut hotfixes);
        debug!(count = hotfixes.len(), path = %self.path.display(), "read hotfix folder");
        Ok(hotfixes)
    }
}

/// Extracts the plain text description following the `Beschreibung` marker
/// line of a rich text hotfix document.
pub fn parse_description(content: &str) -> String {
    content
        .lines()
        .skip_while(|line| !DESCRIPTION_MARKER_PATTERN.is_match(line))
        .skip(1)
        .filter_map(clean_rich_text_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_rich_text_line(line: &str) -> Option<String> {
    let stripped = line
        .trim_matches('}')
        .replace(RTF_PARAGRAPH, "")
        .replace('\0', "");

    let text: String = stripped
        .rsplit('\\')
        .next()
        .unwrap_or_default()
        .trim()
        .nfc()
        .collect();

    (!text.is_empty()).then_some(text)
}

/// Which hotfix source the caller asked for
#[derive(Debug, Clone)]
pub enum HotfixSelection {
    List(ListFileSource),
    Folder(FolderSource),
}

impl HotfixSelection {
    /// Exactly one of `list` and `folder` must be given.
    pub fn from_paths(list: Option<PathBuf>, folder: Option<PathBuf>) -> Result<Self> {
        match (list, folder) {
            (Some(list), None) => Ok(Self::List(ListFileSource::new(list))),
            (None, Some(folder)) => Ok(Self::Folder(FolderSource::new(folder))),
            (None, None) => Err(ChangelogError::MissingHotfixSource),
            (Some(_), Some(_)) => Err(ChangelogError::ConflictingHotfixSources),
        }
    }
}

impl HotfixSource for HotfixSelection {
    fn read(&self) -> Result<Vec<HotfixRecord>> {
        match self {
            Self::List(source) => source.read(),
            Self::Folder(source) => source.read(),
        }
    }
}
