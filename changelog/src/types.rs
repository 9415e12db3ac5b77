use crate::error::ChangelogError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// A hotfix known to the reconciliation, with the description taken from its
/// source file (empty for list file input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotfixRecord {
    pub id: String,
    pub comment: String,
}

impl HotfixRecord {
    pub fn new(id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            comment: comment.into(),
        }
    }

    #[must_use]
    pub fn has_comment(&self) -> bool {
        !self.comment.trim().is_empty()
    }
}

/// Case-insensitive ordering of hotfix ids.
pub fn compare_ids(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

#[must_use]
pub fn ids_equal(left: &str, right: &str) -> bool {
    compare_ids(left, right) == Ordering::Equal
}

/// Sorts hotfixes by id, ignoring case. Ids that only differ in case keep a
/// stable ordinal order.
pub fn sort_hotfixes(hotfixes: &mut [HotfixRecord]) {
    hotfixes.sort_by(|a, b| compare_ids(&a.id, &b.id).then_with(|| a.id.cmp(&b.id)));
}

/// Changelog entry id to hotfix id, as read from the mapping file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotfixMapping {
    entries: HashMap<String, String>,
}

impl HotfixMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping, rejecting a changelog id that is already mapped.
    pub fn insert(
        &mut self,
        changelog_id: impl Into<String>,
        hotfix_id: impl Into<String>,
        line: usize,
    ) -> Result<()> {
        let changelog_id = changelog_id.into();
        if self.entries.contains_key(&changelog_id) {
            return Err(ChangelogError::DuplicateMapping {
                id: changelog_id,
                line,
            });
        }
        self.entries.insert(changelog_id, hotfix_id.into());
        Ok(())
    }

    /// The hotfix id mapped to a changelog entry, if it is present and not blank
    #[must_use]
    pub fn hotfix_for(&self, changelog_id: &str) -> Option<&str> {
        self.entries
            .get(changelog_id)
            .map(String::as_str)
            .filter(|hotfix| !hotfix.trim().is_empty())
    }

    #[must_use]
    pub fn get(&self, changelog_id: &str) -> Option<&str> {
        self.entries.get(changelog_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for HotfixMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
