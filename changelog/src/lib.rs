//! Reconciles a Liquibase style changelog with the list of shipped hotfixes.
//!
//! Entries that belong to a hotfix are kept in document order; hotfixes that
//! have no entry yet get a placeholder `changeSet` at their sorted position.

pub mod config;
pub mod document;
pub mod error;
pub mod hotfix;
pub mod mapping;
pub mod merger;
pub mod types;
pub mod utils;
pub mod writer;

pub use config::MergeConfig;
pub use document::{Document, Element, Node};
pub use error::ChangelogError;
pub use hotfix::{FolderSource, HotfixSelection, HotfixSource, ListFileSource};
pub use mapping::read_mapping;
pub use merger::{ChangelogMerger, MergeOutcome, MergeReport, Merger};
pub use types::{HotfixMapping, HotfixRecord, Result};

use tracing::debug;

/// Merges `original` with `hotfixes` and verifies that every original entry
/// survived exactly once.
pub fn reconcile(
    original: &Document,
    hotfixes: Vec<HotfixRecord>,
    mapping: &HotfixMapping,
    config: &MergeConfig,
) -> Result<MergeOutcome> {
    let outcome = ChangelogMerger::new(config, mapping).merge(original, hotfixes)?;
    let count = writer::validate_entry_count(original, &outcome.document, config)?;
    debug!(
        entries = count,
        inserted = outcome.report.inserted.len(),
        "changelog entry count verified"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> HotfixMapping {
        pairs
            .iter()
            .map(|(entry, hotfix)| (entry.to_string(), hotfix.to_string()))
            .collect()
    }

    fn ids(document: &Document) -> Vec<String> {
        document
            .root()
            .descendants_named("changeSet")
            .map(|entry| entry.attribute("id").unwrap().unwrap().into_owned())
            .collect()
    }

    #[test]
    fn test_reconcile_passes_when_every_entry_is_mapped() {
        let original =
            Document::parse(r#"<databaseChangeLog><changeSet id="id1"/></databaseChangeLog>"#)
                .unwrap();
        let hotfixes = vec![
            HotfixRecord::new("a", ""),
            HotfixRecord::new("c", ""),
            HotfixRecord::new("e", ""),
        ];

        let outcome = reconcile(
            &original,
            hotfixes,
            &mapping(&[("id1", "c")]),
            &MergeConfig::default(),
        )
        .unwrap();

        assert_eq!(ids(&outcome.document), vec!["automaticallyInserted_a", "id1"]);
        assert_eq!(outcome.report.unflushed, vec!["e"]);
    }

    #[test]
    fn test_reconcile_fails_when_an_entry_is_unmapped() {
        let original = Document::parse(
            r#"<databaseChangeLog><changeSet id="id1"/><changeSet id="id2"/></databaseChangeLog>"#,
        )
        .unwrap();

        let err = reconcile(
            &original,
            Vec::new(),
            &mapping(&[("id1", "a")]),
            &MergeConfig::default(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Expected: 2, Got: 1");
    }

    #[test]
    fn test_reconcile_is_idempotent_on_its_output() {
        let config = MergeConfig::default();
        let original = Document::parse(
            r#"<databaseChangeLog><changeSet id="id1"/><changeSet id="id2"/></databaseChangeLog>"#,
        )
        .unwrap();
        let hotfixes = vec![HotfixRecord::new("a", "erster"), HotfixRecord::new("b", "")];
        let first = reconcile(
            &original,
            hotfixes,
            &mapping(&[("id1", "b"), ("id2", "c")]),
            &config,
        )
        .unwrap();

        let identity: HotfixMapping = ids(&first.document)
            .into_iter()
            .map(|id| (id.clone(), id))
            .collect();
        let second = reconcile(&first.document, Vec::new(), &identity, &config).unwrap();

        let real_ids = |document: &Document| -> Vec<String> {
            ids(document)
                .into_iter()
                .filter(|id| !config.is_synthetic(id))
                .collect()
        };
        assert_eq!(real_ids(&second.document), real_ids(&first.document));
        assert_eq!(real_ids(&second.document), vec!["id1", "id2"]);
    }
}
