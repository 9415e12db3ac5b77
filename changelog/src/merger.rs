use crate::config::MergeConfig;
use crate::document::{Document, Element};
use crate::types::{HotfixMapping, HotfixRecord, Result, compare_ids, ids_equal};
use std::cmp::Ordering;
use tracing::{debug, info};

/// What the merge did with each entry and hotfix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids of original entries copied to the output
    pub kept: Vec<String>,
    /// Ids of original entries without a hotfix mapping
    pub skipped: Vec<String>,
    /// Hotfix ids that received a placeholder entry
    pub inserted: Vec<String>,
    /// Hotfix ids matched by a mapped entry
    pub matched: Vec<String>,
    /// Hotfix ids sorting after the last mapped entry, left out of the output
    pub unflushed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Document,
    pub report: MergeReport,
}

pub trait Merger {
    fn merge(&self, original: &Document, hotfixes: Vec<HotfixRecord>) -> Result<MergeOutcome>;
}

/// Interleaves mapped changelog entries with placeholders for the hotfixes
/// that have no entry of their own.
pub struct ChangelogMerger<'a> {
    config: &'a MergeConfig,
    mapping: &'a HotfixMapping,
}

impl<'a> ChangelogMerger<'a> {
    pub const fn new(config: &'a MergeConfig, mapping: &'a HotfixMapping) -> Self {
        Self { config, mapping }
    }

    fn output_root(&self, source_root: &Element) -> Element {
        let mut root = Element::new(self.config.root_element.as_str());
        if self.config.carry_namespaces {
            for (key, value) in source_root.raw_attributes() {
                if key == "xmlns" || key.starts_with("xmlns:") {
                    root.push_raw_attribute(key, value);
                }
            }
        }
        root
    }

    fn synthetic_entry(&self, hotfix: &HotfixRecord) -> Element {
        let mut entry = Element::new(self.config.entry_element.as_str())
            .with_attribute(self.config.id_attribute.as_str(), &self.config.synthetic_id(&hotfix.id));
        if hotfix.has_comment() {
            entry.push_element(
                Element::new(self.config.comment_element.as_str()).with_text(&hotfix.comment),
            );
        }
        entry
    }
}

impl Merger for ChangelogMerger<'_> {
    /// `hotfixes` is expected in ascending id order. Placeholders are inserted
    /// in the order the remaining hotfixes have in that list.
    fn merge(&self, original: &Document, mut hotfixes: Vec<HotfixRecord>) -> Result<MergeOutcome> {
        let mut root = self.output_root(original.root());
        let mut report = MergeReport::default();

        for entry in original.root().descendants_named(&self.config.entry_element) {
            let entry_id = entry
                .attribute(&self.config.id_attribute)?
                .unwrap_or_default();

            let Some(hotfix_id) = self.mapping.hotfix_for(&entry_id) else {
                debug!(entry = %entry_id, "skipping changelog entry without hotfix mapping");
                report.skipped.push(entry_id.into_owned());
                continue;
            };

            let before = hotfixes.len();
            hotfixes.retain(|hotfix| !ids_equal(&hotfix.id, hotfix_id));
            if hotfixes.len() < before {
                report.matched.push(hotfix_id.to_string());
            }

            let (overdue, remaining): (Vec<_>, Vec<_>) = hotfixes
                .into_iter()
                .partition(|hotfix| compare_ids(&hotfix.id, hotfix_id) == Ordering::Less);
            hotfixes = remaining;

            for hotfix in overdue {
                debug!(hotfix = %hotfix.id, before = %entry_id, "inserting placeholder entry");
                root.push_element(self.synthetic_entry(&hotfix));
                report.inserted.push(hotfix.id);
            }

            root.push_element(entry.clone());
            report.kept.push(entry_id.into_owned());
        }

        if !hotfixes.is_empty() {
            info!(
                count = hotfixes.len(),
                hotfixes = ?hotfixes.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
                "hotfixes sort after the last mapped entry and were not inserted"
            );
        }
        report.unflushed = hotfixes.into_iter().map(|hotfix| hotfix.id).collect();

        Ok(MergeOutcome {
            document: Document::new(root),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use tracing_test::traced_test;

    fn hotfixes(ids: &[&str]) -> Vec<HotfixRecord> {
        ids.iter().map(|id| HotfixRecord::new(*id, "")).collect()
    }

    fn mapping(pairs: &[(&str, &str)]) -> HotfixMapping {
        pairs
            .iter()
            .map(|(entry, hotfix)| (entry.to_string(), hotfix.to_string()))
            .collect()
    }

    fn changelog(ids: &[&str]) -> Document {
        let mut root = Element::new("databaseChangeLog");
        for id in ids {
            root.push_element(
                Element::new("changeSet")
                    .with_attribute("id", id)
                    .with_attribute("author", "dev"),
            );
        }
        Document::new(root)
    }

    fn output_ids(document: &Document) -> Vec<String> {
        document
            .root()
            .descendants_named("changeSet")
            .map(|entry| entry.attribute("id").unwrap().unwrap().into_owned())
            .collect()
    }

    #[test]
    fn test_inserts_overdue_hotfixes_before_entry() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "c")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        let outcome = merger
            .merge(&changelog(&["id1"]), hotfixes(&["a", "c", "e"]))
            .unwrap();

        assert_eq!(
            output_ids(&outcome.document),
            vec!["automaticallyInserted_a", "id1"]
        );
        assert_eq!(outcome.report.inserted, vec!["a"]);
        assert_eq!(outcome.report.matched, vec!["c"]);
        assert_eq!(outcome.report.unflushed, vec!["e"]);
    }

    #[test]
    fn test_unmapped_entries_are_dropped() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "b"), ("id2", " "), ("id4", "d")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        let outcome = merger
            .merge(&changelog(&["id1", "id2", "id3", "id4"]), hotfixes(&["b", "d"]))
            .unwrap();

        assert_eq!(output_ids(&outcome.document), vec!["id1", "id4"]);
        assert_eq!(outcome.report.skipped, vec!["id2", "id3"]);
        assert!(outcome.report.inserted.is_empty());
    }

    #[test]
    fn test_matching_ignores_case() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "HF0002")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        let outcome = merger
            .merge(&changelog(&["id1"]), hotfixes(&["hf0001", "hf0002"]))
            .unwrap();

        assert_eq!(
            output_ids(&outcome.document),
            vec!["automaticallyInserted_hf0001", "id1"]
        );
        assert_eq!(outcome.report.matched, vec!["HF0002"]);
    }

    #[test]
    fn test_placeholders_keep_residual_list_order() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "b"), ("id2", "z")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        // not sorted on purpose: the merger must not reorder what it is given
        let outcome = merger
            .merge(&changelog(&["id1", "id2"]), hotfixes(&["y", "a", "x", "b"]))
            .unwrap();

        assert_eq!(
            output_ids(&outcome.document),
            vec![
                "automaticallyInserted_a",
                "id1",
                "automaticallyInserted_y",
                "automaticallyInserted_x",
                "id2"
            ]
        );
    }

    #[test]
    fn test_hotfix_is_never_inserted_twice() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "c"), ("id2", "d")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        let outcome = merger
            .merge(&changelog(&["id1", "id2"]), hotfixes(&["a", "b", "c", "d"]))
            .unwrap();

        assert_eq!(
            output_ids(&outcome.document),
            vec![
                "automaticallyInserted_a",
                "automaticallyInserted_b",
                "id1",
                "id2"
            ]
        );
    }

    #[test]
    fn test_placeholder_carries_comment() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "b")]);
        let merger = ChangelogMerger::new(&config, &mapping);
        let hotfixes = vec![
            HotfixRecord::new("a", "Korrektur der Rundung\nBetrifft Rechnungen"),
            HotfixRecord::new("a2", "  "),
        ];

        let outcome = merger.merge(&changelog(&["id1"]), hotfixes).unwrap();
        let entries: Vec<_> = outcome.document.root().child_elements().collect();

        let comment = entries[0].child_elements().next().unwrap();
        assert_eq!(comment.name(), "comment");
        assert_eq!(
            comment.children(),
            &[Node::Text("Korrektur der Rundung\nBetrifft Rechnungen".to_string())]
        );
        assert!(entries[1].children().is_empty());
    }

    #[test]
    fn test_cloned_entry_keeps_content() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "a")]);
        let merger = ChangelogMerger::new(&config, &mapping);
        let original = Document::parse(
            r#"<databaseChangeLog xmlns="http://www.liquibase.org/xml/ns/dbchangelog" logicalFilePath="x">
                <changeSet id="id1" author="dev"><sql>UPDATE t SET a = 1</sql></changeSet>
            </databaseChangeLog>"#,
        )
        .unwrap();

        let outcome = merger.merge(&original, Vec::new()).unwrap();
        let root = outcome.document.root();

        assert_eq!(root.name(), "databaseChangeLog");
        assert_eq!(
            root.raw_attributes().collect::<Vec<_>>(),
            vec![("xmlns", "http://www.liquibase.org/xml/ns/dbchangelog")]
        );
        assert_eq!(
            root.child_elements().next(),
            original.root().child_elements().next()
        );
    }

    #[test]
    fn test_namespaces_are_not_carried_when_disabled() {
        let config = MergeConfig {
            carry_namespaces: false,
            ..MergeConfig::default()
        };
        let mapping = mapping(&[]);
        let merger = ChangelogMerger::new(&config, &mapping);
        let original = Document::parse(r#"<log xmlns="urn:x"/>"#).unwrap();

        let outcome = merger.merge(&original, Vec::new()).unwrap();
        assert_eq!(outcome.document.root().raw_attributes().count(), 0);
    }

    #[traced_test]
    #[test]
    fn test_trailing_hotfixes_are_logged() {
        let config = MergeConfig::default();
        let mapping = mapping(&[("id1", "a")]);
        let merger = ChangelogMerger::new(&config, &mapping);

        let outcome = merger
            .merge(&changelog(&["id1"]), hotfixes(&["a", "zz"]))
            .unwrap();

        assert_eq!(output_ids(&outcome.document), vec!["id1"]);
        assert_eq!(outcome.report.unflushed, vec!["zz"]);
        assert!(logs_contain("were not inserted"));
    }
}
