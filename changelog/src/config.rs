use serde::Deserialize;

/// Element and naming conventions used when merging a changelog
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MergeConfig {
    /// Prefix of the id given to inserted placeholder entries
    pub synthetic_prefix: String,
    /// Root element name of the generated document
    pub root_element: String,
    pub entry_element: String,
    pub id_attribute: String,
    pub comment_element: String,
    /// Copy `xmlns` declarations of the source root onto the generated root
    pub carry_namespaces: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            synthetic_prefix: "automaticallyInserted_".to_string(),
            root_element: "databaseChangeLog".to_string(),
            entry_element: "changeSet".to_string(),
            id_attribute: "id".to_string(),
            comment_element: "comment".to_string(),
            carry_namespaces: true,
        }
    }
}

impl MergeConfig {
    #[must_use]
    pub fn synthetic_id(&self, hotfix_id: &str) -> String {
        format!("{}{hotfix_id}", self.synthetic_prefix)
    }

    #[must_use]
    pub fn is_synthetic(&self, entry_id: &str) -> bool {
        entry_id.starts_with(&self.synthetic_prefix)
    }
}
