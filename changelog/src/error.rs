use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;

/// Error context to enrich error messages
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub path: Option<PathBuf>,
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

/// Errors that can occur while reading inputs, merging or writing a changelog
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid XML escape sequence: {0}")]
    XmlEscape(#[from] quick_xml::escape::EscapeError),

    #[error("Invalid UTF-8 in XML document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Changelog document has no root element")]
    MissingRoot,

    #[error("No hotfix source given, either a list file or a folder is required")]
    MissingHotfixSource,

    #[error("Both a hotfix list file and a hotfix folder were given, choose one")]
    ConflictingHotfixSources,

    #[error("Duplicate mapping for changelog id '{id}' at line {line}")]
    DuplicateMapping { id: String, line: usize },

    #[error("Expected: {expected}, Got: {actual}")]
    EntryCountMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    Other(String),

    #[error("{context}: {source}")]
    Contextual {
        context: ErrorContext,
        source: Box<ChangelogError>,
    },
}

impl ChangelogError {
    #[must_use]
    pub fn with_operation_context(
        self,
        operation: impl Into<String>,
        path: Option<impl Into<PathBuf>>,
    ) -> Self {
        Self::Contextual {
            context: ErrorContext {
                operation: operation.into(),
                path: path.map(Into::into),
            },
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File operation failed: {e}"),
            Self::Xml(e) => format!("Failed to parse changelog XML: {e}"),
            Self::XmlAttribute(e) => format!("Failed to parse changelog XML attribute: {e}"),
            Self::XmlEscape(e) => format!("Invalid escape sequence in changelog XML: {e}"),
            Self::Utf8(e) => format!("Changelog XML is not valid UTF-8: {e}"),
            Self::MissingRoot => "The changelog document is empty".to_string(),
            Self::MissingHotfixSource => {
                "No hotfix source given. Use --source <file> or --folder <dir>".to_string()
            }
            Self::ConflictingHotfixSources => {
                "Use either --source or --folder, not both".to_string()
            }
            Self::DuplicateMapping { id, line } => {
                format!("Changelog id '{id}' is mapped twice (line {line} of the mapping file)")
            }
            Self::EntryCountMismatch { expected, actual } => format!(
                "Changelog entry count check failed. Expected: {expected}, Got: {actual}"
            ),
            Self::Other(msg) => msg.clone(),
            Self::Contextual { context, source } => {
                format!("{}: {}", context, source.user_message())
            }
        }
    }
}

pub trait ResultExt<T> {
    /// Attach the failing operation and the file it worked on
    fn with_path_context<C, P>(self, operation: C, path: P) -> crate::types::Result<T>
    where
        C: Into<String>,
        P: Into<PathBuf>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ChangelogError>,
{
    fn with_path_context<C, P>(self, operation: C, path: P) -> crate::types::Result<T>
    where
        C: Into<String>,
        P: Into<PathBuf>,
    {
        self.map_err(|err| err.into().with_operation_context(operation, Some(path)))
    }
}
