//! Error types for format operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a document.
///
/// Every variant is fatal to the translation that produced it: writers never
/// return partial output alongside an error.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Settings are missing a mandatory choice (e.g. neither a theme nor a theme URL)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A named theme directory does not exist in any theme search directory
    #[error("Theme directory not found: '{0}'")]
    ThemeNotFound(String),

    /// Required theme files could not be located anywhere in the theme chain
    #[error("Theme files not found: {}", quoted_list(.0))]
    MissingThemeFiles(Vec<String>),

    /// The active backend has no handler registered for a node kind
    #[error("Unsupported construct: no handler for '{0}' nodes")]
    UnsupportedConstruct(String),

    /// An enter/leave pair did not restore the context stacks it found
    #[error("Unbalanced render context after '{kind}' node: {detail}")]
    UnbalancedContext { kind: String, detail: String },

    /// The input document could not be read or decoded
    #[error("Invalid input: {0}")]
    Input(String),

    /// I/O failure while staging theme files or writing output
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FormatError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unbalanced(kind: &str, detail: impl Into<String>) -> Self {
        FormatError::UnbalancedContext {
            kind: kind.to_string(),
            detail: detail.into(),
        }
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
