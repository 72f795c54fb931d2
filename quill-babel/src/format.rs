//! Format trait definition
//!
//! This module defines the trait every writer implements. A format turns a
//! document tree into target text; it never parses.

use crate::error::FormatError;
use crate::ir::nodes::{Node, NodeTag};
use crate::settings::Settings;
use std::path::PathBuf;

/// Output produced by a [`Format`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedDocument {
    /// The rendered document.
    pub text: String,
    /// Files the output relies on: every installed theme file, whether it
    /// was copied in this run or an existing copy was kept.
    pub dependencies: Vec<PathBuf>,
}

impl SerializedDocument {
    pub fn new(text: String) -> Self {
        Self {
            text,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<PathBuf>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

/// Trait for document writers
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn serialize_with_settings(
///         &self,
///         doc: &Node,
///         settings: &Settings,
///     ) -> Result<SerializedDocument, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "latex", "slides")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from output filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Serialize a document with default settings.
    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        self.serialize_with_settings(doc, &Settings::default())
            .map(|out| out.text)
    }

    /// Serialize a document.
    ///
    /// The translation either produces the complete output or fails; no
    /// partial text is ever returned alongside an error.
    fn serialize_with_settings(
        &self,
        doc: &Node,
        settings: &Settings,
    ) -> Result<SerializedDocument, FormatError>;
}

/// Reject trees whose root is not a document node.
pub(crate) fn ensure_document(doc: &Node) -> Result<(), FormatError> {
    if doc.is(NodeTag::Document) {
        Ok(())
    } else {
        Err(FormatError::Input(format!(
            "expected a document node at the root, found '{}'",
            doc.kind_name()
        )))
    }
}
