//! Document publishing pipeline.
//!
//! Provides a high-level API for rendering a document tree to an output
//! format. This module bridges the gap between the format registry and file
//! I/O, handling both in-memory and file-based output.
//!
//! When an output path is given it also becomes the writer's destination, so
//! the slideshow writer stages its theme files next to the written page.
//!
//! For more control over the conversion process, use [`FormatRegistry`] directly.

use crate::error::FormatError;
use crate::ir::nodes::Node;
use crate::registry::FormatRegistry;
use crate::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};

/// Specifies how to publish a document.
///
/// Use the builder pattern to configure the publication:
///
/// ```ignore
/// let spec = PublishSpec::new(&document, "slides")
///     .with_output_path("talk.html")
///     .with_settings(Settings::default().with_theme("big-black"));
/// ```
///
/// If no output path is provided, the rendered text is returned in memory.
#[derive(Debug)]
pub struct PublishSpec<'a> {
    /// The document tree to render.
    pub document: &'a Node,
    /// Target format name (e.g., "latex", "slides").
    pub format: &'a str,
    /// Optional file path for writing output.
    pub output: Option<PathBuf>,
    /// Writer settings.
    pub settings: Settings,
}

impl<'a> PublishSpec<'a> {
    /// Creates a new publish specification for the given document and format.
    pub fn new(document: &'a Node, format: &'a str) -> Self {
        Self {
            document,
            format,
            output: None,
            settings: Settings::default(),
        }
    }

    /// Sets the output file path. If provided, content is written to disk.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// Content held in memory (no output path).
    InMemory(String),
    /// Path to the written file (when output path was specified).
    File(PathBuf),
}

/// Result of a publish operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    /// The published artifact (in-memory content or file path).
    pub artifact: PublishArtifact,
    /// Files the output relies on, as reported by the writer.
    pub dependencies: Vec<PathBuf>,
}

/// Publishes a document according to the specification.
///
/// Uses the default format registry to find the writer.
///
/// # Errors
///
/// Returns [`FormatError`] if:
/// - The format is not supported
/// - Rendering fails (configuration, theme or document errors)
/// - File I/O fails
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult, FormatError> {
    let registry = FormatRegistry::with_defaults();
    let mut settings = spec.settings;
    if let Some(path) = &spec.output {
        settings.destination = Some(path.clone());
    }
    let serialized = registry.serialize_with_settings(spec.document, spec.format, &settings)?;
    let dependencies = serialized.dependencies.clone();

    let artifact = match spec.output {
        Some(path) => PublishArtifact::File(write_to_path(path, serialized.into_bytes())?),
        None => PublishArtifact::InMemory(serialized.text),
    };
    Ok(PublishResult {
        artifact,
        dependencies,
    })
}

fn write_to_path(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, FormatError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| FormatError::io(parent, err))?;
    }
    fs::write(&path, &bytes)
        .map(|_| path.clone())
        .map_err(|err| FormatError::io(&path, err))
}
