//! Shared configuration loader for the quill writers.
//!
//! `defaults/quill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuillConfig`],
//! which converts into the writer [`Settings`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quill_babel::settings::{Settings, TocBacklinks};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/quill.default.toml");
const DEFAULT_THEME: &str = "default";

/// Top-level configuration consumed by quill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuillConfig {
    pub writer: WriterConfig,
    pub latex: LatexConfig,
    pub slides: SlidesConfig,
}

/// Settings shared by every writer.
#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    pub language_code: String,
    pub initial_header_level: usize,
    pub toc_backlinks: TocBacklinks,
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatexConfig {
    pub document_class: String,
    pub document_options: String,
    pub use_toc_linking: bool,
    pub use_section_numbering: bool,
    pub use_citation_shorthand: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlidesConfig {
    pub theme: String,
    pub theme_url: String,
    pub theme_dirs: Vec<PathBuf>,
    pub overwrite_theme_files: bool,
    pub current_slide_indicator: bool,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The configured theme, falling back to `default` only when no theme URL is set.
fn theme_name(slides: &SlidesConfig) -> Option<String> {
    non_empty(&slides.theme).or_else(|| {
        non_empty(&slides.theme_url)
            .is_none()
            .then(|| DEFAULT_THEME.to_string())
    })
}

impl From<&QuillConfig> for Settings {
    fn from(config: &QuillConfig) -> Self {
        Settings {
            language_code: config.writer.language_code.clone(),
            initial_header_level: config.writer.initial_header_level,
            toc_backlinks: config.writer.toc_backlinks,
            stylesheets: config.writer.stylesheets.clone(),
            theme: theme_name(&config.slides),
            theme_url: non_empty(&config.slides.theme_url),
            theme_dirs: config.slides.theme_dirs.clone(),
            overwrite_theme_files: config.slides.overwrite_theme_files,
            current_slide_indicator: config.slides.current_slide_indicator,
            use_toc_linking: config.latex.use_toc_linking,
            use_section_numbering: config.latex.use_section_numbering,
            use_citation_shorthand: config.latex.use_citation_shorthand,
            document_class: config.latex.document_class.clone(),
            document_options: config.latex.document_options.clone(),
            destination: None,
        }
    }
}

impl From<QuillConfig> for Settings {
    fn from(config: QuillConfig) -> Self {
        Settings::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuillConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuillConfig, ConfigError> {
    Loader::new().build()
}
