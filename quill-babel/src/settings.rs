//! Writer settings shared by every backend.
//!
//! One flat struct carries every recognised knob; each writer reads the ones
//! it cares about. Settings are normally produced by `quill-config` from
//! layered TOML, but every field has a default so an empty `Settings` renders
//! a plain document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where section titles link back to when a table of contents exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocBacklinks {
    /// Link to the contents entry of the section.
    #[default]
    Entry,
    /// Link to the contents topic itself.
    Top,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// BCP 47 language code; selects babel language and quote style.
    pub language_code: String,
    /// HTML heading level used for top-level sections.
    pub initial_header_level: usize,
    pub toc_backlinks: TocBacklinks,

    /// Slideshow theme name, searched for in `theme_dirs`.
    pub theme: Option<String>,
    /// URL of an already published theme; used when `theme` is unset.
    pub theme_url: Option<String>,
    pub theme_dirs: Vec<PathBuf>,
    pub overwrite_theme_files: bool,
    pub current_slide_indicator: bool,

    /// Let LaTeX build the table of contents instead of rendering the generated one.
    pub use_toc_linking: bool,
    /// Let LaTeX number sections instead of using generated numbers.
    pub use_section_numbering: bool,
    /// Render citations with `\cite` and a `thebibliography` environment.
    pub use_citation_shorthand: bool,
    pub document_class: String,
    pub document_options: String,

    /// Stylesheets linked from HTML output or loaded by the LaTeX preamble.
    pub stylesheets: Vec<String>,
    /// Output file; theme files are staged next to it.
    pub destination: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language_code: "en".to_string(),
            initial_header_level: 1,
            toc_backlinks: TocBacklinks::Entry,
            theme: Some("default".to_string()),
            theme_url: None,
            theme_dirs: Vec::new(),
            overwrite_theme_files: false,
            current_slide_indicator: false,
            use_toc_linking: false,
            use_section_numbering: false,
            use_citation_shorthand: false,
            document_class: "article".to_string(),
            document_options: "a4paper".to_string(),
            stylesheets: Vec::new(),
            destination: None,
        }
    }
}

impl Settings {
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Use a published theme URL; clears any theme name so the URL takes effect.
    pub fn with_theme_url(mut self, url: impl Into<String>) -> Self {
        self.theme = None;
        self.theme_url = Some(url.into());
        self
    }

    pub fn with_theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dirs.push(dir.into());
        self
    }

    pub fn with_destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }
}
