//! LaTeX writer
//!
//! Renders the document tree as a LaTeX 2e source file using `longtable` for
//! tables, `hyperref` for links and (optionally) `\cite` with a
//! `thebibliography` environment for citations.
//!
//! The preamble is assembled after the traversal from the packages the body
//! turned out to need (see [`LatexTranslator::require`]), so a document
//! without tables does not load `longtable`.
//!
//! # Settings
//!
//! - `use_toc_linking`: emit `\tableofcontents` instead of the generated list.
//! - `use_section_numbering`: let LaTeX number sections.
//! - `use_citation_shorthand`: `\cite{key}` plus a bibliography.
//! - `language_code`: babel language and quotation marks.
//! - `document_class`, `document_options`, `stylesheets`.

pub mod escape;
pub mod handlers;
pub mod table;

use crate::common::context::RenderContext;
use crate::common::dispatch::{Dispatcher, Translator};
use crate::error::FormatError;
use crate::format::{ensure_document, Format, SerializedDocument};
use crate::ir::nodes::Node;
use crate::settings::Settings;
use crate::transforms;
use escape::{EncodeMode, QuoteState};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Names of side buffers and regions used by the LaTeX writer.
pub mod parts {
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const TABLE_CAPTION: &str = "table_caption";
    pub const BIBITEMS: &str = "bibitems";
    pub const BIBLIOGRAPHY: &str = "bibliography";
    pub const PAGE_HEADER: &str = "page_header";
    pub const PAGE_FOOTER: &str = "page_footer";
}

const HEAD_PACKAGES: &str = "\\usepackage{babel}
\\usepackage[T1]{fontenc}
\\usepackage[utf8]{inputenc}
\\usepackage{ifthen}
\\usepackage{fixltx2e} % fix LaTeX2e shortcomings
";

const FALLBACKS: &str = "
%%% Fallback definitions for Quill-specific commands
% hyperref (PDF hyperlinks):
\\ifthenelse{\\isundefined{\\hypersetup}}{
  \\usepackage[colorlinks=true,linkcolor=blue,urlcolor=blue]{hyperref}
}{}
";

/// Babel language and quotation marks for a language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Babel {
    pub language: &'static str,
    pub open_quote: &'static str,
    pub close_quote: &'static str,
}

const BABEL_LANGUAGES: &[(&str, &str)] = &[
    ("en", "english"),
    ("en-gb", "british"),
    ("en-us", "american"),
    ("en-ca", "canadian"),
    ("en-au", "australian"),
    ("de", "ngerman"),
    ("de-at", "naustrian"),
    ("fr", "french"),
    ("it", "italian"),
    ("es", "spanish"),
    ("pt", "portuguese"),
    ("pt-br", "brazil"),
    ("nl", "dutch"),
    ("sv", "swedish"),
    ("da", "danish"),
    ("fi", "finnish"),
    ("pl", "polish"),
    ("cs", "czech"),
    ("ru", "russian"),
];

impl Babel {
    /// Look up `code` (`de`, `de_AT`, `en-GB`, ...), falling back to the
    /// primary subtag and then to English.
    pub fn for_language(code: &str) -> Self {
        let code = code.trim().to_lowercase().replace('_', "-");
        let primary = code.split('-').next().unwrap_or_default().to_string();
        let language = [code.as_str(), primary.as_str()]
            .iter()
            .find_map(|candidate| {
                BABEL_LANGUAGES
                    .iter()
                    .find(|(c, _)| c == candidate)
                    .map(|(_, name)| *name)
            })
            .unwrap_or_else(|| {
                log::warn!("no babel language for '{code}', using english");
                "english"
            });
        let (open_quote, close_quote) = match language {
            "ngerman" | "naustrian" => ("\"`", "\"'"),
            _ => ("``", "''"),
        };
        Self {
            language,
            open_quote,
            close_quote,
        }
    }

    pub fn quotes(&self) -> QuoteState {
        QuoteState::new(self.open_quote, self.close_quote)
    }
}

/// Translator for the LaTeX writer.
pub struct LatexTranslator {
    ctx: RenderContext,
    settings: Settings,
    babel: Babel,
    quotes: QuoteState,
    requirements: IndexMap<&'static str, String>,
    literal_block_depth: usize,
    inline_literal_depth: usize,
    enumeration_depth: usize,
    counters: HashSet<String>,
    /// An open `\cite{` waiting for the next merged key.
    open_cite: bool,
    /// Labels of the citations moved into the bibliography, in order.
    bibitems: Vec<String>,
}

impl LatexTranslator {
    pub fn new(settings: &Settings) -> Self {
        let babel = Babel::for_language(&settings.language_code);
        Self {
            ctx: RenderContext::new(),
            settings: settings.clone(),
            quotes: babel.quotes(),
            babel,
            requirements: IndexMap::new(),
            literal_block_depth: 0,
            inline_literal_depth: 0,
            enumeration_depth: 0,
            counters: HashSet::new(),
            open_cite: false,
            bibitems: Vec::new(),
        }
    }

    /// Record a preamble requirement; the first text registered under a key wins.
    pub fn require(&mut self, key: &'static str, text: impl Into<String>) {
        self.requirements.entry(key).or_insert_with(|| text.into());
    }

    pub(crate) fn encode_mode(&self) -> EncodeMode {
        if self.literal_block_depth > 0 {
            EncodeMode::LiteralBlock
        } else if self.inline_literal_depth > 0 {
            EncodeMode::InlineLiteral
        } else {
            EncodeMode::Normal
        }
    }

    pub fn translate(mut self, doc: &Node) -> Result<String, FormatError> {
        Dispatcher::new(handlers::table()).walk(&mut self, doc)?;
        Ok(self.assemble())
    }

    fn documentclass(&self) -> String {
        let options: Vec<&str> = self
            .settings
            .document_options
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .chain(std::iter::once(self.babel.language))
            .collect();
        format!(
            "\\documentclass[{}]{{{}}}\n",
            options.join(","),
            self.settings.document_class
        )
    }

    fn stylesheets(&self) -> String {
        self.settings
            .stylesheets
            .iter()
            .map(|sheet| match sheet.strip_suffix(".sty") {
                Some(package) => format!("\\usepackage{{{package}}}\n"),
                None => format!("\\input{{{sheet}}}\n"),
            })
            .collect()
    }

    fn assemble(&mut self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "% generated by quill-babel {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        out.push_str(&self.documentclass());
        out.push_str(HEAD_PACKAGES);
        for text in self.requirements.values() {
            out.push_str(text);
        }
        out.push_str("\n%%% User specified packages and stylesheets\n");
        out.push_str(&self.stylesheets());
        out.push_str(FALLBACKS);

        let title = self.ctx.side_text(parts::TITLE);
        let subtitle = self.ctx.side_text(parts::SUBTITLE);
        if !title.is_empty() {
            out.push_str("\n%%% Title Data\n");
            if subtitle.is_empty() {
                out.push_str(&format!("\\title{{{title}}}\n"));
            } else {
                out.push_str(&format!("\\title{{{title}\\\\\n\\large{{{subtitle}}}}}\n"));
            }
            out.push_str("\\author{}\n\\date{}\n");
        }

        out.push_str("\n%%% Body\n\\begin{document}\n");
        if !title.is_empty() {
            out.push_str("\\maketitle\n");
        }
        out.push_str(&std::mem::take(&mut self.ctx.body).concat());
        out.push_str(&self.ctx.side_text(parts::BIBLIOGRAPHY));
        out.push_str("\n\\end{document}\n");
        out
    }
}

impl Translator for LatexTranslator {
    fn context(&self) -> &RenderContext {
        &self.ctx
    }
    fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }
    fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Format implementation for LaTeX
#[derive(Debug, Default, Clone, Copy)]
pub struct LatexFormat;

impl Format for LatexFormat {
    fn name(&self) -> &str {
        "latex"
    }

    fn description(&self) -> &str {
        "LaTeX 2e source document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tex", "latex"]
    }

    fn serialize_with_settings(
        &self,
        doc: &Node,
        settings: &Settings,
    ) -> Result<SerializedDocument, FormatError> {
        ensure_document(doc)?;
        let prepared = transforms::prepare(doc, !settings.use_section_numbering);
        LatexTranslator::new(settings)
            .translate(&prepared)
            .map(SerializedDocument::new)
    }
}
