//! XHTML writer
//!
//! Renders the document tree as XHTML 1.0 in the classic docutils layout:
//! sections become `<div class="section">`, the document title an
//! `<h1 class="title">`, citations and footnotes two-column tables.
//!
//! The writer is also the base of the slideshow writer
//! ([`crate::formats::slides`]): every handler in [`handlers`] is generic over
//! [`HtmlTranslate`], so the slideshow translator reuses them unchanged and
//! only overrides the handful of node kinds it lays out differently.
//!
//! # Document parts
//!
//! Output is assembled from named side buffers of the render context (see
//! [`parts`]). Handlers for the document title, header and footer move their
//! rendered text into those buffers; [`assemble`] stitches them together at
//! the end:
//!
//! | Part               | Content                                            |
//! |--------------------|----------------------------------------------------|
//! | `head`             | meta tags and `<title>`                            |
//! | `stylesheet`       | `<link>` / `<style>` elements                      |
//! | `body_prefix`      | page header, `<div class="document">`              |
//! | `body_pre_docinfo` | document title and subtitle                        |
//! | body               | everything else                                    |
//! | `body_suffix`      | closing `</div>`, page footer                      |

pub mod escape;
pub mod handlers;

use crate::common::context::RenderContext;
use crate::common::dispatch::{Dispatcher, Translator};
use crate::error::FormatError;
use crate::format::{ensure_document, Format, SerializedDocument};
use crate::ir::nodes::Node;
use crate::settings::Settings;
use crate::transforms;
use escape::html_escape;

/// Names of the side buffers the HTML writers assemble output from.
pub mod parts {
    pub const HEAD: &str = "head";
    pub const STYLESHEET: &str = "stylesheet";
    pub const BODY_PREFIX: &str = "body_prefix";
    pub const BODY_PRE_DOCINFO: &str = "body_pre_docinfo";
    pub const BODY_SUFFIX: &str = "body_suffix";
    pub const HTML_TITLE: &str = "html_title";
    pub const HTML_SUBTITLE: &str = "html_subtitle";

    /// Regions captured while a node is being rendered.
    pub const TITLE_REGION: &str = "title";
    pub const SUBTITLE_REGION: &str = "subtitle";
    pub const HEADER_REGION: &str = "header";
    pub const FOOTER_REGION: &str = "footer";
}

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n";
pub const DOCTYPE_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n";
pub const DOCTYPE_STRICT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n";

/// Rendering state specific to the HTML writers.
#[derive(Debug, Default)]
pub struct HtmlState {
    /// Plain text of the document title, used for `<title>`.
    pub title_text: Option<String>,
    /// Id of the first contents topic, target of `top` backlinks.
    pub contents_id: Option<String>,
    /// Number of open contents topics.
    pub in_contents: usize,
}

/// A translator that can run the shared HTML handlers.
pub trait HtmlTranslate: Translator {
    fn html(&self) -> &HtmlState;
    fn html_mut(&mut self) -> &mut HtmlState;
}

/// Seed the head and stylesheet parts from the settings.
pub(crate) fn init_head(ctx: &mut RenderContext, settings: &Settings) {
    let head = ctx.side_buffer_mut(parts::HEAD);
    head.push(
        "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n".to_string(),
    );
    head.push(format!(
        "<meta name=\"generator\" content=\"quill-babel {}\" />\n",
        env!("CARGO_PKG_VERSION")
    ));
    let links: Vec<String> = settings
        .stylesheets
        .iter()
        .map(|href| {
            format!(
                "<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\" />\n",
                html_escape(href)
            )
        })
        .collect();
    ctx.side_buffer_mut(parts::STYLESHEET).extend(links);
}

/// Join the document parts into the final page.
pub(crate) fn assemble(ctx: &mut RenderContext, doctype: &str, language: &str) -> String {
    let lang = html_escape(language);
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push_str(doctype);
    out.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{lang}\" lang=\"{lang}\">\n<head>\n"
    ));
    out.push_str(&ctx.side_text(parts::HEAD));
    out.push_str(&ctx.side_text(parts::STYLESHEET));
    out.push_str("</head>\n<body>\n");
    out.push_str(&ctx.side_text(parts::BODY_PREFIX));
    out.push_str(&ctx.side_text(parts::BODY_PRE_DOCINFO));
    out.push_str(&std::mem::take(&mut ctx.body).concat());
    out.push_str(&ctx.side_text(parts::BODY_SUFFIX));
    out.push_str("</body>\n</html>\n");
    out
}

/// Translator for the plain XHTML writer.
pub struct HtmlTranslator {
    ctx: RenderContext,
    settings: Settings,
    html: HtmlState,
}

impl HtmlTranslator {
    pub fn new(settings: &Settings) -> Self {
        let mut ctx = RenderContext::new();
        init_head(&mut ctx, settings);
        Self {
            ctx,
            settings: settings.clone(),
            html: HtmlState::default(),
        }
    }

    pub fn translate(mut self, doc: &Node) -> Result<String, FormatError> {
        Dispatcher::new(handlers::base_table()).walk(&mut self, doc)?;
        let language = self.settings.language_code.clone();
        Ok(assemble(&mut self.ctx, DOCTYPE_TRANSITIONAL, &language))
    }
}

impl Translator for HtmlTranslator {
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

impl HtmlTranslate for HtmlTranslator {
    fn html(&self) -> &HtmlState {
        &self.html
    }
    fn html_mut(&mut self) -> &mut HtmlState {
        &mut self.html
    }
}

/// Format implementation for XHTML
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "XHTML 1.0 Transitional document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn serialize_with_settings(
        &self,
        doc: &Node,
        settings: &Settings,
    ) -> Result<SerializedDocument, FormatError> {
        ensure_document(doc)?;
        let prepared = transforms::prepare(doc, true);
        HtmlTranslator::new(settings)
            .translate(&prepared)
            .map(SerializedDocument::new)
    }
}
