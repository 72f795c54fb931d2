//! S5 slideshow writer
//!
//! Produces a single XHTML 1.0 Strict page laid out for the S5 slide engine.
//! Each top-level section becomes one slide; everything before the first
//! section (usually the document title) forms the title slide `slide0`.
//!
//! The writer is the XHTML writer with a sparse override table. It changes
//! only how the document is wrapped (`document` leave), how sections open,
//! the heading level of section subtitles, and where the page header and
//! footer end up (the S5 layout block rather than the page body).
//!
//! Theme files are resolved and, when an output path is known, copied next
//! to it under `ui/<theme>` before the tree is walked. Either a theme name or
//! a theme URL must be configured.

pub mod themes;

use super::html::handlers::{self, starttag};
use super::html::{assemble, init_head, parts, HtmlState, HtmlTranslate, DOCTYPE_STRICT};
use crate::common::context::RenderContext;
use crate::common::dispatch::{Cursor, Dispatcher, Flow, HandlerTable, Translator};
use crate::error::FormatError;
use crate::format::{ensure_document, Format, SerializedDocument};
use crate::ir::nodes::{Node, NodeTag};
use crate::settings::{Settings, TocBacklinks};
use crate::transforms;
use std::path::{Path, PathBuf};
use themes::ThemeResolver;

const S5_HEADER: &str = "s5_header";
const S5_FOOTER: &str = "s5_footer";

const S5_STYLESHEET: &str = "<!-- configuration parameters -->
<meta name=\"defaultView\" content=\"slideshow\" />
<meta name=\"controlVis\" content=\"hidden\" />
<!-- style sheet links -->
<link rel=\"stylesheet\" href=\"{path}/slides.css\" type=\"text/css\" media=\"projection\" id=\"slideProj\" />
<link rel=\"stylesheet\" href=\"{path}/outline.css\" type=\"text/css\" media=\"screen\" id=\"outlineStyle\" />
<link rel=\"stylesheet\" href=\"{path}/print.css\" type=\"text/css\" media=\"print\" id=\"slidePrint\" />
<link rel=\"stylesheet\" href=\"{path}/opera.css\" type=\"text/css\" media=\"projection\" id=\"operaFix\" />
<script src=\"{path}/slides.js\" type=\"text/javascript\"></script>
";

const DISABLE_CURRENT_SLIDE: &str = "
<style type=\"text/css\">
#currentSlide {display: none;}
</style>
";

type Result<T> = std::result::Result<T, FormatError>;

/// Translator for the slideshow writer.
pub struct SlideTranslator {
    ctx: RenderContext,
    settings: Settings,
    html: HtmlState,
    section_count: usize,
    dependencies: Vec<PathBuf>,
}

impl SlideTranslator {
    /// Set up theme files and the page head.
    ///
    /// Fails before anything is rendered when no theme is configured, the
    /// theme cannot be found, or the chain lacks required files.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut settings = settings.clone();
        settings.toc_backlinks = TocBacklinks::None;

        let (theme_path, dependencies) = setup_theme(&settings)?;

        let mut ctx = RenderContext::new();
        init_head(&mut ctx, &settings);
        ctx.side_buffer_mut(parts::HEAD)
            .push("<meta name=\"version\" content=\"S5 1.1\" />\n".to_string());
        let stylesheet = ctx.side_buffer_mut(parts::STYLESHEET);
        stylesheet.push(S5_STYLESHEET.replace("{path}", &theme_path));
        if !settings.current_slide_indicator {
            stylesheet.push(DISABLE_CURRENT_SLIDE.to_string());
        }

        Ok(Self {
            ctx,
            settings,
            html: HtmlState::default(),
            section_count: 0,
            dependencies,
        })
    }

    pub fn translate(mut self, doc: &Node) -> Result<SerializedDocument> {
        Dispatcher::with_overrides(handlers::base_table(), overrides()).walk(&mut self, doc)?;
        let language = self.settings.language_code.clone();
        let text = assemble(&mut self.ctx, DOCTYPE_STRICT, &language);
        Ok(SerializedDocument::new(text).with_dependencies(self.dependencies))
    }
}

/// Resolve the theme; returns the theme path used in links and the recorded dependencies.
fn setup_theme(settings: &Settings) -> Result<(String, Vec<PathBuf>)> {
    if let Some(theme) = &settings.theme {
        if settings.theme_dirs.is_empty() {
            return Err(FormatError::Configuration(format!(
                "theme '{theme}' needs a theme directory to be looked up in; \
                 set slides.theme_dirs or use a theme URL"
            )));
        }
        let chain = ThemeResolver::new(&settings.theme_dirs).resolve(theme)?;
        let dependencies = match &settings.destination {
            Some(output) => {
                let target = output
                    .parent()
                    .unwrap_or(Path::new(""))
                    .join("ui")
                    .join(theme);
                chain
                    .install(&target, settings.overwrite_theme_files)?
                    .dependencies
            }
            None => {
                chain.verify()?;
                Vec::new()
            }
        };
        Ok((format!("ui/{theme}"), dependencies))
    } else if let Some(url) = &settings.theme_url {
        Ok((url.trim_end_matches('/').to_string(), Vec::new()))
    } else {
        Err(FormatError::Configuration(
            "No theme specified for the slideshow writer".to_string(),
        ))
    }
}

impl Translator for SlideTranslator {
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

impl HtmlTranslate for SlideTranslator {
    fn html(&self) -> &HtmlState {
        &self.html
    }
    fn html_mut(&mut self) -> &mut HtmlState {
        &mut self.html
    }
}

fn overrides() -> HandlerTable<SlideTranslator> {
    let mut table = HandlerTable::new();
    table
        .on_leave(NodeTag::Document, depart_document)
        .on_enter(NodeTag::Section, visit_section)
        .on_enter(NodeTag::Subtitle, visit_subtitle)
        .on_leave(NodeTag::Header, depart_header)
        .on_leave(NodeTag::Footer, depart_footer);
    table
}

fn depart_document(t: &mut SlideTranslator, _: &Cursor<'_>) -> Result<()> {
    let title_text = t.html.title_text.clone().unwrap_or_default();
    let ctx = &mut t.ctx;
    ctx.side_buffer_mut(parts::HEAD).push(format!(
        "<title>{}</title>\n",
        super::html::escape::html_escape(&title_text)
    ));

    let header = ctx.take_side_buffer(S5_HEADER).concat();
    let footer = ctx.take_side_buffer(S5_FOOTER).concat();
    let title = ctx
        .side_text(parts::HTML_TITLE)
        .replace("<h1 class=\"title\"", "<h1");
    let layout = format!(
        "<div class=\"layout\">\n<div id=\"controls\"></div>\n<div id=\"currentSlide\"></div>\n<div id=\"header\">\n{header}\n</div>\n<div id=\"footer\">\n{title}{footer}\n</div>\n</div>\n"
    );

    let prefix = ctx.side_buffer_mut(parts::BODY_PREFIX);
    prefix.push(layout);
    prefix.push("<div class=\"presentation\">\n".to_string());
    prefix.push("<div class=\"slide\" id=\"slide0\">\n".to_string());

    let suffix = ctx.side_buffer_mut(parts::BODY_SUFFIX);
    suffix.insert(0, "</div>\n".to_string());
    if t.section_count == 0 {
        suffix.insert(0, "</div>\n".to_string());
    }
    Ok(())
}

fn visit_section(t: &mut SlideTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if t.section_count == 0 {
        // closes slide0
        t.ctx.append("\n</div>\n");
    }
    t.section_count += 1;
    let level = t.ctx.enter_section();
    let class = if level > 1 { "section" } else { "slide" };
    t.ctx.append(format!("{}\n", starttag(cur.node, "div", class, &[])));
    Ok(Flow::Continue)
}

fn visit_subtitle(t: &mut SlideTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if !cur.parent_is(NodeTag::Section) {
        return handlers::visit_subtitle(t, cur);
    }
    let level = (t.ctx.section_level + t.settings.initial_header_level)
        .saturating_sub(1)
        .clamp(2, 6);
    t.ctx
        .append(starttag(cur.node, &format!("h{level}"), "", &[]));
    t.ctx.push_closing(format!("</h{level}>\n"));
    Ok(Flow::Continue)
}

fn depart_header(t: &mut SlideTranslator, _: &Cursor<'_>) -> Result<()> {
    let segment = t.ctx.release_region(parts::HEADER_REGION)?;
    t.ctx.side_buffer_mut(S5_HEADER).extend(segment);
    Ok(())
}

fn depart_footer(t: &mut SlideTranslator, _: &Cursor<'_>) -> Result<()> {
    let segment = t.ctx.release_region(parts::FOOTER_REGION)?;
    let footer = t.ctx.side_buffer_mut(S5_FOOTER);
    footer.push("<h2>".to_string());
    footer.extend(segment);
    footer.push("</h2>".to_string());
    Ok(())
}

/// Format implementation for S5 slideshows
#[derive(Debug, Default, Clone, Copy)]
pub struct SlidesFormat;

impl Format for SlidesFormat {
    fn name(&self) -> &str {
        "slides"
    }

    fn description(&self) -> &str {
        "S5 slideshow (XHTML 1.0 Strict)"
    }

    fn serialize_with_settings(
        &self,
        doc: &Node,
        settings: &Settings,
    ) -> Result<SerializedDocument> {
        ensure_document(doc)?;
        let translator = SlideTranslator::new(settings)?;
        let prepared = transforms::prepare(doc, true);
        translator.translate(&prepared)
    }
}
