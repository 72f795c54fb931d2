//! Enter/leave handlers of the XHTML writer.
//!
//! All handlers are generic over [`HtmlTranslate`] so the slideshow writer can
//! register them as its base table.

use super::escape::{comment_escape, html_escape};
use super::{parts, HtmlTranslate};
use crate::common::counters::reference_key;
use crate::common::dispatch::{close_marker, no_leave, pass_through, skip_node, Cursor, Flow, HandlerTable};
use crate::error::FormatError;
use crate::ir::nodes::{Node, NodeKind, NodeTag};
use crate::settings::TocBacklinks;

type Result<T> = std::result::Result<T, FormatError>;

/// The complete handler table of the XHTML writer.
pub fn base_table<T: HtmlTranslate>() -> HandlerTable<T> {
    let mut table = HandlerTable::new();
    table
        .register(NodeTag::Document, pass_through, depart_document)
        .register(NodeTag::Section, visit_section, depart_section)
        .register(NodeTag::Title, visit_title, depart_title)
        .register(NodeTag::Subtitle, visit_subtitle, depart_subtitle)
        .register(NodeTag::Paragraph, visit_paragraph, close_marker)
        .register(NodeTag::Text, visit_text, no_leave)
        .register(NodeTag::Emphasis, visit_emphasis, close_marker)
        .register(NodeTag::Strong, visit_strong, close_marker)
        .register(NodeTag::Literal, visit_literal, close_marker)
        .register(NodeTag::LiteralBlock, visit_literal_block, close_marker)
        .register(NodeTag::BulletList, visit_bullet_list, depart_list)
        .register(NodeTag::EnumeratedList, visit_enumerated_list, depart_list)
        .register(NodeTag::ListItem, visit_list_item, close_marker)
        .register(NodeTag::BlockQuote, visit_block_quote, close_marker)
        .register(NodeTag::Table, visit_table, close_marker)
        .register(NodeTag::TableGroup, visit_tgroup, no_leave)
        .register(NodeTag::ColSpec, skip_node, no_leave)
        .register(NodeTag::TableHead, visit_thead, close_marker)
        .register(NodeTag::TableBody, visit_tbody, close_marker)
        .register(NodeTag::Row, visit_row, close_marker)
        .register(NodeTag::Entry, visit_entry, close_marker)
        .register(NodeTag::Reference, visit_reference, close_marker)
        .register(NodeTag::Target, visit_target, close_marker)
        .register(NodeTag::Citation, visit_citation, close_marker)
        .register(NodeTag::Footnote, visit_citation, close_marker)
        .register(NodeTag::Label, visit_label, close_marker)
        .register(NodeTag::CitationReference, visit_citation_reference, close_marker)
        .register(NodeTag::FootnoteReference, visit_footnote_reference, no_leave)
        .register(NodeTag::Raw, visit_raw, no_leave)
        .register(NodeTag::Header, visit_header, depart_header)
        .register(NodeTag::Footer, visit_footer, depart_footer)
        .register(NodeTag::Decoration, pass_through, no_leave)
        .register(NodeTag::Topic, visit_topic, depart_topic)
        .register(NodeTag::Generated, visit_generated, close_marker)
        .register(NodeTag::Transition, visit_transition, no_leave)
        .register(NodeTag::Comment, visit_comment, no_leave)
        .register(NodeTag::Image, visit_image, no_leave);
    table
}

fn open_tag(node: &Node, tag: &str, class: &str, attrs: &[(&str, String)], empty: bool) -> String {
    let mut classes: Vec<&str> = class.split_whitespace().collect();
    for extra in &node.attributes.classes {
        if !classes.contains(&extra.as_str()) {
            classes.push(extra.as_str());
        }
    }
    let mut out = format!("<{tag}");
    if !classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", html_escape(&classes.join(" "))));
    }
    if let Some(id) = node.first_id() {
        out.push_str(&format!(" id=\"{}\"", html_escape(id)));
    }
    for (name, value) in attrs {
        out.push_str(&format!(" {name}=\"{}\"", html_escape(value)));
    }
    out.push_str(if empty { " />" } else { ">" });
    out
}

/// Opening tag carrying the node's id and classes plus `class`.
pub(crate) fn starttag(node: &Node, tag: &str, class: &str, attrs: &[(&str, String)]) -> String {
    open_tag(node, tag, class, attrs, false)
}

pub(crate) fn emptytag(node: &Node, tag: &str, class: &str, attrs: &[(&str, String)]) -> String {
    open_tag(node, tag, class, attrs, true)
}

/// Heading level of a title inside the current section.
pub(crate) fn heading_level(section_level: usize, initial_header_level: usize) -> usize {
    (section_level + initial_header_level).saturating_sub(1).clamp(1, 6)
}

fn depart_document<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<()> {
    let title = t.html().title_text.clone().unwrap_or_default();
    let ctx = t.context_mut();
    ctx.side_buffer_mut(parts::HEAD)
        .push(format!("<title>{}</title>\n", html_escape(&title)));
    ctx.side_buffer_mut(parts::BODY_PREFIX)
        .push(format!("{}\n", starttag(cur.node, "div", "document", &[])));
    ctx.side_buffer_mut(parts::BODY_SUFFIX)
        .insert(0, "</div>\n".to_string());
    Ok(())
}

pub(crate) fn visit_section<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.enter_section();
    ctx.append(format!("{}\n", starttag(cur.node, "div", "section", &[])));
    Ok(Flow::Continue)
}

pub(crate) fn depart_section<T: HtmlTranslate>(t: &mut T, _: &Cursor<'_>) -> Result<()> {
    let ctx = t.context_mut();
    ctx.leave_section()?;
    ctx.append("</div>\n");
    Ok(())
}

fn backlink<T: HtmlTranslate>(t: &T, title: &Node) -> Option<String> {
    let refid = title.extra("refid")?;
    match t.settings().toc_backlinks {
        TocBacklinks::Entry => Some(format!("#{refid}")),
        TocBacklinks::Top => t.html().contents_id.as_ref().map(|id| format!("#{id}")),
        TocBacklinks::None => None,
    }
}

pub(crate) fn visit_title<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let (open, close) = match cur.parent().map(Node::tag) {
        Some(NodeTag::Document) => {
            t.context_mut().capture_region(parts::TITLE_REGION);
            (starttag(node, "h1", "title", &[]), "</h1>\n".to_string())
        }
        Some(NodeTag::Section) => {
            let level = heading_level(
                t.context().section_level,
                t.settings().initial_header_level,
            );
            let heading = starttag(node, &format!("h{level}"), "", &[]);
            match backlink(t, node) {
                Some(href) => (
                    format!(
                        "{heading}<a class=\"toc-backref\" href=\"{}\">",
                        html_escape(&href)
                    ),
                    format!("</a></h{level}>\n"),
                ),
                None => (heading, format!("</h{level}>\n")),
            }
        }
        Some(NodeTag::Topic) => (
            starttag(node, "p", "topic-title first", &[]),
            "</p>\n".to_string(),
        ),
        Some(NodeTag::Table) => (starttag(node, "caption", "", &[]), "</caption>\n".to_string()),
        _ => (starttag(node, "p", "rubric", &[]), "</p>\n".to_string()),
    };
    let ctx = t.context_mut();
    ctx.append(open);
    ctx.push_closing(close);
    Ok(Flow::Continue)
}

pub(crate) fn depart_title<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<()> {
    t.context_mut().close()?;
    if cur.parent_is(NodeTag::Document) {
        let ctx = t.context_mut();
        let segment = ctx.release_region(parts::TITLE_REGION)?;
        ctx.side_buffer_mut(parts::BODY_PRE_DOCINFO)
            .extend(segment.iter().cloned());
        ctx.side_buffer_mut(parts::HTML_TITLE).extend(segment);
        t.html_mut().title_text = Some(cur.node.astext());
    }
    Ok(())
}

pub(crate) fn visit_subtitle<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let (open, close) = match cur.parent().map(Node::tag) {
        Some(NodeTag::Document) => {
            t.context_mut().capture_region(parts::SUBTITLE_REGION);
            (starttag(node, "h2", "subtitle", &[]), "</h2>\n".to_string())
        }
        Some(NodeTag::Section) => {
            let level = heading_level(
                t.context().section_level,
                t.settings().initial_header_level,
            );
            (
                starttag(node, &format!("h{level}"), "section-subtitle", &[]),
                format!("</h{level}>\n"),
            )
        }
        _ => (starttag(node, "p", "subtitle", &[]), "</p>\n".to_string()),
    };
    let ctx = t.context_mut();
    ctx.append(open);
    ctx.push_closing(close);
    Ok(Flow::Continue)
}

pub(crate) fn depart_subtitle<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<()> {
    let ctx = t.context_mut();
    ctx.close()?;
    if cur.parent_is(NodeTag::Document) {
        let segment = ctx.release_region(parts::SUBTITLE_REGION)?;
        ctx.side_buffer_mut(parts::BODY_PRE_DOCINFO)
            .extend(segment.iter().cloned());
        ctx.side_buffer_mut(parts::HTML_SUBTITLE).extend(segment);
    }
    Ok(())
}

fn visit_paragraph<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    // Entries of a generated table of contents are rendered without <p>.
    let compact = t.html().in_contents > 0 && cur.parent_is(NodeTag::ListItem);
    let ctx = t.context_mut();
    if compact {
        ctx.push_closing("");
    } else {
        ctx.append(starttag(cur.node, "p", "", &[]));
        ctx.push_closing("</p>\n");
    }
    Ok(Flow::Continue)
}

fn visit_text<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    if let Some(text) = cur.node.text_value() {
        t.context_mut().append(html_escape(text));
    }
    Ok(Flow::SkipChildren)
}

fn inline<T: HtmlTranslate>(t: &mut T, node: &Node, tag: &str, class: &str) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(starttag(node, tag, class, &[]));
    ctx.push_closing(format!("</{tag}>"));
    Ok(Flow::Continue)
}

fn visit_emphasis<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    inline(t, cur.node, "em", "")
}

fn visit_strong<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    inline(t, cur.node, "strong", "")
}

fn visit_literal<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    inline(t, cur.node, "tt", "docutils literal")
}

fn visit_literal_block<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(format!("{}\n", starttag(cur.node, "pre", "literal-block", &[])));
    ctx.push_closing("\n</pre>\n");
    Ok(Flow::Continue)
}

fn visit_bullet_list<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.enter_list();
    ctx.append(format!("{}\n", starttag(cur.node, "ul", "", &[])));
    Ok(Flow::Continue)
}

fn visit_enumerated_list<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let NodeKind::EnumeratedList { enumtype, start, .. } = &cur.node.kind else {
        return Ok(Flow::Continue);
    };
    let mut attrs = Vec::new();
    if *start != 1 {
        attrs.push(("start", start.to_string()));
    }
    let open = starttag(cur.node, "ol", enumtype.as_str(), &attrs);
    let ctx = t.context_mut();
    ctx.enter_list();
    ctx.append(format!("{open}\n"));
    Ok(Flow::Continue)
}

fn depart_list<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<()> {
    let ctx = t.context_mut();
    ctx.leave_list()?;
    ctx.append(if cur.node.is(NodeTag::BulletList) {
        "</ul>\n"
    } else {
        "</ol>\n"
    });
    Ok(())
}

fn visit_list_item<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.count_item();
    ctx.append(starttag(cur.node, "li", "", &[]));
    ctx.push_closing("</li>\n");
    Ok(Flow::Continue)
}

fn visit_block_quote<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(format!("{}\n", starttag(cur.node, "blockquote", "", &[])));
    ctx.push_closing("</blockquote>\n");
    Ok(Flow::Continue)
}

fn visit_table<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let border = if cur.node.has_class("borderless") { "0" } else { "1" };
    let open = starttag(cur.node, "table", "docutils", &[("border", border.to_string())]);
    let ctx = t.context_mut();
    ctx.append(format!("{open}\n"));
    ctx.push_closing("</table>\n");
    Ok(Flow::Continue)
}

fn visit_tgroup<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let widths: Vec<usize> = cur
        .node
        .children
        .iter()
        .filter_map(|c| match c.kind {
            NodeKind::ColSpec { colwidth } => Some(colwidth.unwrap_or(1).max(1)),
            _ => None,
        })
        .collect();
    if widths.is_empty() {
        return Ok(Flow::Continue);
    }
    let total: usize = widths.iter().sum();
    let mut colgroup = String::from("<colgroup>\n");
    for width in widths {
        colgroup.push_str(&format!("<col width=\"{}%\" />\n", width * 100 / total));
    }
    colgroup.push_str("</colgroup>\n");
    t.context_mut().append(colgroup);
    Ok(Flow::Continue)
}

fn visit_thead<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(format!(
        "{}\n",
        starttag(cur.node, "thead", "", &[("valign", "bottom".to_string())])
    ));
    ctx.push_closing("</thead>\n");
    Ok(Flow::Continue)
}

fn visit_tbody<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(format!(
        "{}\n",
        starttag(cur.node, "tbody", "", &[("valign", "top".to_string())])
    ));
    ctx.push_closing("</tbody>\n");
    Ok(Flow::Continue)
}

fn visit_row<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    ctx.append(format!("{}\n", starttag(cur.node, "tr", "", &[])));
    ctx.push_closing("</tr>\n");
    Ok(Flow::Continue)
}

fn visit_entry<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let (open, close) = if cur.has_ancestor(NodeTag::TableHead) {
        (starttag(cur.node, "th", "head", &[]), "</th>\n")
    } else {
        (starttag(cur.node, "td", "", &[]), "</td>\n")
    };
    let ctx = t.context_mut();
    ctx.append(open);
    ctx.push_closing(close);
    Ok(Flow::Continue)
}

fn visit_reference<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let open = match &node.kind {
        NodeKind::Reference {
            refuri: Some(uri), ..
        } => starttag(node, "a", "reference external", &[("href", uri.clone())]),
        NodeKind::Reference {
            refid: Some(id), ..
        } => starttag(node, "a", "reference internal", &[("href", format!("#{id}"))]),
        _ => starttag(node, "a", "reference", &[]),
    };
    let ctx = t.context_mut();
    ctx.append(open);
    ctx.push_closing("</a>");
    Ok(Flow::Continue)
}

fn visit_target<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let external = matches!(node.kind, NodeKind::Target { refuri: Some(_) });
    if node.children.is_empty() {
        if !external && node.first_id().is_some() {
            t.context_mut()
                .append(format!("{}</span>", starttag(node, "span", "target", &[])));
        }
        return Ok(Flow::SkipNode);
    }
    let ctx = t.context_mut();
    ctx.append(starttag(node, "span", "target", &[]));
    ctx.push_closing("</span>");
    Ok(Flow::Continue)
}

/// Citations and footnotes render as a two-column table: label, body.
fn visit_citation<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let class = if node.is(NodeTag::Citation) {
        "docutils citation"
    } else {
        "docutils footnote"
    };
    let mut open = starttag(
        node,
        "table",
        class,
        &[("frame", "void".to_string()), ("rules", "none".to_string())],
    );
    open.push_str("\n<colgroup><col class=\"label\" /><col /></colgroup>\n<tbody valign=\"top\">\n<tr>");
    if node.child(NodeTag::Label).is_none() {
        open.push_str("<td class=\"label\"></td><td>");
    }
    let ctx = t.context_mut();
    ctx.append(open);
    ctx.push_closing("</td></tr>\n</tbody>\n</table>\n");
    Ok(Flow::Continue)
}

fn visit_label<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let Some(parent) = cur.parent() else {
        return Ok(Flow::SkipNode);
    };
    let ctx = t.context_mut();
    match parent.tag() {
        NodeTag::Citation => {
            ctx.append("<td class=\"label\">[");
            ctx.push_closing("]</td><td>");
            Ok(Flow::Continue)
        }
        NodeTag::Footnote => {
            let number = ctx.footnotes.number_for(&reference_key(parent));
            ctx.append(format!("<td class=\"label\">[{number}]</td><td>"));
            Ok(Flow::SkipNode)
        }
        _ => Ok(Flow::SkipNode),
    }
}

fn visit_citation_reference<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let key = reference_key(cur.node);
    let open = starttag(cur.node, "a", "citation-reference", &[("href", format!("#{key}"))]);
    let ctx = t.context_mut();
    ctx.citations.number_for(&key);
    ctx.append(format!("{open}["));
    ctx.push_closing("]</a>");
    Ok(Flow::Continue)
}

fn visit_footnote_reference<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let key = reference_key(cur.node);
    let open = starttag(cur.node, "a", "footnote-reference", &[("href", format!("#{key}"))]);
    let ctx = t.context_mut();
    let number = ctx.footnotes.number_for(&key);
    ctx.append(format!("{open}[{number}]</a>"));
    Ok(Flow::SkipNode)
}

fn visit_raw<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    if let NodeKind::Raw { format, text } = &cur.node.kind {
        if cur.node.raw_targets("html") {
            t.context_mut().append(text.clone());
        } else {
            log::warn!("dropping raw '{format}' content from HTML output");
        }
    }
    Ok(Flow::SkipNode)
}

pub(crate) fn visit_header<T: HtmlTranslate>(t: &mut T, _: &Cursor<'_>) -> Result<Flow> {
    t.context_mut().capture_region(parts::HEADER_REGION);
    Ok(Flow::Continue)
}

fn depart_header<T: HtmlTranslate>(t: &mut T, _: &Cursor<'_>) -> Result<()> {
    let ctx = t.context_mut();
    let segment = ctx.release_region(parts::HEADER_REGION)?;
    let prefix = ctx.side_buffer_mut(parts::BODY_PREFIX);
    prefix.push("<div class=\"header\">\n".to_string());
    prefix.extend(segment);
    prefix.push("\n<hr class=\"header\" />\n</div>\n".to_string());
    Ok(())
}

pub(crate) fn visit_footer<T: HtmlTranslate>(t: &mut T, _: &Cursor<'_>) -> Result<Flow> {
    t.context_mut().capture_region(parts::FOOTER_REGION);
    Ok(Flow::Continue)
}

fn depart_footer<T: HtmlTranslate>(t: &mut T, _: &Cursor<'_>) -> Result<()> {
    let ctx = t.context_mut();
    let segment = ctx.release_region(parts::FOOTER_REGION)?.concat();
    ctx.side_buffer_mut(parts::BODY_SUFFIX).insert(
        0,
        format!("<div class=\"footer\">\n<hr class=\"footer\" />\n{segment}\n</div>\n"),
    );
    Ok(())
}

fn visit_topic<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    if node.has_class("contents") {
        let html = t.html_mut();
        html.in_contents += 1;
        if html.contents_id.is_none() {
            html.contents_id = node.first_id().map(str::to_string);
        }
    }
    let ctx = t.context_mut();
    ctx.append(format!("{}\n", starttag(node, "div", "topic", &[])));
    ctx.push_closing("</div>\n");
    Ok(Flow::Continue)
}

fn depart_topic<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<()> {
    t.context_mut().close()?;
    if cur.node.has_class("contents") {
        let html = t.html_mut();
        html.in_contents = html.in_contents.saturating_sub(1);
    }
    Ok(())
}

fn visit_generated<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    let ctx = t.context_mut();
    if cur.node.attributes.classes.is_empty() && cur.node.first_id().is_none() {
        ctx.push_closing("");
    } else {
        ctx.append(starttag(cur.node, "span", "", &[]));
        ctx.push_closing("</span>");
    }
    Ok(Flow::Continue)
}

fn visit_transition<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    t.context_mut()
        .append(format!("{}\n", emptytag(cur.node, "hr", "docutils", &[])));
    Ok(Flow::SkipNode)
}

fn visit_comment<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    t.context_mut()
        .append(format!("<!-- {} -->\n", comment_escape(&cur.node.astext())));
    Ok(Flow::SkipNode)
}

fn visit_image<T: HtmlTranslate>(t: &mut T, cur: &Cursor<'_>) -> Result<Flow> {
    if let NodeKind::Image { uri, alt } = &cur.node.kind {
        let alt = alt.clone().unwrap_or_else(|| uri.clone());
        let tag = emptytag(cur.node, "img", "", &[("alt", alt), ("src", uri.clone())]);
        t.context_mut().append(tag);
    }
    Ok(Flow::SkipNode)
}
