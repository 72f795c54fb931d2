//! Enter/leave handlers of the LaTeX writer.

use super::escape::{encode, encode_literal_block, escape_latex_text, escape_url, EncodeMode};
use super::table::{column_spec, column_widths};
use super::{parts, LatexTranslator};
use crate::common::counters::reference_key;
use crate::common::dispatch::{close_marker, no_leave, pass_through, skip_node, Cursor, Flow, HandlerTable};
use crate::error::FormatError;
use crate::ir::nodes::{EnumType, Node, NodeKind, NodeTag};
use crate::transforms::requested_sectnum_depth;

type Result<T> = std::result::Result<T, FormatError>;

const SECTION_NAMES: [&str; 5] = [
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

const SECTION_RULE: &str =
    "\n\n%___________________________________________________________________________\n\n";

const TABLE_REQUIREMENTS: &str = "\\usepackage{longtable}
\\usepackage{array}
\\setlength{\\extrarowheight}{2pt}
\\newlength{\\DUtablewidth} % internal use in tables
";

pub fn table() -> HandlerTable<LatexTranslator> {
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
        .register(NodeTag::Literal, visit_literal, depart_literal)
        .register(NodeTag::LiteralBlock, visit_literal_block, depart_literal_block)
        .register(NodeTag::BulletList, visit_bullet_list, depart_bullet_list)
        .register(NodeTag::EnumeratedList, visit_enumerated_list, depart_enumerated_list)
        .register(NodeTag::ListItem, visit_list_item, no_leave)
        .register(NodeTag::BlockQuote, visit_block_quote, close_marker)
        .register(NodeTag::Table, visit_table, close_marker)
        .register(NodeTag::TableGroup, visit_tgroup, no_leave)
        .register(NodeTag::ColSpec, skip_node, no_leave)
        .register(NodeTag::TableHead, pass_through, depart_thead)
        .register(NodeTag::TableBody, pass_through, no_leave)
        .register(NodeTag::Row, pass_through, depart_row)
        .register(NodeTag::Entry, visit_entry, close_marker)
        .register(NodeTag::Reference, visit_reference, close_marker)
        .register(NodeTag::Target, visit_target, close_marker)
        .register(NodeTag::Citation, visit_citation, depart_citation)
        .register(NodeTag::CitationReference, visit_citation_reference, no_leave)
        .register(NodeTag::Footnote, visit_footnote, close_marker)
        .register(NodeTag::FootnoteReference, visit_footnote_reference, no_leave)
        .register(NodeTag::Label, skip_node, no_leave)
        .register(NodeTag::Raw, visit_raw, no_leave)
        .register(NodeTag::Header, visit_page_decoration, depart_page_decoration)
        .register(NodeTag::Footer, visit_page_decoration, depart_page_decoration)
        .register(NodeTag::Decoration, pass_through, no_leave)
        .register(NodeTag::Topic, visit_topic, depart_topic)
        .register(NodeTag::Generated, pass_through, no_leave)
        .register(NodeTag::Transition, visit_transition, no_leave)
        .register(NodeTag::Comment, visit_comment, no_leave)
        .register(NodeTag::Image, visit_image, no_leave);
    table
}

fn is_contents(node: &Node) -> bool {
    node.is(NodeTag::Topic) && node.has_class("contents")
}

fn in_contents(cur: &Cursor<'_>) -> bool {
    cur.ancestors().any(is_contents)
}

fn depart_document(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    if t.settings.use_citation_shorthand {
        for key in t.ctx.citations.keys() {
            if !t.bibitems.iter().any(|label| label == key) {
                log::warn!("citation '{key}' is referenced but never defined");
            }
        }
        for label in &t.bibitems {
            if !t.ctx.citations.contains(label) {
                log::warn!("citation '{label}' is never referenced");
            }
        }
    }

    let bibitems = t.ctx.take_side_buffer(parts::BIBITEMS);
    if !bibitems.is_empty() {
        let widest = t
            .bibitems
            .iter()
            .fold("", |widest, label| {
                if label.chars().count() > widest.chars().count() {
                    label.as_str()
                } else {
                    widest
                }
            })
            .to_string();
        let bibliography = t.ctx.side_buffer_mut(parts::BIBLIOGRAPHY);
        bibliography.push(format!(
            "\n\\begin{{thebibliography}}{{{}}}\n",
            escape_latex_text(&widest)
        ));
        bibliography.extend(bibitems);
        bibliography.push("\\end{thebibliography}\n".to_string());
    }

    if t.settings.use_section_numbering && requested_sectnum_depth(cur.node).is_none() {
        t.require("secnumdepth", "\\setcounter{secnumdepth}{0}\n");
    }
    Ok(())
}

fn visit_section(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.ctx.enter_section();
    t.ctx.append(SECTION_RULE);
    Ok(Flow::Continue)
}

fn depart_section(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    t.ctx.leave_section()?;
    Ok(())
}

fn section_name(level: usize) -> &'static str {
    SECTION_NAMES[level.clamp(1, SECTION_NAMES.len()) - 1]
}

fn visit_title(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let Some(parent) = cur.parent() else {
        return Ok(Flow::SkipNode);
    };
    match parent.tag() {
        NodeTag::Document => t.ctx.capture_region(parts::TITLE),
        NodeTag::Section => {
            let level = t.ctx.section_level;
            let starred = !t.settings.use_section_numbering || level > SECTION_NAMES.len();
            let star = if starred { "*" } else { "" };
            t.ctx.append(format!("\\{}{star}{{", section_name(level)));
            t.ctx.push_offset();
        }
        NodeTag::Topic if is_contents(parent) => {
            t.ctx.append("\\subsubsection*{~\\hfill ");
            t.ctx.push_offset();
        }
        NodeTag::Topic => {
            t.ctx.append("\\textbf{");
            t.ctx.push_closing("}\n");
        }
        NodeTag::Table => t.ctx.capture_region(parts::TABLE_CAPTION),
        _ => {
            t.ctx.append("\n\\textbf{");
            t.ctx.push_closing("}\n");
        }
    }
    Ok(Flow::Continue)
}

/// Close a heading: table of contents entry and label.
fn heading_tail(
    t: &mut LatexTranslator,
    suffix: &str,
    level_name: &str,
    starred: bool,
    id: Option<&str>,
) -> Result<()> {
    let start = t.ctx.pop_offset()?;
    let text = t.ctx.text_since(start);
    let mut tail = format!("{suffix}%\n");
    if starred {
        tail.push_str(&format!(
            "  \\phantomsection%\n  \\addcontentsline{{toc}}{{{level_name}}}{{{text}}}%\n"
        ));
    }
    if let Some(id) = id {
        tail.push_str(&format!("  \\label{{{id}}}%\n"));
    }
    tail.push_str("}\n");
    t.ctx.append(tail);
    Ok(())
}

fn depart_title(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    let Some(parent) = cur.parent() else {
        return Ok(());
    };
    match parent.tag() {
        NodeTag::Document => t.ctx.release_region_into(parts::TITLE),
        NodeTag::Section => {
            let level = t.ctx.section_level;
            let starred = !t.settings.use_section_numbering || level > SECTION_NAMES.len();
            heading_tail(t, "", section_name(level), starred, parent.first_id())
        }
        NodeTag::Topic if is_contents(parent) => {
            heading_tail(t, "\\hfill ~", "section", true, parent.first_id())
        }
        NodeTag::Table => t.ctx.release_region_into(parts::TABLE_CAPTION),
        _ => t.ctx.close(),
    }
}

fn visit_subtitle(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if cur.parent_is(NodeTag::Document) {
        t.ctx.capture_region(parts::SUBTITLE);
    } else {
        t.ctx.append("\n\\textbf{");
        t.ctx.push_closing("}\n");
    }
    Ok(Flow::Continue)
}

fn depart_subtitle(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    if cur.parent_is(NodeTag::Document) {
        t.ctx.release_region_into(parts::SUBTITLE)
    } else {
        t.ctx.close()
    }
}

fn visit_paragraph(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    // the first paragraph of an item continues the `\item` line
    if !(cur.parent_is(NodeTag::ListItem) && cur.is_first_child()) {
        t.ctx.append("\n");
    }
    t.ctx.push_closing("\n");
    Ok(Flow::Continue)
}

fn visit_text(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if let Some(text) = cur.node.text_value() {
        let mode = t.encode_mode();
        let encoded = match mode {
            EncodeMode::LiteralBlock => encode_literal_block(text, &mut t.quotes),
            _ => encode(text, mode, &mut t.quotes),
        };
        t.ctx.append(encoded);
    }
    Ok(Flow::SkipChildren)
}

fn command(t: &mut LatexTranslator, name: &str) -> Result<Flow> {
    t.ctx.append(format!("\\{name}{{"));
    t.ctx.push_closing("}");
    Ok(Flow::Continue)
}

fn visit_emphasis(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    command(t, "emph")
}

fn visit_strong(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    command(t, "textbf")
}

fn visit_literal(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.inline_literal_depth += 1;
    command(t, "texttt")
}

fn depart_literal(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    t.inline_literal_depth = t.inline_literal_depth.saturating_sub(1);
    t.ctx.close()
}

fn visit_literal_block(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.literal_block_depth += 1;
    t.ctx
        .append("%\n\\begin{quote}{\\ttfamily \\raggedright \\noindent\n");
    t.ctx.push_closing("\n}\n\\end{quote}\n");
    Ok(Flow::Continue)
}

fn depart_literal_block(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    t.literal_block_depth = t.literal_block_depth.saturating_sub(1);
    t.ctx.close()
}

fn visit_bullet_list(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    t.ctx.enter_list();
    if in_contents(cur) {
        t.ctx.append("%\n\\begin{list}{}{}\n");
        t.ctx.push_closing("\n\\end{list}\n");
    } else {
        t.ctx.append("%\n\\begin{itemize}\n");
        t.ctx.push_closing("\n\\end{itemize}\n");
    }
    Ok(Flow::Continue)
}

fn depart_bullet_list(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    let frame = t.ctx.leave_list()?;
    if frame.is_empty() {
        t.ctx.append("\n\\item[]");
    }
    t.ctx.close()
}

fn counter_command(enumtype: EnumType) -> &'static str {
    match enumtype {
        EnumType::Arabic => "arabic",
        EnumType::LowerAlpha => "alph",
        EnumType::UpperAlpha => "Alph",
        EnumType::LowerRoman => "roman",
        EnumType::UpperRoman => "Roman",
    }
}

fn visit_enumerated_list(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let NodeKind::EnumeratedList {
        enumtype,
        prefix,
        suffix,
        start,
    } = &cur.node.kind
    else {
        return Ok(Flow::Continue);
    };
    let counter = format!("listcnt{}", t.enumeration_depth);
    t.enumeration_depth += 1;

    let mut out = if t.counters.insert(counter.clone()) {
        format!("\\newcounter{{{counter}}}\n")
    } else {
        format!("\\setcounter{{{counter}}}{{0}}\n")
    };
    out.push_str(&format!(
        "\\begin{{list}}{{{}\\{}{{{counter}}}{}}}\n{{\n\\usecounter{{{counter}}}\n",
        escape_latex_text(prefix),
        counter_command(*enumtype),
        escape_latex_text(suffix),
    ));
    if *start != 1 {
        let offset = i64::try_from(*start).unwrap_or(i64::MAX) - 1;
        out.push_str(&format!("\\addtocounter{{{counter}}}{{{offset}}}\n"));
    }
    out.push_str("\\setlength{\\rightmargin}{\\leftmargin}\n}\n");

    t.ctx.enter_list();
    t.ctx.append(out);
    Ok(Flow::Continue)
}

fn depart_enumerated_list(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    let frame = t.ctx.leave_list()?;
    t.enumeration_depth = t.enumeration_depth.saturating_sub(1);
    if frame.is_empty() {
        t.ctx.append("\n\\item[]\n");
    }
    t.ctx.append("\\end{list}\n");
    Ok(())
}

fn visit_list_item(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.ctx.count_item();
    t.ctx.append("\n\\item ");
    Ok(Flow::Continue)
}

fn visit_block_quote(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.ctx.append("%\n\\begin{quote}\n");
    t.ctx.push_closing("\n\\end{quote}\n");
    Ok(Flow::Continue)
}

fn has_borders(table: Option<&Node>) -> bool {
    !table.is_some_and(|table| table.has_class("borderless"))
}

fn enclosing_table<'a>(cur: &Cursor<'a>) -> Option<&'a Node> {
    cur.ancestors().find(|a| a.is(NodeTag::Table))
}

fn visit_table(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.require("table", TABLE_REQUIREMENTS);
    t.ctx
        .append("\n\\leavevmode\n\\setlength{\\DUtablewidth}{\\linewidth}\n");
    t.ctx.push_closing("\\end{longtable}\n");
    Ok(Flow::Continue)
}

fn visit_tgroup(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let borders = has_borders(cur.parent());
    let spec = column_spec(&column_widths(cur.node), borders);
    let caption = t.ctx.take_side_buffer(parts::TABLE_CAPTION).concat();
    let mut out = format!("\\begin{{longtable}}[c]{{{spec}}}\n");
    if !caption.is_empty() {
        out.push_str(&format!("\\caption{{{caption}}}\\\\\n"));
    }
    if borders {
        out.push_str("\\hline\n");
    }
    t.ctx.append(out);
    Ok(Flow::Continue)
}

fn depart_thead(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    t.ctx.append("\\endhead\n");
    Ok(())
}

fn depart_row(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    t.ctx.append(" \\\\\n");
    if has_borders(enclosing_table(cur)) {
        t.ctx.append("\\hline\n");
    }
    Ok(())
}

fn visit_entry(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if !cur.is_first_child() {
        t.ctx.append(" & ");
    }
    if cur.has_ancestor(NodeTag::TableHead) {
        t.ctx.append("\\textbf{");
        t.ctx.push_closing("}");
    } else {
        t.ctx.push_closing("");
    }
    Ok(Flow::Continue)
}

fn visit_reference(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let open = match &cur.node.kind {
        NodeKind::Reference {
            refuri: Some(uri), ..
        } => format!("\\href{{{}}}{{", escape_url(uri)),
        NodeKind::Reference {
            refid: Some(id), ..
        } => format!("\\hyperref[{id}]{{"),
        _ => {
            t.ctx.push_closing("");
            return Ok(Flow::Continue);
        }
    };
    t.ctx.append(open);
    t.ctx.push_closing("}");
    Ok(Flow::Continue)
}

fn visit_target(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let node = cur.node;
    let id = match node.kind {
        NodeKind::Target { refuri: None } => node.first_id(),
        _ => None,
    };
    match (id, node.children.is_empty()) {
        (Some(id), true) => {
            t.ctx.append(format!("\\hypertarget{{{id}}}{{}}"));
            Ok(Flow::SkipNode)
        }
        (None, true) => Ok(Flow::SkipNode),
        (Some(id), false) => {
            t.ctx.append(format!("\\hypertarget{{{id}}}{{"));
            t.ctx.push_closing("}");
            Ok(Flow::Continue)
        }
        (None, false) => {
            t.ctx.push_closing("");
            Ok(Flow::Continue)
        }
    }
}

fn citation_label(node: &Node) -> String {
    node.child(NodeTag::Label)
        .map(Node::astext)
        .unwrap_or_else(|| reference_key(node))
}

fn visit_citation(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let label = citation_label(cur.node);
    if t.settings.use_citation_shorthand {
        t.ctx.capture_region(parts::BIBITEMS);
        t.ctx.append(format!(
            "\\bibitem[{}]{{{label}}}{{",
            escape_latex_text(&label)
        ));
        t.bibitems.push(label);
    } else {
        t.ctx.append(format!(
            "\n\\begin{{description}}\n\\item[{{[}}{}{{]}}] \\hypertarget{{{}}}{{}}",
            escape_latex_text(&label),
            reference_key(cur.node)
        ));
    }
    Ok(Flow::Continue)
}

fn depart_citation(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<()> {
    if t.settings.use_citation_shorthand {
        t.ctx.append("}\n");
        t.ctx.release_region_into(parts::BIBITEMS)
    } else {
        t.ctx.append("\\end{description}\n");
        Ok(())
    }
}

/// Whether the reference is followed by a single-space or newline separator
/// and another citation reference.
fn merges_with_next(cur: &Cursor<'_>) -> bool {
    let separator = cur
        .next_sibling(0)
        .and_then(Node::text_value)
        .is_some_and(|text| text == " " || text == "\n");
    separator
        && cur
            .next_sibling(1)
            .is_some_and(|n| n.is(NodeTag::CitationReference))
}

fn visit_citation_reference(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let key = cur.node.astext();
    t.ctx.citations.number_for(&key);
    if !t.settings.use_citation_shorthand {
        t.ctx.append(format!(
            "{{[}}\\hyperlink{{{}}}{{{}}}{{]}}",
            reference_key(cur.node),
            escape_latex_text(&key)
        ));
        return Ok(Flow::SkipNode);
    }

    if t.open_cite {
        t.ctx.pop_fragment_if(|f| f == " " || f == "\n");
        t.ctx.append(format!(",{key}"));
    } else {
        t.ctx.append(format!("\\cite{{{key}"));
    }
    t.open_cite = merges_with_next(cur);
    if !t.open_cite {
        t.ctx.append("}");
    }
    Ok(Flow::SkipNode)
}

fn visit_footnote(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let number = t.ctx.footnotes.number_for(&reference_key(cur.node));
    t.ctx.append(format!("\\footnotetext[{number}]{{"));
    t.ctx.push_closing("}\n");
    Ok(Flow::Continue)
}

fn visit_footnote_reference(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let number = t.ctx.footnotes.number_for(&reference_key(cur.node));
    t.ctx.append(format!("\\footnotemark[{number}]"));
    Ok(Flow::SkipNode)
}

fn visit_raw(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if let NodeKind::Raw { format, text } = &cur.node.kind {
        if cur.node.raw_targets("latex") {
            t.ctx.append(text.clone());
        } else {
            log::warn!("dropping raw '{format}' content from LaTeX output");
        }
    }
    Ok(Flow::SkipNode)
}

fn page_part(cur: &Cursor<'_>) -> (&'static str, &'static str) {
    if cur.node.is(NodeTag::Header) {
        (parts::PAGE_HEADER, "fancyhead")
    } else {
        (parts::PAGE_FOOTER, "fancyfoot")
    }
}

fn visit_page_decoration(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    t.ctx.capture_region(page_part(cur).0);
    Ok(Flow::Continue)
}

fn depart_page_decoration(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    let (region, command) = page_part(cur);
    let text = t.ctx.release_region(region)?.concat();
    t.require("fancyhdr", "\\usepackage{fancyhdr}\n\\pagestyle{fancy}\n");
    t.require(command, format!("\\{command}[L]{{{}}}\n", text.trim()));
    Ok(())
}

fn visit_topic(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if !is_contents(cur.node) {
        t.ctx.append("%\n\\begin{quote}\n");
        t.ctx.push_closing("\n\\end{quote}\n");
        return Ok(Flow::Continue);
    }
    if t.settings.use_toc_linking {
        let title = cur
            .node
            .child(NodeTag::Title)
            .map(Node::astext)
            .unwrap_or_else(|| "Contents".to_string());
        t.ctx.append(format!(
            "\n\\renewcommand{{\\contentsname}}{{{}}}\n\\tableofcontents\n\n",
            escape_latex_text(&title)
        ));
        return Ok(Flow::SkipNode);
    }
    Ok(Flow::Continue)
}

fn depart_topic(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<()> {
    if is_contents(cur.node) {
        Ok(())
    } else {
        t.ctx.close()
    }
}

fn visit_transition(t: &mut LatexTranslator, _: &Cursor<'_>) -> Result<Flow> {
    t.ctx
        .append("\n\n%\n\\hspace*{\\fill}\\hrulefill\\hspace*{\\fill}\n\n");
    Ok(Flow::SkipNode)
}

fn visit_comment(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    let text = cur.node.astext();
    let mut out = String::from("\n");
    for line in text.lines() {
        out.push_str(&format!("% {line}\n"));
    }
    t.ctx.append(out);
    Ok(Flow::SkipNode)
}

fn visit_image(t: &mut LatexTranslator, cur: &Cursor<'_>) -> Result<Flow> {
    if let NodeKind::Image { uri, .. } = &cur.node.kind {
        t.require("graphicx", "\\usepackage{graphicx}\n");
        let inline = cur.parent_is(NodeTag::Paragraph);
        let graphic = format!("\\includegraphics{{{uri}}}");
        t.ctx.append(if inline {
            graphic
        } else {
            format!("\n{graphic}\n")
        });
    }
    Ok(Flow::SkipNode)
}
