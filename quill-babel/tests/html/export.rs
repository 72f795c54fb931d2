//! Export tests for the XHTML writer.

use crate::common::render;
use quill_babel::ir::build::{
    contents, document, enumerated_list, footnote, footnote_reference, list_item, para,
    paragraph, raw, section, title,
};
use quill_babel::ir::nodes::EnumType;
use quill_babel::{Node, NodeKind, Settings, TocBacklinks};
use roxmltree::{Document, ParsingOptions};

fn html(doc: &Node) -> String {
    render(doc, "html", &Settings::default())
}

fn guide() -> Node {
    document(vec![
        title(vec![Node::text("Guide")]),
        contents("Contents", "contents"),
        section("Intro", vec![para("Start here.")]),
        section("Usage", vec![section("Flags", vec![para("--verbose")])]),
    ])
}

#[test]
fn page_skeleton() {
    let page = html(&document(vec![para("Hello & welcome")]));
    assert!(page.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\""));
    assert!(page.contains("<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n"));
    assert!(page.contains("<body>\n<div class=\"document\">\n<p>Hello &amp; welcome</p>\n</div>\n</body>\n</html>\n"));
}

#[test]
fn document_title_and_sections() {
    let page = html(&guide());
    assert!(page.contains("<title>Guide</title>\n"));
    assert!(page.contains("<div class=\"document\">\n<h1 class=\"title\">Guide</h1>\n"));
    assert!(page.contains("<div class=\"section\" id=\"usage\">\n"));
    assert!(page.contains("<div class=\"section\" id=\"flags\">\n<h2>"));
}

#[test]
fn contents_entries_link_to_sections() {
    let page = html(&guide());
    assert!(page.contains("<div class=\"topic contents\" id=\"contents\">\n"));
    assert!(page.contains(
        "<li><a class=\"reference internal\" id=\"toc-entry-1\" href=\"#intro\">Intro</a></li>\n"
    ));
}

#[test]
fn contents_nesting_follows_section_nesting() {
    let page = html(&guide());
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let parsed = Document::parse_with_options(&page, options).unwrap();
    let list_depth = |href: &str| {
        let link = parsed
            .descendants()
            .find(|n| n.has_tag_name("a") && n.attribute("href") == Some(href))
            .unwrap_or_else(|| panic!("no contents entry for {href}"));
        link.ancestors().filter(|n| n.has_tag_name("ul")).count()
    };
    assert_eq!(list_depth("#intro"), 1);
    assert_eq!(list_depth("#usage"), 1);
    assert_eq!(list_depth("#flags"), 2);
}

#[test]
fn section_titles_link_back_to_their_entry() {
    let page = html(&guide());
    assert!(page.contains(
        "<h1><a class=\"toc-backref\" href=\"#toc-entry-1\">Intro</a></h1>\n"
    ));
}

#[test]
fn backlinks_to_the_top_or_none() {
    let top = Settings {
        toc_backlinks: TocBacklinks::Top,
        ..Settings::default()
    };
    let page = render(&guide(), "html", &top);
    assert!(page.contains("<h1><a class=\"toc-backref\" href=\"#contents\">Intro</a></h1>\n"));

    let none = Settings {
        toc_backlinks: TocBacklinks::None,
        ..Settings::default()
    };
    let page = render(&guide(), "html", &none);
    assert!(page.contains("<h1>Intro</h1>\n"));
    assert!(!page.contains("toc-backref"));
}

#[test]
fn initial_header_level_shifts_headings() {
    let settings = Settings {
        initial_header_level: 2,
        ..Settings::default()
    };
    let page = render(&guide(), "html", &settings);
    assert!(page.contains("<h3><a class=\"toc-backref\" href=\"#toc-entry-3\">Flags</a></h3>\n"));
}

#[test]
fn footnotes_render_as_tables() {
    let page = html(&document(vec![
        paragraph(vec![Node::text("Claim"), footnote_reference("fn1", "1")]),
        footnote("fn1", "1", vec![para("Source.")]),
    ]));
    assert!(page.contains("Claim<a class=\"footnote-reference\" href=\"#fn1\">[1]</a>"));
    assert!(page.contains("<table class=\"docutils footnote\" id=\"fn1\" frame=\"void\" rules=\"none\">"));
    assert!(page.contains("<td class=\"label\">[1]</td><td><p>Source.</p>\n</td></tr>"));
}

#[test]
fn page_header_and_footer_wrap_the_document() {
    let decoration = Node::new(NodeKind::Decoration).with_children(vec![
        Node::new(NodeKind::Header).with_child(para("Top")),
        Node::new(NodeKind::Footer).with_child(para("Bottom")),
    ]);
    let page = html(&document(vec![decoration, para("Body.")]));
    assert!(page.contains(
        "<body>\n<div class=\"header\">\n<p>Top</p>\n\n<hr class=\"header\" />\n</div>\n<div class=\"document\">\n"
    ));
    assert!(page.contains(
        "</div>\n<div class=\"footer\">\n<hr class=\"footer\" />\n<p>Bottom</p>\n\n</div>\n</body>"
    ));
}

#[test]
fn raw_html_passes_through() {
    let page = html(&document(vec![raw("html", "<hr />"), raw("latex", "\\newpage")]));
    assert!(page.contains("<hr />"));
    assert!(!page.contains("newpage"));
}

#[test]
fn stylesheets_are_linked() {
    let settings = Settings {
        stylesheets: vec!["site.css".to_string()],
        ..Settings::default()
    };
    let page = render(&document(vec![para("x")]), "html", &settings);
    assert!(page.contains("<link rel=\"stylesheet\" href=\"site.css\" type=\"text/css\" />\n"));
}

#[test]
fn requested_section_numbers_ignore_the_latex_numbering_switch() {
    let doc = document(vec![section("First", vec![para("x")])]).with_extra("sectnum", "");
    let numbered = "<h1><span class=\"sectnum\">1&nbsp;&nbsp;&nbsp;</span>First</h1>";
    assert!(html(&doc).contains(numbered));

    let latex_numbering = Settings {
        use_section_numbering: true,
        ..Settings::default()
    };
    assert!(render(&doc, "html", &latex_numbering).contains(numbered));
}

#[test]
fn enumerated_list_keeps_its_start() {
    let page = html(&document(vec![enumerated_list(
        EnumType::LowerAlpha,
        "",
        ")",
        2,
        vec![list_item(vec![para("b")]), list_item(vec![para("c")])],
    )]));
    let open = page
        .lines()
        .find(|line| line.starts_with("<ol"))
        .expect("ordered list");
    assert!(open.contains("class=\"loweralpha\""), "{open}");
    assert!(open.contains("start=\"2\""), "{open}");
    assert_eq!(page.matches("<li>").count(), 2);
}
