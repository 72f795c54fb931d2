//! Layout of the generated slideshow page.

use crate::common::render;
use quill_babel::ir::build::{document, para, section, subtitle, title};
use quill_babel::{FormatError, FormatRegistry, Node, NodeKind, Settings};
use roxmltree::{Document, ParsingOptions};

fn url_settings() -> Settings {
    Settings::default().with_theme_url("http://example.org/ui/big/")
}

fn parse(page: &str) -> Document<'_> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(page, options)
        .unwrap_or_else(|e| panic!("slideshow is not well-formed XML: {e}\n{page}"))
}

fn divs_with_class<'a>(doc: &'a Document<'a>, class: &str) -> Vec<roxmltree::Node<'a, 'a>> {
    doc.descendants()
        .filter(|n| n.has_tag_name("div") && n.attribute("class") == Some(class))
        .collect()
}

fn talk() -> Node {
    document(vec![
        title(vec![Node::text("Talk")]),
        section("Intro", vec![para("Hello.")]),
        section(
            "Usage",
            vec![
                subtitle(vec![Node::text("In practice")]),
                section("Detail", vec![para("Fine print.")]),
            ],
        ),
    ])
}

#[test]
fn every_top_level_section_is_a_slide() {
    let page = render(&talk(), "slides", &url_settings());
    let doc = parse(&page);

    let slides = divs_with_class(&doc, "slide");
    let ids: Vec<_> = slides.iter().filter_map(|n| n.attribute("id")).collect();
    assert_eq!(ids, vec!["slide0", "intro", "usage"]);

    let presentation = divs_with_class(&doc, "presentation");
    assert_eq!(presentation.len(), 1);
    assert!(slides
        .iter()
        .all(|s| s.parent_element() == Some(presentation[0])));
}

#[test]
fn nested_sections_stay_inside_their_slide() {
    let page = render(&talk(), "slides", &url_settings());
    let doc = parse(&page);
    let nested = divs_with_class(&doc, "section");
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].attribute("id"), Some("detail"));
    assert_eq!(
        nested[0].parent_element().and_then(|p| p.attribute("id")),
        Some("usage")
    );
}

#[test]
fn title_slide_and_footer_carry_the_document_title() {
    let page = render(&talk(), "slides", &url_settings());
    assert!(page.contains("<title>Talk</title>\n"));
    assert!(page.contains("<div class=\"slide\" id=\"slide0\">\n<h1 class=\"title\">Talk</h1>\n"));
    assert!(page.contains("<div id=\"footer\">\n<h1>Talk</h1>\n"));
}

#[test]
fn section_subtitles_are_second_level_headings() {
    let page = render(&talk(), "slides", &url_settings());
    assert!(page.contains("<h2>In practice</h2>\n"));
}

#[test]
fn head_links_the_theme() {
    let page = render(&talk(), "slides", &url_settings());
    assert!(page.contains("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\""));
    assert!(page.contains("<meta name=\"version\" content=\"S5 1.1\" />\n"));
    assert!(page.contains("<meta name=\"defaultView\" content=\"slideshow\" />\n"));
    assert!(page.contains(
        "<script src=\"http://example.org/ui/big/slides.js\" type=\"text/javascript\"></script>\n"
    ));
    assert!(page.contains("href=\"http://example.org/ui/big/slides.css\""));
    assert!(page.contains("#currentSlide {display: none;}"));
}

#[test]
fn theme_script_follows_the_stylesheet_links() {
    let page = render(&talk(), "slides", &url_settings());
    let script = page.find("/slides.js\"").expect("script tag");
    let last_link = page.find("id=\"operaFix\"").expect("opera stylesheet");
    assert!(page.find("id=\"slideProj\"").expect("projection stylesheet") < last_link);
    assert!(last_link < script);
}

#[test]
fn current_slide_indicator_can_be_shown() {
    let settings = Settings {
        current_slide_indicator: true,
        ..url_settings()
    };
    let page = render(&talk(), "slides", &settings);
    assert!(!page.contains("#currentSlide {display: none;}"));
    assert!(page.contains("<div id=\"currentSlide\"></div>"));
}

#[test]
fn document_without_sections_is_a_single_slide() {
    let doc = document(vec![title(vec![Node::text("Lonely")]), para("Just this.")]);
    let page = render(&doc, "slides", &url_settings());
    let parsed = parse(&page);
    let slides = divs_with_class(&parsed, "slide");
    assert_eq!(slides.len(), 1);
    assert!(slides[0]
        .descendants()
        .any(|n| n.text() == Some("Just this.")));
}

#[test]
fn page_header_and_footer_go_into_the_layout() {
    let decoration = Node::new(NodeKind::Decoration).with_children(vec![
        Node::new(NodeKind::Header).with_child(para("Conference 2024")),
        Node::new(NodeKind::Footer).with_child(para("example.org")),
    ]);
    let doc = document(vec![decoration, section("Intro", vec![para("Hi.")])]);
    let page = render(&doc, "slides", &url_settings());
    let parsed = parse(&page);

    let header = parsed
        .descendants()
        .find(|n| n.attribute("id") == Some("header"))
        .expect("header div");
    assert!(header.descendants().any(|n| n.text() == Some("Conference 2024")));
    let footer = parsed
        .descendants()
        .find(|n| n.attribute("id") == Some("footer"))
        .expect("footer div");
    assert!(footer.descendants().any(|n| n.text() == Some("example.org")));
    assert!(!page.contains("<div class=\"header\">"));
}

#[test]
fn a_theme_or_theme_url_is_required() {
    let settings = Settings {
        theme: None,
        theme_url: None,
        ..Settings::default()
    };
    let err = FormatRegistry::with_defaults()
        .serialize_with_settings(&talk(), "slides", &settings)
        .unwrap_err();
    assert!(matches!(err, FormatError::Configuration(_)), "{err}");
}

#[test]
fn a_named_theme_needs_a_theme_directory() {
    let err = FormatRegistry::with_defaults()
        .serialize_with_settings(&talk(), "slides", &Settings::default())
        .unwrap_err();
    let FormatError::Configuration(message) = err else {
        panic!("expected a configuration error, got {err}");
    };
    assert!(message.contains("theme 'default'"), "{message}");
    assert!(message.contains("slides.theme_dirs"), "{message}");
}

#[test]
fn section_titles_never_link_back_to_the_contents() {
    let doc = document(vec![
        quill_babel::ir::build::contents("Contents", "contents"),
        section("Intro", vec![]),
    ]);
    let page = render(&doc, "slides", &url_settings());
    assert!(!page.contains("toc-backref"));
}
