//! Preamble, title data and overall layout of LaTeX output.

use crate::common::{latex_body, latex_preamble, render};
use quill_babel::ir::build::{document, para, subtitle, title};
use quill_babel::{Node, NodeKind, Settings};

fn latex(doc: &Node) -> String {
    render(doc, "latex", &Settings::default())
}

#[test]
fn minimal_document_layout() {
    let output = latex(&document(vec![para("Hello.")]));
    let expected = format!(
        "% generated by quill-babel {}
\\documentclass[a4paper,english]{{article}}
\\usepackage{{babel}}
\\usepackage[T1]{{fontenc}}
\\usepackage[utf8]{{inputenc}}
\\usepackage{{ifthen}}
\\usepackage{{fixltx2e}} % fix LaTeX2e shortcomings

%%% User specified packages and stylesheets

%%% Fallback definitions for Quill-specific commands
% hyperref (PDF hyperlinks):
\\ifthenelse{{\\isundefined{{\\hypersetup}}}}{{
  \\usepackage[colorlinks=true,linkcolor=blue,urlcolor=blue]{{hyperref}}
}}{{}}

%%% Body
\\begin{{document}}

Hello.

\\end{{document}}
",
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(output, expected);
}

#[test]
fn title_and_subtitle_become_title_data() {
    let doc = document(vec![
        title(vec![Node::text("Annual Report")]),
        subtitle(vec![Node::text("2024 & beyond")]),
        para("Body."),
    ]);
    let output = latex(&doc);
    assert!(output.contains(
        "\n%%% Title Data\n\\title{Annual Report\\\\\n\\large{2024 \\& beyond}}\n\\author{}\n\\date{}\n"
    ));
    let body = latex_body(&output);
    assert!(body.starts_with("\\maketitle\n"));
    assert!(!body.contains("Annual Report"));
}

#[test]
fn no_title_data_without_a_title() {
    let output = latex(&document(vec![para("Body.")]));
    assert!(!output.contains("%%% Title Data"));
    assert!(!output.contains("\\maketitle"));
}

#[test]
fn document_class_options_and_language() {
    let settings = Settings {
        document_class: "report".to_string(),
        document_options: "11pt, twoside".to_string(),
        language_code: "fr".to_string(),
        ..Settings::default()
    };
    let output = render(&document(vec![para("Bonjour.")]), "latex", &settings);
    assert!(output.contains("\\documentclass[11pt,twoside,french]{report}\n"));
}

#[test]
fn stylesheets_are_loaded_after_the_user_marker() {
    let settings = Settings {
        stylesheets: vec!["custom.sty".to_string(), "defs.tex".to_string()],
        ..Settings::default()
    };
    let output = render(&document(vec![para("x")]), "latex", &settings);
    assert!(output.contains(
        "%%% User specified packages and stylesheets\n\\usepackage{custom}\n\\input{defs.tex}\n"
    ));
}

#[test]
fn page_header_and_footer_move_to_the_preamble() {
    let decoration = Node::new(NodeKind::Decoration).with_children(vec![
        Node::new(NodeKind::Header).with_child(para("Draft copy")),
        Node::new(NodeKind::Footer).with_child(para("Page footer")),
    ]);
    let output = latex(&document(vec![decoration, para("Body.")]));
    let preamble = latex_preamble(&output);
    assert!(preamble.contains("\\usepackage{fancyhdr}\n\\pagestyle{fancy}\n"));
    assert!(preamble.contains("\\fancyhead[L]{Draft copy}\n"));
    assert!(preamble.contains("\\fancyfoot[L]{Page footer}\n"));
    let body = latex_body(&output);
    assert!(!body.contains("Draft copy"));
    assert!(!body.contains("Page footer"));
}

#[test]
fn packages_are_loaded_only_when_needed() {
    let plain = latex(&document(vec![para("No tables here.")]));
    assert!(!plain.contains("longtable"));
    assert!(!plain.contains("graphicx"));

    let image = Node::new(NodeKind::Image {
        uri: "figure.png".to_string(),
        alt: None,
    });
    let output = latex(&document(vec![image]));
    assert!(latex_preamble(&output).contains("\\usepackage{graphicx}\n"));
    assert!(latex_body(&output).contains("\n\\includegraphics{figure.png}\n"));
}
