//! Inline markup, quotes, links and footnotes.

use crate::common::{latex_body, render};
use quill_babel::ir::build::{
    document, emphasis, external_reference, footnote, footnote_reference, internal_reference,
    literal, para, paragraph, strong,
};
use quill_babel::{Node, NodeKind, Settings};

fn body_with(settings: &Settings, children: Vec<Node>) -> String {
    let output = render(&document(children), "latex", settings);
    latex_body(&output).to_string()
}

fn body_of(children: Vec<Node>) -> String {
    body_with(&Settings::default(), children)
}

#[test]
fn emphasis_strong_and_literal() {
    let body = body_of(vec![paragraph(vec![
        emphasis("soft"),
        Node::text(" "),
        strong("loud"),
        Node::text(" "),
        literal("x_1 \"q\""),
    ])]);
    assert_eq!(body, "\n\\emph{soft} \\textbf{loud} \\texttt{x\\_1 \"q\"}\n");
}

#[test]
fn double_quotes_alternate_in_running_text() {
    let body = body_of(vec![para("He said \"yes\" and \"no\".")]);
    assert_eq!(body, "\nHe said ``yes'' and ``no''.\n");
}

#[test]
fn quote_state_carries_across_text_nodes() {
    let body = body_of(vec![paragraph(vec![
        Node::text("\"open "),
        emphasis("inside"),
        Node::text(" closed\""),
    ])]);
    assert_eq!(body, "\n``open \\emph{inside} closed''\n");
}

#[test]
fn german_quotes() {
    let settings = Settings::default().with_language("de");
    let body = body_with(&settings, vec![para("Er sagte \"ja\".")]);
    assert_eq!(body, "\nEr sagte \"`ja\"'.\n");
}

#[test]
fn square_brackets_are_protected() {
    let body = body_of(vec![para("[1] see [note]")]);
    assert_eq!(body, "\n{[}1{]} see {[}note{]}\n");
}

#[test]
fn url_special_characters() {
    let body = body_of(vec![paragraph(vec![external_reference(
        "http://example.org/a%20b#frag_1",
        "50% off",
    )])]);
    assert_eq!(
        body,
        "\n\\href{http://example.org/a\\%20b\\#frag_1}{50\\% off}\n"
    );
}

#[test]
fn internal_references_and_targets() {
    let target = Node::new(NodeKind::Target { refuri: None })
        .with_id("here")
        .with_child(Node::text("anchor"));
    let body = body_of(vec![paragraph(vec![
        internal_reference("here", "jump"),
        Node::text(" "),
        target,
    ])]);
    assert_eq!(body, "\n\\hyperref[here]{jump} \\hypertarget{here}{anchor}\n");
}

#[test]
fn footnotes_are_numbered_on_first_use() {
    let body = body_of(vec![
        paragraph(vec![
            Node::text("First"),
            footnote_reference("fn-b", "*"),
            Node::text(" second"),
            footnote_reference("fn-a", "*"),
        ]),
        footnote("fn-a", "*", vec![para("Note A.")]),
        footnote("fn-b", "*", vec![para("Note B.")]),
    ]);
    assert!(body.contains("First\\footnotemark[1] second\\footnotemark[2]"));
    assert!(body.contains("\\footnotetext[2]{\nNote A.\n}\n"));
    assert!(body.contains("\\footnotetext[1]{\nNote B.\n}\n"));
}
