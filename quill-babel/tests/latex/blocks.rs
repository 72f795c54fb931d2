//! Lists, tables, literal blocks and other body elements.

use crate::common::{latex_body, latex_preamble, render};
use insta::assert_snapshot;
use quill_babel::ir::build::{
    block_quote, bullet_list, document, enumerated_list, list_item, literal_block, para, raw,
    table, title,
};
use quill_babel::ir::nodes::EnumType;
use quill_babel::{Node, NodeKind, Settings};

fn body_of(children: Vec<Node>) -> String {
    let output = render(&document(children), "latex", &Settings::default());
    latex_body(&output).to_string()
}

#[test]
fn bullet_list_items() {
    let body = body_of(vec![bullet_list(vec![
        list_item(vec![para("one")]),
        list_item(vec![para("two"), para("more")]),
    ])]);
    assert_snapshot!(body.trim(), @r"
%
\begin{itemize}

\item one

\item two

more

\end{itemize}
");
}

#[test]
fn empty_bullet_list_gets_a_placeholder_item() {
    let body = body_of(vec![bullet_list(vec![])]);
    assert_eq!(body, "%\n\\begin{itemize}\n\n\\item[]\n\\end{itemize}\n");
}

#[test]
fn enumerated_list_with_start_and_affixes() {
    let body = body_of(vec![enumerated_list(
        EnumType::LowerAlpha,
        "(",
        ")",
        3,
        vec![list_item(vec![para("first")])],
    )]);
    assert_snapshot!(body.trim(), @r"
\newcounter{listcnt0}
\begin{list}{(\alph{listcnt0})}
{
\usecounter{listcnt0}
\addtocounter{listcnt0}{2}
\setlength{\rightmargin}{\leftmargin}
}

\item first
\end{list}
");
}

#[test]
fn alphabetic_list_starting_at_b() {
    let body = body_of(vec![enumerated_list(
        EnumType::LowerAlpha,
        "",
        ")",
        2,
        vec![
            list_item(vec![para("b")]),
            list_item(vec![para("c")]),
            list_item(vec![para("d")]),
        ],
    )]);
    assert_snapshot!(body.trim(), @r"
\newcounter{listcnt0}
\begin{list}{\alph{listcnt0})}
{
\usecounter{listcnt0}
\addtocounter{listcnt0}{1}
\setlength{\rightmargin}{\leftmargin}
}

\item b

\item c

\item d
\end{list}
");
}

#[test]
fn list_starting_at_zero_counts_back() {
    let body = body_of(vec![enumerated_list(
        EnumType::Arabic,
        "",
        ".",
        0,
        vec![list_item(vec![para("zero")])],
    )]);
    assert!(body.contains("\\addtocounter{listcnt0}{-1}\n"), "{body}");
}

#[test]
fn enumeration_counters_are_reused_and_nested() {
    let inner = enumerated_list(
        EnumType::UpperRoman,
        "",
        ".",
        1,
        vec![list_item(vec![para("inner")])],
    );
    let body = body_of(vec![
        enumerated_list(
            EnumType::Arabic,
            "",
            ".",
            1,
            vec![list_item(vec![para("outer"), inner])],
        ),
        enumerated_list(EnumType::Arabic, "", ".", 1, vec![list_item(vec![para("again")])]),
    ]);
    assert!(body.contains("\\newcounter{listcnt0}\n\\begin{list}{\\arabic{listcnt0}.}"));
    assert!(body.contains("\\newcounter{listcnt1}\n\\begin{list}{\\Roman{listcnt1}.}"));
    assert!(body.contains("\\setcounter{listcnt0}{0}\n\\begin{list}{\\arabic{listcnt0}.}"));
    assert_eq!(body.matches("\\newcounter{listcnt0}").count(), 1);
    assert!(!body.contains("\\addtocounter"));
}

#[test]
fn literal_block_keeps_spacing_and_lines() {
    let body = body_of(vec![literal_block("a  b\n\nsay \"\"hi\"\"")]);
    assert_eq!(
        body,
        "%\n\\begin{quote}{\\ttfamily \\raggedright \\noindent\n\
         a~~b\\\\\n~\\\\\nsay~\"{}\"hi\"{}\"\n\
         }\n\\end{quote}\n"
    );
}

#[test]
fn block_quote_environment() {
    let body = body_of(vec![block_quote(vec![para("Quoted.")])]);
    assert_eq!(body, "%\n\\begin{quote}\n\nQuoted.\n\n\\end{quote}\n");
}

#[test]
fn table_with_colspec_widths() {
    let output = render(
        &document(vec![table(Some(5), &[&["a", "b"], &["c", ""]])]),
        "latex",
        &Settings::default(),
    );
    assert!(latex_preamble(&output).contains("\\usepackage{longtable}\n"));
    assert_eq!(
        latex_body(&output),
        "\n\\leavevmode\n\\setlength{\\DUtablewidth}{\\linewidth}\n\
         \\begin{longtable}[c]{|p{0.075\\DUtablewidth}|p{0.075\\DUtablewidth}|}\n\
         \\hline\n\
         \na\n & \nb\n \\\\\n\\hline\n\
         \nc\n &  \\\\\n\\hline\n\
         \\end{longtable}\n"
    );
}

#[test]
fn table_caption_precedes_the_rows() {
    let mut captioned = table(None, &[&["x"]]);
    captioned
        .children
        .insert(0, title(vec![Node::text("Results & notes")]));
    let body = body_of(vec![captioned]);
    assert!(body.contains(
        "\\begin{longtable}[c]{|p{0.935\\DUtablewidth}|}\n\\caption{Results \\& notes}\\\\\n\\hline\n"
    ));
    assert_eq!(body.matches("Results").count(), 1);
}

#[test]
fn borderless_tables_have_no_rules() {
    let body = body_of(vec![table(None, &[&["a", "b"]]).with_class("borderless")]);
    assert!(body.contains("\\begin{longtable}[c]{p{0.470\\DUtablewidth}p{0.470\\DUtablewidth}}\n"));
    assert!(!body.contains("\\hline"));
}

#[test]
fn table_head_cells_are_bold() {
    let head = Node::new(NodeKind::TableHead).with_child(
        Node::new(NodeKind::Row).with_children(vec![
            Node::new(NodeKind::Entry).with_child(para("Name")),
            Node::new(NodeKind::Entry).with_child(para("Value")),
        ]),
    );
    let mut t = table(None, &[&["a", "b"]]);
    t.children[0].children.insert(2, head);
    let body = body_of(vec![t]);
    assert!(body.contains("\\textbf{\nName\n} & \\textbf{\nValue\n} \\\\\n\\hline\n\\endhead\n"));
}

#[test]
fn raw_latex_passes_through_and_other_raw_is_dropped() {
    let body = body_of(vec![
        raw("latex", "\\newpage"),
        raw("html latex", "\\clearpage"),
        raw("html", "<br />"),
    ]);
    assert_eq!(body, "\\newpage\\clearpage");
}

#[test]
fn transitions_and_comments() {
    let comment = Node::new(NodeKind::Comment).with_child(Node::text("first\nsecond"));
    let body = body_of(vec![Node::new(NodeKind::Transition), comment]);
    assert_eq!(
        body,
        "\n\n%\n\\hspace*{\\fill}\\hrulefill\\hspace*{\\fill}\n\n\n% first\n% second\n"
    );
}
