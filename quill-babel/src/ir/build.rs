//! Shorthand constructors for assembling trees in code.
//!
//! The parser builds trees from JSON; these helpers exist for transforms and
//! tests that build small trees by hand.

use super::nodes::{EnumType, Node, NodeKind};

pub fn document(children: Vec<Node>) -> Node {
    Node::new(NodeKind::Document).with_children(children)
}

/// A section whose first child is a title holding `title` as plain text.
pub fn section(title_text: &str, children: Vec<Node>) -> Node {
    let mut all = vec![title(vec![Node::text(title_text)])];
    all.extend(children);
    Node::new(NodeKind::Section).with_children(all)
}

pub fn title(children: Vec<Node>) -> Node {
    Node::new(NodeKind::Title).with_children(children)
}

pub fn subtitle(children: Vec<Node>) -> Node {
    Node::new(NodeKind::Subtitle).with_children(children)
}

pub fn paragraph(children: Vec<Node>) -> Node {
    Node::new(NodeKind::Paragraph).with_children(children)
}

/// A paragraph holding a single text node.
pub fn para(text: &str) -> Node {
    paragraph(vec![Node::text(text)])
}

pub fn emphasis(text: &str) -> Node {
    Node::new(NodeKind::Emphasis).with_child(Node::text(text))
}

pub fn strong(text: &str) -> Node {
    Node::new(NodeKind::Strong).with_child(Node::text(text))
}

pub fn literal(text: &str) -> Node {
    Node::new(NodeKind::Literal).with_child(Node::text(text))
}

pub fn literal_block(text: &str) -> Node {
    Node::new(NodeKind::LiteralBlock).with_child(Node::text(text))
}

pub fn bullet_list(items: Vec<Node>) -> Node {
    Node::new(NodeKind::BulletList).with_children(items)
}

pub fn enumerated_list(enumtype: EnumType, prefix: &str, suffix: &str, start: usize, items: Vec<Node>) -> Node {
    Node::new(NodeKind::EnumeratedList {
        enumtype,
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        start,
    })
    .with_children(items)
}

pub fn list_item(children: Vec<Node>) -> Node {
    Node::new(NodeKind::ListItem).with_children(children)
}

pub fn block_quote(children: Vec<Node>) -> Node {
    Node::new(NodeKind::BlockQuote).with_children(children)
}

pub fn external_reference(uri: &str, text: &str) -> Node {
    Node::new(NodeKind::Reference {
        refuri: Some(uri.to_string()),
        refid: None,
    })
    .with_child(Node::text(text))
}

pub fn internal_reference(refid: &str, text: &str) -> Node {
    Node::new(NodeKind::Reference {
        refuri: None,
        refid: Some(refid.to_string()),
    })
    .with_child(Node::text(text))
}

pub fn citation_reference(key: &str) -> Node {
    Node::new(NodeKind::CitationReference {
        refid: Some(key.to_lowercase()),
    })
    .with_child(Node::text(key))
}

/// A citation with a label and body paragraphs.
pub fn citation(key: &str, body: Vec<Node>) -> Node {
    let mut children = vec![Node::new(NodeKind::Label).with_child(Node::text(key))];
    children.extend(body);
    Node::new(NodeKind::Citation)
        .with_id(key.to_lowercase())
        .with_name(key.to_lowercase())
        .with_children(children)
}

pub fn footnote_reference(refid: &str, label: &str) -> Node {
    Node::new(NodeKind::FootnoteReference {
        refid: Some(refid.to_string()),
    })
    .with_child(Node::text(label))
}

pub fn footnote(id: &str, label: &str, body: Vec<Node>) -> Node {
    let mut children = vec![Node::new(NodeKind::Label).with_child(Node::text(label))];
    children.extend(body);
    Node::new(NodeKind::Footnote).with_id(id).with_children(children)
}

pub fn raw(format: &str, text: &str) -> Node {
    Node::new(NodeKind::Raw {
        format: format.to_string(),
        text: text.to_string(),
    })
}

/// A contents topic; an empty one is filled in by [`crate::transforms::build_contents`].
pub fn contents(title_text: &str, id: &str) -> Node {
    Node::new(NodeKind::Topic)
        .with_class("contents")
        .with_id(id)
        .with_child(title(vec![Node::text(title_text)]))
}

/// A simple table: one tgroup with `cols` colspecs of `colwidth`, body rows of text cells.
pub fn table(colwidth: Option<usize>, rows: &[&[&str]]) -> Node {
    let cols = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut tgroup = Node::new(NodeKind::TableGroup { cols });
    for _ in 0..cols {
        tgroup
            .children
            .push(Node::new(NodeKind::ColSpec { colwidth }));
    }
    let body_rows = rows
        .iter()
        .map(|cells| {
            Node::new(NodeKind::Row).with_children(
                cells
                    .iter()
                    .map(|cell| {
                        let entry = Node::new(NodeKind::Entry);
                        if cell.is_empty() {
                            entry
                        } else {
                            entry.with_child(para(cell))
                        }
                    })
                    .collect(),
            )
        })
        .collect();
    tgroup
        .children
        .push(Node::new(NodeKind::TableBody).with_children(body_rows));
    Node::new(NodeKind::Table).with_child(tgroup)
}
