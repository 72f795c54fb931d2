//! Tree transforms applied before rendering.
//!
//! Writers never change the tree they walk. Everything that requires looking
//! at the whole document first (unique section ids, generated section
//! numbers, the entries of a table of contents) is computed here, on a copy,
//! before any backend sees it.

use crate::common::ids::{make_id, IdRegistry};
use crate::ir::nodes::{Node, NodeKind, NodeTag};

/// Separator placed between a generated section number and the title text.
pub const SECTNUM_SUFFIX: &str = "\u{a0}\u{a0}\u{a0}";

/// Run every transform the writers rely on and return the prepared tree.
///
/// `section_numbers` is false for a writer that leaves the numbering of
/// requested sections to the target format (LaTeX with
/// `use_section_numbering`).
pub fn prepare(doc: &Node, section_numbers: bool) -> Node {
    let mut doc = doc.clone();
    assign_section_ids(&mut doc);
    if let Some(depth) = requested_sectnum_depth(&doc) {
        if section_numbers {
            number_sections(&mut doc, depth);
        }
    }
    build_contents(&mut doc);
    doc
}

/// Depth of section numbering the document asks for, if any.
///
/// The document requests numbering with a `sectnum` extra attribute whose
/// value is the depth; an empty or non-numeric value means unlimited.
pub fn requested_sectnum_depth(doc: &Node) -> Option<usize> {
    doc.extra("sectnum")
        .map(|value| value.trim().parse().unwrap_or(usize::MAX))
}

/// Give every section without an id one derived from its title.
pub fn assign_section_ids(doc: &mut Node) {
    let mut ids = IdRegistry::new();
    collect_ids(doc, &mut ids);
    assign_ids_in(doc, &mut ids);
}

fn collect_ids(node: &Node, ids: &mut IdRegistry) {
    for id in &node.attributes.ids {
        ids.reserve(id);
    }
    for child in &node.children {
        collect_ids(child, ids);
    }
}

fn assign_ids_in(node: &mut Node, ids: &mut IdRegistry) {
    if node.is(NodeTag::Section) && node.attributes.ids.is_empty() {
        let title = node
            .child(NodeTag::Title)
            .map(Node::astext)
            .unwrap_or_default();
        let id = ids.unique(&make_id(&title));
        if node.attributes.names.is_empty() && !title.is_empty() {
            node.attributes.names.push(title.to_lowercase());
        }
        node.attributes.ids.push(id);
    }
    for child in &mut node.children {
        assign_ids_in(child, ids);
    }
}

/// Prefix section titles with generated numbers (`1`, `1.1`, ...) down to `max_depth`.
pub fn number_sections(doc: &mut Node, max_depth: usize) {
    let mut prefix = Vec::new();
    number_level(&mut doc.children, &mut prefix, max_depth);
}

fn number_level(children: &mut [Node], prefix: &mut Vec<usize>, max_depth: usize) {
    let mut n = 0;
    for section in children.iter_mut().filter(|c| c.is(NodeTag::Section)) {
        n += 1;
        prefix.push(n);
        if prefix.len() <= max_depth {
            if let Some(title) = section.children.iter_mut().find(|c| c.is(NodeTag::Title)) {
                let already = title
                    .children
                    .first()
                    .is_some_and(|c| c.is(NodeTag::Generated) && c.has_class("sectnum"));
                if !already {
                    let label = prefix
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(".");
                    let number = Node::new(NodeKind::Generated)
                        .with_class("sectnum")
                        .with_child(Node::text(format!("{label}{SECTNUM_SUFFIX}")));
                    title.children.insert(0, number);
                }
            }
            number_level(&mut section.children, prefix, max_depth);
        }
        prefix.pop();
    }
}

fn is_pending_contents(node: &Node) -> bool {
    node.is(NodeTag::Topic) && node.has_class("contents") && node.child(NodeTag::BulletList).is_none()
}

fn find_pending_contents(node: &Node) -> Option<&Node> {
    if is_pending_contents(node) {
        return Some(node);
    }
    node.children.iter().find_map(find_pending_contents)
}

/// Fill every empty `contents` topic with a nested list of links to the sections.
///
/// Each entry links to its section, and the section title records the id of
/// the entry (`refid` extra) so HTML output can link back. The optional
/// `depth` extra on the topic limits how many levels are listed.
pub fn build_contents(doc: &mut Node) {
    let Some(topic) = find_pending_contents(doc) else {
        return;
    };
    let max_depth = topic
        .extra("depth")
        .and_then(|d| d.trim().parse().ok())
        .unwrap_or(usize::MAX);

    let mut counter = 0;
    let items = outline(&mut doc.children, 1, max_depth, &mut counter);
    if items.is_empty() {
        return;
    }
    let list = Node::new(NodeKind::BulletList)
        .with_class("simple")
        .with_children(items);
    fill_contents(doc, &list);
}

fn outline(children: &mut [Node], level: usize, max_depth: usize, counter: &mut usize) -> Vec<Node> {
    let mut items = Vec::new();
    for section in children.iter_mut().filter(|c| c.is(NodeTag::Section)) {
        let Some(id) = section.first_id().map(str::to_string) else {
            continue;
        };
        *counter += 1;
        let backref = format!("toc-entry-{counter}");

        let mut entry_text = Vec::new();
        if let Some(title) = section.children.iter_mut().find(|c| c.is(NodeTag::Title)) {
            entry_text = title.children.clone();
            title
                .attributes
                .extra
                .insert("refid".to_string(), backref.clone());
        }

        let reference = Node::new(NodeKind::Reference {
            refuri: None,
            refid: Some(id),
        })
        .with_id(backref)
        .with_children(entry_text);
        let mut item = Node::new(NodeKind::ListItem)
            .with_child(Node::new(NodeKind::Paragraph).with_child(reference));

        if level < max_depth {
            let nested = outline(&mut section.children, level + 1, max_depth, counter);
            if !nested.is_empty() {
                item.children
                    .push(Node::new(NodeKind::BulletList).with_children(nested));
            }
        }
        items.push(item);
    }
    items
}

fn fill_contents(node: &mut Node, list: &Node) {
    if is_pending_contents(node) {
        node.children.push(list.clone());
        return;
    }
    for child in &mut node.children {
        fill_contents(child, list);
    }
}
