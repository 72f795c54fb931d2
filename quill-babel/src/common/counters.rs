//! Counters kept during a traversal: list items and reference numbering.
//!
//! Item labels themselves are rendered by the targets (`\alph{listcnt0})`
//! with `\addtocounter` in LaTeX, `<ol start>` in HTML); a list frame only
//! records whether any item was emitted.

use crate::ir::nodes::{Node, NodeKind, NodeTag};
use indexmap::IndexMap;

/// State of one open list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFrame {
    pub items: usize,
}

impl ListFrame {
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}

/// Assigns sequential numbers to reference keys in order of first use.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    numbers: IndexMap<String, usize>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for `key`, assigning the next one if the key is new.
    pub fn number_for(&mut self, key: &str) -> usize {
        let next = self.numbers.len() + 1;
        *self.numbers.entry(key.to_string()).or_insert(next)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.numbers.contains_key(key)
    }

    /// Keys in order of first use.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.numbers.keys().map(String::as_str)
    }
}

/// Key under which a footnote or citation and the references to it are numbered.
///
/// References use their `refid`, targets their first id; either falls back
/// to the label text.
pub fn reference_key(node: &Node) -> String {
    match &node.kind {
        NodeKind::FootnoteReference { refid: Some(id) }
        | NodeKind::CitationReference { refid: Some(id) } => id.clone(),
        NodeKind::Footnote | NodeKind::Citation => node
            .first_id()
            .map(str::to_string)
            .or_else(|| node.child(NodeTag::Label).map(Node::astext))
            .unwrap_or_default(),
        _ => node.astext(),
    }
}
