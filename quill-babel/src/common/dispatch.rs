//! Handler tables and the tree walker.
//!
//! Every backend registers an `enter` and an optional `leave` function per
//! node kind in a [`HandlerTable`]. A derived backend (the slideshow writer)
//! supplies a second, sparse table whose entries take precedence phase by
//! phase; anything it leaves out falls through to the base table.
//!
//! The walker is a plain pre-order/post-order recursion. It owns the ancestor
//! stack, so handlers reach the parent and siblings of a node through the
//! [`Cursor`] they are given rather than through the tree itself.

use super::context::RenderContext;
use crate::error::FormatError;
use crate::ir::nodes::{Node, NodeTag};
use crate::settings::Settings;
use std::collections::HashMap;

/// What the walker does after an `enter` handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the children, then call `leave`.
    Continue,
    /// Do not visit the children, but still call `leave`.
    SkipChildren,
    /// Do not visit the children and do not call `leave`.
    SkipNode,
}

pub type EnterFn<T> = fn(&mut T, &Cursor<'_>) -> Result<Flow, FormatError>;
pub type LeaveFn<T> = fn(&mut T, &Cursor<'_>) -> Result<(), FormatError>;

/// State every translator exposes to the walker and the shared handlers.
pub trait Translator {
    fn context(&self) -> &RenderContext;
    fn context_mut(&mut self) -> &mut RenderContext;
    fn settings(&self) -> &Settings;
}

/// A node together with its position in the tree.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    pub node: &'a Node,
    ancestors: &'a [&'a Node],
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(node: &'a Node, ancestors: &'a [&'a Node], index: usize) -> Self {
        Self {
            node,
            ancestors,
            index,
        }
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    pub fn parent_is(&self, tag: NodeTag) -> bool {
        self.parent().is_some_and(|p| p.is(tag))
    }

    /// Ancestors from the parent outwards.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Node> + 'a {
        let ancestors: &'a [&'a Node] = self.ancestors;
        ancestors.iter().rev().copied()
    }

    pub fn has_ancestor(&self, tag: NodeTag) -> bool {
        self.ancestors().any(|a| a.is(tag))
    }

    /// Position of this node among its parent's children.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first_child(&self) -> bool {
        self.index == 0
    }

    pub fn previous_sibling(&self) -> Option<&'a Node> {
        let parent = self.parent()?;
        self.index.checked_sub(1).and_then(|i| parent.children.get(i))
    }

    /// The sibling `offset + 1` positions after this node.
    pub fn next_sibling(&self, offset: usize) -> Option<&'a Node> {
        self.parent()?.children.get(self.index + 1 + offset)
    }

    /// Depth of this node below the root (the root itself is 0).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Enter and leave handlers keyed by node kind.
pub struct HandlerTable<T> {
    enter: HashMap<NodeTag, EnterFn<T>>,
    leave: HashMap<NodeTag, LeaveFn<T>>,
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self {
            enter: HashMap::new(),
            leave: HashMap::new(),
        }
    }
}

impl<T> HandlerTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: NodeTag, enter: EnterFn<T>, leave: LeaveFn<T>) -> &mut Self {
        self.enter.insert(tag, enter);
        self.leave.insert(tag, leave);
        self
    }

    pub fn on_enter(&mut self, tag: NodeTag, enter: EnterFn<T>) -> &mut Self {
        self.enter.insert(tag, enter);
        self
    }

    pub fn on_leave(&mut self, tag: NodeTag, leave: LeaveFn<T>) -> &mut Self {
        self.leave.insert(tag, leave);
        self
    }

    pub fn enter_for(&self, tag: NodeTag) -> Option<EnterFn<T>> {
        self.enter.get(&tag).copied()
    }

    pub fn leave_for(&self, tag: NodeTag) -> Option<LeaveFn<T>> {
        self.leave.get(&tag).copied()
    }
}

/// Walks a tree, routing every node to the handlers of the active backend.
pub struct Dispatcher<T> {
    base: HandlerTable<T>,
    overrides: HandlerTable<T>,
}

impl<T: Translator> Dispatcher<T> {
    pub fn new(base: HandlerTable<T>) -> Self {
        Self::with_overrides(base, HandlerTable::new())
    }

    pub fn with_overrides(base: HandlerTable<T>, overrides: HandlerTable<T>) -> Self {
        Self { base, overrides }
    }

    fn enter_for(&self, tag: NodeTag) -> Option<EnterFn<T>> {
        self.overrides
            .enter_for(tag)
            .or_else(|| self.base.enter_for(tag))
    }

    fn leave_for(&self, tag: NodeTag) -> Option<LeaveFn<T>> {
        self.overrides
            .leave_for(tag)
            .or_else(|| self.base.leave_for(tag))
    }

    /// Visit `root` and all of its descendants, then check the context is unwound.
    pub fn walk(&self, translator: &mut T, root: &Node) -> Result<(), FormatError> {
        let mut ancestors = Vec::new();
        self.walk_node(translator, root, &mut ancestors, 0)?;
        translator.context().finish()
    }

    fn walk_node<'t>(
        &self,
        translator: &mut T,
        node: &'t Node,
        ancestors: &mut Vec<&'t Node>,
        index: usize,
    ) -> Result<(), FormatError> {
        let tag = node.tag();
        let enter = self
            .enter_for(tag)
            .ok_or_else(|| FormatError::UnsupportedConstruct(node.kind_name().to_string()))?;

        let before = translator.context().depth();
        let flow = enter(translator, &Cursor::new(node, ancestors, index))?;

        if flow != Flow::SkipNode {
            if flow == Flow::Continue {
                ancestors.push(node);
                for (i, child) in node.children.iter().enumerate() {
                    self.walk_node(translator, child, ancestors, i)?;
                }
                ancestors.pop();
            }
            if let Some(leave) = self.leave_for(tag) {
                leave(translator, &Cursor::new(node, ancestors, index))?;
            }
        }

        let after = translator.context().depth();
        if before != after {
            return Err(FormatError::unbalanced(
                node.kind_name(),
                format!("stacks were {before:?} on enter and {after:?} on leave"),
            ));
        }
        Ok(())
    }
}

/// Enter handler for nodes that produce no output of their own.
pub fn pass_through<T>(_: &mut T, _: &Cursor<'_>) -> Result<Flow, FormatError> {
    Ok(Flow::Continue)
}

/// Enter handler for nodes that are dropped with their whole subtree.
pub fn skip_node<T>(_: &mut T, _: &Cursor<'_>) -> Result<Flow, FormatError> {
    Ok(Flow::SkipNode)
}

/// Leave handler that does nothing.
pub fn no_leave<T>(_: &mut T, _: &Cursor<'_>) -> Result<(), FormatError> {
    Ok(())
}

/// Leave handler that appends the text pushed by the matching enter.
pub fn close_marker<T: Translator>(t: &mut T, _: &Cursor<'_>) -> Result<(), FormatError> {
    t.context_mut().close()
}
