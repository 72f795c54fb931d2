//! The document tree handed to the writers.
//!
//! The tree is produced by an external parser (or deserialized from JSON) and
//! is treated as immutable by every writer.

pub mod build;
pub mod nodes;

pub use nodes::{Attributes, EnumType, Node, NodeKind, NodeTag};
