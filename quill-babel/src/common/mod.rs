//! Backend-independent traversal machinery shared by every writer.

pub mod context;
pub mod counters;
pub mod dispatch;
pub mod ids;

pub use context::RenderContext;
pub use counters::{ListFrame, ReferenceTable};
pub use dispatch::{Cursor, Dispatcher, Flow, HandlerTable, Translator};
