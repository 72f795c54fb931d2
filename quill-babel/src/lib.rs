//! Document-tree writers
//!
//!     This crate turns an already parsed document tree into target markup: a LaTeX source file,
//!     an S5 slideshow page, or the plain XHTML page the slideshow is built on.
//!
//!     TLDR: For writer authors:
//!         - Quill never parses markup. The tree arrives fully built (see ./ir/nodes.rs), usually
//!           deserialized from JSON by the cli.
//!         - A writer is a handler table (node kind -> enter/leave) plus a translator holding the
//!           render context. The dispatcher walks the tree and calls the handlers.
//!         - A writer that differs from another in a few places registers only those handlers as
//!           overrides (see ./formats/slides/mod.rs).
//!         - Every enter must be undone by its leave. The dispatcher checks this after every node
//!           and fails the translation otherwise.
//!
//! Architecture
//!
//!     tree -> transforms -> dispatcher -> handlers (context updates + output fragments) -> assembly
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── settings.rs             # Writer settings
//!     ├── transforms.rs           # Section ids, numbering, table of contents
//!     ├── publish.rs              # Render and write to disk
//!     ├── formats
//!     │   ├── html                # XHTML writer, base of the slideshow writer
//!     │   ├── slides              # S5 slideshow writer and theme resolver
//!     │   └── latex               # LaTeX writer
//!     ├── ir                      # The document tree
//!     └── common                  # Dispatcher, render context, counters, ids
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Render Context
//!
//!     Output is a vector of fragments. Text that ends up somewhere other than where it is
//!     rendered (the document title in the page head, citations in the bibliography, page headers)
//!     is captured as a region and moved into a named side buffer when its node is left. The
//!     document-level assembly then stitches the side buffers and the body together.
//!
//! Transforms
//!
//!     Section ids, generated section numbers and the generated table of contents are computed
//!     on a copy of the tree before rendering. Writers never mutate the tree they walk.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod publish;
pub mod registry;
pub mod settings;
pub mod transforms;

pub use error::FormatError;
pub use format::{Format, SerializedDocument};
pub use ir::nodes::{Node, NodeKind};
pub use registry::FormatRegistry;
pub use settings::{Settings, TocBacklinks};

