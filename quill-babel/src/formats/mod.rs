//! Format implementations
//!
//! This module contains the writers that turn a document tree into target
//! text. The slideshow writer is built on the XHTML writer's handler table.

pub mod html;
pub mod latex;
pub mod slides;

pub use html::HtmlFormat;
pub use latex::LatexFormat;
pub use slides::SlidesFormat;
