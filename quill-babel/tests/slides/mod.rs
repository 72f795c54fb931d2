//! Tests for the S5 slideshow writer.

mod page;
mod themes;
