//! Tests for the LaTeX writer.

mod blocks;
mod document;
mod escaping;
mod inline;
