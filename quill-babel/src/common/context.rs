//! Mutable state of one translation.
//!
//! A [`RenderContext`] is created for a single document, threaded by
//! reference through every handler, and dropped once the output has been
//! assembled. It is never shared between documents.
//!
//! Output is accumulated as a vector of fragments (`body`). Handlers may
//! divert a contiguous run of fragments into a named side buffer with
//! [`RenderContext::capture_region`] / [`RenderContext::release_region`]; this
//! is how header, footer, title and bibliography text is pulled out of the
//! main stream and placed by the document-level assembly.

use super::counters::{ListFrame, ReferenceTable};
use crate::error::FormatError;
use std::collections::HashMap;

const CONTEXT: &str = "render context";

/// Entry of the marker stack: pushed on enter, popped by the matching leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Length of `body` when the marker was pushed.
    Offset(usize),
    /// Text the leave handler appends (usually a closing tag or brace).
    Closing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    name: String,
    start: usize,
}

/// Depths of the balanced stacks, compared around each enter/leave pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackDepth {
    pub markers: usize,
    pub regions: usize,
    pub lists: usize,
    pub section_level: usize,
}

#[derive(Debug, Default)]
pub struct RenderContext {
    pub section_level: usize,
    pub body: Vec<String>,
    pub footnotes: ReferenceTable,
    pub citations: ReferenceTable,
    markers: Vec<Marker>,
    regions: Vec<Region>,
    side: HashMap<String, Vec<String>>,
    lists: Vec<ListFrame>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: impl Into<String>) {
        self.body.push(fragment.into());
    }

    /// Remove the last body fragment if `pred` accepts it.
    ///
    /// Refuses to reach back past the start of the innermost open region.
    pub fn pop_fragment_if(&mut self, pred: impl Fn(&str) -> bool) -> Option<String> {
        let floor = self.regions.last().map(|r| r.start).unwrap_or(0);
        if self.body.len() > floor && self.body.last().is_some_and(|f| pred(f)) {
            self.body.pop()
        } else {
            None
        }
    }

    // ---------------------------------------------------------------------
    // Marker stack
    // ---------------------------------------------------------------------

    pub fn push_closing(&mut self, text: impl Into<String>) {
        self.markers.push(Marker::Closing(text.into()));
    }

    pub fn pop_closing(&mut self) -> Result<String, FormatError> {
        match self.markers.pop() {
            Some(Marker::Closing(text)) => Ok(text),
            Some(other) => Err(FormatError::unbalanced(
                CONTEXT,
                format!("expected a closing marker, found {other:?}"),
            )),
            None => Err(FormatError::unbalanced(CONTEXT, "marker stack is empty")),
        }
    }

    /// Pop a closing marker and append its text.
    pub fn close(&mut self) -> Result<(), FormatError> {
        let text = self.pop_closing()?;
        self.append(text);
        Ok(())
    }

    /// Snapshot the body length.
    pub fn push_offset(&mut self) {
        self.markers.push(Marker::Offset(self.body.len()));
    }

    pub fn pop_offset(&mut self) -> Result<usize, FormatError> {
        match self.markers.pop() {
            Some(Marker::Offset(start)) if start <= self.body.len() => Ok(start),
            Some(other) => Err(FormatError::unbalanced(
                CONTEXT,
                format!("expected an offset marker, found {other:?}"),
            )),
            None => Err(FormatError::unbalanced(CONTEXT, "marker stack is empty")),
        }
    }

    /// Text appended since `start`, left in place.
    pub fn text_since(&self, start: usize) -> String {
        self.body[start.min(self.body.len())..].concat()
    }

    // ---------------------------------------------------------------------
    // Sections
    // ---------------------------------------------------------------------

    pub fn enter_section(&mut self) -> usize {
        self.section_level += 1;
        self.section_level
    }

    pub fn leave_section(&mut self) -> Result<usize, FormatError> {
        if self.section_level == 0 {
            return Err(FormatError::unbalanced(
                "section",
                "left a section at level 0",
            ));
        }
        self.section_level -= 1;
        Ok(self.section_level)
    }

    // ---------------------------------------------------------------------
    // Regions and side buffers
    // ---------------------------------------------------------------------

    /// Start diverting output: everything appended until the matching
    /// [`release_region`](Self::release_region) belongs to region `name`.
    pub fn capture_region(&mut self, name: &str) {
        self.regions.push(Region {
            name: name.to_string(),
            start: self.body.len(),
        });
    }

    /// Close the innermost region and remove its fragments from the body.
    pub fn release_region(&mut self, name: &str) -> Result<Vec<String>, FormatError> {
        match self.regions.pop() {
            Some(region) if region.name == name => {
                let start = region.start.min(self.body.len());
                Ok(self.body.split_off(start))
            }
            Some(region) => {
                let open = region.name.clone();
                self.regions.push(region);
                Err(FormatError::unbalanced(
                    CONTEXT,
                    format!("released region '{name}' while '{open}' is open"),
                ))
            }
            None => Err(FormatError::unbalanced(
                CONTEXT,
                format!("released region '{name}' that was never captured"),
            )),
        }
    }

    /// Close region `name` and append its fragments to the side buffer of the same name.
    pub fn release_region_into(&mut self, name: &str) -> Result<(), FormatError> {
        let segment = self.release_region(name)?;
        self.side_buffer_mut(name).extend(segment);
        Ok(())
    }

    pub fn side_buffer(&self, name: &str) -> &[String] {
        self.side.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn side_buffer_mut(&mut self, name: &str) -> &mut Vec<String> {
        self.side.entry(name.to_string()).or_default()
    }

    pub fn side_text(&self, name: &str) -> String {
        self.side_buffer(name).concat()
    }

    pub fn take_side_buffer(&mut self, name: &str) -> Vec<String> {
        self.side.remove(name).unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Lists
    // ---------------------------------------------------------------------

    pub fn enter_list(&mut self) {
        self.lists.push(ListFrame::default());
    }

    pub fn leave_list(&mut self) -> Result<ListFrame, FormatError> {
        self.lists
            .pop()
            .ok_or_else(|| FormatError::unbalanced("list", "left a list that was never entered"))
    }

    /// Record an item of the innermost list.
    pub fn count_item(&mut self) {
        if let Some(frame) = self.lists.last_mut() {
            frame.items += 1;
        }
    }

    // ---------------------------------------------------------------------
    // Balance checks
    // ---------------------------------------------------------------------

    pub fn depth(&self) -> StackDepth {
        StackDepth {
            markers: self.markers.len(),
            regions: self.regions.len(),
            lists: self.lists.len(),
            section_level: self.section_level,
        }
    }

    /// Verify that every stack has been unwound at the end of a traversal.
    pub fn finish(&self) -> Result<(), FormatError> {
        let depth = self.depth();
        if depth.markers != 0 || depth.regions != 0 || depth.lists != 0 || depth.section_level != 0 {
            return Err(FormatError::unbalanced(
                "document",
                format!("context not unwound at end of traversal: {depth:?}"),
            ));
        }
        Ok(())
    }
}
