//! Identifier generation for sections and generated references.

use std::collections::HashSet;

/// Turn arbitrary title text into an identifier usable as an HTML id and a
/// LaTeX label.
///
/// Lowercases ASCII letters, collapses every run of other characters to a
/// single hyphen, and strips leading characters until the id starts with a
/// letter. Returns `"id"` when nothing usable is left.
pub fn make_id(text: &str) -> String {
    let slug = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let trimmed = slug.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
    if trimmed.is_empty() {
        "id".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Tracks ids already in use in one document.
#[derive(Debug, Default)]
pub struct IdRegistry {
    used: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    /// `base` if it is free, otherwise `base-1`, `base-2`, ...; the result is reserved.
    pub fn unique(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 0;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
