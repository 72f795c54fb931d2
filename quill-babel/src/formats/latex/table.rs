//! `longtable` column layout.

use crate::ir::nodes::{Node, NodeKind};

/// Share of the line width available to the columns.
const TABLE_WIDTH: f64 = 0.93;
/// Column width in characters that maps to the full table width.
const CHARS_PER_LINE: f64 = 80.0;
const COLUMN_PADDING: f64 = 0.005;

/// Relative column widths of a table group.
///
/// Columns with a `colwidth` are sized from it, scaled down when they would
/// not fit; without colspec widths every column gets an equal share.
pub fn column_widths(tgroup: &Node) -> Vec<f64> {
    let colwidths: Vec<Option<usize>> = tgroup
        .children
        .iter()
        .filter_map(|c| match c.kind {
            NodeKind::ColSpec { colwidth } => Some(colwidth),
            _ => None,
        })
        .collect();

    if colwidths.is_empty() || colwidths.iter().all(Option::is_none) {
        let cols = match tgroup.kind {
            NodeKind::TableGroup { cols } => cols.max(colwidths.len()).max(1),
            _ => colwidths.len().max(1),
        };
        return vec![TABLE_WIDTH / cols as f64 + COLUMN_PADDING; cols];
    }

    let raw: Vec<f64> = colwidths
        .iter()
        .map(|w| TABLE_WIDTH * w.unwrap_or(1).saturating_add(1) as f64 / CHARS_PER_LINE)
        .collect();
    let total: f64 = raw.iter().sum();
    let scale = if total > 1.0 { total } else { 1.0 };
    raw.iter().map(|w| w / scale + COLUMN_PADDING).collect()
}

/// The `longtable` column specification, e.g. `|p{0.075\DUtablewidth}|`.
pub fn column_spec(widths: &[f64], borders: bool) -> String {
    let bar = if borders { "|" } else { "" };
    let mut spec = String::from(bar);
    for width in widths {
        spec.push_str(&format!("p{{{width:.3}\\DUtablewidth}}{bar}"));
    }
    spec
}
