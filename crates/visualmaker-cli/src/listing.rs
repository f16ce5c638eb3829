//! Terminal listing of the diagram type selector
//!
//! Renders selector entries as aligned columns, highlighting the selected
//! one with crossterm styles.

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use visualmaker::SelectorEntry;

const SELECTED_MARKER: &str = "●";
const UNSELECTED_MARKER: &str = " ";

/// One entry of `types --json`
#[derive(Debug, Serialize)]
pub struct TypeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

impl From<&SelectorEntry> for TypeInfo {
    fn from(entry: &SelectorEntry) -> Self {
        Self {
            id: entry.id(),
            name: entry.name(),
            description: entry.description(),
            selected: entry.selected,
        }
    }
}

/// Format entries as `marker  id  name  description` rows
pub fn format_entries(entries: &[SelectorEntry], colorize: bool) -> String {
    let id_width = column_width(entries.iter().map(|e| e.id()));
    let name_width = column_width(entries.iter().map(|e| e.name()));

    let mut out = String::new();
    for entry in entries {
        let marker = if entry.selected {
            SELECTED_MARKER
        } else {
            UNSELECTED_MARKER
        };
        let id = pad(entry.id(), id_width);
        let name = pad(entry.name(), name_width);

        let row = if colorize && entry.selected {
            format!(
                "{} {}  {}  {}",
                marker.with(Color::Green),
                id.with(Color::Cyan).bold(),
                name.bold(),
                entry.description()
            )
        } else if colorize {
            format!(
                "{} {}  {}  {}",
                marker,
                id.with(Color::Cyan),
                name,
                entry.description().with(Color::DarkGrey)
            )
        } else {
            format!("{} {}  {}  {}", marker, id, name, entry.description())
        };
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}
