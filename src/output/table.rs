//! Text rendering of the visible page
//!
//! A row is drawn as checked iff its id is in the selected set; explicit
//! deselections are not shown differently from rows nobody touched.

use crate::config::DisplayConfig;
use crate::source::{Page, Record, RecordId};
use colored::Colorize;

/// Truncate `text` to `max_width` characters, marking the cut with `…`
#[must_use]
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_width - 1).collect();
    cut.push('…');
    cut
}

/// Single-line form of a cell value
fn cell(record: &Record, column: &str, max_width: usize) -> String {
    let text = record.field_text(column).replace(['\n', '\r', '\t'], " ");
    truncate(&text, max_width)
}

/// One table row: checkbox, id, configured columns separated by `│`
#[must_use]
pub fn format_row(record: &Record, selected: bool, display: &DisplayConfig) -> String {
    let checkbox = if selected { "[x]" } else { "[ ]" };
    let mut parts = vec![format!("{checkbox} {:>8}", record.id)];
    parts.extend(
        display
            .columns
            .iter()
            .map(|column| cell(record, column, display.max_width)),
    );
    parts.join(" │ ")
}

/// Header line naming the configured columns
#[must_use]
pub fn format_header(display: &DisplayConfig) -> String {
    let mut parts = vec![format!("    {:>8}", "id")];
    parts.extend(
        display
            .columns
            .iter()
            .map(|c| truncate(c, display.max_width)),
    );
    parts.join(" │ ")
}

/// Status line: page position, visible and global selection counts
#[must_use]
pub fn format_status(
    page_number: u32,
    page_count: u32,
    total_count: u64,
    visible_selected: usize,
    selected_count: usize,
) -> String {
    format!(
        "Page {page_number}/{page_count} · {total_count} records · {visible_selected} selected on page · {selected_count} selected in total"
    )
}

/// Render a whole page, one line per record, highlighting selected rows
#[must_use]
pub fn format_page<F>(
    page: &Page,
    is_selected: F,
    display: &DisplayConfig,
    color: bool,
) -> Vec<String>
where
    F: Fn(RecordId) -> bool,
{
    let mut lines = Vec::with_capacity(page.len() + 1);
    let header = format_header(display);
    lines.push(if color { header.bold().to_string() } else { header });

    for record in &page.records {
        let selected = is_selected(record.id);
        let row = format_row(record, selected, display);
        lines.push(if color && selected {
            row.green().to_string()
        } else {
            row
        });
    }
    lines
}
