//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use salon_core::Resource;
use salon_core::table::{Align, ResourceTable};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a padded text grid with a dimmed header row.
pub fn grid(headers: &[(&str, Align)], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|(h, _)| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, (h, align))| pad(h, widths[i], *align))
        .collect();
    println!("{}", header_line.join("  ").dimmed());

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", rule.join("──").dimmed());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], headers[i].1))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(text.width());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
    }
}

/// Render a resource table: skeleton while loading, error state when the
/// subscription degraded, otherwise the current page.
pub fn render_table<T: Resource>(table: &ResourceTable<T>) {
    if table.is_loading() {
        render_skeleton(table);
        return;
    }

    if let Some(message) = table.error() {
        error(&format!("Subscription degraded: {}", message));
    }

    let columns = table.visible_columns();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in table.page_rows() {
        rows.push(columns.iter().map(|c| (c.accessor)(row)).collect());
    }

    if rows.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
        return;
    }

    let headers: Vec<(&str, Align)> = columns.iter().map(|c| (c.header, c.align)).collect();
    grid(&headers, &rows);

    eprintln!();
    eprintln!(
        "{}",
        format!(
            "page {} of {} ({} records)",
            table.page() + 1,
            table.page_count(),
            table.len()
        )
        .dimmed()
    );
}

/// Structural placeholder matching the table's shape, shown until the
/// first snapshot lands.
fn render_skeleton<T: Resource>(table: &ResourceTable<T>) {
    let columns = table.visible_columns();
    let headers: Vec<(&str, Align)> = columns.iter().map(|c| (c.header, c.align)).collect();
    let placeholder: Vec<Vec<String>> = (0..3)
        .map(|_| headers.iter().map(|_| "░░░░░░".to_string()).collect())
        .collect();
    grid(&headers, &placeholder);
    eprintln!("{}", "Loading...".dimmed());
}
