//! Message and table helpers for the expense shell.

use std::fmt;

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
}

fn label(kind: MessageKind) -> String {
    match kind {
        MessageKind::Info => "INFO:".cyan().to_string(),
        MessageKind::Success => "OK:".green().bold().to_string(),
        MessageKind::Warning => "WARNING:".yellow().bold().to_string(),
        MessageKind::Error => "ERROR:".red().bold().to_string(),
        MessageKind::Hint => "HINT:".dimmed().to_string(),
    }
}

pub fn emit(kind: MessageKind, message: impl fmt::Display) {
    println!("{} {}", label(kind), message);
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    emit(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}

/// Lays out `rows` under `headers` with columns padded to their widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", render_table(headers, rows));
}
