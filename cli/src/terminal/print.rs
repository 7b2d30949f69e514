//! Terminal layout helpers.
//!
//! Everything is emitted as a `tracing` event under [`PRINT_TARGET`], so the
//! lines interleave correctly with spinners and log output.

use colored::*;
use tracing::info;

use crate::terminal::colors;

/// Width of headers and separators, in terminal columns.
pub const WIDTH: usize = 64;

/// Events under this target are written without a status symbol.
pub const PRINT_TARGET: &str = "drone_bbot::print";

pub fn print(line: &str) {
    info!(target: PRINT_TARGET, "{line}");
}

/// `──────⟦ TITLE ⟧──────`, centred on [`WIDTH`].
pub fn header(title: &str) {
    let label = format!("⟦ {} ⟧", title.to_uppercase());
    let fill = WIDTH.saturating_sub(console::measure_text_width(&label));
    let (left, right) = (fill / 2, fill - fill / 2);

    print(&format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        label.bright_green(),
        "─".repeat(right).color(colors::SEPARATOR)
    ));
}

pub fn fat_separator() {
    print(&"═".repeat(WIDTH).color(colors::SEPARATOR).to_string());
}

/// Prints `pairs` as one tree level with the keys padded by dots to a common width.
pub fn tree(pairs: &[(&str, ColoredString)]) {
    let key_width = pairs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    for (i, (key, value)) in pairs.iter().enumerate() {
        let branch = if i + 1 == pairs.len() { "└─" } else { "├─" };
        let dots = ".".repeat(key_width - key.len());
        print(&format!(
            " {} {}{}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centered(line: &str) {
    let pad = " ".repeat(WIDTH.saturating_sub(console::measure_text_width(line)) / 2);
    print(&format!("{pad}{line}"));
}

pub fn end_of_program() {
    fat_separator();
}
