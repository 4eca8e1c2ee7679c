//! Terminal output for CLI handlers.
//!
//! Human-readable output uses indented, colored lines and `tabled` tables.
//! In JSON mode every helper emits one machine-readable line instead, and
//! whole-command reports go through [`json_output`] as a single document.

use std::fmt::Display;

use owo_colors::OwoColorize;
use parking_lot::{const_rwlock, RwLock};
use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: RwLock<OutputConfig> = const_rwlock(OutputConfig::new(false, false));

fn read_config() -> OutputConfig {
    *OUTPUT_CONFIG.read()
}

fn suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT_CONFIG.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("header", json!({ "app": "betgraph", "version": version }));
        return;
    }
    if suppressed(config) {
        return;
    }

    println!("{} {}", "betgraph".bold(), version.dimmed());
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if suppressed(config) {
        return;
    }

    println!("  {:<16} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    if read_config().json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if read_config().json {
        eprintln!(
            "{}",
            json!({ "type": "error", "payload": { "message": message } })
        );
        return;
    }

    eprintln!("  {} {}", "×".red(), message);
}

/// Print a dimmed note.
pub fn note(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }

    println!("  {}", message.dimmed());
}

/// Print multiple lines of content, each indented.
fn lines(content: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("lines", json!({ "content": content }));
        return;
    }
    if suppressed(config) {
        return;
    }

    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON value directly.
pub fn json_output(value: &serde_json::Value) {
    println!("{value}");
}

/// Render typed rows as a table.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    lines(&table.to_string());
}

/// Render a table whose columns are only known at runtime.
pub fn grid(header: Vec<String>, rows: Vec<Vec<String>>) {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    lines(&table.to_string());
}

/// Format a value green when positive and red when negative.
#[must_use]
pub fn signed(value: f64, text: impl Display) -> String {
    let text = text.to_string();
    if is_json() {
        return text;
    }
    if value > 0.0 {
        format!("{}", text.green())
    } else if value < 0.0 {
        format!("{}", text.red())
    } else {
        text
    }
}

/// Format a highlighted value in cyan.
#[must_use]
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

/// Format a probability or fraction as a percentage.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_uses_two_decimals() {
        assert_eq!(percent(0.05), "5.00%");
        assert_eq!(percent(0.747), "74.70%");
        assert_eq!(percent(0.123456), "12.35%");
        assert_eq!(percent(-0.012), "-1.20%");
    }

    #[test]
    fn output_config_defaults_to_human_mode() {
        let config = OutputConfig::default();
        assert!(!config.json);
        assert!(!config.quiet);
        assert!(suppressed(OutputConfig::new(false, true)));
        assert!(!suppressed(OutputConfig::new(true, true)));
    }
}
