//! Table and JSON output for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format. `items` backs the JSON output so it
/// keeps the wire shape; `rows` backs the table.
pub fn print_list<T: Serialize, R: Tabled>(items: &[T], rows: &[R], empty: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{empty}");
            } else {
                println!("{}", Table::new(rows));
            }
        },
        OutputFormat::Json => print_json(&items),
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "Could not serialize output"),
    }
}

/// Print a message, or `{"message": ...}` in JSON mode.
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{message}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "message": message })),
    }
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {value}", format!("{key}:"));
}
