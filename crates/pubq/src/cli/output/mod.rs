//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use pubq_highlight::{Highlighter, dim, header, highlight_query, subheader, success, warning};
use pubq_query::BooleanQuery;
use serde::Serialize;

/// Applies terminal styles, or passes text through when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    /// Whether to emit ANSI escapes.
    color: bool,
}

impl Painter {
    /// Creates a painter.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Styles a header.
    pub fn header(self, text: &str) -> String {
        self.paint(text, header)
    }

    /// Styles a subheader.
    pub fn subheader(self, text: &str) -> String {
        self.paint(text, subheader)
    }

    /// Styles secondary text.
    pub fn dim(self, text: &str) -> String {
        self.paint(text, dim)
    }

    /// Styles a success message.
    pub fn success(self, text: &str) -> String {
        self.paint(text, success)
    }

    /// Styles a warning.
    pub fn warning(self, text: &str) -> String {
        self.paint(text, warning)
    }

    /// Highlights query text.
    pub fn query(self, text: &str) -> String {
        self.paint(text, highlight_query)
    }

    /// Highlights TOML text.
    pub fn toml(self, text: &str) -> String {
        if self.color {
            Highlighter::new().highlight_toml(text)
        } else {
            text.to_string()
        }
    }

    /// Applies `style` when color is on.
    fn paint(self, text: &str, style: fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Renders the groups of a query as a table: index, term count, terms.
pub fn groups_table(query: &BooleanQuery) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["group", "terms", "query"]);

    for (index, group) in query.groups().iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            group.len().to_string(),
            group.to_query_string(),
        ]);
    }
    table
}
