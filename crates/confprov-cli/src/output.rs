//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use confprov_domain::ProvenanceEntry;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format provenance entries keyed by dotted path.
    pub fn format_entries(&self, entries: &[(String, &ProvenanceEntry)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_entries_json(entries),
            OutputFormat::Table => self.format_entries_table(entries),
            OutputFormat::Quiet => Ok(Self::format_entries_quiet(entries)),
        }
    }

    /// Format the provenance of a single parameter.
    pub fn format_source(&self, path: &str, entry: &ProvenanceEntry) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&entry.to_value())?),
            OutputFormat::Quiet => Ok(entry.to_string()),
            OutputFormat::Table => self.format_entries_table(&[(path.to_string(), entry)]),
        }
    }

    /// Format a configuration value (or the whole merged mapping).
    pub fn format_value(&self, value: &serde_yaml::Value) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            _ => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        }
    }

    fn format_entries_json(&self, entries: &[(String, &ProvenanceEntry)]) -> Result<String> {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.to_value()))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    fn format_entries_table(&self, entries: &[(String, &ProvenanceEntry)]) -> Result<String> {
        if entries.is_empty() {
            return Ok(self.colorize("No parameters tracked.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Parameter", "File", "Line", "Col"]);

        for (path, entry) in entries {
            builder.push_record([
                path.clone(),
                entry.source_file.clone(),
                optional(entry.line),
                optional(entry.column),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    fn format_entries_quiet(entries: &[(String, &ProvenanceEntry)]) -> String {
        entries
            .iter()
            .map(|(path, _)| path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
