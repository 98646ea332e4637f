//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use toss_bin::ReconcileReport;
use toss_domain::Entry;

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

    /// Format bin entries output.
    pub fn format_entries(&self, entries: &[Entry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_entries_json(entries),
            OutputFormat::Table => Ok(self.format_entries_table(entries)),
            OutputFormat::Quiet => Ok(self.format_entries_quiet(entries)),
        }
    }

    fn format_entries_json(&self, entries: &[Entry]) -> Result<String> {
        let json_entries: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
        Ok(serde_json::to_string_pretty(&json_entries)?)
    }

    fn format_entries_table(&self, entries: &[Entry]) -> String {
        if entries.is_empty() {
            return self.colorize("bin is empty", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["NO.", "TOSSED AT", "SIZE", "PATH"]);

        for (i, entry) in entries.iter().enumerate() {
            let mut path = entry.original_path.display().to_string();
            if entry.is_dir {
                path.push_str(" [dir]");
            }
            builder.push_record([
                (i + 1).to_string(),
                format_timestamp(&entry.tossed_at),
                format_size(entry.size_bytes),
                path,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Quiet mode prints ids only.
    fn format_entries_quiet(&self, entries: &[Entry]) -> String {
        let ids: Vec<String> = entries.iter().map(|e| e.id.to_string()).collect();
        ids.join("\n")
    }

    /// Format a reconciliation report.
    pub fn format_report(&self, report: &ReconcileReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "consistent": report.is_consistent(),
                    "tracked": report.tracked,
                    "orphans": report.orphans,
                    "stale": report.stale.iter().map(entry_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => {
                let mut lines: Vec<String> = report
                    .orphans
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                lines.extend(report.stale.iter().map(|e| e.id.to_string()));
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => {
                let mut out = report.summary();
                out.push('\n');
                if report.is_consistent() {
                    out.push_str(&self.success("bin and ledger agree"));
                } else {
                    out.push_str(&self.warning("bin and ledger disagree"));
                }
                Ok(out)
            }
        }
    }

    /// Format disk usage.
    pub fn format_usage(&self, bytes: u64) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "bytes": bytes }),
            )?),
            OutputFormat::Quiet => Ok(bytes.to_string()),
            OutputFormat::Table => Ok(format!("bin usage: {}", format_size(bytes))),
        }
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

fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id.to_string(),
        "original_path": entry.original_path,
        "bin_name": entry.bin_name,
        "tossed_at": entry.tossed_at.to_rfc3339(),
        "is_dir": entry.is_dir,
        "size_bytes": entry.size_bytes,
    })
}

/// Toss time in local time, to the minute.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Human-readable size: bytes below 1 KB, otherwise one decimal place.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    match bytes {
        b if b >= GB => format!("{:.1}GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1}MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1}KB", b as f64 / KB as f64),
        b => format!("{}B", b),
    }
}
