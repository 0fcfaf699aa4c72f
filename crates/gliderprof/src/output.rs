use std::io;

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::Table;
use gliderprof_core::status::format_timestamp;
use gliderprof_core::ProfileWindow;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexRow {
    pub source: String,
    pub profile: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub start_time_str: String,
    pub end_time_str: String,
    pub duration_seconds: f64,
}

impl IndexRow {
    pub fn new(source: &str, profile: usize, window: &ProfileWindow) -> Self {
        Self {
            source: source.to_string(),
            profile,
            start_time: window.start_time,
            end_time: window.end_time,
            start_time_str: format_timestamp(window.start_time),
            end_time_str: format_timestamp(window.end_time),
            duration_seconds: window.duration(),
        }
    }
}

pub fn print_index(rows: &[IndexRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["source", "profile", "start", "end", "duration (s)"]);
            for row in rows {
                table.add_row(vec![
                    row.source.clone(),
                    row.profile.to_string(),
                    row.start_time_str.clone(),
                    row.end_time_str.clone(),
                    format!("{:.0}", row.duration_seconds),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
