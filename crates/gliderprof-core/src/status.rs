use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::types::{clean_slice, ProfileDirection, ProfileWindow, Sample};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Summary of one indexed profile, as kept in a deployment's profile status file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatus {
    pub profile_id: i64,
    pub profile_time: f64,
    pub profile_time_str: String,
    pub profile_max_time: f64,
    pub profile_max_time_str: String,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub num_records: usize,
    pub direction: ProfileDirection,
    pub source: String,
}

pub fn build_profile_status(
    stream: &[Sample],
    windows: &[ProfileWindow],
    source: &str,
) -> Vec<ProfileStatus> {
    windows
        .iter()
        .map(|window| summarize(stream, window, source))
        .collect()
}

fn summarize(stream: &[Sample], window: &ProfileWindow, source: &str) -> ProfileStatus {
    let rows: Vec<&Sample> = clean_slice(stream, window).collect();
    if rows.is_empty() {
        warn!(
            start = window.start_time,
            end = window.end_time,
            "profile has no valid time/depth records"
        );
    }

    let min_depth = rows.iter().map(|s| s.depth).reduce(f64::min);
    let max_depth = rows.iter().map(|s| s.depth).reduce(f64::max);
    let direction = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if last.depth < first.depth => ProfileDirection::Climb,
        _ => ProfileDirection::Dive,
    };

    let profile_time = window.midpoint();
    ProfileStatus {
        profile_id: profile_time.trunc() as i64,
        profile_time,
        profile_time_str: format_timestamp(profile_time),
        profile_max_time: window.end_time,
        profile_max_time_str: format_timestamp(window.end_time),
        min_depth,
        max_depth,
        num_records: rows.len(),
        direction,
        source: source.to_string(),
    }
}

pub fn format_timestamp(seconds: f64) -> String {
    let secs = seconds.floor();
    let nanos = ((seconds - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| format!("{seconds}"))
}

/// Appends entries whose `profile_id` is not yet present and sorts the result by time.
pub fn merge_profile_status(
    existing: Vec<ProfileStatus>,
    incoming: Vec<ProfileStatus>,
) -> Vec<ProfileStatus> {
    let mut seen: HashSet<i64> = existing.iter().map(|s| s.profile_id).collect();
    let mut merged = existing;
    for status in incoming {
        if seen.insert(status.profile_id) {
            merged.push(status);
        }
    }
    merged.sort_by(|a, b| a.profile_time.total_cmp(&b.profile_time));
    merged
}

/// Reads a status file; a file that does not exist yet reads as empty.
pub fn read_status_file(path: impl AsRef<Path>) -> Result<Vec<ProfileStatus>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

pub fn write_status_file(path: impl AsRef<Path>, statuses: &[ProfileStatus]) -> Result<()> {
    let json = serde_json::to_string_pretty(statuses)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_status_csv<W: Write>(writer: W, statuses: &[ProfileStatus]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for status in statuses {
        csv_writer.serialize(status)?;
    }
    csv_writer.flush()?;
    Ok(())
}
