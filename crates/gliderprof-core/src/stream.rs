use polars::prelude::*;

use crate::config::ProfileConfig;
use crate::error::{ProfileError, Result};
use crate::types::{ProfileWindow, Sample};

pub const PROFILE_ID_COLUMN: &str = "profile_id";

/// Extracts the (time, depth) record from a parsed stream, preserving row order.
///
/// Null cells become NaN so the engine can treat them as missing. Datetime columns are
/// converted to epoch seconds.
pub fn yo_from_dataframe(
    df: &DataFrame,
    time_field: &str,
    depth_field: &str,
) -> Result<Vec<Sample>> {
    let times = seconds_column(df, time_field)?;
    let depths = float_column(df, depth_field)?;

    Ok(times
        .into_iter()
        .zip(depths)
        .map(|(t, d)| Sample::new(t.unwrap_or(f64::NAN), d.unwrap_or(f64::NAN)))
        .collect())
}

pub fn yo_from_config(df: &DataFrame, config: &ProfileConfig) -> Result<Vec<Sample>> {
    yo_from_dataframe(df, &config.time_field, &config.depth_field)
}

/// Appends a nullable `profile_id` column holding the index of the window each row falls in.
///
/// Rows on a shared boundary belong to the later window.
pub fn label_profiles(
    df: &DataFrame,
    time_field: &str,
    windows: &[ProfileWindow],
) -> Result<DataFrame> {
    let times = seconds_column(df, time_field)?;
    let labels: Vec<Option<i64>> = times
        .iter()
        .map(|t| {
            t.and_then(|t| {
                windows
                    .iter()
                    .rposition(|window| window.contains(t))
                    .map(|idx| idx as i64)
            })
        })
        .collect();

    let mut output = df.clone();
    output.with_column(Series::new(PROFILE_ID_COLUMN.into(), labels))?;
    Ok(output)
}

/// Slices the stream into one frame per window using inclusive time bounds.
pub fn split_profiles(
    df: &DataFrame,
    time_field: &str,
    windows: &[ProfileWindow],
) -> Result<Vec<DataFrame>> {
    let times = seconds_column(df, time_field)?;
    let mut frames = Vec::with_capacity(windows.len());

    for (idx, window) in windows.iter().enumerate() {
        let mask: BooleanChunked = times
            .iter()
            .map(|t| t.is_some_and(|t| window.contains(t)))
            .collect();
        let mut profile = df.filter(&mask)?;
        let height = profile.height();
        profile.with_column(Series::new(
            PROFILE_ID_COLUMN.into(),
            vec![idx as i64; height],
        ))?;
        frames.push(profile);
    }

    Ok(frames)
}

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| ProfileError::MissingField(name.to_string()))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = lookup(df, name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn seconds_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = lookup(df, name)?;
    let per_second = match column.dtype() {
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1e3,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1e6,
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 1e9,
        _ => 1.0,
    };

    let physical = column
        .as_materialized_series()
        .to_physical_repr()
        .cast(&DataType::Float64)?;
    Ok(physical
        .f64()?
        .into_iter()
        .map(|value| value.map(|v| v / per_second))
        .collect())
}
