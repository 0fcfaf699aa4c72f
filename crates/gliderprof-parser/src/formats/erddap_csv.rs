use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use csv::StringRecord;

use crate::errors::ParserError;
use crate::model::{ParsedGliderFile, StreamFormat, StreamMetadata};
use crate::registry::GliderParser;

use super::{build_sensor_frame, parse_optional_f64, SensorColumn};

const TIME_COLUMN: &str = "time";

/// Reader for ERDDAP `.csv` tabledap downloads.
///
/// The second row is treated as units when its `time` cell is not itself a time value
/// (ERDDAP writes `UTC` there).
#[derive(Debug, Clone, Copy, Default)]
pub struct ErddapCsvParser;

impl ErddapCsvParser {
    const NAME: &'static str = "ERDDAP_CSV";

    fn csv_error(source: csv::Error) -> ParserError {
        ParserError::Csv {
            parser: Self::NAME,
            source,
        }
    }

    fn parse_time(value: &str, line_index: usize) -> Result<Option<f64>, ParserError> {
        static FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        if let Ok(seconds) = trimmed.parse::<f64>() {
            return Ok(seconds.is_finite().then_some(seconds));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Some(dt.timestamp_micros() as f64 / 1e6));
        }
        let naive = trimmed.trim_end_matches('Z');
        for fmt in FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
                return Ok(Some(dt.and_utc().timestamp_micros() as f64 / 1e6));
            }
        }
        Err(ParserError::BadRecord {
            parser: Self::NAME,
            line_index,
            message: format!("invalid time '{trimmed}'"),
        })
    }

    fn classify(parser: &'static str, name: &str, raw: Vec<Option<String>>) -> SensorColumn {
        let parsed: Result<Vec<Option<f64>>, ParserError> = raw
            .iter()
            .enumerate()
            .map(|(idx, cell)| match cell {
                Some(cell) => parse_optional_f64(parser, cell, idx, name),
                None => Ok(None),
            })
            .collect();
        match parsed {
            Ok(values) => SensorColumn::Float(values),
            Err(_) => SensorColumn::Text(raw),
        }
    }
}

impl GliderParser for ErddapCsvParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedGliderFile, ParserError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut records = reader.records();

        let columns: StringRecord = records
            .next()
            .ok_or(ParserError::WrongFormat {
                parser: Self::NAME,
                reason: "file missing column header row".to_string(),
            })?
            .map_err(Self::csv_error)?;
        let sensor_names: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();
        let time_index = sensor_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(TIME_COLUMN))
            .ok_or_else(|| ParserError::WrongFormat {
                parser: Self::NAME,
                reason: format!("header has no '{TIME_COLUMN}' column"),
            })?;

        let mut sensor_units = vec![String::new(); sensor_names.len()];
        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); sensor_names.len()];
        let mut timestamp = Vec::new();

        for (row_idx, record) in records.enumerate() {
            let record = record.map_err(Self::csv_error)?;
            let line_index = row_idx + 1;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if record.len() != sensor_names.len() {
                return Err(ParserError::BadRecord {
                    parser: Self::NAME,
                    line_index,
                    message: format!(
                        "expected {} fields, found {}",
                        sensor_names.len(),
                        record.len()
                    ),
                });
            }

            let time_cell = record.get(time_index).unwrap_or_default();
            let time = match Self::parse_time(time_cell, line_index) {
                Ok(time) => time,
                Err(_) if row_idx == 0 => {
                    sensor_units = record.iter().map(|u| u.trim().to_string()).collect();
                    continue;
                }
                Err(err) => return Err(err),
            };

            timestamp.push(time);
            for (column, field) in raw.iter_mut().zip(record.iter()) {
                let field = field.trim();
                column.push((!field.is_empty()).then(|| field.to_string()));
            }
        }

        if timestamp.is_empty() {
            return Err(ParserError::NoRecords { parser: Self::NAME });
        }

        let sensor_columns = sensor_names
            .iter()
            .zip(raw)
            .map(|(name, values)| Self::classify(Self::NAME, name, values))
            .collect();
        let df = build_sensor_frame(Self::NAME, &sensor_names, sensor_columns, timestamp)?;

        Ok(ParsedGliderFile {
            format: StreamFormat::ErddapCsv,
            metadata: StreamMetadata {
                header: BTreeMap::new(),
                sensor_bytes: Vec::new(),
                time_sensor: sensor_names[time_index].clone(),
                sensor_names,
                sensor_units,
            },
            df,
        })
    }
}
