use std::collections::BTreeMap;

use crate::errors::ParserError;
use crate::model::{ParsedGliderFile, StreamFormat, StreamMetadata};
use crate::registry::GliderParser;

use super::{build_sensor_frame, parse_optional_f64, SensorColumn};

/// Master time sensors, in order of preference.
pub const DBA_TIME_SENSORS: [&str; 3] = [
    "m_present_time",
    "sci_m_present_time",
    "sci_ctd41cp_timestamp",
];

const LABEL_LINES: usize = 3;

/// Reader for Slocum glider ASCII (`dba`) files.
#[derive(Debug, Clone, Default)]
pub struct DbaParser {
    time_sensor: Option<String>,
}

impl DbaParser {
    const NAME: &'static str = "DBA";

    pub fn with_time_sensor(sensor: impl Into<String>) -> Self {
        Self {
            time_sensor: Some(sensor.into()),
        }
    }

    fn split_tag(line: &str) -> Option<(&str, &str)> {
        let (key, value) = line.split_once(": ")?;
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }
        Some((key, value.trim()))
    }

    fn parse_count(header: &BTreeMap<String, String>, key: &str) -> Result<usize, ParserError> {
        let raw = header.get(key).ok_or_else(|| ParserError::WrongFormat {
            parser: Self::NAME,
            reason: format!("header missing '{key}'"),
        })?;
        raw.parse::<usize>().map_err(|_| ParserError::BadTag {
            tag: key.to_string(),
            value: raw.clone(),
        })
    }

    fn resolve_time_sensor(&self, sensor_names: &[String]) -> Result<String, ParserError> {
        if let Some(sensor) = &self.time_sensor {
            if sensor_names.iter().any(|name| name == sensor) {
                return Ok(sensor.clone());
            }
            return Err(ParserError::TimeSensorMissing(sensor.clone()));
        }

        DBA_TIME_SENSORS
            .iter()
            .find(|candidate| sensor_names.iter().any(|name| name == *candidate))
            .map(|sensor| sensor.to_string())
            .ok_or(ParserError::NoTimeSensor {
                candidates: &DBA_TIME_SENSORS,
            })
    }
}

impl GliderParser for DbaParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedGliderFile, ParserError> {
        let mut lines = content.lines().enumerate().peekable();

        let mut header = BTreeMap::new();
        while let Some((_, line)) = lines.peek() {
            match Self::split_tag(line) {
                Some((key, value)) => {
                    header.insert(key.to_string(), value.to_string());
                    lines.next();
                }
                None => break,
            }
        }

        if header.is_empty() {
            return Err(ParserError::WrongFormat {
                parser: Self::NAME,
                reason: "file has no 'key: value' header".to_string(),
            });
        }

        let tag_count = Self::parse_count(&header, "num_ascii_tags")?;
        if tag_count != header.len() {
            return Err(ParserError::TagCountMismatch {
                declared: tag_count,
                found: header.len(),
            });
        }
        if let Some(raw) = header.get("num_label_lines") {
            if raw.parse::<usize>().ok() != Some(LABEL_LINES) {
                return Err(ParserError::BadTag {
                    tag: "num_label_lines".to_string(),
                    value: raw.clone(),
                });
            }
        }

        // label lines follow the tags: names, units, then byte sizes
        let mut next_label = |label: &'static str, line_index: usize| {
            let fields: Vec<String> = lines
                .next()
                .map(|(_, line)| line.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            if fields.is_empty() {
                return Err(ParserError::MissingLabelLine { label, line_index });
            }
            Ok(fields)
        };

        let sensor_names = next_label("sensor name", tag_count)?;
        let sensor_units = next_label("sensor unit", tag_count + 1)?;
        let sensor_bytes = next_label("sensor byte", tag_count + 2)?;

        if sensor_units.len() != sensor_names.len() || sensor_bytes.len() != sensor_names.len() {
            return Err(ParserError::LabelMismatch {
                names: sensor_names.len(),
                units: sensor_units.len(),
                bytes: sensor_bytes.len(),
            });
        }

        let time_sensor = self.resolve_time_sensor(&sensor_names)?;
        let time_index = sensor_names
            .iter()
            .position(|name| *name == time_sensor)
            .unwrap_or_default();

        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); sensor_names.len()];
        for (line_index, line) in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != sensor_names.len() {
                return Err(ParserError::BadRecord {
                    parser: Self::NAME,
                    line_index,
                    message: format!(
                        "expected {} values, found {}",
                        sensor_names.len(),
                        fields.len()
                    ),
                });
            }
            for ((column, field), name) in values.iter_mut().zip(fields).zip(&sensor_names) {
                column.push(parse_optional_f64(Self::NAME, field, line_index, name)?);
            }
        }

        let timestamp = values[time_index].clone();
        if timestamp.is_empty() {
            return Err(ParserError::NoRecords { parser: Self::NAME });
        }

        let columns = values.into_iter().map(SensorColumn::Float).collect();
        let df = build_sensor_frame(Self::NAME, &sensor_names, columns, timestamp)?;

        Ok(ParsedGliderFile {
            format: StreamFormat::Dba,
            metadata: StreamMetadata {
                header,
                sensor_names,
                sensor_units,
                sensor_bytes,
                time_sensor,
            },
            df,
        })
    }
}
