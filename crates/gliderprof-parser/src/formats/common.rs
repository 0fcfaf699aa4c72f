use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::TIMESTAMP_COLUMN;

/// A parsed sensor column, numeric when every cell parsed as a float.
#[derive(Debug, Clone)]
pub(crate) enum SensorColumn {
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl SensorColumn {
    pub fn len(&self) -> usize {
        match self {
            SensorColumn::Float(values) => values.len(),
            SensorColumn::Text(values) => values.len(),
        }
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            SensorColumn::Float(values) => Series::new(name.into(), values).into(),
            SensorColumn::Text(values) => Series::new(name.into(), values).into(),
        }
    }
}

pub(crate) fn parse_optional_f64(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<f64>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        Ok(_) => Ok(None),
        Err(err) => Err(ParserError::BadRecord {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        }),
    }
}

/// Assembles sensor columns plus the `timestamp` column into one frame.
///
/// A sensor already named `timestamp` is replaced by the master time values.
pub(crate) fn build_sensor_frame(
    parser: &'static str,
    names: &[String],
    columns: Vec<SensorColumn>,
    timestamp: Vec<Option<f64>>,
) -> Result<DataFrame, ParserError> {
    let row_count = timestamp.len();
    let mut cols: Vec<Column> = Vec::with_capacity(columns.len() + 1);

    for (name, column) in names.iter().zip(columns) {
        if name == TIMESTAMP_COLUMN {
            continue;
        }
        if column.len() != row_count {
            return Err(ParserError::Frame {
                parser,
                message: format!(
                    "sensor {name} had {} rows, expected {row_count}",
                    column.len()
                ),
            });
        }
        cols.push(column.into_column(name));
    }
    cols.push(Series::new(TIMESTAMP_COLUMN.into(), timestamp).into());

    DataFrame::new(cols).map_err(|err| ParserError::Frame {
        parser,
        message: format!("failed to build sensor dataframe: {err}"),
    })
}
