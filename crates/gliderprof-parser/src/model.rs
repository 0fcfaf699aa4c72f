use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the column every parser fills with epoch seconds from the master time sensor.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamFormat {
    Dba,
    ErddapCsv,
}

impl StreamFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamFormat::Dba => "dba",
            StreamFormat::ErddapCsv => "erddap_csv",
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub header: BTreeMap<String, String>,
    pub sensor_names: Vec<String>,
    pub sensor_units: Vec<String>,
    pub sensor_bytes: Vec<String>,
    pub time_sensor: String,
}

impl StreamMetadata {
    pub fn unit_of(&self, sensor: &str) -> Option<&str> {
        self.sensor_names
            .iter()
            .position(|name| name == sensor)
            .and_then(|idx| self.sensor_units.get(idx))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedGliderFile {
    pub format: StreamFormat,
    pub metadata: StreamMetadata,
    /// One row per record, one `Float64` column per sensor plus [`TIMESTAMP_COLUMN`].
    pub df: DataFrame,
}

impl ParsedGliderFile {
    pub fn row_count(&self) -> usize {
        self.df.height()
    }
}
