mod common;
mod dba;
mod erddap_csv;

pub use dba::{DbaParser, DBA_TIME_SENSORS};
pub use erddap_csv::ErddapCsvParser;

pub(crate) use common::{build_sensor_frame, parse_optional_f64, SensorColumn};
