pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{FormatRejection, ParserError};
pub use formats::{DbaParser, ErddapCsvParser, DBA_TIME_SENSORS};
pub use model::{ParsedGliderFile, StreamFormat, StreamMetadata, TIMESTAMP_COLUMN};
pub use registry::{parse_glider_file, parse_with_parsers, GliderParser};

#[cfg(test)]
mod tests;
