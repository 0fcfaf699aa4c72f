use std::fmt;

use thiserror::Error;

/// A reader that declined the input, and why.
#[derive(Debug, Clone)]
pub struct FormatRejection {
    pub parser: &'static str,
    pub reason: String,
}

impl fmt::Display for FormatRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parser, self.reason)
    }
}

fn list_rejections(rejections: &[FormatRejection]) -> String {
    rejections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ParserError {
    /// The input is not this reader's format; the registry moves on to the next reader.
    #[error("not a {parser} file: {reason}")]
    WrongFormat {
        parser: &'static str,
        reason: String,
    },

    #[error("dba header declares {declared} ascii tags but {found} were read")]
    TagCountMismatch { declared: usize, found: usize },

    #[error("dba header tag '{tag}' has unusable value '{value}'")]
    BadTag { tag: String, value: String },

    #[error("dba {label} line (line {line_index}) is missing or empty")]
    MissingLabelLine {
        label: &'static str,
        line_index: usize,
    },

    #[error("dba label lines disagree: {names} sensor names, {units} units, {bytes} byte sizes")]
    LabelMismatch {
        names: usize,
        units: usize,
        bytes: usize,
    },

    #[error("master time sensor '{0}' is not in the file")]
    TimeSensorMissing(String),

    #[error("none of the master time sensors {candidates:?} is in the file")]
    NoTimeSensor { candidates: &'static [&'static str] },

    #[error("{parser} record on line {line_index}: {message}")]
    BadRecord {
        parser: &'static str,
        line_index: usize,
        message: String,
    },

    #[error("{parser} could not read CSV: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} sensor columns do not form a frame: {message}")]
    Frame {
        parser: &'static str,
        message: String,
    },

    #[error("{parser} file holds no sensor records")]
    NoRecords { parser: &'static str },

    #[error("unrecognized glider file ({})", list_rejections(.rejections))]
    Unrecognized { rejections: Vec<FormatRejection> },
}
