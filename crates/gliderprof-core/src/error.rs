// crates/gliderprof-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("insufficient data: {valid} valid samples after normalization, need at least 2")]
    InsufficientData { valid: usize },

    #[error("field '{0}' not found in stream")]
    MissingField(String),

    #[error("resampling grid of {points} points exceeds the limit of {limit}")]
    GridTooLarge { points: f64, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML configuration error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
