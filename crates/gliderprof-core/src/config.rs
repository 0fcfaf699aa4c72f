use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};
use crate::filters::{FilterChain, FilterKind, ProfileFilter};

pub const DEFAULT_RESAMPLE_INTERVAL_SECONDS: f64 = 10.0;
pub const DEFAULT_MIN_POINTS: usize = 3;
pub const DEFAULT_MIN_DEPTH_SPAN: f64 = 1.0;
pub const DEFAULT_MIN_TIME_SPAN: f64 = 10.0;
pub const DEFAULT_DEPTH_FIELD: &str = "sci_water_pressure_dbar";
pub const DEFAULT_TIME_FIELD: &str = "timestamp";

/// Tunables for profile segmentation.
///
/// Every field is optional in TOML; missing keys fall back to the defaults above.
///
/// ```toml
/// resample_interval_seconds = 10.0
/// min_points = 3
/// min_depth_span = 1.0
/// depth_field = "sci_water_pressure"
/// filters = ["min_points", "min_depth_span", "min_time_span"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    pub resample_interval_seconds: f64,
    pub min_points: usize,
    pub min_depth_span: f64,
    pub min_time_span: f64,
    pub depth_field: String,
    pub time_field: String,
    pub filters: Vec<FilterKind>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            resample_interval_seconds: DEFAULT_RESAMPLE_INTERVAL_SECONDS,
            min_points: DEFAULT_MIN_POINTS,
            min_depth_span: DEFAULT_MIN_DEPTH_SPAN,
            min_time_span: DEFAULT_MIN_TIME_SPAN,
            depth_field: DEFAULT_DEPTH_FIELD.to_string(),
            time_field: DEFAULT_TIME_FIELD.to_string(),
            filters: vec![FilterKind::MinPoints, FilterKind::MinDepthSpan],
        }
    }
}

impl ProfileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProfileConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let interval = self.resample_interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ProfileError::InvalidConfig(format!(
                "resample_interval_seconds must be a positive number, got {interval}"
            )));
        }
        for (name, value) in [
            ("min_depth_span", self.min_depth_span),
            ("min_time_span", self.min_time_span),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.depth_field.trim().is_empty() {
            return Err(ProfileError::InvalidConfig("depth_field is empty".into()));
        }
        if self.time_field.trim().is_empty() {
            return Err(ProfileError::InvalidConfig("time_field is empty".into()));
        }
        Ok(())
    }

    /// Builds the filter chain in the configured order with the configured thresholds.
    pub fn filter_chain(&self) -> FilterChain {
        FilterChain::new(
            self.filters
                .iter()
                .map(|kind| match kind {
                    FilterKind::MinPoints => ProfileFilter::MinPoints(self.min_points),
                    FilterKind::MinDepthSpan => ProfileFilter::MinDepthSpan(self.min_depth_span),
                    FilterKind::MinTimeSpan => ProfileFilter::MinTimeSpan(self.min_time_span),
                })
                .collect(),
        )
    }
}
