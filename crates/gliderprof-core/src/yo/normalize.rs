use crate::error::{ProfileError, Result};
use crate::types::Sample;

/// Valid rows of the raw stream, sorted by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSeries {
    timestamps: Vec<f64>,
    depths: Vec<f64>,
}

impl CleanSeries {
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first_time(&self) -> f64 {
        self.timestamps[0]
    }

    pub fn last_time(&self) -> f64 {
        self.timestamps[self.timestamps.len() - 1]
    }
}

/// Drops rows with a missing timestamp, a missing depth or a non-positive depth.
///
/// Fails with [`ProfileError::InsufficientData`] when fewer than two rows survive.
pub fn normalize(stream: &[Sample]) -> Result<CleanSeries> {
    let mut rows: Vec<(f64, f64)> = stream
        .iter()
        .filter(|sample| sample.is_valid())
        .map(|sample| (sample.timestamp, sample.depth))
        .collect();

    if rows.len() < 2 {
        return Err(ProfileError::InsufficientData { valid: rows.len() });
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (timestamps, depths) = rows.into_iter().unzip();

    Ok(CleanSeries { timestamps, depths })
}
