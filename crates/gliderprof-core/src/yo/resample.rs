use super::normalize::CleanSeries;
use crate::error::{ProfileError, Result};
use crate::types::GridIndex;

/// Largest grid `resample` will allocate; about 115 days at a 1 s interval.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Depth interpolated onto a uniform time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    interval: f64,
    timestamps: Vec<f64>,
    depths: Vec<f64>,
}

impl ResampledSeries {
    pub fn interval(&self) -> f64 {
        self.interval
    }

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

    pub fn timestamp_at(&self, index: GridIndex) -> f64 {
        self.timestamps[index.0]
    }
}

/// Builds the grid `t_i = min + i * interval` for every `t_i < max` and interpolates depth onto it.
///
/// Fails with [`ProfileError::GridTooLarge`] rather than allocating more than
/// [`MAX_GRID_POINTS`] points.
pub fn resample(clean: &CleanSeries, interval: f64) -> Result<ResampledSeries> {
    let start = clean.first_time();
    let stop = clean.last_time();
    let points = ((stop - start) / interval).ceil().max(0.0);
    if points.is_nan() || points > MAX_GRID_POINTS as f64 {
        return Err(ProfileError::GridTooLarge {
            points,
            limit: MAX_GRID_POINTS,
        });
    }
    let steps = points as usize;

    let timestamps: Vec<f64> = (0..steps).map(|i| start + i as f64 * interval).collect();
    let depths = timestamps
        .iter()
        .map(|&t| interpolate(clean.timestamps(), clean.depths(), t))
        .collect();

    Ok(ResampledSeries {
        interval,
        timestamps,
        depths,
    })
}

/// Piecewise-linear interpolation over sorted `xs`, holding the boundary values outside the range.
pub(crate) fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let upper = xs.partition_point(|&value| value <= x);
    if upper == 0 {
        return ys[0];
    }
    if upper == xs.len() {
        return ys[xs.len() - 1];
    }

    let lower = upper - 1;
    let (x0, x1) = (xs[lower], xs[upper]);
    let (y0, y1) = (ys[lower], ys[upper]);
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
