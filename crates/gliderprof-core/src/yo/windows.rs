use tracing::warn;

use super::resample::ResampledSeries;
use crate::types::{GridRange, ProfileCandidate, Sample, SampleIndex};

/// Padding on each side of a grid range, in grid intervals.
const PAD_INTERVALS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No valid sample fell inside the padded time window.
    EmptySlice,
    /// The shallowest and deepest samples share a timestamp.
    ZeroDuration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedCandidate {
    pub range: GridRange,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateOutcome {
    Accepted(ProfileCandidate),
    Skipped(SkippedCandidate),
}

/// Time bounds covered by a grid range, widened by `pad` seconds on both sides.
pub fn grid_time_window(grid: &ResampledSeries, range: GridRange, pad: f64) -> (f64, f64) {
    (
        grid.timestamp_at(range.start) - pad,
        grid.timestamp_at(range.end) + pad,
    )
}

/// Original stream positions whose timestamps fall in `[lo, hi]`, in stream order.
pub fn samples_in_window(stream: &[Sample], lo: f64, hi: f64) -> Vec<SampleIndex> {
    stream
        .iter()
        .enumerate()
        .filter(|(_, sample)| sample.timestamp >= lo && sample.timestamp <= hi)
        .map(|(idx, _)| SampleIndex(idx))
        .collect()
}

/// Refines a grid range to the original samples holding the minimum and maximum depth.
pub fn map_range(stream: &[Sample], grid: &ResampledSeries, range: GridRange) -> CandidateOutcome {
    let pad = PAD_INTERVALS * grid.interval();
    let (lo, hi) = grid_time_window(grid, range, pad);

    let valid: Vec<SampleIndex> = samples_in_window(stream, lo, hi)
        .into_iter()
        .filter(|idx| stream[idx.0].is_valid())
        .collect();

    let Some(&first) = valid.first() else {
        warn!(
            start = lo,
            end = hi,
            "no valid samples in profile window; skipping candidate"
        );
        return CandidateOutcome::Skipped(SkippedCandidate {
            range,
            reason: SkipReason::EmptySlice,
        });
    };

    let mut shallowest = first;
    let mut deepest = first;
    for &idx in &valid[1..] {
        let depth = stream[idx.0].depth;
        if depth < stream[shallowest.0].depth {
            shallowest = idx;
        }
        if depth > stream[deepest.0].depth {
            deepest = idx;
        }
    }

    let (mut start_index, mut end_index) = if shallowest <= deepest {
        (shallowest, deepest)
    } else {
        (deepest, shallowest)
    };
    if stream[start_index.0].timestamp > stream[end_index.0].timestamp {
        std::mem::swap(&mut start_index, &mut end_index);
    }
    let start_time = stream[start_index.0].timestamp;
    let end_time = stream[end_index.0].timestamp;

    if start_time >= end_time {
        return CandidateOutcome::Skipped(SkippedCandidate {
            range,
            reason: SkipReason::ZeroDuration,
        });
    }

    CandidateOutcome::Accepted(ProfileCandidate {
        start_index,
        end_index,
        start_time,
        end_time,
    })
}
