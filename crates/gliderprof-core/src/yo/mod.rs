//! Profile segmentation of a glider depth/time record ("yo").
//!
//! Inflections are detected on a smoothed, uniformly resampled copy of the record and then
//! refined against the original samples, which carry the true turning points.

pub mod inflection;
pub mod normalize;
pub mod resample;
pub mod smooth;
pub mod windows;

use tracing::{debug, warn};

use crate::config::ProfileConfig;
use crate::error::Result;
use crate::filters::{FilterChain, RejectedProfile};
use crate::types::{ProfileCandidate, ProfileWindow, Sample};

pub use inflection::{Heading, Inflections};
pub use normalize::CleanSeries;
pub use resample::ResampledSeries;
pub use windows::{CandidateOutcome, SkipReason, SkippedCandidate};

/// Unfiltered profile candidates for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct YoExtrema {
    pub candidates: Vec<ProfileCandidate>,
    pub skipped: Vec<SkippedCandidate>,
    pub grid_len: usize,
    pub inflections: usize,
    /// True when the heading never reversed and the whole grid became one candidate.
    pub monotonic: bool,
}

impl YoExtrema {
    pub fn windows(&self) -> Vec<ProfileWindow> {
        self.candidates.iter().map(ProfileCandidate::window).collect()
    }
}

/// Filtered, ordered profile windows for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileIndex {
    pub windows: Vec<ProfileWindow>,
    pub rejected: Vec<RejectedProfile>,
    pub skipped: Vec<SkippedCandidate>,
    /// Windows dropped because they started before the previous window ended.
    pub overlapping: Vec<ProfileWindow>,
    pub monotonic: bool,
}

/// Runs normalization through window mapping and returns the raw candidates.
pub fn find_yo_extrema(stream: &[Sample], interval: f64) -> Result<YoExtrema> {
    let clean = normalize::normalize(stream)?;
    let grid = resample::resample(&clean, interval)?;

    if grid.is_empty() {
        warn!(
            samples = clean.len(),
            "record spans zero seconds; no profiles can be indexed"
        );
        return Ok(YoExtrema {
            candidates: Vec::new(),
            skipped: Vec::new(),
            grid_len: 0,
            inflections: 0,
            monotonic: false,
        });
    }

    let smoothed = smooth::boxcar_smooth(grid.depths(), smooth::boxcar_width(interval));
    let headings = inflection::classify_headings(&smoothed);
    let inflections = inflection::find_inflections(&headings);
    let monotonic = inflections == Inflections::Monotonic;
    if monotonic {
        debug!(grid_len = grid.len(), "no direction reversals; treating record as one profile");
    }

    let mut candidates = Vec::new();
    let mut skipped = Vec::new();
    for range in inflection::grid_ranges(&inflections, grid.len()) {
        match windows::map_range(stream, &grid, range) {
            CandidateOutcome::Accepted(candidate) => candidates.push(candidate),
            CandidateOutcome::Skipped(skip) => {
                debug!(
                    start = %range.start,
                    end = %range.end,
                    reason = ?skip.reason,
                    "candidate skipped"
                );
                skipped.push(skip);
            }
        }
    }

    Ok(YoExtrema {
        candidates,
        skipped,
        grid_len: grid.len(),
        inflections: inflections.count(),
        monotonic,
    })
}

/// Finds profiles using the configured interval and filter chain.
pub fn find_profiles(stream: &[Sample], config: &ProfileConfig) -> Result<ProfileIndex> {
    config.validate()?;
    find_profiles_with(stream, config.resample_interval_seconds, &config.filter_chain())
}

pub fn find_profiles_with(
    stream: &[Sample],
    interval: f64,
    chain: &FilterChain,
) -> Result<ProfileIndex> {
    let extrema = find_yo_extrema(stream, interval)?;
    let filtered = chain.apply(stream, &extrema.windows());
    let (windows, overlapping) = enforce_ordering(filtered.kept);

    Ok(ProfileIndex {
        windows,
        rejected: filtered.rejected,
        skipped: extrema.skipped,
        overlapping,
        monotonic: extrema.monotonic,
    })
}

/// Sorts by start time and drops any window that begins before its predecessor ends.
fn enforce_ordering(mut windows: Vec<ProfileWindow>) -> (Vec<ProfileWindow>, Vec<ProfileWindow>) {
    windows.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then(a.end_time.total_cmp(&b.end_time))
    });

    let mut kept: Vec<ProfileWindow> = Vec::with_capacity(windows.len());
    let mut dropped = Vec::new();
    for window in windows {
        match kept.last() {
            Some(prev) if window.start_time < prev.end_time => {
                debug!(
                    start = window.start_time,
                    end = window.end_time,
                    "dropping window overlapping its predecessor"
                );
                dropped.push(window);
            }
            _ => kept.push(window),
        }
    }
    (kept, dropped)
}
