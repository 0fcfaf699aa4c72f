use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{clean_slice, ProfileWindow, Sample};

/// Names the filter predicates that can appear in a configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    MinPoints,
    MinDepthSpan,
    MinTimeSpan,
}

/// A validity predicate evaluated against the clean samples inside a window.
///
/// Every predicate rejects a window whose clean slice is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileFilter {
    /// At least `n` valid samples.
    ///
    /// An empty clean slice is rejected even for `n == 0`: a window with no valid
    /// samples has no extrema and cannot be a profile.
    MinPoints(usize),
    /// `max(depth) - min(depth)` of at least the given span.
    MinDepthSpan(f64),
    /// `max(timestamp) - min(timestamp)` of at least the given seconds.
    MinTimeSpan(f64),
}

impl ProfileFilter {
    pub fn kind(&self) -> FilterKind {
        match self {
            ProfileFilter::MinPoints(_) => FilterKind::MinPoints,
            ProfileFilter::MinDepthSpan(_) => FilterKind::MinDepthSpan,
            ProfileFilter::MinTimeSpan(_) => FilterKind::MinTimeSpan,
        }
    }

    pub fn keep(&self, stream: &[Sample], window: &ProfileWindow) -> bool {
        match *self {
            ProfileFilter::MinPoints(min) => {
                let count = clean_slice(stream, window).count();
                count > 0 && count >= min
            }
            ProfileFilter::MinDepthSpan(min) => {
                span(clean_slice(stream, window).map(|s| s.depth)).is_some_and(|v| v >= min)
            }
            ProfileFilter::MinTimeSpan(min) => {
                span(clean_slice(stream, window).map(|s| s.timestamp)).is_some_and(|v| v >= min)
            }
        }
    }
}

impl fmt::Display for ProfileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileFilter::MinPoints(n) => write!(f, "min_points({n})"),
            ProfileFilter::MinDepthSpan(s) => write!(f, "min_depth_span({s})"),
            ProfileFilter::MinTimeSpan(t) => write!(f, "min_time_span({t})"),
        }
    }
}

fn span(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut bounds: Option<(f64, f64)> = None;
    for value in values {
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    bounds.map(|(lo, hi)| hi - lo)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedProfile {
    pub window: ProfileWindow,
    pub filter: ProfileFilter,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredProfiles {
    pub kept: Vec<ProfileWindow>,
    pub rejected: Vec<RejectedProfile>,
}

/// Ordered list of predicates; a window survives only if every predicate keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    filters: Vec<ProfileFilter>,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new(vec![
            ProfileFilter::MinPoints(crate::config::DEFAULT_MIN_POINTS),
            ProfileFilter::MinDepthSpan(crate::config::DEFAULT_MIN_DEPTH_SPAN),
        ])
    }
}

impl FilterChain {
    pub fn new(filters: Vec<ProfileFilter>) -> Self {
        Self { filters }
    }

    /// The historical chain, which runs the depth-span predicate twice.
    ///
    /// Produces the same windows as [`FilterChain::default`] since the predicate is idempotent.
    pub fn source_compatible() -> Self {
        Self::new(vec![
            ProfileFilter::MinPoints(crate::config::DEFAULT_MIN_POINTS),
            ProfileFilter::MinDepthSpan(crate::config::DEFAULT_MIN_DEPTH_SPAN),
            ProfileFilter::MinDepthSpan(crate::config::DEFAULT_MIN_DEPTH_SPAN),
        ])
    }

    pub fn filters(&self) -> &[ProfileFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the first predicate that rejects `window`, if any.
    pub fn first_rejection(
        &self,
        stream: &[Sample],
        window: &ProfileWindow,
    ) -> Option<ProfileFilter> {
        self.filters
            .iter()
            .find(|filter| !filter.keep(stream, window))
            .copied()
    }

    /// Applies the chain to each window, preserving input order among survivors.
    pub fn apply(&self, stream: &[Sample], windows: &[ProfileWindow]) -> FilteredProfiles {
        let mut result = FilteredProfiles::default();
        for window in windows {
            match self.first_rejection(stream, window) {
                None => result.kept.push(*window),
                Some(filter) => {
                    debug!(
                        start = window.start_time,
                        end = window.end_time,
                        %filter,
                        "profile rejected by filter"
                    );
                    result.rejected.push(RejectedProfile {
                        window: *window,
                        filter,
                    });
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(rows: &[(f64, f64)]) -> Vec<Sample> {
        rows.iter().copied().map(Sample::from).collect()
    }

    #[test]
    fn span_of_empty_is_none() {
        assert_eq!(span(std::iter::empty()), None);
        assert_eq!(span([3.0, 1.0, 2.0].into_iter()), Some(2.0));
    }

    #[test]
    fn empty_slice_fails_every_predicate() {
        let data = stream(&[(0.0, f64::NAN), (10.0, -1.0)]);
        let window = ProfileWindow::new(0.0, 10.0);
        assert!(!ProfileFilter::MinPoints(0).keep(&data, &window));
        assert!(!ProfileFilter::MinDepthSpan(0.0).keep(&data, &window));
        assert!(!ProfileFilter::MinTimeSpan(0.0).keep(&data, &window));
    }

    #[test]
    fn chain_reports_first_failing_filter() {
        let data = stream(&[(0.0, 5.0), (10.0, 5.2), (20.0, 5.4)]);
        let chain = FilterChain::source_compatible();
        let window = ProfileWindow::new(0.0, 20.0);
        assert_eq!(
            chain.first_rejection(&data, &window),
            Some(ProfileFilter::MinDepthSpan(1.0))
        );
    }
}
