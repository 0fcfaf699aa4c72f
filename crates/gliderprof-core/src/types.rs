use std::fmt;

use serde::{Deserialize, Serialize};

/// One (timestamp, depth) observation from the glider stream.
///
/// Timestamps are seconds since the Unix epoch. A missing depth is carried as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    pub depth: f64,
}

impl Sample {
    pub fn new(timestamp: f64, depth: f64) -> Self {
        Self { timestamp, depth }
    }

    /// Non-positive depths are physically invalid for the pressure sensor and count as missing.
    pub fn is_valid(&self) -> bool {
        self.timestamp.is_finite() && self.depth.is_finite() && self.depth > 0.0
    }
}

impl From<(f64, f64)> for Sample {
    fn from((timestamp, depth): (f64, f64)) -> Self {
        Self { timestamp, depth }
    }
}

/// Position on the synthetic uniform resampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridIndex(pub usize);

/// Position in the caller's original, irregularly sampled stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleIndex(pub usize);

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid[{}]", self.0)
    }
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sample[{}]", self.0)
    }
}

/// Closed range of grid indices between two consecutive inflections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub start: GridIndex,
    pub end: GridIndex,
}

/// Candidate profile anchored at two original samples (the depth extrema).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileCandidate {
    pub start_index: SampleIndex,
    pub end_index: SampleIndex,
    pub start_time: f64,
    pub end_time: f64,
}

impl ProfileCandidate {
    pub fn window(&self) -> ProfileWindow {
        ProfileWindow::new(self.start_time, self.end_time)
    }
}

/// Final output unit: inclusive start/stop timestamps of one dive or climb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileWindow {
    pub start_time: f64,
    pub end_time: f64,
}

impl ProfileWindow {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start_time && timestamp <= self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn midpoint(&self) -> f64 {
        self.start_time + self.duration() / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileDirection {
    Dive,
    Climb,
}

impl ProfileDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileDirection::Dive => "dive",
            ProfileDirection::Climb => "climb",
        }
    }
}

impl fmt::Display for ProfileDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Valid samples of `stream` whose timestamps fall inside `window` (inclusive).
pub fn clean_slice<'a>(
    stream: &'a [Sample],
    window: &'a ProfileWindow,
) -> impl Iterator<Item = &'a Sample> + 'a {
    stream
        .iter()
        .filter(move |sample| sample.is_valid() && window.contains(sample.timestamp))
}
