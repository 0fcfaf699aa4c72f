use crate::types::{GridIndex, GridRange};

/// Direction of travel between two neighbouring grid samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// Depth decreasing (shoaling).
    Ascending,
    /// Depth increasing or unchanged.
    Descending,
}

impl Heading {
    /// `<= 0` maps to ascending, then `>= 0` maps to descending, so an exact zero lands on
    /// descending.
    fn from_delta(delta: f64) -> Self {
        let mut heading = Heading::Descending;
        if delta <= 0.0 {
            heading = Heading::Ascending;
        }
        if delta >= 0.0 {
            heading = Heading::Descending;
        }
        heading
    }
}

/// Binarized first difference of the smoothed depth, one entry shorter than the input.
pub fn classify_headings(smoothed: &[f64]) -> Vec<Heading> {
    smoothed
        .windows(2)
        .map(|pair| Heading::from_delta(pair[1] - pair[0]))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inflections {
    /// The heading never reverses; the whole record is a single profile.
    Monotonic,
    /// Grid indices at which the heading reverses, ascending.
    At(Vec<GridIndex>),
}

impl Inflections {
    pub fn count(&self) -> usize {
        match self {
            Inflections::Monotonic => 0,
            Inflections::At(indices) => indices.len(),
        }
    }
}

pub fn find_inflections(headings: &[Heading]) -> Inflections {
    let indices: Vec<GridIndex> = headings
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(idx, _)| GridIndex(idx))
        .collect();

    if indices.is_empty() {
        Inflections::Monotonic
    } else {
        Inflections::At(indices)
    }
}

/// Splits `[0, grid_len - 1]` at each inflection into `N + 1` closed ranges.
///
/// Neighbouring ranges share their boundary index. An empty grid produces no ranges.
pub fn grid_ranges(inflections: &Inflections, grid_len: usize) -> Vec<GridRange> {
    let Some(last) = grid_len.checked_sub(1).map(GridIndex) else {
        return Vec::new();
    };

    match inflections {
        Inflections::Monotonic => vec![GridRange {
            start: GridIndex(0),
            end: last,
        }],
        Inflections::At(indices) => {
            let mut bounds = Vec::with_capacity(indices.len() + 2);
            bounds.push(GridIndex(0));
            bounds.extend(indices.iter().copied());
            bounds.push(last);
            bounds
                .windows(2)
                .map(|pair| GridRange {
                    start: pair[0],
                    end: pair[1],
                })
                .collect()
        }
    }
}
