/// Boxcar width, in grid samples, used for a given resampling interval.
pub fn boxcar_width(interval: f64) -> usize {
    ((interval / 2.0).floor() as usize).max(1)
}

/// Centered moving average of width `width`.
///
/// Near the ends the window is truncated to the samples that exist; there is no padding.
pub fn boxcar_smooth(values: &[f64], width: usize) -> Vec<f64> {
    let width = width.max(1);
    let behind = (width - 1) / 2;
    let ahead = width / 2;

    (0..values.len())
        .map(|idx| {
            let lo = idx.saturating_sub(behind);
            let hi = (idx + ahead).min(values.len() - 1);
            let window = &values[lo..=hi];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_half_interval() {
        assert_eq!(boxcar_width(10.0), 5);
        assert_eq!(boxcar_width(3.0), 1);
        assert_eq!(boxcar_width(1.0), 1);
        assert_eq!(boxcar_width(0.5), 1);
    }

    #[test]
    fn edges_average_over_fewer_points() {
        let smoothed = boxcar_smooth(&[0.0, 3.0, 6.0, 9.0, 12.0], 3);
        assert_eq!(smoothed, vec![1.5, 3.0, 6.0, 9.0, 10.5]);
    }

    #[test]
    fn width_one_is_identity() {
        let input = [4.0, -2.0, 7.5];
        assert_eq!(boxcar_smooth(&input, 1), input.to_vec());
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(boxcar_smooth(&[], 5).is_empty());
    }
}
