use std::f64::consts::PI;

use gliderprof_core::{
    find_profiles, find_profiles_with, find_yo_extrema, FilterChain, ProfileConfig, ProfileError,
    ProfileWindow, Sample,
};

fn cycle_depth(t: f64) -> f64 {
    50.0 * (1.0 - (2.0 * PI * t / 100.0).cos())
}

fn cycle_stream() -> Vec<Sample> {
    (0..200)
        .map(|t| Sample::new(t as f64, cycle_depth(t as f64)))
        .collect()
}

fn assert_ordered(windows: &[ProfileWindow]) {
    for window in windows {
        assert!(window.start_time < window.end_time, "{window:?} is empty");
    }
    for pair in windows.windows(2) {
        assert!(
            pair[0].end_time <= pair[1].start_time,
            "{:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}

fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

#[test]
fn synthetic_cycle_yields_one_dive_and_one_climb_per_period() {
    let stream = cycle_stream();
    let extrema = find_yo_extrema(&stream, 10.0).expect("extrema");

    assert_eq!(extrema.inflections, 3);
    assert!(!extrema.monotonic);
    assert!(extrema.skipped.is_empty());

    let windows = extrema.windows();
    assert_eq!(windows.len(), 4);
    let expected = [(0.0, 50.0), (50.0, 100.0), (100.0, 150.0), (150.0, 200.0)];
    for (window, (start, end)) in windows.iter().zip(expected) {
        assert_near(window.start_time, start, 2.0);
        assert_near(window.end_time, end, 2.0);
    }
    assert_ordered(&windows);
}

#[test]
fn synthetic_cycle_depth_bounds_span_full_range() {
    let stream = cycle_stream();
    let index = find_profiles(&stream, &ProfileConfig::default()).expect("profiles");
    assert_eq!(index.windows.len(), 4);

    for window in &index.windows {
        let depths: Vec<f64> = stream
            .iter()
            .filter(|s| s.is_valid() && window.contains(s.timestamp))
            .map(|s| s.depth)
            .collect();
        let min = depths.iter().copied().fold(f64::INFINITY, f64::min);
        let max = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_near(min, 0.0, 0.5);
        assert_near(max, 100.0, 0.5);
    }
}

#[test]
fn single_valid_sample_is_insufficient() {
    let stream = vec![
        Sample::new(0.0, 4.0),
        Sample::new(10.0, f64::NAN),
        Sample::new(20.0, -3.0),
    ];
    match find_profiles(&stream, &ProfileConfig::default()) {
        Err(ProfileError::InsufficientData { valid }) => assert_eq!(valid, 1),
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn monotonic_record_becomes_one_profile() {
    let stream: Vec<Sample> = (0..50)
        .map(|i| Sample::new(i as f64 * 10.0, 1.0 + i as f64))
        .collect();

    let index = find_profiles(&stream, &ProfileConfig::default()).expect("profiles");
    assert!(index.monotonic);
    assert_eq!(index.windows.len(), 1);

    let window = index.windows[0];
    assert_near(window.start_time, 0.0, 10.0);
    assert_near(window.end_time, 490.0, 10.0);
}

#[test]
fn single_sample_jitter_does_not_change_profile_count() {
    let clean = find_profiles(&cycle_stream(), &ProfileConfig::default()).expect("clean");

    for (t, delta) in [(31usize, 0.01), (77, -0.01), (133, 0.01), (188, -0.01)] {
        let mut noisy = cycle_stream();
        noisy[t].depth += delta;
        let jittered = find_profiles(&noisy, &ProfileConfig::default()).expect("noisy");
        assert_eq!(jittered.windows.len(), clean.windows.len(), "jitter at t={t}");
    }
}

#[test]
fn negative_depths_do_not_shift_windows() {
    let clean = find_profiles(&cycle_stream(), &ProfileConfig::default()).expect("clean");

    let mut gappy = cycle_stream();
    for t in [30usize, 72, 130, 174] {
        gappy[t].depth = -5.0;
    }
    let gapped = find_profiles(&gappy, &ProfileConfig::default()).expect("gappy");

    assert_eq!(gapped.windows, clean.windows);
}

#[test]
fn unsorted_input_produces_the_same_windows() {
    let sorted = find_profiles(&cycle_stream(), &ProfileConfig::default()).expect("sorted");

    let mut shuffled = cycle_stream();
    shuffled.reverse();
    shuffled.swap(10, 150);
    let unsorted = find_profiles(&shuffled, &ProfileConfig::default()).expect("unsorted");

    assert_eq!(unsorted.windows.len(), sorted.windows.len());
    assert_ordered(&unsorted.windows);
    for (a, b) in unsorted.windows.iter().zip(&sorted.windows) {
        assert_near(a.start_time, b.start_time, 2.0);
        assert_near(a.end_time, b.end_time, 2.0);
    }
}

#[test]
fn long_data_gap_keeps_profiles_on_both_sides() {
    // a dive, several minutes of missing depth, then a climb
    let mut stream: Vec<Sample> = (0..60)
        .map(|t| Sample::new(t as f64, 1.0 + t as f64))
        .collect();
    stream.extend((60..400).map(|t| Sample::new(t as f64, f64::NAN)));
    stream.extend((400..460).map(|t| Sample::new(t as f64, 60.0 - (t - 400) as f64)));

    let index = find_profiles(&stream, &ProfileConfig::default()).expect("profiles");
    assert!(index.skipped.is_empty());
    assert_eq!(
        index.windows,
        vec![ProfileWindow::new(0.0, 59.0), ProfileWindow::new(400.0, 459.0)]
    );
}

#[test]
fn historical_chain_matches_default_chain() {
    let stream = cycle_stream();
    let default = find_profiles_with(&stream, 10.0, &FilterChain::default()).expect("default");
    let historical =
        find_profiles_with(&stream, 10.0, &FilterChain::source_compatible()).expect("historical");
    assert_eq!(default.windows, historical.windows);
}

#[test]
fn zero_time_span_yields_no_profiles() {
    let stream = vec![Sample::new(100.0, 3.0), Sample::new(100.0, 4.0)];
    let index = find_profiles(&stream, &ProfileConfig::default()).expect("profiles");
    assert!(index.windows.is_empty());
}

#[test]
fn invalid_interval_is_rejected() {
    let config = ProfileConfig {
        resample_interval_seconds: -1.0,
        ..ProfileConfig::default()
    };
    assert!(matches!(
        find_profiles(&cycle_stream(), &config),
        Err(ProfileError::InvalidConfig(_))
    ));
}

#[test]
fn tiny_interval_over_long_record_is_an_error_not_a_panic() {
    let stream = vec![Sample::new(0.0, 1.0), Sample::new(1e9, 2.0)];
    let config = ProfileConfig {
        resample_interval_seconds: 1e-300,
        ..ProfileConfig::default()
    };
    assert!(matches!(
        find_profiles(&stream, &config),
        Err(ProfileError::GridTooLarge { .. })
    ));
}
