use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use cyclescope::analysis::compute_threshold;
use cyclescope::config::ThresholdParams;
use cyclescope::data::Sample;

fn at(min: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
        + TimeDelta::minutes(min)
}

fn series(sp_vals: &[Option<f64>]) -> Vec<Sample> {
    sp_vals
        .iter()
        .enumerate()
        .map(|(min, &sp)| Sample {
            time: at(min as i64),
            pv: None,
            sp,
        })
        .collect()
}

#[test]
fn midpoint_of_valid_extremes() {
    let samples = series(&[Some(10.0), Some(60.0), Some(30.0)]);
    let threshold = compute_threshold(&samples, &ThresholdParams::default());
    assert_eq!(threshold, 35.0);
}

#[test]
fn out_of_range_values_are_ignored() {
    let samples = series(&[Some(10.0), Some(60.0), Some(500.0), Some(-400.0)]);
    let threshold = compute_threshold(&samples, &ThresholdParams::default());
    assert_eq!(threshold, 35.0);
}

#[test]
fn no_valid_values_falls_back_to_default() {
    let params = ThresholdParams::default();

    let empty = series(&[]);
    assert_eq!(compute_threshold(&empty, &params), params.default);

    let all_missing = series(&[None, None]);
    assert_eq!(compute_threshold(&all_missing, &params), params.default);

    let all_out_of_range = series(&[Some(1000.0), Some(-1000.0)]);
    assert_eq!(compute_threshold(&all_out_of_range, &params), params.default);
}

#[test]
fn flat_signal_falls_back_to_default() {
    let params = ThresholdParams::default();

    // Spread of 8 is below the default minimum spread of 10.
    let samples = series(&[Some(20.0), Some(28.0), Some(24.0)]);
    assert_eq!(compute_threshold(&samples, &params), params.default);

    // Spread of exactly min_spread is enough.
    let samples = series(&[Some(20.0), Some(30.0)]);
    assert_eq!(compute_threshold(&samples, &params), 25.0);
}

#[test]
fn sentinel_filtering_is_range_based() {
    // Any out-of-range stand-in for a faulty reading must leave the
    // threshold unchanged, whether it arrives as a missing value or as a
    // different sentinel magnitude.
    let params = ThresholdParams::default();
    let with_missing = series(&[Some(10.0), None, Some(60.0), None]);
    let with_other_sentinel = series(&[Some(10.0), Some(-777.0), Some(60.0), Some(9999.0)]);

    assert_eq!(
        compute_threshold(&with_missing, &params),
        compute_threshold(&with_other_sentinel, &params)
    );
}

#[test]
fn custom_valid_range_narrows_the_candidates() {
    let params = ThresholdParams {
        valid_min: 0.0,
        valid_max: 100.0,
        ..ThresholdParams::default()
    };
    let samples = series(&[Some(-50.0), Some(20.0), Some(80.0), Some(150.0)]);
    assert_eq!(compute_threshold(&samples, &params), 50.0);
}
