//! Integration tests for the public API.
//!
//! These tests run each indicator end to end through the series builder and
//! check alignment, defaults and typical usage patterns.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

mod common;

use std::sync::mpsc;
use std::sync::Arc;

use common::{
    approx_eq, random_walk, sawtooth, sine, verify_warm_up_prefix, EPSILON, LOOSE_EPSILON,
};
use nonlinear_ta::prelude::*;

fn mi_series() -> Vec<f64> {
    (0..64)
        .map(|t| (0.3 * f64::from(t)).sin() + 0.1 * f64::from(t % 4))
        .collect()
}

// ==================== Basic Usage Tests ====================

#[test]
fn test_prelude_import_basic() {
    let data = sawtooth(64);

    let _lyap = lyapunov(&data, 20).unwrap();
    let _lz = lempel_ziv(&data, 16).unwrap();
    let _h = shannon_entropy(&data, 16).unwrap();
    let _apen = approximate_entropy(&data, 16, 2, 3.0).unwrap();
    let _mi = mutual_information(&data, 16, &MutualInformation::new()).unwrap();
    let _mfs = multifractal(&data, 32).unwrap();
    let _rqa = recurrence_quantification(&data, 30).unwrap();
}

#[test]
fn test_output_is_aligned_with_input() {
    let data = sawtooth(100);
    let out = lempel_ziv(&data, 16).unwrap();

    assert_eq!(out.len(), data.len());
    assert_eq!(out.lookback(), lempel_ziv_lookback(16));
    assert!(verify_warm_up_prefix(&out, 15));
    assert_eq!(out.defined_count(), 85);
    assert_eq!(out.indicator(), "lempel_ziv");
}

// ==================== Lyapunov ====================

#[test]
fn test_lyapunov_sawtooth_end_to_end() {
    let data = sawtooth(200);
    let out = lyapunov(&data, 20).unwrap();

    assert_eq!(out.warm_up_count(), 19);
    assert_eq!(out.defined_count(), 181);
    for (i, est) in out.values() {
        assert!(est.exponent > 0.0 && est.exponent < 0.5, "index {i}: {}", est.exponent);
        assert!(approx_eq(est.exponent, 2.0_f64.ln() / 4.0, LOOSE_EPSILON));
        assert!(est.r_squared > 0.6, "index {i}: R² {}", est.r_squared);
        assert_eq!(est.cutoff, 3);
    }
}

#[test]
fn test_lyapunov_f32() {
    let data: Vec<f32> = sawtooth(60).into_iter().map(|x| x as f32).collect();
    let out = lyapunov(&data, 20).unwrap();
    assert_eq!(out.len(), 60);
    assert_eq!(out.warm_up_count(), 19);
}

// ==================== Lempel-Ziv ====================

#[test]
fn test_lempel_ziv_values() {
    let data = sawtooth(40);
    let out = lempel_ziv(&data, 16).unwrap();
    let expected = [
        4, 5, 5, 6, 5, 4, 5, 4, 4, 5, 6, 5, 5, 5, 5, 5, 5, 4, 4, 4, 5, 4, 5, 5, 6,
    ];
    let actual: Vec<usize> = out.values().map(|(_, &c)| c).collect();
    assert_eq!(actual, expected);
}

// ==================== Entropy ====================

#[test]
fn test_shannon_entropy_values() {
    let data = sawtooth(200);
    let out = shannon_entropy(&data, 20).unwrap();
    assert!(approx_eq(*out.value(19).unwrap(), 3.996743480380894, EPSILON));
    assert!(approx_eq(*out.value(199).unwrap(), 3.9818666261546514, EPSILON));
}

#[test]
fn test_approximate_entropy_values() {
    let data = sawtooth(200);
    let out = approximate_entropy(&data, 20, 2, 3.0).unwrap();
    assert_eq!(out.lookback(), 19);
    assert!(approx_eq(*out.value(199).unwrap(), 0.29984893085457964, EPSILON));

    let tight = ApproximateEntropy::new().tolerance(0.5).compute(&data, 20).unwrap();
    assert!(approx_eq(*tight.value(19).unwrap(), 0.3837099453991617, EPSILON));
}

// ==================== Mutual Information ====================

#[test]
fn test_mutual_information_constant_delay() {
    let data = mi_series();
    let config = MutualInformation::new();
    let out = mutual_information(&data, 20, &config).unwrap();

    // Each window holds period + delay samples
    assert_eq!(out.lookback(), config.lookback(20));
    assert_eq!(out.lookback(), 20);
    assert!(approx_eq(*out.value(63).unwrap(), 1.708694969562842, EPSILON));
    assert!(out.values().all(|(_, &v)| v >= 0.0));
}

#[test]
fn test_mutual_information_first_local_minimum() {
    let data = mi_series();
    let config = MutualInformation::new()
        .mode(MutualInfoMode::FirstLocalMinimum)
        .max_delay(10);
    let out = mutual_information(&data, 20, &config).unwrap();

    assert_eq!(out.lookback(), 19);
    let delays: Vec<f64> = out.values().map(|(_, &v)| v).collect();
    let expected = [
        4, 2, 2, 2, 2, 2, 1, 1, 1, 3, 1, 1, 1, 1, 1, 1, 2, 5, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1,
        1, 1, 1, 1, 2, 1, 2, 1, 1, 2, 2, 2, 2, 2, 2,
    ];
    assert_eq!(delays.len(), expected.len());
    for (d, e) in delays.iter().zip(expected) {
        assert_eq!(*d, f64::from(e));
    }
}

#[test]
fn test_mutual_info_mode_from_str() {
    assert_eq!(
        "first_local_minimum".parse::<MutualInfoMode>().unwrap(),
        MutualInfoMode::FirstLocalMinimum
    );
    assert!("fastest".parse::<MutualInfoMode>().is_err());
}

// ==================== Multifractal ====================

#[test]
fn test_multifractal_summary_series() {
    let data = sawtooth(128);
    let out = multifractal(&data, 64).unwrap();
    assert_eq!(out.warm_up_count(), multifractal_lookback(64));
    assert_eq!(out.defined_count(), 65);
    for (_, s) in out.values() {
        assert!(s.width.is_finite() && s.width >= 0.0);
        assert!(s.height.is_finite() && s.height >= 0.0);
    }

    let width = multifractal_width(&data, 64).unwrap();
    assert_eq!(width.value(100), out.value(100).map(|s| &s.width));
}

// ==================== RQA ====================

#[test]
fn test_rqa_series() {
    let data = sine(60, 0.5);
    let out = recurrence_quantification(&data, 30).unwrap();
    assert_eq!(out.lookback(), rqa_lookback(30));

    let first = out.value(29).unwrap();
    assert_eq!(first.embedded_points, 28);
    assert_eq!(first.recurrent_points, 156);
    assert!(approx_eq(first.recurrence_rate, 0.1989795918367347, EPSILON));
    assert!(approx_eq(first.determinism.unwrap(), 0.9871794871794872, EPSILON));
    assert!(approx_eq(first.laminarity.unwrap(), 0.6346153846153846, EPSILON));
}

#[test]
fn test_rqa_custom_params() {
    let data = sine(60, 0.5);
    let kernel = RecurrenceRate::with_params(RecurrenceParams::new().radius(0.1));
    let out = IndicatorSeriesBuilder::new(kernel, 30).build(&data).unwrap();
    assert!(approx_eq(*out.value(29).unwrap(), 0.007653061224489796, EPSILON));
}

// ==================== Builder Features ====================

#[test]
fn test_channel_observer_reports_progress() {
    let data = sawtooth(50);
    let (tx, rx) = mpsc::channel();
    let out = IndicatorSeriesBuilder::new(LempelZiv::new(), 10)
        .observer(Arc::new(ChannelObserver::new(tx)))
        .build(&data)
        .unwrap();
    let events: Vec<ProgressEvent> = rx.try_iter().collect();

    assert_eq!(events.len(), out.defined_count() + 2);
    assert!(matches!(
        events.first(),
        Some(ProgressEvent::Started { windows: 41, lookback: 9, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Finished { defined: 41, undefined: 0, cancelled: 0 })
    ));
}

#[test]
fn test_cancellation_marks_every_window() {
    let data = sawtooth(50);
    let token = CancellationToken::new();
    token.cancel();
    let out = IndicatorSeriesBuilder::new(ShannonEntropy::new(), 10)
        .cancellation(token)
        .build(&data)
        .unwrap();
    assert_eq!(out.warm_up_count(), 9);
    assert_eq!(out.cancelled_count(), 41);
    assert_eq!(out.defined_count(), 0);
}

#[test]
fn test_sequential_processor_matches_default() {
    let data = sawtooth(200);
    let parallel = recurrence_quantification(&data, 40).unwrap();
    let sequential = IndicatorSeriesBuilder::new(RecurrenceQuantification::new(), 40)
        .processor(BatchProcessor::sequential())
        .build(&data)
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_window_source_iteration() {
    let data = sawtooth(10);
    let source = WindowSource::new(&data, 4).unwrap();
    assert_eq!(source.len(), 7);
    let ends: Vec<usize> = source.iter().map(|w| w.end).collect();
    assert_eq!(ends, (3..10).collect::<Vec<_>>());
    // Fresh cursor each time
    assert_eq!(source.iter().count(), 7);
}

#[test]
fn test_to_nan_series() {
    let data = sawtooth(40);
    let out = shannon_entropy(&data, 10).unwrap();
    let series = out.to_nan_series();
    assert_eq!(series.len(), 40);
    assert!(series[..9].iter().all(|v| v.is_nan()));
    assert!(series[9..].iter().all(|v| v.is_finite()));
}

// ==================== Random-Walk Regression ====================

#[test]
fn test_random_walk_all_indicators() {
    let data = random_walk(300, 42);
    let n = data.len();

    let lz = lempel_ziv(&data, 32).unwrap();
    assert_eq!(lz.defined_count(), n - 31);
    assert!(lz.values().all(|(_, &c)| (1..=32).contains(&c)));

    let h = shannon_entropy(&data, 32).unwrap();
    assert_eq!(h.defined_count(), n - 31);
    assert!(h.values().all(|(_, &v)| v > 0.0 && v <= 5.0 + EPSILON));

    let apen = approximate_entropy(&data, 32, 2, 0.5).unwrap();
    assert_eq!(apen.warm_up_count(), 31);
    assert_eq!(apen.defined_count() + apen.undefined_count(), n - 31);

    let mi = mutual_information(&data, 32, &MutualInformation::new()).unwrap();
    assert_eq!(mi.warm_up_count(), 32);
    assert!(mi.values().all(|(_, &v)| v >= -EPSILON));

    let rqa = recurrence_quantification(&data, 40).unwrap();
    assert_eq!(rqa.warm_up_count(), 39);
    for (_, m) in rqa.values() {
        assert!((0.0..=1.0).contains(&m.recurrence_rate));
        assert!(m.determinism.map_or(true, |d| (0.0..=1.0).contains(&d)));
        assert!(m.laminarity.map_or(true, |l| (0.0..=1.0).contains(&l)));
    }

    let lyap = lyapunov(&data, 40).unwrap();
    assert_eq!(lyap.warm_up_count(), 39);
    assert_eq!(lyap.defined_count() + lyap.undefined_count(), n - 39);
}

#[test]
fn test_random_walk_dispatch_is_deterministic() {
    let data = random_walk(256, 7);
    let parallel = lyapunov(&data, 30).unwrap();
    let sequential = IndicatorSeriesBuilder::new(Lyapunov::new(), 30)
        .processor(BatchProcessor::sequential())
        .build(&data)
        .unwrap();
    assert_eq!(parallel, sequential);
}
