//! JSON-driven fixture tests with pinned reference values.
//!
//! The JSON files in tests/fixtures/ hold inputs, parameters and expected
//! outputs for each indicator family.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]

use nonlinear_ta::indicators::entropy::{approximate_entropy_window, shannon};
use nonlinear_ta::indicators::lempel_ziv::lempel_ziv_complexity;
use nonlinear_ta::indicators::lyapunov::{lyapunov_exponent, Lyapunov};
use nonlinear_ta::indicators::multifractal::Multifractal;
use nonlinear_ta::indicators::mutual_info::{delayed_mutual_information, first_local_minimum};
use nonlinear_ta::indicators::rqa::{rqa_metrics, RecurrenceParams};
use nonlinear_ta::kernels::Binning;
use nonlinear_ta::WindowError;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

const EPSILON: f64 = 1e-9;
const FIXTURE_VERSION: &str = "1.0";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    fixture_version: String,
    rationale: String,
    cases: Vec<FixtureCase>,
}

#[derive(Debug, Deserialize)]
struct FixtureCase {
    name: String,
    #[serde(default)]
    kind: Option<String>,
    input: Vec<f64>,
    #[serde(default)]
    params: Value,
    expected: Value,
}

fn load_fixture(name: &str) -> FixtureFile {
    let path = fixtures_dir().join(name);
    let content = fs::read_to_string(&path).expect("Failed to read fixture file");
    let fixture: FixtureFile = serde_json::from_str(&content).expect("Invalid fixture schema");
    assert_eq!(fixture.fixture_version, FIXTURE_VERSION, "{name}: fixture version mismatch");
    assert!(!fixture.rationale.is_empty(), "{name}: missing rationale");
    assert!(!fixture.cases.is_empty(), "{name}: no cases");
    fixture
}

fn param_f64(case: &FixtureCase, key: &str) -> f64 {
    case.params[key].as_f64().expect("Expected f64 parameter")
}

fn param_usize(case: &FixtureCase, key: &str) -> usize {
    case.params[key].as_u64().expect("Expected integer parameter") as usize
}

fn expected_f64(case: &FixtureCase, key: &str) -> f64 {
    case.expected[key].as_f64().expect("Expected f64 value")
}

fn expected_usize(case: &FixtureCase, key: &str) -> usize {
    case.expected[key].as_u64().expect("Expected integer value") as usize
}

fn assert_close(case: &FixtureCase, what: &str, actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{}: {what} = {actual}, expected {expected}",
        case.name
    );
}

#[test]
fn fixture_lempel_ziv() {
    for case in load_fixture("lempel_ziv.json").cases {
        let symbols: Vec<u8> = case.input.iter().map(|&v| v as u8).collect();
        assert_eq!(
            lempel_ziv_complexity(&symbols),
            expected_usize(&case, "complexity"),
            "{}",
            case.name
        );
    }
}

#[test]
fn fixture_lyapunov() {
    for case in load_fixture("lyapunov.json").cases {
        let config = Lyapunov::new().min_fit_points(param_usize(&case, "min_fit_points"));
        let est = lyapunov_exponent(&case.input, &config).unwrap();

        assert_close(&case, "exponent", est.exponent, expected_f64(&case, "exponent"));
        assert_close(&case, "intercept", est.intercept, expected_f64(&case, "intercept"));
        assert_close(&case, "r_squared", est.r_squared, expected_f64(&case, "r_squared"));
        assert_close(&case, "diameter", est.diameter, expected_f64(&case, "diameter"));
        assert_eq!(est.cutoff, expected_usize(&case, "cutoff"), "{}", case.name);
        assert_eq!(est.points, expected_usize(&case, "points"), "{}", case.name);
    }
}

#[test]
fn fixture_entropy() {
    for case in load_fixture("entropy.json").cases {
        let expected = expected_f64(&case, "value");
        let actual = match case.kind.as_deref() {
            Some("shannon") => shannon(&case.input).unwrap(),
            Some("approximate") => approximate_entropy_window(
                &case.input,
                param_usize(&case, "pattern_len"),
                param_f64(&case, "tolerance"),
            )
            .unwrap(),
            other => panic!("{}: unknown kind {other:?}", case.name),
        };
        assert_close(&case, "value", actual, expected);
    }
}

#[test]
fn fixture_mutual_information() {
    let binning = Binning::default();
    for case in load_fixture("mutual_information.json").cases {
        match case.kind.as_deref() {
            Some("constant_delay") => {
                let delay = param_usize(&case, "delay");
                let actual = delayed_mutual_information(&case.input, delay, binning).unwrap();
                assert_close(&case, "value", actual, expected_f64(&case, "value"));
            }
            Some("first_local_minimum") => {
                let max_delay = param_usize(&case, "max_delay");
                let actual = first_local_minimum(&case.input, max_delay, binning);
                match case.expected["value"].as_u64() {
                    Some(delay) => assert_eq!(actual, Ok(delay as usize), "{}", case.name),
                    None => assert!(
                        matches!(actual, Err(WindowError::InsufficientEvidence { .. })),
                        "{}: expected no minimum, got {actual:?}",
                        case.name
                    ),
                }
            }
            other => panic!("{}: unknown kind {other:?}", case.name),
        }
    }
}

#[test]
fn fixture_multifractal() {
    for case in load_fixture("multifractal.json").cases {
        let config = Multifractal::new()
            .q_range(
                case.params["q_min"].as_i64().expect("q_min") as i32,
                case.params["q_max"].as_i64().expect("q_max") as i32,
            )
            .scale_range(
                case.params["min_scale"].as_u64().expect("min_scale") as u32,
                case.params["max_scale"].as_u64().expect("max_scale") as u32,
            );
        let spectrum = config.spectrum(&case.input).unwrap();
        let summary = spectrum.summary().unwrap();

        assert_close(&case, "width", summary.width, expected_f64(&case, "width"));
        assert_close(&case, "height", summary.height, expected_f64(&case, "height"));

        let points = case.expected["points"].as_object().expect("points object");
        for (q, point) in points {
            let q: i32 = q.parse().expect("integer q");
            let i = spectrum.q.iter().position(|&x| x == q).expect("q in range");
            let get = |key: &str| point[key].as_f64().expect("point value");
            assert_close(&case, "alpha", spectrum.alpha[i], get("alpha"));
            assert_close(&case, "f_alpha", spectrum.f_alpha[i], get("f_alpha"));
            assert_close(&case, "dq", spectrum.dq[i], get("dq"));
        }
    }
}

#[test]
fn fixture_rqa() {
    for case in load_fixture("rqa.json").cases {
        let params = RecurrenceParams::new().radius(param_f64(&case, "radius"));
        let metrics = rqa_metrics(&case.input, &params).unwrap();

        assert_close(
            &case,
            "recurrence_rate",
            metrics.recurrence_rate,
            expected_f64(&case, "recurrence_rate"),
        );
        assert_eq!(
            metrics.recurrent_points,
            expected_usize(&case, "recurrent_points"),
            "{}",
            case.name
        );
        assert_eq!(
            metrics.embedded_points,
            expected_usize(&case, "embedded_points"),
            "{}",
            case.name
        );

        for (key, actual) in [
            ("determinism", metrics.determinism),
            ("laminarity", metrics.laminarity),
        ] {
            match case.expected[key].as_f64() {
                Some(expected) => assert_close(&case, key, actual.expect("defined metric"), expected),
                None => assert_eq!(actual, None, "{}: {key}", case.name),
            }
        }
    }
}
