//! Basic Usage
//!
//! Computes every indicator family over one synthetic series and prints the
//! last few aligned values, marking warm-up and undefined positions.
//!
//! Run with: `cargo run --example basic_usage`

#![allow(clippy::cast_precision_loss)]

use nonlinear_ta::prelude::*;

fn describe<R: std::fmt::Debug>(name: &str, out: &AlignedOutput<R>) {
    println!(
        "{name}: lookback {}, defined {}, undefined {}",
        out.lookback(),
        out.defined_count(),
        out.undefined_count()
    );
    let tail = out.len().saturating_sub(3);
    for (i, slot) in out.iter().enumerate().skip(tail) {
        match slot {
            Slot::WarmUp => println!("   [{i}] warm-up"),
            Slot::Cancelled => println!("   [{i}] cancelled"),
            Slot::Undefined(reason) => println!("   [{i}] undefined: {reason}"),
            Slot::Value(v) => println!("   [{i}] {v:?}"),
        }
    }
}

fn main() -> Result<()> {
    let data: Vec<f64> = (0..300)
        .map(|t| {
            let t = t as f64;
            2.0 + (0.3 * t).sin() + 0.5 * (1.7 * t).sin() + 0.1 * (t % 5.0)
        })
        .collect();

    println!("=== nonlinear-ta indicators over {} samples ===", data.len());
    println!();

    describe("lyapunov", &lyapunov(&data, 40)?.map(|e| e.exponent));
    describe("lempel_ziv", &lempel_ziv(&data, 32)?);
    describe("shannon_entropy", &shannon_entropy(&data, 32)?);
    describe("approximate_entropy", &approximate_entropy(&data, 32, 2, 0.2)?);

    let mi = MutualInformation::new().mode(MutualInfoMode::FirstLocalMinimum).max_delay(12);
    describe("mutual_information (first minimum)", &mutual_information(&data, 64, &mi)?);

    describe("multifractal", &multifractal(&data, 64)?);
    describe("rqa", &recurrence_quantification(&data, 48)?);

    Ok(())
}
