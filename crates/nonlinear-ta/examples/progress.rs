//! Progress Reporting and Cancellation
//!
//! Runs a slow kernel on a worker thread, prints progress received over a
//! channel, and cancels the build halfway through.
//!
//! Run with: `cargo run --example progress`

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use nonlinear_ta::prelude::*;

fn main() {
    let data: Vec<f64> = (0..2_000).map(|t| (0.05 * f64::from(t)).sin()).collect();
    let (tx, rx) = mpsc::channel();
    let token = CancellationToken::new();

    let worker = {
        let token = token.clone();
        thread::spawn(move || {
            IndicatorSeriesBuilder::new(RecurrenceQuantification::new(), 128)
                .observer(Arc::new(ChannelObserver::new(tx)))
                .cancellation(token)
                .build(&data)
        })
    };

    for event in rx {
        match event {
            ProgressEvent::Started { indicator, windows, .. } => {
                println!("{indicator}: {windows} windows");
            }
            ProgressEvent::WindowEvaluated { completed, total, .. } => {
                if completed % 100 == 0 {
                    println!("   {completed}/{total}");
                }
                if completed == total / 2 {
                    println!("   cancelling");
                    token.cancel();
                }
            }
            ProgressEvent::Finished { defined, undefined, cancelled } => {
                println!("done: {defined} defined, {undefined} undefined, {cancelled} cancelled");
            }
        }
    }

    match worker.join() {
        Ok(Ok(out)) => println!("output length {}", out.len()),
        Ok(Err(e)) => eprintln!("error: {e}"),
        Err(_) => eprintln!("worker panicked"),
    }
}
