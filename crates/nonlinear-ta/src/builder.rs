//! Driving a kernel across every window of a series.
//!
//! [`IndicatorSeriesBuilder`] validates the kernel once, evaluates every
//! window (in parallel when enabled) and aligns each result to its window's
//! end index. The first `L - 1` positions stay [`Slot::WarmUp`].
//!
//! Progress is reported through an injected [`ProgressObserver`]; the builder
//! itself never writes to the console. It emits `tracing` events at `debug`
//! (run start and summary) and `trace` (each undefined window) level.
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//! use std::sync::Arc;
//!
//! use nonlinear_ta::builder::{ChannelObserver, IndicatorSeriesBuilder, ProgressEvent};
//! use nonlinear_ta::indicators::lempel_ziv::LempelZiv;
//!
//! let data: Vec<f64> = (0..32).map(|i| f64::from(i % 5)).collect();
//! let (tx, rx) = mpsc::channel();
//!
//! let output = IndicatorSeriesBuilder::new(LempelZiv::new(), 8)
//!     .observer(Arc::new(ChannelObserver::new(tx)))
//!     .build(&data)
//!     .unwrap();
//!
//! assert_eq!(output.lookback(), 7);
//! assert_eq!(output.defined_count(), 25);
//!
//! let events: Vec<ProgressEvent> = rx.try_iter().collect();
//! assert!(matches!(events.first(), Some(ProgressEvent::Started { windows: 25, .. })));
//! assert!(matches!(events.last(), Some(ProgressEvent::Finished { .. })));
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::batch::BatchProcessor;
use crate::error::Result;
use crate::output::{AlignedOutput, Slot};
use crate::traits::{IndicatorKernel, SeriesElement};
use crate::window::WindowSource;

/// A progress notification from a running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Validation passed; evaluation is about to start.
    Started {
        /// Kernel name.
        indicator: &'static str,
        /// Number of windows that will be dispatched.
        windows: usize,
        /// Number of warm-up positions.
        lookback: usize,
    },
    /// One window finished. With parallel dispatch these arrive in any order.
    WindowEvaluated {
        /// End index of the window, i.e. its output position.
        end: usize,
        /// Windows finished so far, including this one.
        completed: usize,
        /// Total number of windows.
        total: usize,
        /// Whether the window produced a defined value.
        defined: bool,
    },
    /// All windows have been dispatched or skipped.
    Finished {
        /// Windows with a value.
        defined: usize,
        /// Windows evaluated without a defined value.
        undefined: usize,
        /// Windows skipped after cancellation.
        cancelled: usize,
    },
}

/// Receives progress events.
///
/// Called from worker threads when dispatch is parallel, so implementations
/// must be thread-safe and should return quickly.
pub trait ProgressObserver: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events over an `mpsc` channel.
///
/// Send failures (receiver dropped) are ignored: a consumer that stops
/// listening never affects the computation.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<ProgressEvent>,
}

impl ChannelObserver {
    /// Wraps a channel sender.
    #[must_use]
    pub const fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_event(&self, event: &ProgressEvent) {
        let _ = self.sender.send(event.clone());
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match *event {
            ProgressEvent::Started {
                indicator,
                windows,
                lookback,
            } => tracing::debug!(indicator, windows, lookback, "evaluation started"),
            ProgressEvent::WindowEvaluated {
                end,
                completed,
                total,
                defined,
            } => tracing::trace!(end, completed, total, defined, "window evaluated"),
            ProgressEvent::Finished {
                defined,
                undefined,
                cancelled,
            } => tracing::debug!(defined, undefined, cancelled, "evaluation finished"),
        }
    }
}

/// Shared flag that stops a build from starting further windows.
///
/// Windows already running finish normally; the rest end up as
/// [`Slot::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Applies one kernel to every window of a series.
#[derive(Clone)]
pub struct IndicatorSeriesBuilder<K> {
    kernel: K,
    window_len: usize,
    processor: BatchProcessor,
    observer: Option<Arc<dyn ProgressObserver>>,
    cancellation: Option<CancellationToken>,
}

impl<K: std::fmt::Debug> std::fmt::Debug for IndicatorSeriesBuilder<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorSeriesBuilder")
            .field("kernel", &self.kernel)
            .field("window_len", &self.window_len)
            .field("processor", &self.processor)
            .field("observer", &self.observer.is_some())
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

impl<K> IndicatorSeriesBuilder<K> {
    /// Creates a builder for windows of length `window_len`.
    #[must_use]
    pub fn new(kernel: K, window_len: usize) -> Self {
        Self {
            kernel,
            window_len,
            processor: BatchProcessor::new(),
            observer: None,
            cancellation: None,
        }
    }

    /// Sets the progress observer.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sets a cancellation token.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets the window scheduler.
    #[must_use]
    pub fn processor(mut self, processor: BatchProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// The kernel.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The window length.
    #[must_use]
    pub const fn window_len(&self) -> usize {
        self.window_len
    }

    /// Evaluates the kernel over `data`.
    ///
    /// The output has one slot per input position: `L - 1` warm-up slots,
    /// then one slot per window.
    ///
    /// # Errors
    ///
    /// Configuration errors only, raised before any window is evaluated:
    /// - `Error::EmptyInput` if `data` is empty
    /// - `Error::InvalidParameter` if the window length is out of range or the
    ///   kernel rejects its parameters
    pub fn build<T>(&self, data: &[T]) -> Result<AlignedOutput<K::Output>>
    where
        T: SeriesElement,
        K: IndicatorKernel<T>,
    {
        let indicator = self.kernel.name();
        self.kernel.validate(self.window_len)?;
        let source = WindowSource::new(data, self.window_len).map_err(|e| e.with_indicator(indicator))?;
        let lookback = source.lookback();
        let total = source.len();

        tracing::debug!(
            indicator,
            series_len = data.len(),
            window_len = self.window_len,
            lookback,
            "building indicator series"
        );

        let noop = NoopObserver;
        let observer: &dyn ProgressObserver = self.observer.as_deref().unwrap_or(&noop);
        observer.on_event(&ProgressEvent::Started {
            indicator,
            windows: total,
            lookback,
        });

        let mut slots: Vec<Slot<K::Output>> = (0..data.len()).map(|_| Slot::WarmUp).collect();
        let completed = AtomicUsize::new(0);
        let cancellation = self.cancellation.as_ref();
        let kernel = &self.kernel;

        self.processor
            .evaluate_windows(&source, &mut slots[lookback..], |window| {
                if cancellation.is_some_and(CancellationToken::is_cancelled) {
                    return Slot::Cancelled;
                }
                let result = kernel.evaluate(window.values);
                if let Err(error) = &result {
                    tracing::trace!(indicator, end = window.end, %error, "window undefined");
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                observer.on_event(&ProgressEvent::WindowEvaluated {
                    end: window.end,
                    completed: done,
                    total,
                    defined: result.is_ok(),
                });
                Slot::from(result)
            });

        let output = AlignedOutput::from_slots(indicator, lookback, slots);
        let defined = output.defined_count();
        let undefined = output.undefined_count();
        let cancelled = output.cancelled_count();

        tracing::debug!(
            indicator,
            defined,
            undefined,
            cancelled,
            "indicator series complete"
        );
        observer.on_event(&ProgressEvent::Finished {
            defined,
            undefined,
            cancelled,
        });

        Ok(output)
    }
}
