//! Indicator configurations shared by the subcommands and `run --config`.
//!
//! A run configuration is a JSON document listing indicators, each tagged by
//! name and carrying its window length plus optional kernel parameters.
//! Omitted parameters take the library defaults:
//!
//! ```json
//! {
//!   "indicators": [
//!     { "indicator": "lempel_ziv", "window": 32 },
//!     { "indicator": "rqa", "window": 40, "params": { "radius": 0.5 } },
//!     { "indicator": "mutual_information", "period": 32,
//!       "params": { "mode": "first_local_minimum", "max_delay": 12 } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use nonlinear_ta::indicators::{
    ApproximateEntropy, LempelZiv, Lyapunov, Multifractal, MutualInfoMode, MutualInformation,
    RecurrenceParams, RecurrenceQuantification, ShannonEntropy,
};
use nonlinear_ta::builder::{IndicatorSeriesBuilder, ProgressObserver, TracingObserver};
use nonlinear_ta::{AlignedOutput, IndicatorKernel};
use serde::{Deserialize, Serialize};

use crate::csv_writer::Column;
use crate::error::{CliError, Result};

/// One indicator with its window length and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum IndicatorConfig {
    /// Largest Lyapunov exponent and its fit R².
    Lyapunov {
        /// Window length.
        window: usize,
        /// Estimator parameters.
        #[serde(default)]
        params: Lyapunov,
    },
    /// LZ76 complexity of the mean-binarized window.
    LempelZiv {
        /// Window length.
        window: usize,
    },
    /// Shannon entropy in bits.
    ShannonEntropy {
        /// Window length.
        window: usize,
    },
    /// Approximate entropy.
    ApproximateEntropy {
        /// Window length.
        window: usize,
        /// Pattern length and tolerance.
        #[serde(default)]
        params: ApproximateEntropy,
    },
    /// Delayed mutual information, or the first-local-minimum delay.
    MutualInformation {
        /// Samples per compared segment.
        period: usize,
        /// Mode, delays and binning.
        #[serde(default)]
        params: MutualInformation,
    },
    /// Multifractal spectrum width and height.
    Multifractal {
        /// Window length.
        window: usize,
        /// Moment orders, scales and preprocessing.
        #[serde(default)]
        params: Multifractal,
    },
    /// Recurrence rate, determinism and laminarity.
    Rqa {
        /// Window length.
        window: usize,
        /// Embedding and recurrence parameters.
        #[serde(default)]
        params: RecurrenceParams,
    },
}

impl IndicatorConfig {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lyapunov { .. } => "lyapunov",
            Self::LempelZiv { .. } => "lempel_ziv",
            Self::ShannonEntropy { .. } => "shannon_entropy",
            Self::ApproximateEntropy { .. } => "approximate_entropy",
            Self::MutualInformation { .. } => "mutual_information",
            Self::Multifractal { .. } => "multifractal",
            Self::Rqa { .. } => "rqa",
        }
    }

    /// Checks the kernel parameters against the window length.
    ///
    /// Needs no data; the window is checked against the series length when
    /// the indicator is computed.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IndicatorError` if a parameter is out of range.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Lyapunov { window, params } => check(params, *window),
            Self::LempelZiv { window } => check(&LempelZiv::new(), *window),
            Self::ShannonEntropy { window } => check(&ShannonEntropy::new(), *window),
            Self::ApproximateEntropy { window, params } => check(params, *window),
            Self::MutualInformation { period, params } => {
                if *period == 0 {
                    return Err(nonlinear_ta::Error::invalid_parameter(
                        "mutual_information",
                        "period",
                        "period must be at least 1",
                    )
                    .into());
                }
                check(params, params.window_len(*period))
            }
            Self::Multifractal { window, params } => check(params, *window),
            Self::Rqa { window, params } => {
                check(&RecurrenceQuantification::with_params(*params), *window)
            }
        }
    }

    /// Computes the indicator over `values`, reporting progress to `tracing`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IndicatorError` if the configuration is rejected.
    pub fn compute(&self, values: &[f64]) -> Result<Vec<Column>> {
        self.compute_with(values, Arc::new(TracingObserver))
    }

    /// Computes the indicator with an explicit progress observer.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IndicatorError` if the configuration is rejected.
    pub fn compute_with(
        &self,
        values: &[f64],
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<Vec<Column>> {
        self.validate()?;
        tracing::info!(indicator = self.name(), rows = values.len(), "computing");
        let columns = match self {
            Self::Lyapunov { window, params } => {
                let out = build(*params, *window, values, observer)?;
                vec![
                    Column::from_output(format!("lyapunov_{window}"), &out, |e| Some(e.exponent)),
                    Column::from_output(format!("lyapunov_{window}_r2"), &out, |e| {
                        Some(e.r_squared)
                    }),
                ]
            }
            Self::LempelZiv { window } => {
                let out = build(LempelZiv::new(), *window, values, observer)?;
                vec![Column::from_output(format!("lz_{window}"), &out, |&c| {
                    u32::try_from(c).ok().map(f64::from)
                })]
            }
            Self::ShannonEntropy { window } => {
                let out = build(ShannonEntropy::new(), *window, values, observer)?;
                vec![scalar_column(format!("shannon_{window}"), &out)]
            }
            Self::ApproximateEntropy { window, params } => {
                let out = build(*params, *window, values, observer)?;
                vec![scalar_column(format!("apen_{window}"), &out)]
            }
            Self::MutualInformation { period, params } => {
                let out = build(*params, params.window_len(*period), values, observer)?;
                let header = match params.get_mode() {
                    MutualInfoMode::ConstantDelay => {
                        format!("mi_{period}_d{}", params.get_delay())
                    }
                    MutualInfoMode::FirstLocalMinimum => format!("mi_delay_{period}"),
                };
                vec![scalar_column(header, &out)]
            }
            Self::Multifractal { window, params } => {
                let out = build(*params, *window, values, observer)?;
                vec![
                    Column::from_output(format!("mfs_width_{window}"), &out, |s| Some(s.width)),
                    Column::from_output(format!("mfs_height_{window}"), &out, |s| Some(s.height)),
                ]
            }
            Self::Rqa { window, params } => {
                let out = build(
                    RecurrenceQuantification::with_params(*params),
                    *window,
                    values,
                    observer,
                )?;
                vec![
                    Column::from_output(format!("rr_{window}"), &out, |m| Some(m.recurrence_rate)),
                    Column::from_output(format!("det_{window}"), &out, |m| m.determinism),
                    Column::from_output(format!("lam_{window}"), &out, |m| m.laminarity),
                ]
            }
        };
        Ok(columns)
    }
}

/// A list of indicators computed over the same series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Indicators, in output column order.
    pub indicators: Vec<IndicatorConfig>,
}

impl RunConfig {
    /// Parses a run configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ConfigError` for malformed JSON or an empty list.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.indicators.is_empty() {
            return Err(CliError::ConfigError {
                message: "no indicators listed".to_string(),
                path: None,
            });
        }
        Ok(config)
    }

    /// Loads a run configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the file cannot be read, or
    /// `CliError::ConfigError` (carrying the path) if it is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
            source: e,
            path: Some(display.clone()),
        })?;
        Self::from_json(&text).map_err(|err| match err {
            CliError::ConfigError { message, .. } => CliError::ConfigError {
                message,
                path: Some(display),
            },
            other => other,
        })
    }
}

fn check<K: IndicatorKernel<f64>>(kernel: &K, window_len: usize) -> Result<()> {
    Ok(kernel.validate(window_len)?)
}

fn build<K>(
    kernel: K,
    window_len: usize,
    values: &[f64],
    observer: Arc<dyn ProgressObserver>,
) -> Result<AlignedOutput<K::Output>>
where
    K: IndicatorKernel<f64>,
{
    Ok(IndicatorSeriesBuilder::new(kernel, window_len)
        .observer(observer)
        .build(values)?)
}

fn scalar_column(header: String, out: &AlignedOutput<f64>) -> Column {
    Column::from_output(header, out, |&v| Some(v))
}
