//! CLI argument parsing module.
//!
//! This module defines the command-line interface for nonlinear-ta using clap.
//! The CLI follows the pattern: `nonlinear-ta <indicator> <input.csv> [window] [options] [-o output.csv]`
//!
//! # Examples
//!
//! ```bash
//! # Lempel-Ziv complexity over 32-sample windows (the default)
//! nonlinear-ta lempel-ziv prices.csv
//!
//! # Lyapunov exponent over 20-sample windows, written to a file
//! nonlinear-ta lyapunov prices.csv 20 -o lyapunov.csv
//!
//! # Approximate entropy with a tighter tolerance
//! nonlinear-ta apen prices.csv 40 -m 2 -r 0.5
//!
//! # First local minimum of the delayed mutual information
//! nonlinear-ta mutual-info prices.csv 32 --mode first_local_minimum --max-delay 12
//!
//! # Multifractal spectrum width and height
//! nonlinear-ta mfs prices.csv 64 --q-range -10,10 --scales 1,5
//!
//! # Several indicators from a JSON run configuration
//! nonlinear-ta run prices.csv --config indicators.json -vv
//! ```

use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use nonlinear_ta::indicators::{
    ApproximateEntropy, DiameterSearch, Lyapunov, Multifractal, MutualInfoMode, MutualInformation,
    RecurrenceParams,
};
use nonlinear_ta::kernels::Binning;

use crate::config::IndicatorConfig;
use crate::error::{CliError, Result};

/// nonlinear-ta: sliding-window nonlinear indicators
#[derive(Parser, Debug)]
#[command(name = "nonlinear-ta")]
#[command(author, version, about = "Sliding-window nonlinear time-series indicators")]
#[command(long_about = "nonlinear-ta computes chaos, complexity, entropy, multifractal \
    and recurrence indicators over every window of a numeric CSV column. Output is \
    aligned with the input rows. Warm-up cells are empty, windows without a defined \
    result are written as NaN, and leading rows that are warm-up in every column are \
    dropped.")]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The indicator to compute
    #[command(subcommand)]
    pub command: Command,
}

/// Input and output options shared by every command.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct IoArgs {
    /// Input CSV file
    pub input: String,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Column holding the series (auto-detected if not specified)
    #[arg(short, long)]
    pub column: Option<String>,
}

/// Available indicator commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Largest Lyapunov exponent
    #[command(about = "Largest Lyapunov exponent and its fit R²")]
    Lyapunov {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "40")]
        window: usize,

        /// Most near-neighbour pairs accepted by the diameter search
        #[arg(long, default_value = "15")]
        max_pairs: usize,

        /// Smallest divergence-curve prefix used by the regression
        #[arg(long, default_value = "3")]
        min_fit: usize,
    },

    /// Lempel-Ziv complexity
    #[command(about = "Lempel-Ziv (LZ76) complexity of the mean-binarized window")]
    LempelZiv {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "32")]
        window: usize,
    },

    /// Shannon entropy
    #[command(about = "Shannon entropy (bits) of the window as a probability mass")]
    Shannon {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "32")]
        window: usize,
    },

    /// Approximate entropy
    #[command(about = "Approximate entropy (ApEn)")]
    Apen {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "32")]
        window: usize,

        /// Pattern length m
        #[arg(short = 'm', long = "pattern-len", default_value = "2")]
        pattern_len: usize,

        /// Absolute tolerance r
        #[arg(short = 'r', long, default_value = "3.0")]
        tolerance: f64,
    },

    /// Mutual information
    #[command(about = "Delayed mutual information or its first local minimum")]
    MutualInfo {
        #[command(flatten)]
        io: IoArgs,

        /// Samples per compared segment
        #[arg(default_value = "32")]
        period: usize,

        /// constant_delay or first_local_minimum
        #[arg(long, default_value = "constant_delay")]
        mode: MutualInfoMode,

        /// Fixed delay (constant_delay mode)
        #[arg(long, default_value = "1")]
        delay: usize,

        /// Largest delay searched (first_local_minimum mode)
        #[arg(long, default_value = "10")]
        max_delay: usize,

        /// Number of equal-width bins
        #[arg(long, default_value = "8")]
        bins: usize,

        /// Use the floor of each value as its symbol instead of binning
        #[arg(long)]
        integer: bool,
    },

    /// Multifractal spectrum
    #[command(about = "Multifractal spectrum (Chhabra-Jensen) width and height")]
    Mfs {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "64")]
        window: usize,

        /// Moment orders: q_min,q_max (e.g., -40,40)
        #[arg(long, default_value = "-40,40", allow_hyphen_values = true)]
        q_range: String,

        /// Dyadic scales: min,max (defaults to 1,log2(window))
        #[arg(long)]
        scales: Option<String>,
    },

    /// Recurrence quantification
    #[command(about = "Recurrence rate, determinism and laminarity")]
    Rqa {
        #[command(flatten)]
        io: IoArgs,

        /// Window length
        #[arg(default_value = "40")]
        window: usize,

        /// Embedding dimension
        #[arg(long, default_value = "2")]
        dimension: usize,

        /// Embedding time delay
        #[arg(long, default_value = "2")]
        delay: usize,

        /// Neighbourhood radius (Euclidean)
        #[arg(long, default_value = "0.65")]
        radius: f64,

        /// Diagonals closer than this to the main diagonal are excluded
        #[arg(long, default_value = "1")]
        theiler: usize,

        /// Minimum diagonal line length
        #[arg(long, default_value = "2")]
        min_diagonal: usize,

        /// Minimum vertical line length
        #[arg(long, default_value = "2")]
        min_vertical: usize,
    },

    /// Several indicators from a JSON run configuration
    #[command(about = "Compute the indicators listed in a JSON run configuration")]
    Run {
        #[command(flatten)]
        io: IoArgs,

        /// JSON run configuration file
        #[arg(long)]
        config: String,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the input file path from the command.
    pub fn input_path(&self) -> &str {
        &self.command.io().input
    }

    /// Get the output file path from the command, if specified.
    pub fn output_path(&self) -> Option<&str> {
        self.command.io().output.as_deref()
    }
}

impl Command {
    /// Input and output options of this command.
    pub const fn io(&self) -> &IoArgs {
        match self {
            Self::Lyapunov { io, .. }
            | Self::LempelZiv { io, .. }
            | Self::Shannon { io, .. }
            | Self::Apen { io, .. }
            | Self::MutualInfo { io, .. }
            | Self::Mfs { io, .. }
            | Self::Rqa { io, .. }
            | Self::Run { io, .. } => io,
        }
    }

    /// The indicator a single-indicator command describes; `None` for `run`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` if a comma-separated range cannot
    /// be parsed.
    pub fn indicator_config(&self) -> Result<Option<IndicatorConfig>> {
        let config = match self {
            Self::Lyapunov {
                window,
                max_pairs,
                min_fit,
                ..
            } => IndicatorConfig::Lyapunov {
                window: *window,
                params: Lyapunov::new()
                    .search(DiameterSearch::new().max_pairs(*max_pairs))
                    .min_fit_points(*min_fit),
            },
            Self::LempelZiv { window, .. } => IndicatorConfig::LempelZiv { window: *window },
            Self::Shannon { window, .. } => IndicatorConfig::ShannonEntropy { window: *window },
            Self::Apen {
                window,
                pattern_len,
                tolerance,
                ..
            } => IndicatorConfig::ApproximateEntropy {
                window: *window,
                params: ApproximateEntropy::new()
                    .pattern_len(*pattern_len)
                    .tolerance(*tolerance),
            },
            Self::MutualInfo {
                period,
                mode,
                delay,
                max_delay,
                bins,
                integer,
                ..
            } => IndicatorConfig::MutualInformation {
                period: *period,
                params: MutualInformation::new()
                    .mode(*mode)
                    .delay(*delay)
                    .max_delay(*max_delay)
                    .binning(if *integer {
                        Binning::Integer
                    } else {
                        Binning::EqualWidth(*bins)
                    }),
            },
            Self::Mfs {
                window,
                q_range,
                scales,
                ..
            } => {
                let (q_min, q_max) = parse_range::<i32>("q_range", q_range)?;
                let mut params = Multifractal::new().q_range(q_min, q_max);
                if let Some(scales) = scales {
                    let (min_scale, max_scale) = parse_range::<u32>("scales", scales)?;
                    params = params.scale_range(min_scale, max_scale);
                }
                IndicatorConfig::Multifractal {
                    window: *window,
                    params,
                }
            }
            Self::Rqa {
                window,
                dimension,
                delay,
                radius,
                theiler,
                min_diagonal,
                min_vertical,
                ..
            } => IndicatorConfig::Rqa {
                window: *window,
                params: RecurrenceParams::new()
                    .embedding_dimension(*dimension)
                    .time_delay(*delay)
                    .radius(*radius)
                    .theiler_window(*theiler)
                    .min_diagonal(*min_diagonal)
                    .min_vertical(*min_vertical),
            },
            Self::Run { .. } => return Ok(None),
        };
        Ok(Some(config))
    }
}

/// Parse an inclusive range from string "low,high".
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if there are not exactly two values,
/// a value does not parse, or `low > high`.
pub fn parse_range<N>(argument: &str, text: &str) -> Result<(N, N)>
where
    N: FromStr + PartialOrd + Copy,
{
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        return Err(CliError::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("expected 2 values, got {}", parts.len()),
            suggestion: Some("Use format: low,high (e.g., -10,10)".to_string()),
        });
    }

    let parse = |part: &str| {
        part.trim().parse::<N>().map_err(|_| CliError::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("cannot parse '{}' as integer", part.trim()),
            suggestion: Some("Use whole numbers like 1,6".to_string()),
        })
    };
    let low = parse(parts[0])?;
    let high = parse(parts[1])?;

    if low > high {
        return Err(CliError::InvalidArgument {
            argument: argument.to_string(),
            reason: "low bound must not exceed high bound".to_string(),
            suggestion: Some(format!("Use {},{}", parts[1].trim(), parts[0].trim())),
        });
    }

    Ok((low, high))
}
