//! Command execution: load the series, compute every requested indicator and
//! write the aligned columns.

use crate::args::{Args, Command};
use crate::config::{IndicatorConfig, RunConfig};
use crate::csv_parser::read_series;
use crate::csv_writer::{write_columns, OutputDest};
use crate::error::Result;

/// Indicators requested by a command.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for unparseable ranges, or the I/O and
/// config errors of [`RunConfig::load`].
pub fn indicator_configs(command: &Command) -> Result<Vec<IndicatorConfig>> {
    if let Command::Run { config, .. } = command {
        return Ok(RunConfig::load(config)?.indicators);
    }
    Ok(command.indicator_config()?.into_iter().collect())
}

/// Runs a parsed command line.
///
/// Ranges and kernel parameters are checked before the input file is read.
/// Window lengths are checked against the series length once it is loaded.
///
/// # Errors
///
/// Returns the first I/O, parse, configuration or indicator error.
pub fn run(args: &Args) -> Result<()> {
    let configs = indicator_configs(&args.command)?;
    for config in &configs {
        config.validate()?;
    }
    let io = args.command.io();

    let series = read_series(&io.input, io.column.as_deref())?;
    tracing::info!(
        input = %io.input,
        column = %series.name,
        rows = series.values.len(),
        indicators = configs.len(),
        "loaded series"
    );

    let mut columns = Vec::new();
    for config in &configs {
        columns.extend(config.compute(&series.values)?);
    }

    write_columns(
        &columns,
        series.dates.as_deref(),
        &OutputDest::from_option(io.output.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use clap::Parser;
    use std::fs;

    fn write_input(dir: &std::path::Path) -> String {
        let mut text = String::from("date,close\n");
        for t in 0..40 {
            text.push_str(&format!("2024-01-{:02},{}\n", t + 1, t % 5 + 1));
        }
        let path = dir.join("in.csv");
        fs::write(&path, text).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_run_single_indicator() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("out.csv").display().to_string();

        let args =
            Args::try_parse_from(["nonlinear-ta", "lempel-ziv", &input, "10", "-o", &output])
                .unwrap();
        run(&args).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,lz_10");
        assert_eq!(lines.len(), 1 + 31);
        assert!(lines[1].starts_with("2024-01-10,"));
    }

    #[test]
    fn test_run_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("out.csv").display().to_string();
        let config = dir.path().join("run.json");
        fs::write(
            &config,
            r#"{"indicators": [
                {"indicator": "shannon_entropy", "window": 8},
                {"indicator": "lempel_ziv", "window": 16}
            ]}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "nonlinear-ta",
            "run",
            &input,
            "--config",
            &config.display().to_string(),
            "-o",
            &output,
        ])
        .unwrap();
        run(&args).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,shannon_8,lz_16");
        // Rows start at the shorter warm-up; the longer one leaves empty cells
        assert_eq!(lines.len(), 1 + 33);
        assert!(lines[1].ends_with(','));
    }

    #[test]
    fn test_bad_config_checked_before_input() {
        let args = Args::try_parse_from([
            "nonlinear-ta",
            "mfs",
            "/definitely/not/here.csv",
            "--q-range",
            "3",
        ])
        .unwrap();
        assert!(matches!(run(&args), Err(CliError::InvalidArgument { .. })));
    }

    #[test]
    fn test_kernel_parameters_checked_before_input() {
        let args = Args::try_parse_from([
            "nonlinear-ta",
            "apen",
            "/definitely/not/here.csv",
            "32",
            "-m",
            "0",
        ])
        .unwrap();
        assert!(matches!(run(&args), Err(CliError::IndicatorError { .. })));
    }
}
