use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use sensorfilt::config::SensorConfig;
use sensorfilt::data_io::read_rows;
use sensorfilt::output::iso8601_timestamp;
use sensorfilt::signal_processing::{KalmanParameterEstimator, KalmanParameters};

#[derive(Parser, Debug)]
#[command(name = "estimate_kalman")]
#[command(about = "Estimate scalar Kalman parameters from a rest and an active recording", long_about = None)]
struct Args {
    /// Observations taken with the sensor at rest
    rest: PathBuf,

    /// Observations taken while the sensor is active
    active: PathBuf,

    /// Column of each file to use (0-based)
    #[arg(long, default_value_t = 0)]
    column: usize,

    /// Observation gain H
    #[arg(long)]
    h: Option<f64>,

    /// Samples kept per window
    #[arg(long)]
    capacity: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Report {
    ts: String,
    rest_file: String,
    active_file: String,
    rest_samples: usize,
    active_samples: usize,
    parameters: KalmanParameters,
    /// `[H, R, A, Q]`
    vector: Vec<f64>,
}

fn column_values(rows: &[Vec<f64>], column: usize) -> Vec<f64> {
    rows.iter().filter_map(|r| r.get(column).copied()).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match args.config {
        Some(ref path) => SensorConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SensorConfig::default(),
    };
    let h = args.h.unwrap_or(config.estimator.h);
    let capacity = args.capacity.unwrap_or(config.estimator.capacity);

    let rest = column_values(
        &read_rows(&args.rest).with_context(|| format!("Failed to read {}", args.rest.display()))?,
        args.column,
    );
    let active = column_values(
        &read_rows(&args.active)
            .with_context(|| format!("Failed to read {}", args.active.display()))?,
        args.column,
    );

    let mut estimator =
        KalmanParameterEstimator::new(h, capacity).context("Failed to create estimator")?;
    for &v in &rest {
        estimator.add_rest_sample(v);
    }
    for &v in &active {
        estimator.add_active_sample(v);
    }
    let parameters = estimator.compute_parameters();

    if !parameters.a.is_finite() || !parameters.q.is_finite() {
        log::warn!(
            "Estimate is not finite; the active recording must be noisier than the rest recording"
        );
    }

    match args.format {
        ReportFormat::Text => {
            println!("{}", parameters);
            print!("[H, R, A, Q] = {}", estimator.parameter_vector());
        }
        ReportFormat::Json => {
            let report = Report {
                ts: iso8601_timestamp(),
                rest_file: args.rest.display().to_string(),
                active_file: args.active.display().to_string(),
                rest_samples: estimator.rest_samples().len(),
                active_samples: estimator.active_samples().len(),
                parameters,
                vector: estimator.parameter_vector().as_slice().to_vec(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_values_skips_short_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0], vec![4.0, 5.0]];
        assert_eq!(column_values(&rows, 1), vec![2.0, 5.0]);
        assert_eq!(column_values(&rows, 0), vec![1.0, 3.0, 4.0]);
    }
}
