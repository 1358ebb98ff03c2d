use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use sensorfilt::config::SensorConfig;
use sensorfilt::constants::NANOS_PER_SECOND;
use sensorfilt::data_io::read_rows;
use sensorfilt::pipeline::{AccelPipeline, AccelSample};
use sensorfilt::signal_processing::KalmanParameters;

#[derive(Parser, Debug)]
#[command(name = "sensorfilt")]
#[command(about = "Kalman-filter accelerometer recordings and integrate velocity and position")]
struct Args {
    /// Sample file: `ax ay az [timestamp_ns]` per line
    input: PathBuf,

    /// Directory for accelerations.txt, velocities.txt and positions.txt
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kalman parameters "A,H,Q,R" (overrides the configuration)
    #[arg(short, long)]
    kalman: Option<KalmanParameters>,

    /// Sample spacing used when the file has no timestamp column
    #[arg(long, default_value_t = 0.01)]
    sample_interval: f64,

    /// Samples at the start of the file recorded at rest (0 disables calibration)
    #[arg(long)]
    rest_samples: Option<usize>,

    /// Seed for the filters' noise generators
    #[arg(long)]
    seed: Option<u64>,

    /// Print fitted Kalman parameters per axis after processing
    #[arg(long)]
    estimate: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn to_samples(rows: &[Vec<f64>], sample_interval: f64) -> Result<Vec<AccelSample>> {
    let step_ns = (sample_interval * NANOS_PER_SECOND) as i64;
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            &[x, y, z] => Ok(AccelSample::new(x, y, z, i as i64 * step_ns)),
            &[x, y, z, t] => Ok(AccelSample::new(x, y, z, t as i64)),
            other => anyhow::bail!("Row {} has {} columns, expected 3 or 4", i + 1, other.len()),
        })
        .collect()
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

    let mut config = match args.config {
        Some(ref path) => SensorConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SensorConfig::default(),
    };
    if let Some(params) = args.kalman {
        config.kalman.a = params.a;
        config.kalman.h = params.h;
        config.kalman.q = params.q;
        config.kalman.r = params.r;
    }
    if let Some(rest) = args.rest_samples {
        config.pipeline.rest_samples = rest;
    }
    if args.seed.is_some() {
        config.pipeline.seed = args.seed;
    }

    let rows = read_rows(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let samples = to_samples(&rows, args.sample_interval)?;
    log::info!(
        "Processing {} samples from {}",
        samples.len(),
        args.input.display()
    );

    let mut pipeline = AccelPipeline::new(&config).context("Failed to build pipeline")?;
    for sample in samples {
        pipeline.process(sample);
    }

    pipeline
        .write_recordings(&args.output_dir)
        .context("Failed to write recordings")?;

    if pipeline.samples_seen() > 0 {
        let n = pipeline.positions().len();
        let last = &pipeline.positions()[n - 3..];
        println!(
            "Final position: x={:.4} y={:.4} z={:.4}",
            last[0], last[1], last[2]
        );
    }
    if pipeline.is_calibrated() {
        let params = pipeline.filter_parameters();
        println!(
            "Calibrated R: x={:.6} y={:.6} z={:.6}",
            params[0].r, params[1].r, params[2].r
        );
    }
    if args.estimate {
        for (axis, params) in ["x", "y", "z"].iter().zip(pipeline.estimate_parameters()) {
            println!("{}: {}", axis, params);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_samples_synthesizes_timestamps() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let samples = to_samples(&rows, 0.5).unwrap();
        assert_eq!(samples[1], AccelSample::new(4.0, 5.0, 6.0, 500_000_000));
    }

    #[test]
    fn test_to_samples_uses_timestamp_column() {
        let rows = vec![vec![1.0, 2.0, 3.0, 1234.0]];
        assert_eq!(to_samples(&rows, 0.5).unwrap()[0].timestamp_ns, 1234);
    }

    #[test]
    fn test_to_samples_rejects_bad_width() {
        assert!(to_samples(&[vec![1.0, 2.0]], 0.01).is_err());
    }
}
