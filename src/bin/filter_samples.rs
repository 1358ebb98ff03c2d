use anyhow::{Context, Result};
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use sensorfilt::config::SensorConfig;
use sensorfilt::data_io::{load_wav, read_rows, save_wav};
use sensorfilt::output::{OutputFormat, SampleOutput, create_formatter, iso8601_timestamp};
use sensorfilt::random::{GeneratorFactory, SeedSource};
use sensorfilt::signal_processing::{KalmanFilter1D, KalmanParameters, NlmsFilter};

#[derive(Parser, Debug)]
#[command(name = "filter_samples")]
#[command(about = "Run a FIR, NLMS or Kalman filter over a single-channel recording", long_about = None)]
struct Args {
    /// Text (one value per line, or `desired reference` pairs for NLMS) or WAV file
    input: PathBuf,

    /// Filter to apply
    #[arg(short = 'm', long, value_enum, default_value = "kalman")]
    filter: FilterKind,

    /// Output format: text, csv, tsv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kalman parameters "A,H,Q,R" (overrides the configuration)
    #[arg(short, long)]
    kalman: Option<KalmanParameters>,

    /// Seed for the Kalman noise generator
    #[arg(long)]
    seed: Option<u64>,

    /// Print a header line for csv/tsv output
    #[arg(long)]
    header: bool,

    /// Only print the summary statistics
    #[arg(short, long)]
    quiet: bool,

    /// Write the filtered signal to a mono WAV file
    #[arg(long)]
    dump_audio: Option<PathBuf>,

    /// Sample rate for --dump-audio when the input is a text file
    #[arg(long, default_value_t = 100)]
    sample_rate: u32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
enum FilterKind {
    Fir,
    Nlms,
    Kalman,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct FilterSummary {
    ts: String,
    file: String,
    filter: FilterKind,
    input: Option<StatsSummary>,
    output: Option<StatsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StatsSummary>,
}

/// Input channel plus the optional NLMS reference channel
struct Recording {
    samples: Vec<f64>,
    reference: Option<Vec<f64>>,
    sample_rate: u32,
}

fn load_recording(path: &Path, default_rate: u32) -> Result<Recording> {
    let is_wav = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if is_wav {
        let (samples, sample_rate) = load_wav(path)?;
        return Ok(Recording {
            samples,
            reference: None,
            sample_rate,
        });
    }

    let rows = read_rows(path)?;
    let samples = rows.iter().filter_map(|r| r.first().copied()).collect();
    let reference = if rows.iter().all(|r| r.len() >= 2) && !rows.is_empty() {
        Some(rows.iter().map(|r| r[1]).collect())
    } else {
        None
    };
    Ok(Recording {
        samples,
        reference,
        sample_rate: default_rate,
    })
}

fn run_filter(
    kind: FilterKind,
    recording: &Recording,
    config: &SensorConfig,
    seed: SeedSource,
) -> Result<Vec<SampleOutput>> {
    let samples = &recording.samples;
    let outputs = match kind {
        FilterKind::Fir => {
            let mut fir = config.fir.build().context("Failed to build FIR filter")?;
            log::info!("FIR filter of order {}", fir.order());
            samples
                .iter()
                .enumerate()
                .map(|(i, &x)| SampleOutput::new(i, x, fir.evaluate(x)))
                .collect()
        }
        FilterKind::Nlms => {
            let mut nlms = NlmsFilter::new(config.nlms.mhu, config.nlms.order);
            nlms.set_lambda(config.nlms.lambda);
            // Without a reference channel, predict each sample from the previous one
            let reference: Vec<f64> = match &recording.reference {
                Some(r) => r.clone(),
                None => std::iter::once(0.0)
                    .chain(samples.iter().copied())
                    .take(samples.len())
                    .collect(),
            };
            samples
                .iter()
                .zip(&reference)
                .enumerate()
                .map(|(i, (&d, &x))| {
                    let out = nlms.evaluate(d, x);
                    SampleOutput {
                        error: Some(out.e),
                        ..SampleOutput::new(i, d, out.y)
                    }
                })
                .collect()
        }
        FilterKind::Kalman => {
            let mut factory = GeneratorFactory::with_seed_source(seed);
            let mut kalman = KalmanFilter1D::new(config.kalman.parameters(), &mut factory);
            kalman.init(config.kalman.init_x, config.kalman.init_p);
            log::info!("Kalman filter with {}", kalman.params());
            samples
                .iter()
                .enumerate()
                .map(|(i, &z)| {
                    let x = kalman.evaluate(z);
                    SampleOutput {
                        variance: Some(kalman.current_p()),
                        ..SampleOutput::new(i, z, x)
                    }
                })
                .collect()
        }
    };
    Ok(outputs)
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
    let seed = match args.seed.or(config.pipeline.seed) {
        Some(s) => SeedSource::Fixed(s),
        None => SeedSource::WallClock,
    };

    let recording = load_recording(&args.input, args.sample_rate)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    log::info!(
        "Loaded {} samples from {}",
        recording.samples.len(),
        args.input.display()
    );

    let outputs = run_filter(args.filter, &recording, &config, seed)?;

    let mut input_stats: Stats<f64> = Stats::new();
    let mut output_stats: Stats<f64> = Stats::new();
    let mut error_stats: Stats<f64> = Stats::new();

    let formatter = create_formatter(args.format, args.verbose > 0);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if !args.quiet
        && args.header
        && let Some(header) = formatter.header()
    {
        writeln!(out, "{}", header)?;
    }
    for sample in &outputs {
        input_stats.update(sample.input);
        output_stats.update(sample.output);
        if let Some(e) = sample.error {
            error_stats.update(e);
        }
        if !args.quiet {
            writeln!(out, "{}", formatter.format(sample))?;
        }
    }

    let summary = FilterSummary {
        ts: iso8601_timestamp(),
        file: args.input.display().to_string(),
        filter: args.filter,
        input: StatsSummary::from_stats(&input_stats),
        output: StatsSummary::from_stats(&output_stats),
        error: StatsSummary::from_stats(&error_stats),
    };
    match args.format {
        OutputFormat::Json => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
            );
        }
        _ => {
            if let Some(s) = &summary.output {
                eprintln!(
                    "{} samples, output mean {:.6} std {:.6} [{:.6}, {:.6}]",
                    s.count, s.mean, s.std_dev, s.min, s.max
                );
            }
            if let Some(s) = &summary.error {
                eprintln!("error mean {:.6} std {:.6}", s.mean, s.std_dev);
            }
        }
    }

    if let Some(ref path) = args.dump_audio {
        let filtered: Vec<f64> = outputs.iter().map(|s| s.output).collect();
        save_wav(path, &filtered, recording.sample_rate)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Filtered signal written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(samples: Vec<f64>) -> Recording {
        Recording {
            samples,
            reference: None,
            sample_rate: 100,
        }
    }

    #[test]
    fn test_fir_moving_average() {
        let mut config = SensorConfig::default();
        config.fir.order = 1;
        let out = run_filter(
            FilterKind::Fir,
            &recording(vec![2.0, 4.0, 6.0]),
            &config,
            SeedSource::Fixed(0),
        )
        .unwrap();
        let y: Vec<f64> = out.iter().map(|s| s.output).collect();
        assert_eq!(y, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_kalman_reports_variance() {
        let config = SensorConfig::default();
        let out = run_filter(
            FilterKind::Kalman,
            &recording(vec![1.0; 5]),
            &config,
            SeedSource::Fixed(3),
        )
        .unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|s| s.variance.is_some() && s.error.is_none()));
    }

    #[test]
    fn test_nlms_reports_error() {
        let config = SensorConfig::default();
        let out = run_filter(
            FilterKind::Nlms,
            &recording(vec![1.0, 2.0, 3.0]),
            &config,
            SeedSource::Fixed(0),
        )
        .unwrap();
        assert!(out.iter().all(|s| s.error.is_some()));
    }
}
