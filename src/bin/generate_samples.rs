use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use sensorfilt::constants::DEFAULT_GRAVITY_OFFSET;
use sensorfilt::data_io::{save_wav, write_columns};
use sensorfilt::signal_processing::KalmanParameters;
use sensorfilt::simulation::{
    NoiseConfig, apply_noise, ar1_observations, generate_accel_recording, generate_sine,
};

#[derive(Parser, Debug)]
#[command(name = "generate_samples")]
#[command(about = "Generate synthetic sensor recordings for filter testing")]
struct Args {
    /// Kind of recording to generate
    #[arg(value_enum)]
    kind: SignalKind,

    /// TOML noise configuration file (sine recordings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Number of samples (active samples for accel recordings)
    #[arg(short, long, default_value_t = 4000)]
    samples: usize,

    /// Base seed for reproducibility
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Kalman model "A,H,Q,R" for AR(1) recordings
    #[arg(long, default_value = "0.5,1,1,0.25")]
    model: KalmanParameters,

    /// Sine frequency in cycles/sample
    #[arg(long, default_value_t = 0.01)]
    frequency: f64,

    /// Rest samples before the motion in accel recordings
    #[arg(long, default_value_t = 800)]
    rest_samples: usize,

    /// Accelerometer noise sigma
    #[arg(long, default_value_t = 0.05)]
    sigma: f64,

    /// Also write the signal as a WAV file at this sample rate
    #[arg(long)]
    wav_rate: Option<u32>,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, Clone, Copy, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
enum SignalKind {
    /// rest.txt and active.txt observations of an AR(1) source
    Ar1,
    /// Noisy sine in sine.txt
    Sine,
    /// Three-axis recording in accel.txt
    Accel,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    kind: SignalKind,
    seed: u64,
    samples: usize,
    model: Option<KalmanParameters>,
    files: Vec<String>,
}

fn load_noise_config(path: &Path) -> Result<NoiseConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn write_signal(args: &Args, name: &str, values: &[f64], files: &mut Vec<String>) -> Result<()> {
    let path = args.output_dir.join(name);
    write_columns(&path, values, 1).with_context(|| format!("Failed to write {}", name))?;
    files.push(name.to_string());
    if let Some(rate) = args.wav_rate {
        let wav_name = Path::new(name).with_extension("wav");
        save_wav(args.output_dir.join(&wav_name), values, rate)
            .context("Failed to write WAV file")?;
        files.push(wav_name.display().to_string());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let mut files = Vec::new();
    let mut model = None;
    match args.kind {
        SignalKind::Ar1 => {
            let rest_model = KalmanParameters {
                q: 0.0,
                ..args.model
            };
            let (_, rest) = ar1_observations(args.samples, &rest_model, args.seed);
            let (_, active) = ar1_observations(args.samples, &args.model, args.seed + 2);
            write_signal(&args, "rest.txt", &rest, &mut files)?;
            write_signal(&args, "active.txt", &active, &mut files)?;
            model = Some(args.model);
        }
        SignalKind::Sine => {
            let noise = match args.config {
                Some(ref path) => load_noise_config(path)?,
                None => NoiseConfig::default().with_gaussian(args.sigma),
            };
            let noise = match noise.seed {
                Some(_) => noise,
                None => noise.with_seed(args.seed),
            };
            let clean = generate_sine(args.samples, args.frequency, 1.0);
            let noisy = apply_noise(&clean, &noise);
            write_signal(&args, "sine.txt", &noisy, &mut files)?;
        }
        SignalKind::Accel => {
            let recording = generate_accel_recording(
                args.rest_samples,
                args.samples,
                0.01,
                DEFAULT_GRAVITY_OFFSET,
                args.sigma,
                args.seed,
            );
            let rows: Vec<f64> = recording
                .iter()
                .flat_map(|s| [s.x, s.y, s.z, s.timestamp_ns as f64])
                .collect();
            write_columns(args.output_dir.join("accel.txt"), &rows, 4)
                .context("Failed to write accel.txt")?;
            files.push("accel.txt".to_string());
        }
    }

    if args.manifest {
        let manifest = Manifest {
            kind: args.kind,
            seed: args.seed,
            samples: args.samples,
            model,
            files: files.clone(),
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        files.len(),
        args.output_dir.display()
    );
    Ok(())
}
