use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Disturbances applied to a clean signal, in this order: bias drift,
/// Gaussian noise of fixed sigma, noise at a target SNR, impulses
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub drift: Option<BiasDriftConfig>,
    pub gaussian: Option<GaussianNoiseConfig>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gaussian(mut self, sigma: f64) -> Self {
        self.gaussian = Some(GaussianNoiseConfig { sigma });
        self
    }

    pub fn with_awgn(mut self, snr_db: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_impulse(
        mut self,
        probability: f64,
        amplitude: f64,
        duration_samples: usize,
    ) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            probability,
            amplitude,
            duration_samples,
        });
        self
    }

    pub fn with_drift(mut self, per_sample: f64) -> Self {
        self.drift = Some(BiasDriftConfig { per_sample });
        self
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct GaussianNoiseConfig {
    pub sigma: f64,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f64,
}

/// Spikes starting at each sample with the given probability
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    pub probability: f64,
    pub amplitude: f64,
    pub duration_samples: usize,
}

/// Linear bias growing by `per_sample` every sample
#[derive(Clone, Debug, serde::Deserialize)]
pub struct BiasDriftConfig {
    pub per_sample: f64,
}

pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}

pub(crate) fn add_gaussian(signal: &mut [f64], sigma: f64, rng: &mut ChaCha8Rng) {
    let Ok(normal) = Normal::new(0.0, sigma) else {
        log::warn!("Ignoring Gaussian noise with invalid sigma {}", sigma);
        return;
    };
    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}

fn apply_additive_noise(signal: &mut [f64], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }
    let snr_linear = 10.0_f64.powf(config.snr_db / 10.0);
    add_gaussian(signal, (sig_power / snr_linear).sqrt(), rng);
}

fn apply_impulse_noise(signal: &mut [f64], config: &ImpulseNoiseConfig, rng: &mut ChaCha8Rng) {
    let n = signal.len();
    if n == 0 || config.probability <= 0.0 {
        return;
    }

    let mut pos = 0usize;
    while pos < n {
        if rng.random::<f64>() < config.probability {
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            let end = (pos + config.duration_samples.max(1)).min(n);
            for sample in signal[pos..end].iter_mut() {
                *sample += sign * config.amplitude;
            }
            pos = end;
        } else {
            pos += 1;
        }
    }
}

fn apply_drift(signal: &mut [f64], config: &BiasDriftConfig) {
    for (i, sample) in signal.iter_mut().enumerate() {
        *sample += config.per_sample * i as f64;
    }
}

pub fn apply_noise(clean_signal: &[f64], config: &NoiseConfig) -> Vec<f64> {
    let mut signal = clean_signal.to_vec();
    let mut rng = create_rng(config.seed);

    if let Some(ref drift_config) = config.drift {
        apply_drift(&mut signal, drift_config);
    }

    if let Some(ref gaussian_config) = config.gaussian {
        add_gaussian(&mut signal, gaussian_config.sigma, &mut rng);
    }

    if let Some(ref additive_config) = config.additive {
        apply_additive_noise(&mut signal, additive_config, &mut rng);
    }

    if let Some(ref impulse_config) = config.impulse {
        apply_impulse_noise(&mut signal, impulse_config, &mut rng);
    }

    signal
}
