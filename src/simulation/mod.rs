//! Seeded synthetic signals for tests and the sample generator

mod noise;
mod signal;

pub use noise::{
    AdditiveNoiseConfig, BiasDriftConfig, GaussianNoiseConfig, ImpulseNoiseConfig, NoiseConfig,
    apply_noise, signal_power,
};
pub use signal::{
    ar1_observations, generate_accel_recording, generate_ar1, generate_sine, observe,
};
