pub mod config;
pub mod constants;
pub mod data_io;
pub mod error;
pub mod integrator;
pub mod linalg;
pub mod output;
pub mod pipeline;
pub mod random;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::SensorConfig;
pub use error::{DspError, Result};
pub use integrator::MotionIntegrator;
pub use linalg::{Matrix, Vector};
pub use pipeline::{AccelPipeline, AccelSample, MotionState};
pub use random::{GaussianRv, GeneratorFactory, RandomCore, SeedSource, UniformRv};
pub use signal_processing::{
    Filter, FirFilter, KalmanFilter1D, KalmanParameterEstimator, KalmanParameters, NlmsFilter,
    RingBuffer, WaveTable,
};
