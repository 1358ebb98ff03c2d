//! Three-axis accelerometer pipeline
//!
//! Each sample is offset for gravity on z, smoothed per axis by a
//! [`KalmanFilter1D`], and integrated into velocity and position. The
//! leading `rest_samples` samples can be used to measure the observation
//! noise of each axis and rebuild the filters with it.

use std::path::Path;

use crate::config::{EstimatorConfig, KalmanConfig, PipelineConfig, SensorConfig};
use crate::data_io::write_columns;
use crate::error::Result;
use crate::integrator::MotionIntegrator;
use crate::random::{GeneratorFactory, SeedSource};
use crate::signal_processing::{KalmanFilter1D, KalmanParameterEstimator, KalmanParameters};

pub const ACCELERATIONS_FILE: &str = "accelerations.txt";
pub const VELOCITIES_FILE: &str = "velocities.txt";
pub const POSITIONS_FILE: &str = "positions.txt";

/// One accelerometer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp_ns: i64,
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ns: i64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ns,
        }
    }
}

/// Per-axis results of one pipeline step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub filtered: [f64; 3],
    pub velocity: [f64; 3],
    pub position: [f64; 3],
}

pub struct AccelPipeline {
    config: PipelineConfig,
    kalman: KalmanConfig,
    factory: GeneratorFactory,
    filters: [KalmanFilter1D; 3],
    integrators: [MotionIntegrator; 3],
    estimators: [KalmanParameterEstimator; 3],
    samples_seen: usize,
    calibrated: bool,
    accelerations: Vec<f64>,
    velocities: Vec<f64>,
    positions: Vec<f64>,
}

impl AccelPipeline {
    /// Build the pipeline from a configuration
    ///
    /// # Errors
    /// Returns `DspError::InvalidCapacity` if the estimator capacity is zero
    pub fn new(config: &SensorConfig) -> Result<Self> {
        let seed = match config.pipeline.seed {
            Some(seed) => SeedSource::Fixed(seed),
            None => SeedSource::WallClock,
        };
        let mut factory = GeneratorFactory::with_seed_source(seed);
        let params = config.kalman.parameters();
        let filters = Self::build_filters(&config.kalman, [params; 3], &mut factory);

        Ok(Self {
            config: config.pipeline.clone(),
            kalman: config.kalman.clone(),
            factory,
            filters,
            integrators: std::array::from_fn(|_| {
                MotionIntegrator::new(config.pipeline.position_step_secs)
            }),
            estimators: Self::build_estimators(&config.estimator)?,
            samples_seen: 0,
            calibrated: false,
            accelerations: Vec::new(),
            velocities: Vec::new(),
            positions: Vec::new(),
        })
    }

    fn build_filters(
        kalman: &KalmanConfig,
        params: [KalmanParameters; 3],
        factory: &mut GeneratorFactory,
    ) -> [KalmanFilter1D; 3] {
        params.map(|p| {
            let mut filter = KalmanFilter1D::new(p, factory);
            filter.init(kalman.init_x, kalman.init_p);
            filter
        })
    }

    fn build_estimators(config: &EstimatorConfig) -> Result<[KalmanParameterEstimator; 3]> {
        Ok([
            KalmanParameterEstimator::new(config.h, config.capacity)?,
            KalmanParameterEstimator::new(config.h, config.capacity)?,
            KalmanParameterEstimator::new(config.h, config.capacity)?,
        ])
    }

    /// Run one sample through the pipeline
    ///
    /// While the rest window is filling, the gravity-corrected values also
    /// go to the estimators' rest windows; the filters are recalibrated
    /// as soon as it is full. Later samples feed the active windows.
    pub fn process(&mut self, sample: AccelSample) -> MotionState {
        let accel = [sample.x, sample.y, sample.z - self.config.gravity_offset];
        self.accelerations.extend_from_slice(&accel);

        let in_rest_window = self.samples_seen < self.config.rest_samples;
        for (est, &a) in self.estimators.iter_mut().zip(&accel) {
            if in_rest_window {
                est.add_rest_sample(a);
            } else {
                est.add_active_sample(a);
            }
        }
        self.samples_seen += 1;
        if in_rest_window && self.samples_seen == self.config.rest_samples {
            self.calibrate();
        }

        let mut state = MotionState {
            filtered: [0.0; 3],
            velocity: [0.0; 3],
            position: [0.0; 3],
        };
        for axis in 0..3 {
            let filtered = self.filters[axis].evaluate(accel[axis]);
            let (v, p) = self.integrators[axis].update(filtered, sample.timestamp_ns);
            state.filtered[axis] = filtered;
            state.velocity[axis] = v;
            state.position[axis] = p;
        }
        self.velocities.extend_from_slice(&state.velocity);
        self.positions.extend_from_slice(&state.position);
        state
    }

    /// Rebuild the filters with the observation noise measured at rest
    ///
    /// Each axis keeps the configured `A`, `H` and `Q` and takes `R` from
    /// the variance of its rest window. Does nothing before any rest
    /// sample has been seen.
    pub fn calibrate(&mut self) {
        if self.estimators.iter().any(|e| e.rest_samples().is_empty()) {
            log::warn!("No rest samples collected; keeping configured filters");
            return;
        }
        let base = self.kalman.parameters();
        let params: [KalmanParameters; 3] = std::array::from_fn(|axis| KalmanParameters {
            r: self.estimators[axis].rest_samples().variance(),
            ..base
        });
        log::debug!(
            "Calibrated observation noise: R = [{}, {}, {}]",
            params[0].r,
            params[1].r,
            params[2].r
        );
        self.filters = Self::build_filters(&self.kalman, params, &mut self.factory);
        self.calibrated = true;
    }

    /// Fit full Kalman parameters for each axis from the rest and active windows
    pub fn estimate_parameters(&mut self) -> [KalmanParameters; 3] {
        let mut out = [KalmanParameters::default(); 3];
        for (slot, est) in out.iter_mut().zip(self.estimators.iter_mut()) {
            *slot = est.compute_parameters();
        }
        out
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Parameters of the x, y and z filters currently in use
    pub fn filter_parameters(&self) -> [KalmanParameters; 3] {
        std::array::from_fn(|axis| *self.filters[axis].params())
    }

    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// Gravity-corrected accelerations, three values per sample
    pub fn accelerations(&self) -> &[f64] {
        &self.accelerations
    }

    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Write the three recordings into `dir` as tab-separated x/y/z rows
    pub fn write_recordings(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        write_columns(dir.join(ACCELERATIONS_FILE), &self.accelerations, 3)?;
        write_columns(dir.join(VELOCITIES_FILE), &self.velocities, 3)?;
        write_columns(dir.join(POSITIONS_FILE), &self.positions, 3)?;
        log::info!(
            "Wrote {} samples to {}",
            self.accelerations.len() / 3,
            dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn quiet_config(rest_samples: usize) -> SensorConfig {
        let mut config = SensorConfig::default();
        config.kalman.q = 0.0;
        config.kalman.r = 0.5;
        config.pipeline.rest_samples = rest_samples;
        config.pipeline.seed = Some(7);
        config
    }

    #[test]
    fn test_gravity_removed_and_recorded() {
        let mut pipeline = AccelPipeline::new(&quiet_config(0)).unwrap();
        pipeline.process(AccelSample::new(1.0, -2.0, 9.78, 0));
        let acc = pipeline.accelerations();
        assert_eq!(acc.len(), 3);
        assert_abs_diff_eq!(acc[0], 1.0);
        assert_abs_diff_eq!(acc[1], -2.0);
        assert_abs_diff_eq!(acc[2], 0.0);
        assert_eq!(pipeline.velocities(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rest_window_triggers_calibration() {
        let mut pipeline = AccelPipeline::new(&quiet_config(4)).unwrap();
        let rest = [0.5, -0.5, 0.5, -0.5];
        for (i, &v) in rest.iter().enumerate() {
            assert!(!pipeline.is_calibrated());
            pipeline.process(AccelSample::new(v, 2.0 * v, 9.78, i as i64 * 10_000_000));
        }
        assert!(pipeline.is_calibrated());
        let params = pipeline.filter_parameters();
        assert_abs_diff_eq!(params[0].r, 0.25);
        assert_abs_diff_eq!(params[1].r, 1.0);
        assert_abs_diff_eq!(params[2].r, 0.0, epsilon = 1e-12);
        assert_eq!(params[0].q, 0.0);
    }

    #[test]
    fn test_velocity_integrates_filtered_acceleration() {
        let mut config = quiet_config(0);
        config.kalman.q = 1.0;
        config.kalman.r = 0.0;
        let mut pipeline = AccelPipeline::new(&config).unwrap();
        // With R = 0 the gain is 1 and the filter follows the observation
        for i in 0..3 {
            pipeline.process(AccelSample::new(1.0, 0.0, 9.78, i * 1_000_000_000));
        }
        assert_abs_diff_eq!(pipeline.velocities()[6], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pipeline.positions()[6], 0.3, epsilon = 1e-9);
    }
}
