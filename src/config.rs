//! Configuration for the sensor filtering pipeline and the filter front ends.
//!
//! Every section has defaults, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! [kalman]
//! q = 0.05
//! r = 0.4
//!
//! [pipeline]
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GRAVITY_OFFSET;
use crate::error::{DspError, Result};
use crate::signal_processing::{FirFilter, KalmanParameters, design_lowpass};

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorConfig {
    pub pipeline: PipelineConfig,
    pub kalman: KalmanConfig,
    pub nlms: NlmsConfig,
    pub fir: FirConfig,
    pub estimator: EstimatorConfig,
}

impl SensorConfig {
    /// Load a configuration from a TOML file
    ///
    /// # Errors
    /// Returns `DspError::Io` if the file cannot be read and
    /// `DspError::Config` if it is not valid TOML for this structure
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DspError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the filters cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.kalman.q < 0.0 || self.kalman.r < 0.0 {
            return Err(DspError::Config(
                "kalman: q and r must be non-negative".to_string(),
            ));
        }
        if self.estimator.capacity == 0 {
            return Err(DspError::Config(
                "estimator: capacity must be at least 1".to_string(),
            ));
        }
        if self.pipeline.position_step_secs < 0.0 {
            return Err(DspError::Config(
                "pipeline: position_step_secs must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sensor pipeline settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Removed from the z axis before filtering (m/s²)
    pub gravity_offset: f64,
    /// Step used when integrating velocity into position
    pub position_step_secs: f64,
    /// Leading samples treated as the rest window for calibration; 0 disables it
    pub rest_samples: usize,
    /// Fixed seed for the filters' noise generators; wall clock when absent
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gravity_offset: DEFAULT_GRAVITY_OFFSET,
            position_step_secs: 0.1,
            rest_samples: 800,
            seed: None,
        }
    }
}

/// Scalar Kalman model and initial state
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KalmanConfig {
    pub a: f64,
    pub h: f64,
    pub q: f64,
    pub r: f64,
    pub init_x: f64,
    pub init_p: f64,
}

impl KalmanConfig {
    pub fn parameters(&self) -> KalmanParameters {
        KalmanParameters::new(self.a, self.h, self.q, self.r)
    }
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            a: 1.0,
            h: 1.0,
            q: 1.0,
            r: 1.0,
            init_x: 0.0,
            init_p: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NlmsConfig {
    pub order: usize,
    pub mhu: f64,
    pub lambda: f64,
}

impl Default for NlmsConfig {
    fn default() -> Self {
        Self {
            order: 12,
            mhu: 0.6,
            lambda: 1e-7,
        }
    }
}

/// FIR settings
///
/// Explicit `coefficients` win over a `lowpass_cutoff` design; with
/// neither, the filter is a moving average of the given order.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FirConfig {
    pub order: usize,
    pub coefficients: Option<Vec<f64>>,
    /// Normalized cutoff in cycles/sample
    pub lowpass_cutoff: Option<f64>,
    /// Normalized transition width in cycles/sample
    pub transition_width: f64,
}

impl FirConfig {
    /// Build the filter these settings describe
    ///
    /// # Errors
    /// Returns `DspError::FilterDesign` when the lowpass design fails
    pub fn build(&self) -> Result<FirFilter> {
        if let Some(taps) = &self.coefficients {
            return Ok(FirFilter::with_coefficients(taps));
        }
        match self.lowpass_cutoff {
            Some(cutoff) => design_lowpass(self.order, cutoff, self.transition_width),
            None => Ok(FirFilter::moving_average(self.order)),
        }
    }
}

impl Default for FirConfig {
    fn default() -> Self {
        Self {
            order: 8,
            coefficients: None,
            lowpass_cutoff: None,
            transition_width: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub h: f64,
    /// Samples kept per window
    pub capacity: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            h: 1.0,
            capacity: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.nlms.order, 12);
        assert_eq!(config.nlms.mhu, 0.6);
        assert_eq!(config.estimator.capacity, 800);
        assert_eq!(config.pipeline.gravity_offset, 9.78);
        assert_eq!(config.kalman.parameters(), KalmanParameters::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: SensorConfig = toml::from_str(
            r#"
            [kalman]
            q = 0.05
            r = 0.4

            [pipeline]
            seed = 42
            rest_samples = 0

            [fir]
            coefficients = [0.5, 0.5]
            "#,
        )
        .unwrap();
        assert_eq!(config.kalman.q, 0.05);
        assert_eq!(config.kalman.a, 1.0);
        assert_eq!(config.pipeline.seed, Some(42));
        assert_eq!(config.pipeline.rest_samples, 0);
        assert_eq!(config.nlms.lambda, 1e-7);
        assert_eq!(config.fir.build().unwrap().coefficients(), &[0.5, 0.5]);
    }

    #[test]
    fn test_fir_build_default_is_moving_average() {
        let fir = FirConfig::default().build().unwrap();
        assert_eq!(fir.order(), 8);
        assert!(fir.coefficients().iter().all(|&h| h == 1.0 / 9.0));
    }

    #[test]
    fn test_validate_rejects_negative_noise() {
        let mut config = SensorConfig::default();
        config.kalman.r = -1.0;
        assert!(matches!(config.validate(), Err(DspError::Config(_))));
    }
}
