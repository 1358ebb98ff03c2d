use super::{KalmanParameters, RingBuffer};
use crate::constants::{ESTIMATOR_ITERATIONS, ESTIMATOR_LAG_DEPTH};
use crate::error::Result;
use crate::linalg::Vector;

/// Offline estimator of the scalar Kalman parameters `{H, R, A, Q}`
///
/// Collects two windows of observations of the same sensor: one at rest
/// (pure observation noise) and one while active. Given the chosen `H`:
///
/// - `R` is the variance of the rest window.
/// - `A` is fitted to the normalized autocorrelation of the active window,
///   `hF[i] = C(i+1) / (var - R) ≈ A^(i+1)` for `i < L`, starting from
///   `hF[0]` and refined by fixed-point steps `A += <hF - F, J> / |J|²`
///   with `F[j] = A^(j+1)` and `J[j] = A^j`.
/// - `Q = (1 - A²)(var - R) / H²`.
///
/// The refinement contracts for moderate `A` (it does well up to about
/// 0.7) but overshoots and can diverge as `A` approaches 1.
///
/// Inputs are not validated: too few samples, or an active window no
/// noisier than the rest window, give non-finite results.
#[derive(Debug, Clone)]
pub struct KalmanParameterEstimator {
    h: f64,
    lag_depth: usize,
    parameters: Vector,
    active: RingBuffer,
    rest: RingBuffer,
}

impl KalmanParameterEstimator {
    /// Create an estimator for observation gain `h` keeping at most
    /// `capacity` samples per window
    ///
    /// # Errors
    /// Returns `DspError::InvalidCapacity` for a zero capacity
    pub fn new(h: f64, capacity: usize) -> Result<Self> {
        let mut parameters = Vector::new(4);
        parameters.set(0, h);
        Ok(Self {
            h,
            lag_depth: ESTIMATOR_LAG_DEPTH,
            parameters,
            active: RingBuffer::new(capacity)?,
            rest: RingBuffer::new(capacity)?,
        })
    }

    /// Add an observation taken while the sensor is active
    pub fn add_active_sample(&mut self, value: f64) {
        self.active.push(value);
    }

    /// Add an observation taken while the sensor is at rest
    pub fn add_rest_sample(&mut self, value: f64) {
        self.rest.push(value);
    }

    /// Estimate the parameters from the samples collected so far
    pub fn compute_parameters(&mut self) -> KalmanParameters {
        let needed = self.lag_depth + 1;
        if self.active.len() < needed || self.rest.len() < 2 {
            log::warn!(
                "Estimating Kalman parameters from {} active / {} rest samples (need at least {} / 2)",
                self.active.len(),
                self.rest.len(),
                needed
            );
        }

        let r = self.rest.variance();
        let var_active = self.active.variance();
        let signal_var = var_active - r;

        let mut hf = Vector::new(self.lag_depth);
        for i in 0..self.lag_depth {
            hf.set(i, self.active.autocorrelation(i as isize + 1) / signal_var);
        }

        let mut a = hf.get(0);
        let mut f = Vector::new(self.lag_depth);
        let mut j = Vector::new(self.lag_depth);
        for _ in 0..ESTIMATOR_ITERATIONS {
            for k in 0..self.lag_depth {
                f.set(k, a.powi(k as i32 + 1));
                j.set(k, a.powi(k as i32));
            }
            a += hf.sub_new(&f).dot(&j) / j.norm2();
        }

        let q = (1.0 - a * a) * signal_var / (self.h * self.h);

        self.parameters.set(1, r);
        self.parameters.set(2, a);
        self.parameters.set(3, q);

        let params = KalmanParameters::new(a, self.h, q, r);
        log::debug!("Estimated Kalman parameters: {}", params);
        params
    }

    /// Last computed parameters as the vector `[H, R, A, Q]`
    ///
    /// Only `H` is set before the first call to
    /// [`compute_parameters`](Self::compute_parameters).
    pub fn parameter_vector(&self) -> &Vector {
        &self.parameters
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn lag_depth(&self) -> usize {
        self.lag_depth
    }

    pub fn active_samples(&self) -> &RingBuffer {
        &self.active
    }

    pub fn rest_samples(&self) -> &RingBuffer {
        &self.rest
    }

    /// Drop both sample windows
    pub fn clear(&mut self) {
        self.active.clear();
        self.rest.clear();
    }
}
