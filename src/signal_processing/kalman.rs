use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Filter;
use crate::linalg::Vector;
use crate::random::{GaussianRv, GeneratorFactory};

/// Model parameters of the scalar Kalman filter
///
/// Source model `X[k] = A·X[k-1] + U[k]` with `U ~ N(0, Q)` and observation
/// model `Z[k] = H·X[k] + V[k]` with `V ~ N(0, R)`.
///
/// # Parsing
/// `"A,H,Q,R"`, e.g. `"1,1,0.01,0.1"`
///
/// ```
/// use sensorfilt::signal_processing::KalmanParameters;
///
/// let p: KalmanParameters = "0.9, 1, 0.5, 0.25".parse().unwrap();
/// assert_eq!(p.a, 0.9);
/// assert_eq!(p.r, 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KalmanParameters {
    pub a: f64,
    pub h: f64,
    pub q: f64,
    pub r: f64,
}

impl KalmanParameters {
    pub fn new(a: f64, h: f64, q: f64, r: f64) -> Self {
        Self { a, h, q, r }
    }

    /// Parameters as the 4-element vector `[H, R, A, Q]`
    pub fn to_vector(&self) -> Vector {
        Vector::from_vec(vec![self.h, self.r, self.a, self.q])
    }

    /// Steady-state posterior variance for a random walk (`A = H = 1`)
    ///
    /// Fixed point of the Riccati recursion: `(sqrt(Q² + 4QR) - Q) / 2`.
    pub fn random_walk_steady_state_p(&self) -> f64 {
        ((self.q * self.q + 4.0 * self.q * self.r).sqrt() - self.q) / 2.0
    }
}

impl Default for KalmanParameters {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl fmt::Display for KalmanParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A={} H={} Q={} R={}", self.a, self.h, self.q, self.r)
    }
}

impl FromStr for KalmanParameters {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid parameter: {}", p.trim()))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        match values.as_slice() {
            &[a, h, q, r] => {
                if q < 0.0 || r < 0.0 {
                    return Err("variances Q and R must not be negative".to_string());
                }
                Ok(Self::new(a, h, q, r))
            }
            _ => Err(format!("expected 4 values A,H,Q,R, got {}", values.len())),
        }
    }
}

/// Scalar Kalman predictor/corrector
///
/// Each call to [`evaluate`](Self::evaluate) draws one sample of simulated
/// process noise from an owned `GaussianRv(0, sqrt(Q))`, predicts, and
/// corrects against the new observation.
#[derive(Debug, Clone)]
pub struct KalmanFilter1D {
    x: f64,
    p: f64,
    params: KalmanParameters,
    noise: GaussianRv,
}

impl KalmanFilter1D {
    pub fn new(params: KalmanParameters, factory: &mut GeneratorFactory) -> Self {
        Self {
            x: 0.0,
            p: 0.0,
            params,
            noise: GaussianRv::new(0.0, params.q.sqrt(), factory),
        }
    }

    /// Set the state estimate and its variance directly
    pub fn init(&mut self, x0: f64, p0: f64) {
        self.x = x0;
        self.p = p0;
    }

    /// Feed observation `z` and return the corrected state estimate
    pub fn evaluate(&mut self, z: f64) -> f64 {
        let KalmanParameters { a, h, q, r } = self.params;
        let u = self.noise.value();

        let x_minus = a * self.x + u;
        let p_minus = a * self.p * a + q;

        let k = p_minus * h / (h * p_minus * h + r);
        self.x = x_minus + k * (z - h * x_minus);
        self.p = (1.0 - k * h) * p_minus;
        self.x
    }

    /// Variance of the latest correction; read right after `evaluate`
    pub fn current_p(&self) -> f64 {
        self.p
    }

    pub fn current_x(&self) -> f64 {
        self.x
    }

    pub fn params(&self) -> &KalmanParameters {
        &self.params
    }

    /// Reseed the process-noise source
    pub fn seed_noise(&mut self, x0: f64) {
        self.noise.init(x0);
    }
}

impl Filter for KalmanFilter1D {
    fn process(&mut self, sample: f64) -> f64 {
        self.evaluate(sample)
    }

    fn reset(&mut self) {
        self.init(0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_parameters() {
        let p: KalmanParameters = "1,1,0.01,0.1".parse().unwrap();
        assert_eq!(p, KalmanParameters::new(1.0, 1.0, 0.01, 0.1));
    }

    #[test]
    fn test_parse_parameters_invalid() {
        assert!("1,1,0.01".parse::<KalmanParameters>().is_err());
        assert!("1,1,x,0.1".parse::<KalmanParameters>().is_err());
        assert!("1,1,-0.5,0.1".parse::<KalmanParameters>().is_err());
    }

    #[test]
    fn test_vector_order() {
        let p = KalmanParameters::new(0.5, 2.0, 3.0, 4.0);
        let v = p.to_vector();
        assert_eq!(v.as_slice(), &[2.0, 4.0, 0.5, 3.0]);
    }

    #[test]
    fn test_zero_q_is_deterministic() {
        // sigma = 0 makes the simulated noise vanish
        let mut factory = GeneratorFactory::with_fixed_seed(1);
        let mut kf = KalmanFilter1D::new(KalmanParameters::new(1.0, 1.0, 0.0, 1.0), &mut factory);
        kf.init(0.0, 1.0);

        // P- = 1, K = 0.5
        assert_abs_diff_eq!(kf.evaluate(2.0), 1.0);
        assert_abs_diff_eq!(kf.current_p(), 0.5);
        // P- = 0.5, K = 1/3
        assert_abs_diff_eq!(kf.evaluate(4.0), 2.0);
        assert_abs_diff_eq!(kf.current_p(), 1.0 / 3.0);
    }

    #[test]
    fn test_random_walk_convergence() {
        let params = KalmanParameters::new(1.0, 1.0, 0.01, 0.1);
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut kf = KalmanFilter1D::new(params, &mut factory);

        let mut tail = Vec::new();
        for i in 0..2000 {
            let x = kf.evaluate(3.0);
            if i >= 1500 {
                tail.push(x);
            }
        }

        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        assert!((mean - 3.0).abs() < 0.05, "mean estimate {}", mean);
        assert_abs_diff_eq!(
            kf.current_p(),
            params.random_walk_steady_state_p(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_reset() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut kf = KalmanFilter1D::new(KalmanParameters::default(), &mut factory);
        kf.process(5.0);
        kf.reset();
        assert_eq!(kf.current_x(), 0.0);
        assert_eq!(kf.current_p(), 0.0);
    }
}
