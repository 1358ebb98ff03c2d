use std::f64::consts::PI;

use rand_distr::{Distribution, Normal};

use super::noise::{add_gaussian, create_rng};
use crate::constants::NANOS_PER_SECOND;
use crate::pipeline::AccelSample;
use crate::signal_processing::KalmanParameters;

/// Sample path of the source model `x[k] = a·x[k-1] + u[k]`, `u ~ N(0, q)`
///
/// Starts from `x[-1] = 0`.
pub fn generate_ar1(n: usize, a: f64, q: f64, seed: Option<u64>) -> Vec<f64> {
    let mut rng = create_rng(seed);
    let Ok(normal) = Normal::new(0.0, q.sqrt()) else {
        log::warn!("Invalid process variance {}; returning a zero path", q);
        return vec![0.0; n];
    };
    let mut x = 0.0;
    (0..n)
        .map(|_| {
            x = a * x + normal.sample(&mut rng);
            x
        })
        .collect()
}

/// Observations `z[k] = h·x[k] + v[k]`, `v ~ N(0, r)`
pub fn observe(states: &[f64], h: f64, r: f64, seed: Option<u64>) -> Vec<f64> {
    let mut z: Vec<f64> = states.iter().map(|x| h * x).collect();
    add_gaussian(&mut z, r.sqrt(), &mut create_rng(seed));
    z
}

/// Hidden states and observations of the full scalar Kalman model
pub fn ar1_observations(n: usize, params: &KalmanParameters, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let states = generate_ar1(n, params.a, params.q, Some(seed));
    let z = observe(&states, params.h, params.r, Some(seed.wrapping_add(1)));
    (states, z)
}

/// `amplitude·sin(2π·freq·n)` with `freq` in cycles/sample
pub fn generate_sine(n: usize, freq: f64, amplitude: f64) -> Vec<f64> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64).sin())
        .collect()
}

/// Accelerometer recording: `rest` samples lying still, then `active`
/// samples with a sinusoidal push along x
///
/// z carries `gravity`; every axis gets Gaussian noise of `sigma`.
pub fn generate_accel_recording(
    rest: usize,
    active: usize,
    sample_interval_secs: f64,
    gravity: f64,
    sigma: f64,
    seed: u64,
) -> Vec<AccelSample> {
    let n = rest + active;
    let mut x = vec![0.0; n];
    for (i, v) in x.iter_mut().enumerate().skip(rest) {
        *v = (2.0 * PI * (i - rest) as f64 / active as f64).sin();
    }
    let mut y = vec![0.0; n];
    let mut z = vec![gravity; n];

    let mut rng = create_rng(Some(seed));
    add_gaussian(&mut x, sigma, &mut rng);
    add_gaussian(&mut y, sigma, &mut rng);
    add_gaussian(&mut z, sigma, &mut rng);

    let step_ns = (sample_interval_secs * NANOS_PER_SECOND) as i64;
    (0..n)
        .map(|i| AccelSample::new(x[i], y[i], z[i], i as i64 * step_ns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ar1_variance() {
        // Stationary variance q / (1 - a²)
        let path = generate_ar1(50_000, 0.5, 1.0, Some(1));
        let mean = path.iter().sum::<f64>() / path.len() as f64;
        let var = path.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / path.len() as f64;
        assert_abs_diff_eq!(var, 4.0 / 3.0, epsilon = 0.05);
    }

    #[test]
    fn test_observe_noiseless() {
        assert_eq!(observe(&[1.0, -2.0], 2.0, 0.0, Some(1)), vec![2.0, -4.0]);
    }

    #[test]
    fn test_sine_period() {
        let s = generate_sine(8, 0.25, 2.0);
        assert_abs_diff_eq!(s[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s[3], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accel_recording_layout() {
        let rec = generate_accel_recording(10, 20, 0.01, 9.78, 0.0, 5);
        assert_eq!(rec.len(), 30);
        assert_eq!(rec[3].x, 0.0);
        assert_eq!(rec[3].z, 9.78);
        assert_eq!(rec[2].timestamp_ns, 20_000_000);
        assert!(rec[15].x > 0.0);
    }
}
