use approx::assert_abs_diff_eq;

use sensorfilt::signal_processing::{Filter, FirFilter, NlmsFilter, design_lowpass};
use sensorfilt::simulation::{NoiseConfig, apply_noise, generate_sine, signal_power};

fn rms_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>() / a.len() as f64).sqrt()
}

#[test]
fn test_lowpass_removes_high_frequency_tone() {
    let n = 4000;
    let slow = generate_sine(n, 0.01, 1.0);
    let fast = generate_sine(n, 0.3, 0.5);
    let mut mixed: Vec<f64> = slow.iter().zip(&fast).map(|(a, b)| a + b).collect();

    let mut fir = design_lowpass(60, 0.05, 0.05).unwrap();
    fir.process_buffer(&mut mixed);

    // Compare against the slow tone delayed by the group delay
    let delay = fir.group_delay_samples() as usize;
    let settled = &mixed[200..];
    let reference = &slow[200 - delay..n - delay];
    assert!(rms_error(settled, reference) < 0.05);
}

#[test]
fn test_moving_average_reduces_noise_power() {
    let noise = NoiseConfig::default().with_seed(9).with_gaussian(1.0);
    let noisy = apply_noise(&vec![0.0; 5000], &noise);
    let mut smoothed = noisy.clone();
    FirFilter::moving_average(15).process_buffer(&mut smoothed);

    let ratio = signal_power(&smoothed[16..]) / signal_power(&noisy[16..]);
    assert_abs_diff_eq!(ratio, 1.0 / 16.0, epsilon = 0.02);
}

#[test]
fn test_nlms_identifies_fir_system() {
    let unknown = [0.6, 0.3, 0.1];
    let mut plant = FirFilter::with_coefficients(&unknown);
    // Positive excitation keeps the input-sum normalizer away from zero
    let excitation: Vec<f64> = apply_noise(
        &vec![2.0; 6000],
        &NoiseConfig::default().with_seed(21).with_gaussian(0.5),
    );

    let mut nlms = NlmsFilter::new(0.1, 2);
    let mut late_error = 0.0;
    for (i, &x) in excitation.iter().enumerate() {
        let d = plant.evaluate(x);
        let out = nlms.evaluate(d, x);
        if i >= 5000 {
            late_error += out.e.abs();
        }
    }

    assert!(late_error / 1000.0 < 1e-3);
    for (&w, &h) in nlms.coefficients().iter().zip(&unknown) {
        assert_abs_diff_eq!(w, h, epsilon = 1e-3);
    }
}

#[test]
fn test_reset_restarts_filters() {
    let mut fir = FirFilter::moving_average(3);
    let first: Vec<f64> = (0..4).map(|_| fir.process(1.0)).collect();
    Filter::reset(&mut fir);
    let again: Vec<f64> = (0..4).map(|_| fir.process(1.0)).collect();
    assert_eq!(first, again);
}
