use approx::assert_abs_diff_eq;

use sensorfilt::random::{GaussianRv, GeneratorFactory, RandomVariable, SeedSource, UniformRv};

fn moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

#[test]
fn test_fixed_seed_factories_repeat_streams() {
    let draw = || {
        let mut factory = GeneratorFactory::with_fixed_seed(2024);
        let mut g = GaussianRv::new(1.0, 2.0, &mut factory);
        let mut u = UniformRv::new(-1.0, 1.0, &mut factory);
        let mut buf = vec![0.0; 64];
        g.fill(&mut buf[..32]);
        u.fill(&mut buf[32..]);
        buf
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_generators_from_one_factory_differ() {
    let mut factory = GeneratorFactory::with_seed_source(SeedSource::Fixed(1));
    let mut a = UniformRv::new(0.0, 1.0, &mut factory);
    let mut b = UniformRv::new(0.0, 1.0, &mut factory);
    let xa: Vec<f64> = (0..16).map(|_| a.value()).collect();
    let xb: Vec<f64> = (0..16).map(|_| b.value()).collect();
    assert_ne!(xa, xb);
}

#[test]
fn test_uniform_and_gaussian_moments() {
    let mut factory = GeneratorFactory::with_fixed_seed(31337);

    let mut u = UniformRv::new(2.0, 6.0, &mut factory);
    let mut samples = vec![0.0; 50_000];
    u.fill(&mut samples);
    assert!(samples.iter().all(|&v| (2.0..6.0).contains(&v)));
    let (mean, var) = moments(&samples);
    assert_abs_diff_eq!(mean, 4.0, epsilon = 0.05);
    assert_abs_diff_eq!(var, 16.0 / 12.0, epsilon = 0.05);

    let mut g = GaussianRv::new(-3.0, 0.5, &mut factory);
    g.fill(&mut samples);
    let (mean, var) = moments(&samples);
    assert_abs_diff_eq!(mean, -3.0, epsilon = 0.02);
    assert_abs_diff_eq!(var, 0.25, epsilon = 0.02);
}
