use crate::constants::{PDS_RAND_MAX, UNIFORM_GUARD};

use super::{GeneratorFactory, RandomCore, RandomVariable};

/// Uniform random variable on `[A, B)`
///
/// Draws from an owned [`RandomCore`] and scales linearly into the range.
/// When `A == B` no generator is allocated and every draw returns `A`.
#[derive(Debug, Clone)]
pub struct UniformRv {
    core: Option<RandomCore>,
    a: f64,
    b: f64,
    x: f64,
}

impl UniformRv {
    pub fn new(a: f64, b: f64, factory: &mut GeneratorFactory) -> Self {
        let core = if a != b { Some(factory.core()) } else { None };
        Self { core, a, b, x: 0.0 }
    }

    /// Position the sequence so it starts from `x0`
    ///
    /// Values outside `[A, B)` are replaced by `A`.
    pub fn init(&mut self, x0: f64) {
        let x0 = if x0 < self.a || x0 >= self.b {
            self.a
        } else {
            x0
        };
        let seed = if self.b != self.a {
            (((x0 - self.a) / (self.b - self.a)) * (PDS_RAND_MAX - UNIFORM_GUARD) as f64) as u64
        } else {
            0
        };
        if let Some(core) = self.core.as_mut() {
            core.init(seed);
        }
        self.x = x0;
    }

    pub fn value(&mut self) -> f64 {
        let x1 = self.core.as_mut().map_or(0, RandomCore::value);
        self.x = (x1 as f64 / (PDS_RAND_MAX + UNIFORM_GUARD) as f64) * (self.b - self.a) + self.a;
        self.x
    }

    pub fn last_value(&self) -> f64 {
        self.x
    }

    /// `(A, B)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Whether the degenerate `A == B` form is in use
    pub fn is_degenerate(&self) -> bool {
        self.core.is_none()
    }
}

impl RandomVariable for UniformRv {
    fn value(&mut self) -> f64 {
        UniformRv::value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_mean() {
        let mut factory = GeneratorFactory::with_fixed_seed(12_345);
        let mut rv = UniformRv::new(2.0, 5.0, &mut factory);

        let mut sum = 0.0;
        for _ in 0..10_000 {
            let v = rv.value();
            assert!((2.0..5.0).contains(&v), "draw {} out of range", v);
            sum += v;
        }
        let mean = sum / 10_000.0;
        assert!((mean - 3.5).abs() < 0.05, "mean {} too far from 3.5", mean);
    }

    #[test]
    fn test_degenerate_range() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut rv = UniformRv::new(1.5, 1.5, &mut factory);
        assert!(rv.is_degenerate());
        assert_eq!(factory.allocated(), 0);
        for _ in 0..10 {
            assert_eq!(rv.value(), 1.5);
        }
    }

    #[test]
    fn test_init_resumes_near_x0() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut rv = UniformRv::new(0.0, 1.0, &mut factory);
        rv.init(0.25);
        assert_eq!(rv.last_value(), 0.25);
        assert!((rv.value() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_init_out_of_range_falls_back_to_a() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut rv = UniformRv::new(-1.0, 1.0, &mut factory);
        rv.init(3.0);
        assert_eq!(rv.last_value(), -1.0);
        assert_eq!(rv.value(), -1.0);
    }
}
