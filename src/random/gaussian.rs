use std::f64::consts::PI;

use crate::constants::{PDS_RAND_MAX, TWO_LN_PDS_RAND_MAX};

use super::{GeneratorFactory, RandomCore, RandomVariable, UniformRv};

/// Approximately normal random variable with mean `U` and std-dev `Sigma`
///
/// Box-Muller style transform of one congruential draw `x1` and one
/// uniform draw `x2`:
///
/// `X = Sigma * sqrt(2 ln N - 2 ln(N - x1)) * cos(2π x2) + U`, `N = 2^31`
///
/// Since `x1 < N`, the logarithm argument is at least 1 and the radius is
/// always finite.
#[derive(Debug, Clone)]
pub struct GaussianRv {
    core: RandomCore,
    uniform: UniformRv,
    mean: f64,
    sigma: f64,
    x: f64,
}

impl GaussianRv {
    pub fn new(mean: f64, sigma: f64, factory: &mut GeneratorFactory) -> Self {
        let core = factory.core();
        let uniform = UniformRv::new(0.0, 1.0, factory);
        Self {
            core,
            uniform,
            mean,
            sigma,
            x: 0.0,
        }
    }

    /// Reseed both internal generators so the next draw lands near `x0`
    ///
    /// The congruential state is back-solved from the radius term and the
    /// uniform phase is parked at 0.5, so this is an approximate inversion:
    /// the next draw has magnitude `|x0 - U|` on the negative side of `U`.
    /// A zero `Sigma` parks the congruential state at its maximum.
    pub fn init(&mut self, x0: f64) {
        let n = PDS_RAND_MAX as f64;
        let x1 = if self.sigma != 0.0 {
            let z = (x0 - self.mean) / self.sigma;
            (n - n * (-0.5 * z * z).exp()) as u64
        } else {
            PDS_RAND_MAX
        };
        let x1 = x1.min(PDS_RAND_MAX - 1);

        self.core.init(x1);
        self.uniform.init(0.5);
        self.x = x0;
    }

    pub fn value(&mut self) -> f64 {
        let x1 = self.core.value();
        let x2 = self.uniform.value();
        let n = PDS_RAND_MAX as f64;

        let radius = (TWO_LN_PDS_RAND_MAX - 2.0 * (n - x1 as f64).ln()).sqrt();
        self.x = self.sigma * radius * (2.0 * PI * x2).cos() + self.mean;
        self.x
    }

    pub fn last_value(&self) -> f64 {
        self.x
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl RandomVariable for GaussianRv {
    fn value(&mut self) -> f64 {
        GaussianRv::value(self)
    }
}
