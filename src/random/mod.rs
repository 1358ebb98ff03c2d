//! Pseudo-random sources built on a mixed congruential generator
//!
//! [`RandomCore`] produces the integer stream, [`UniformRv`] maps it onto a
//! real interval and [`GaussianRv`] combines both into approximately
//! normal draws. Increments are handed out by a [`GeneratorFactory`].

mod congruential;
mod factory;
mod gaussian;
mod uniform;

pub use congruential::RandomCore;
pub use factory::{GeneratorFactory, SeedSource};
pub use gaussian::GaussianRv;
pub use uniform::UniformRv;

/// Common trait for real-valued random sources
pub trait RandomVariable {
    /// Draw the next value
    fn value(&mut self) -> f64;

    /// Fill a buffer with consecutive draws
    fn fill(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.value();
        }
    }
}
