use crate::constants::{CONGRUENTIAL_MULTIPLIER, PDS_RAND_MAX};

use super::GeneratorFactory;

/// Mixed congruential generator `x[n+1] = (a * x[n] + c) mod 2^31`
///
/// Produces integers uniformly spread over `[0, PDS_RAND_MAX)`; the value
/// `PDS_RAND_MAX` itself is never reached. All generators share `a`, and
/// the increment `c` is handed out by a [`GeneratorFactory`].
#[derive(Debug, Clone)]
pub struct RandomCore {
    x0: u64,
    xn: u64,
    a: u64,
    c: u64,
}

impl RandomCore {
    /// Allocate a generator from `factory`
    pub fn new(factory: &mut GeneratorFactory) -> Self {
        factory.core()
    }

    /// Build a generator with an explicit increment and seed
    ///
    /// `c` should be odd so the sequence reaches its full period.
    pub fn with_increment(c: u64, seed: u64) -> Self {
        let xn = seed % PDS_RAND_MAX;
        Self {
            x0: xn,
            xn,
            a: CONGRUENTIAL_MULTIPLIER,
            c: c % PDS_RAND_MAX,
        }
    }

    /// Reseed the sequence. Seeds outside `[0, PDS_RAND_MAX)` wrap.
    pub fn init(&mut self, x0: u64) {
        self.xn = x0 % PDS_RAND_MAX;
        self.x0 = self.xn;
    }

    /// Advance the sequence and return the state before the step
    pub fn value(&mut self) -> u64 {
        self.x0 = self.xn;
        // a < 2^31 and x0 < 2^31, so the product fits in 62 bits
        self.xn = (self.a * self.x0 + self.c) % PDS_RAND_MAX;
        self.x0
    }

    /// The value the next call to [`value`](Self::value) will return
    pub fn state(&self) -> u64 {
        self.xn
    }

    /// The most recently returned value
    pub fn last_value(&self) -> u64 {
        self.x0
    }

    pub fn multiplier(&self) -> u64 {
        self.a
    }

    pub fn increment(&self) -> u64 {
        self.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_pre_advance_state() {
        let mut core = RandomCore::with_increment(3, 5);
        assert_eq!(core.value(), 5);
        let expected = (CONGRUENTIAL_MULTIPLIER * 5 + 3) % PDS_RAND_MAX;
        assert_eq!(core.value(), expected);
        assert_eq!(core.last_value(), expected);
    }

    #[test]
    fn test_init_wraps_seed() {
        let mut core = RandomCore::with_increment(3, 0);
        core.init(PDS_RAND_MAX + 7);
        assert_eq!(core.value(), 7);
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut core = RandomCore::with_increment(9, PDS_RAND_MAX - 1);
        for _ in 0..10_000 {
            assert!(core.value() < PDS_RAND_MAX);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut a = factory.core();
        let mut b = RandomCore::with_increment(a.increment(), 0);
        a.init(123_456);
        b.init(123_456);
        for _ in 0..1000 {
            assert_eq!(a.value(), b.value());
        }
    }

    #[test]
    fn test_distinct_increments_diverge() {
        let mut factory = GeneratorFactory::with_fixed_seed(42);
        let mut a = RandomCore::new(&mut factory);
        let mut b = RandomCore::new(&mut factory);
        assert_ne!(a.increment(), b.increment());
        assert_eq!(a.value(), b.value());
        assert_ne!(a.value(), b.value());
    }
}
