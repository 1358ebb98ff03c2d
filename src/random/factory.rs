use chrono::Utc;

use super::RandomCore;
use crate::constants::PDS_RAND_MAX;

/// Prime bases of the increment enumeration. All are odd, so every
/// increment is coprime with `2^31`.
const INCREMENT_PRIMES: [u64; 6] = [3, 5, 7, 11, 13, 17];

/// Exponents of the first increment handed out (`c = 3`).
const INITIAL_EXPONENTS: [u32; 6] = [1, 0, 0, 0, 0, 0];

/// Where new generators take their initial state from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Wall-clock milliseconds at construction, modulo `PDS_RAND_MAX / 2`
    WallClock,
    /// The same fixed seed for every generator (reproducible runs)
    Fixed(u64),
}

/// Allocator for congruential generators
///
/// Every generator shares the multiplier `a`; what makes two generators
/// distinct is the increment `c`. The factory walks the products
/// `3^t3 · 5^t5 · 7^t7 · 11^t11 · 13^t13 · 17^t17` below `PDS_RAND_MAX`
/// like an odometer, handing out the next one on each allocation. After
/// 7829 allocations the walk is back at its first increment.
///
/// Filters and random variables take the factory by `&mut` so the
/// enumeration state stays explicit and can be reset between tests.
#[derive(Debug, Clone)]
pub struct GeneratorFactory {
    exponents: [u32; 6],
    seed: SeedSource,
    allocated: u64,
}

impl GeneratorFactory {
    /// Factory seeding generators from the wall clock
    pub fn new() -> Self {
        Self::with_seed_source(SeedSource::WallClock)
    }

    /// Factory seeding every generator with `seed` (reduced modulo `PDS_RAND_MAX`)
    pub fn with_fixed_seed(seed: u64) -> Self {
        Self::with_seed_source(SeedSource::Fixed(seed))
    }

    pub fn with_seed_source(seed: SeedSource) -> Self {
        Self {
            exponents: INITIAL_EXPONENTS,
            seed,
            allocated: 0,
        }
    }

    /// Build a new generator with the next increment and a fresh seed
    pub fn core(&mut self) -> RandomCore {
        let c = self.next_increment();
        let seed = self.next_seed();
        log::trace!("Allocated congruential generator c={} seed={}", c, seed);
        RandomCore::with_increment(c, seed)
    }

    /// Return the current increment and advance the enumeration
    pub fn next_increment(&mut self) -> u64 {
        let c = increment_for(&self.exponents);
        self.advance();
        self.allocated += 1;
        c
    }

    /// Increment the next allocation would receive
    pub fn peek_increment(&self) -> u64 {
        increment_for(&self.exponents)
    }

    /// Current exponents `(t3, t5, t7, t11, t13, t17)`
    pub fn exponents(&self) -> [u32; 6] {
        self.exponents
    }

    /// Total number of increments handed out since construction or reset
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    pub fn seed_source(&self) -> SeedSource {
        self.seed
    }

    /// Rewind the enumeration to its first increment
    pub fn reset(&mut self) {
        self.exponents = INITIAL_EXPONENTS;
        self.allocated = 0;
    }

    fn next_seed(&self) -> u64 {
        match self.seed {
            SeedSource::WallClock => {
                let millis = Utc::now().timestamp_millis();
                millis.rem_euclid((PDS_RAND_MAX / 2) as i64) as u64
            }
            SeedSource::Fixed(seed) => seed % PDS_RAND_MAX,
        }
    }

    fn advance(&mut self) {
        for k in 0..self.exponents.len() {
            let mut bumped = self.exponents;
            bumped[k] += 1;
            if increment_for(&bumped) < PDS_RAND_MAX {
                self.exponents = bumped;
                return;
            }
            self.exponents[k] = INITIAL_EXPONENTS[k];
        }
        self.exponents = INITIAL_EXPONENTS;
    }
}

impl Default for GeneratorFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn increment_for(exponents: &[u32; 6]) -> u64 {
    INCREMENT_PRIMES
        .iter()
        .zip(exponents)
        .fold(1u64, |acc, (&p, &e)| acc.saturating_mul(p.saturating_pow(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_increments_are_powers_of_three() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let first: Vec<u64> = (0..5).map(|_| factory.next_increment()).collect();
        assert_eq!(first, vec![3, 9, 27, 81, 243]);
    }

    #[test]
    fn test_rollover_to_next_prime() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        // 3^19 is the largest power of three below 2^31
        for _ in 0..19 {
            factory.next_increment();
        }
        assert_eq!(factory.exponents(), [1, 1, 0, 0, 0, 0]);
        assert_eq!(factory.next_increment(), 15);
    }

    #[test]
    fn test_cycle_length() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        let mut seen = HashSet::new();
        seen.insert(factory.next_increment());
        while factory.exponents() != INITIAL_EXPONENTS {
            let c = factory.next_increment();
            assert!(c < PDS_RAND_MAX);
            assert_eq!(c % 2, 1, "increment must be odd");
            seen.insert(c);
        }
        assert_eq!(factory.allocated(), 7829);
        assert_eq!(seen.len(), 7829);
        assert_eq!(factory.peek_increment(), 3);
    }

    #[test]
    fn test_reset() {
        let mut factory = GeneratorFactory::with_fixed_seed(0);
        factory.next_increment();
        factory.next_increment();
        factory.reset();
        assert_eq!(factory.allocated(), 0);
        assert_eq!(factory.peek_increment(), 3);
    }

    #[test]
    fn test_wall_clock_seed_in_half_range() {
        let mut factory = GeneratorFactory::new();
        let core = factory.core();
        assert!(core.state() < PDS_RAND_MAX / 2);
    }
}
