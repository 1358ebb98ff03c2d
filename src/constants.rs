//! Numeric constants shared by the random sources and estimators
//!
//! The congruential generator works modulo `2^31`; the logarithm constants
//! are kept at the precision the Gaussian transform was calibrated with.

/// Period bound of the congruential sequences. Draws lie in `[0, PDS_RAND_MAX)`.
pub const PDS_RAND_MAX: u64 = 2_147_483_648;

/// `2 * ln(PDS_RAND_MAX)`, the radius offset of the Gaussian transform.
pub const TWO_LN_PDS_RAND_MAX: f64 = 42.975125195;

/// Multiplier shared by every congruential generator.
/// `a - 1` is a multiple of 4, as required for a full period modulo `2^31`.
pub const CONGRUENTIAL_MULTIPLIER: u64 = 1_103_515_245;

/// Guard band used when mapping congruential draws onto `[A, B)`.
pub const UNIFORM_GUARD: u64 = 64;

/// Number of autocorrelation lags fitted by the Kalman parameter estimator.
pub const ESTIMATOR_LAG_DEPTH: usize = 5;

/// Fixed-point refinement passes applied to the transition estimate `A`.
pub const ESTIMATOR_ITERATIONS: usize = 10;

/// Standard gravity offset removed from the accelerometer z axis (m/s²).
pub const DEFAULT_GRAVITY_OFFSET: f64 = 9.78;

/// Nanoseconds per second, for sensor event timestamps.
pub const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
