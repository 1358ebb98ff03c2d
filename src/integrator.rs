use crate::constants::NANOS_PER_SECOND;

/// Integrates acceleration into velocity and position
///
/// Velocity uses the real spacing of the sensor timestamps; the first
/// sample only establishes the time base. Position is advanced by a
/// fixed step per sample.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    last_timestamp_ns: Option<i64>,
    velocity: f64,
    position: f64,
    position_step_secs: f64,
}

impl MotionIntegrator {
    pub fn new(position_step_secs: f64) -> Self {
        Self {
            last_timestamp_ns: None,
            velocity: 0.0,
            position: 0.0,
            position_step_secs,
        }
    }

    /// Add one acceleration sample taken at `timestamp_ns`
    ///
    /// Returns the updated `(velocity, position)`.
    pub fn update(&mut self, accel: f64, timestamp_ns: i64) -> (f64, f64) {
        let dt = match self.last_timestamp_ns {
            Some(last) => (timestamp_ns - last) as f64 / NANOS_PER_SECOND,
            None => 0.0,
        };
        self.last_timestamp_ns = Some(timestamp_ns);

        self.velocity += accel * dt;
        self.position += self.velocity * self.position_step_secs;
        (self.velocity, self.position)
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn reset(&mut self) {
        self.last_timestamp_ns = None;
        self.velocity = 0.0;
        self.position = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_sample_sets_time_base() {
        let mut integ = MotionIntegrator::new(0.1);
        assert_eq!(integ.update(5.0, 1_000), (0.0, 0.0));
    }

    #[test]
    fn test_constant_acceleration() {
        let mut integ = MotionIntegrator::new(0.1);
        integ.update(2.0, 0);
        integ.update(2.0, 500_000_000);
        let (v, p) = integ.update(2.0, 1_000_000_000);
        assert_abs_diff_eq!(v, 2.0);
        // 0.1 * (1.0 + 2.0)
        assert_abs_diff_eq!(p, 0.3);
    }

    #[test]
    fn test_reset() {
        let mut integ = MotionIntegrator::new(1.0);
        integ.update(1.0, 0);
        integ.update(1.0, 1_000_000_000);
        integ.reset();
        assert_eq!(integ.velocity(), 0.0);
        assert_eq!(integ.update(1.0, 5_000_000_000), (0.0, 0.0));
    }
}
