/// Common trait for single-input sample filters
///
/// Implemented by FirFilter and KalmanFilter1D.
pub trait Filter {
    /// Process a single sample through the filter
    fn process(&mut self, sample: f64) -> f64;

    /// Process a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Return the filter to its freshly constructed state
    fn reset(&mut self);
}
