use std::f64::consts::PI;
use std::fmt;
use std::num::NonZeroUsize;

use num_complex::Complex;

use super::{Filter, RingBuffer};

/// FIR filter of order `M`
///
/// `y[n] = H[0]·x[n] + H[1]·x[n-1] + ... + H[M]·x[n-M]`
///
/// The delay line is a [`RingBuffer`] of capacity `M + 1`. A fresh filter
/// has `H[0] = 1` and every other tap at 0, so it passes its input through
/// unchanged until coefficients are set.
#[derive(Debug, Clone)]
pub struct FirFilter {
    taps: Vec<f64>,
    delay_line: RingBuffer,
}

impl FirFilter {
    /// Create a pass-through filter of order `order`
    pub fn new(order: usize) -> Self {
        let mut taps = vec![0.0; order + 1];
        taps[0] = 1.0;
        Self::from_taps(taps)
    }

    /// Create a filter from explicit taps; the order is `taps.len() - 1`
    ///
    /// An empty slice yields the order-0 pass-through filter.
    pub fn with_coefficients(taps: &[f64]) -> Self {
        if taps.is_empty() {
            return Self::new(0);
        }
        Self::from_taps(taps.to_vec())
    }

    /// Averaging lowpass with every tap at `1 / (M + 1)`
    pub fn moving_average(order: usize) -> Self {
        Self::from_taps(vec![1.0 / (order + 1) as f64; order + 1])
    }

    fn from_taps(taps: Vec<f64>) -> Self {
        let capacity = NonZeroUsize::MIN.saturating_add(taps.len() - 1);
        Self {
            delay_line: RingBuffer::with_capacity(capacity),
            taps,
        }
    }

    /// Set `H[n] = h`. Indices beyond the order are ignored.
    pub fn set_coefficient(&mut self, h: f64, n: usize) {
        if let Some(tap) = self.taps.get_mut(n) {
            *tap = h;
        }
    }

    /// Push `x` into the delay line and return the weighted sum
    pub fn evaluate(&mut self, x: f64) -> f64 {
        self.delay_line.push(x);
        self.taps
            .iter()
            .enumerate()
            .map(|(i, h)| h * self.delay_line.read(i))
            .sum()
    }

    /// Filter order `M` (the filter has `M + 1` taps)
    pub fn order(&self) -> usize {
        self.taps.len() - 1
    }

    /// `H[n]`, or 0 beyond the order
    pub fn coefficient(&self, n: usize) -> f64 {
        self.taps.get(n).copied().unwrap_or(0.0)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.taps
    }

    /// `x[n - index]` as currently held by the delay line
    pub fn delayed_input(&self, index: usize) -> f64 {
        self.delay_line.read(index)
    }

    /// Sum of the held inputs across all taps
    pub fn input_sum(&self) -> f64 {
        (0..self.taps.len()).map(|i| self.delay_line.read(i)).sum()
    }

    /// Clear the delay line, keeping the coefficients
    pub fn reset(&mut self) {
        self.delay_line.clear();
    }

    /// Frequency response at `freq` cycles/sample (0 to 0.5 is the useful range)
    pub fn frequency_response(&self, freq: f64) -> Complex<f64> {
        self.taps
            .iter()
            .enumerate()
            .map(|(n, &h)| Complex::from_polar(h, -2.0 * PI * freq * n as f64))
            .sum()
    }

    /// Magnitude response in dB at `freq` cycles/sample
    pub fn magnitude_db(&self, freq: f64) -> f64 {
        20.0 * self.frequency_response(freq).norm().log10()
    }

    /// Group delay in samples for a symmetric (linear phase) design
    pub fn group_delay_samples(&self) -> f64 {
        self.order() as f64 / 2.0
    }
}

impl Filter for FirFilter {
    fn process(&mut self, sample: f64) -> f64 {
        self.evaluate(sample)
    }

    fn reset(&mut self) {
        FirFilter::reset(self);
    }
}

impl fmt::Display for FirFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "M={}", self.order())?;
        for (i, h) in self.taps.iter().enumerate() {
            write!(f, "H({})={} ", i, h)?;
        }
        writeln!(f)?;
        for i in 0..self.taps.len() {
            write!(f, "X({})={} ", i, self.delay_line.read(i))?;
        }
        writeln!(f)
    }
}
