use super::FirFilter;

/// One NLMS evaluation result
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NlmsOutput {
    /// Filter output `Y`
    pub y: f64,
    /// Error `E = D - Y`
    pub e: f64,
}

/// Whether the NLMS filter keeps adapting its taps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adaptation {
    Enabled,
    Disabled,
}

/// Normalized least-mean-squares adaptive FIR filter
///
/// Wraps a [`FirFilter`] of order `M` whose taps start at `1 / (M + 1)`.
/// After every evaluation (while enabled) each tap moves by
///
/// `H[i] += mhu · E · x[n-i] / (lambda + Σ x[n-k])`
///
/// The normalizer is the plain sum of the held inputs, not their energy.
/// `lambda` defaults to 0, so an all-zero delay line divides by zero and
/// the taps turn NaN; set a small positive `lambda` when the input can be
/// silent.
#[derive(Debug, Clone)]
pub struct NlmsFilter {
    fir: FirFilter,
    mhu: f64,
    lambda: f64,
    adaptation: Adaptation,
}

impl NlmsFilter {
    /// Create an adaptive filter of order `order` with step size `mhu`
    pub fn new(mhu: f64, order: usize) -> Self {
        Self {
            fir: FirFilter::moving_average(order),
            mhu,
            lambda: 0.0,
            adaptation: Adaptation::Enabled,
        }
    }

    /// Filter input `x` against the desired response `d`
    pub fn evaluate(&mut self, d: f64, x: f64) -> NlmsOutput {
        let y = self.fir.evaluate(x);
        let e = d - y;

        if self.adaptation == Adaptation::Enabled {
            let normalizer = self.lambda + self.fir.input_sum();
            if normalizer == 0.0 {
                log::warn!("NLMS normalizer is zero, taps will not be finite");
            }
            for i in 0..=self.fir.order() {
                let h = self.fir.coefficient(i)
                    + self.mhu * e * self.fir.delayed_input(i) / normalizer;
                self.fir.set_coefficient(h, i);
            }
        }

        NlmsOutput { y, e }
    }

    /// Resume adapting the taps
    pub fn enable(&mut self) {
        self.adaptation = Adaptation::Enabled;
    }

    /// Freeze the taps at their current values
    pub fn disable(&mut self) {
        self.adaptation = Adaptation::Disabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.adaptation == Adaptation::Enabled
    }

    pub fn adaptation(&self) -> Adaptation {
        self.adaptation
    }

    pub fn set_mhu(&mut self, mhu: f64) {
        self.mhu = mhu;
    }

    /// Stabilizer added to the normalizer; keep it much smaller than 1
    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    pub fn mhu(&self) -> f64 {
        self.mhu
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn order(&self) -> usize {
        self.fir.order()
    }

    pub fn coefficients(&self) -> &[f64] {
        self.fir.coefficients()
    }

    pub fn fir(&self) -> &FirFilter {
        &self.fir
    }
}
