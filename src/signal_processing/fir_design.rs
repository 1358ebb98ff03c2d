use pm_remez::{BandSetting, constant, pm_parameters, pm_remez};

use super::FirFilter;
use crate::error::{DspError, Result};

/// Design an equiripple lowpass [`FirFilter`] of order `order`
///
/// Frequencies are normalized to the sample rate (Nyquist is 0.5). The
/// pass band is `[0, cutoff]` and the stop band `[cutoff + transition, 0.5]`.
///
/// # Errors
/// Returns `DspError::FilterDesign` when the bands do not fit below Nyquist
/// or the Remez exchange fails to converge
pub fn design_lowpass(order: usize, cutoff: f64, transition: f64) -> Result<FirFilter> {
    let stop_start = cutoff + transition;
    if order == 0 || cutoff <= 0.0 || transition <= 0.0 || stop_start >= 0.5 {
        return Err(DspError::FilterDesign(format!(
            "Invalid lowpass: order={}, cutoff={}, transition={}",
            order, cutoff, transition
        )));
    }

    let bands = [
        BandSetting::new(0.0, cutoff, constant(1.0))
            .map_err(|e| DspError::FilterDesign(format!("Passband: {:?}", e)))?,
        BandSetting::new(stop_start, 0.5, constant(0.0))
            .map_err(|e| DspError::FilterDesign(format!("Stopband: {:?}", e)))?,
    ];

    let params = pm_parameters(order + 1, &bands)
        .map_err(|e| DspError::FilterDesign(format!("PM parameters: {:?}", e)))?;
    let design =
        pm_remez(&params).map_err(|e| DspError::FilterDesign(format!("PM Remez: {:?}", e)))?;

    log::debug!(
        "Designed order {} lowpass (cutoff {}, transition {})",
        order,
        cutoff,
        transition
    );
    Ok(FirFilter::with_coefficients(&design.impulse_response))
}
