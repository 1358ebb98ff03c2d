pub mod filter;
pub mod fir;
pub mod fir_design;
pub mod kalman;
pub mod kalman_estimator;
pub mod nlms;
pub mod ring_buffer;
pub mod wave;

pub use filter::Filter;
pub use fir::FirFilter;
pub use fir_design::design_lowpass;
pub use kalman::{KalmanFilter1D, KalmanParameters};
pub use kalman_estimator::KalmanParameterEstimator;
pub use nlms::{Adaptation, NlmsFilter, NlmsOutput};
pub use ring_buffer::RingBuffer;
pub use wave::WaveTable;
