pub mod calibration;
pub mod classifier;

pub use calibration::CalibrationSession;
pub use classifier::{DirectionalIntent, TiltSample, TiltState};
