pub mod calibration;
pub mod config;
pub mod ctrl_meas;
pub mod status;
