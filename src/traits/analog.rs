//! Capability boundary for the calibrated analog-to-digital front end.

/// A calibrated voltage source, one value per channel.
///
/// The implementation owns the conversion hardware and its calibration;
/// `average_voltage` is expected to average several raw conversions
/// internally before scaling to volts.
pub trait AnalogSource {
    type Error;

    /// Averaged raw conversion code for the channel.
    fn read_raw(&mut self, channel: u8) -> Result<u16, Self::Error>;

    /// Averaged, calibration-corrected voltage for the channel, in volts.
    fn average_voltage(&mut self, channel: u8) -> Result<f32, Self::Error>;
}
