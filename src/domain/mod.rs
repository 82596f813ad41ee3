pub mod temperature;

use core::fmt::{Debug, Formatter};
use temperature::*;

/// A humidity/temperature acquisition from the single-wire sensor.
#[derive(Copy, Clone)]
pub struct SensorAcquisition<S: TemperatureScale> {
    pub temperature: Temperature<S>,
    pub relative_humidity: f32,
}

impl<S: TemperatureScale> Debug for SensorAcquisition<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorAcquisition")
            .field("temperature", &self.temperature)
            .field("relative_humidity", &self.relative_humidity)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<S: TemperatureScale> defmt::Format for SensorAcquisition<S> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "SensorAcquisition(temperature: {}, relative_humidity: {})",
            &self.temperature,
            &self.relative_humidity
        );
    }
}

/// A compensated temperature/pressure acquisition from the barometric sensor.
#[derive(Copy, Clone)]
pub struct BaroAcquisition<S: TemperatureScale> {
    pub temperature: Temperature<S>,
    /// Barometric pressure in Pascals.
    pub pressure: f32,
}

impl<S: TemperatureScale> Debug for BaroAcquisition<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BaroAcquisition")
            .field("temperature", &self.temperature)
            .field("pressure", &self.pressure)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<S: TemperatureScale> defmt::Format for BaroAcquisition<S> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "BaroAcquisition(temperature: {}, pressure: {} Pa)",
            &self.temperature,
            &self.pressure
        );
    }
}

/// A full gas-sensor acquisition: the raw conversion, the derived
/// resistance ratio and the per-gas concentration estimates.
///
/// Recomputed wholesale on every sampling cycle; no history is kept.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AirQuality {
    /// Unprocessed code from the analog-to-digital conversion.
    pub raw: u16,
    /// Averaged, calibrated voltage at the sense resistor, in volts.
    pub voltage: f32,
    /// Sensor resistance over the clean-air baseline resistance.
    pub ratio: f32,
    /// Carbon dioxide estimate, parts per million.
    pub co2_ppm: f32,
    /// LPG-family hydrocarbons estimate, parts per million.
    pub lpg_ppm: f32,
    /// Carbon monoxide estimate, parts per million.
    pub co_ppm: f32,
    /// Ammonia estimate, parts per million.
    pub nh3_ppm: f32,
}
