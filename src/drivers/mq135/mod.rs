//! Concentration estimator for the MQ135 analog gas sensor.
//!
//! The sensor is a resistive element in a voltage divider against a
//! fixed load resistor. Each sampling cycle converts the measured
//! voltage into a sensor resistance, normalizes it against the clean-air
//! baseline resistance and maps the resulting ratio through per-gas
//! power-law curve fits.

use crate::domain::AirQuality;
use crate::traits::AnalogSource;
use libm::powf;

/// Device supply rail, volts.
const SUPPLY_VOLTS: f32 = 3.3;

/// Fixed load resistor in the divider, kilo-ohms.
const LOAD_RESISTANCE: f32 = 200.0;

/// Clean-air baseline resistance Ro, kilo-ohms. Device specific; not
/// recalibrated at runtime.
const BASELINE_RESISTANCE: f32 = 146.4;

/// Target gases with calibrated concentration curves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gas {
    CarbonDioxide,
    Lpg,
    CarbonMonoxide,
    Ammonia,
}

/// Curve-fit constants for `ppm = (ratio / b)^(1/a)`.
///
/// The constants are tied to this parameterization; they are not
/// interchangeable with tables fitted for `a * ratio^b`.
struct Curve {
    a: f32,
    b: f32,
}

impl Gas {
    fn curve(self) -> Curve {
        match self {
            Gas::CarbonDioxide => Curve {
                a: -0.352519,
                b: 5.17901,
            },
            Gas::Lpg => Curve {
                a: -0.30219,
                b: 3.00802,
            },
            Gas::CarbonMonoxide => Curve {
                a: -0.229115,
                b: 4.98267,
            },
            Gas::Ammonia => Curve {
                a: -0.41162,
                b: 6.6564,
            },
        }
    }
}

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mq135Error<E> {
    /// The analog source failed to produce a reading.
    Analog(E),
    /// The measured voltage sits at or beyond a supply rail, so no
    /// meaningful resistance can be derived from the divider.
    InvalidSample,
}

impl<E> From<E> for Mq135Error<E> {
    fn from(e: E) -> Mq135Error<E> {
        Mq135Error::Analog(e)
    }
}

/// Gas estimator bound to one analog channel.
pub struct Mq135<A: AnalogSource> {
    source: A,
    channel: u8,
}

impl<A: AnalogSource> Mq135<A> {
    pub fn new(source: A, channel: u8) -> Self {
        Self { source, channel }
    }

    /// Take one full sample: raw code, voltage, resistance ratio and the
    /// concentration estimate for every tracked gas.
    pub fn sample(&mut self) -> Result<AirQuality, Mq135Error<A::Error>> {
        let raw = self.source.read_raw(self.channel)?;
        let voltage = self.source.average_voltage(self.channel)?;
        let ratio = resistance_ratio(voltage).ok_or(Mq135Error::InvalidSample)?;

        Ok(AirQuality {
            raw,
            voltage,
            ratio,
            co2_ppm: concentration(ratio, Gas::CarbonDioxide),
            lpg_ppm: concentration(ratio, Gas::Lpg),
            co_ppm: concentration(ratio, Gas::CarbonMonoxide),
            nh3_ppm: concentration(ratio, Gas::Ammonia),
        })
    }

    /// Release the analog source.
    pub fn free(self) -> A {
        self.source
    }
}

/// Sensor resistance over the clean-air baseline, from the divider
/// equation `Rs = ((Vcc - Vout) / Vout) * Rl`. Voltages at or beyond
/// either rail have no valid solution and yield `None`.
pub fn resistance_ratio(voltage: f32) -> Option<f32> {
    if voltage <= 0.0 || voltage >= SUPPLY_VOLTS {
        return None;
    }
    let rs = ((SUPPLY_VOLTS - voltage) / voltage) * LOAD_RESISTANCE;
    Some(rs / BASELINE_RESISTANCE)
}

/// Concentration estimate in parts per million for one gas at the given
/// resistance ratio.
pub fn concentration(ratio: f32, gas: Gas) -> f32 {
    let Curve { a, b } = gas.curve();
    powf(ratio / b, 1.0 / a)
}
