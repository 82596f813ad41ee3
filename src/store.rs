//! Concurrency-safe store for the latest validated observations.
//!
//! One blocking mutex guards the whole record. Every setter overwrites
//! exactly its own field group under the lock and every getter copies a
//! whole group out under the lock, so a reader's snapshot of a group
//! always comes from a single completed writer call — never a mix of
//! two. Writers from different producers serialize against each other
//! even though they touch disjoint fields; at one write every couple of
//! seconds per producer that coarse lock costs nothing.
//!
//! The store is constructed explicitly and passed by shared reference
//! (or placed in a `static` — `new` is const), so tests can instantiate
//! independent stores.

use core::cell::RefCell;
use core::fmt::{Display, Formatter};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use serde::Serialize;

use crate::domain::temperature::Celsius;
use crate::domain::{AirQuality, SensorAcquisition};

/// Latest readings from the producers. A `None` group means "no
/// successful read yet"; a transient producer failure never clears a
/// previously published group (last known good wins).
struct StationRecord {
    climate: Option<SensorAcquisition<Celsius>>,
    air_quality: Option<AirQuality>,
}

/// Shared observation store decoupling sensor tasks from display and
/// network consumers.
pub struct StationStore<M: RawMutex> {
    record: Mutex<M, RefCell<StationRecord>>,
}

impl<M: RawMutex> StationStore<M> {
    pub const fn new() -> Self {
        Self {
            record: Mutex::new(RefCell::new(StationRecord {
                climate: None,
                air_quality: None,
            })),
        }
    }

    /// Publish a complete humidity/temperature acquisition.
    pub fn set_climate(&self, reading: SensorAcquisition<Celsius>) {
        self.record
            .lock(|record| record.borrow_mut().climate = Some(reading));
    }

    /// Latest humidity/temperature acquisition, if one ever succeeded.
    pub fn climate(&self) -> Option<SensorAcquisition<Celsius>> {
        self.record.lock(|record| record.borrow().climate)
    }

    /// Publish a complete gas-sensor acquisition.
    pub fn set_air_quality(&self, reading: AirQuality) {
        self.record
            .lock(|record| record.borrow_mut().air_quality = Some(reading));
    }

    /// Latest gas-sensor acquisition, if one ever succeeded.
    pub fn air_quality(&self) -> Option<AirQuality> {
        self.record.lock(|record| record.borrow().air_quality)
    }

    /// One coherent copy of everything, for the display and network
    /// consumers at the station boundary.
    pub fn snapshot(&self) -> StationSnapshot {
        self.record.lock(|record| {
            let record = record.borrow();
            StationSnapshot::from_parts(record.climate, record.air_quality)
        })
    }
}

impl<M: RawMutex> Default for StationStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-value rendering of the latest observations for consumers
/// outside this core. Numeric fields of a group are only meaningful when
/// the group's validity indicator is set.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationSnapshot {
    pub temperature: f32,
    pub humidity: f32,
    pub climate_valid: bool,
    pub co2_ppm: f32,
    pub lpg_ppm: f32,
    pub co_ppm: f32,
    pub nh3_ppm: f32,
    pub air_quality_valid: bool,
}

impl StationSnapshot {
    fn from_parts(
        climate: Option<SensorAcquisition<Celsius>>,
        air_quality: Option<AirQuality>,
    ) -> Self {
        let mut snapshot = StationSnapshot {
            temperature: 0.0,
            humidity: 0.0,
            climate_valid: false,
            co2_ppm: 0.0,
            lpg_ppm: 0.0,
            co_ppm: 0.0,
            nh3_ppm: 0.0,
            air_quality_valid: false,
        };
        if let Some(climate) = climate {
            snapshot.temperature = climate.temperature.raw_value();
            snapshot.humidity = climate.relative_humidity;
            snapshot.climate_valid = true;
        }
        if let Some(air) = air_quality {
            snapshot.co2_ppm = air.co2_ppm;
            snapshot.lpg_ppm = air.lpg_ppm;
            snapshot.co_ppm = air.co_ppm;
            snapshot.nh3_ppm = air.nh3_ppm;
            snapshot.air_quality_valid = true;
        }
        snapshot
    }
}

impl Display for StationSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.climate_valid {
            write!(f, "{:.1}°C {:.1}%", self.temperature, self.humidity)?;
        } else {
            write!(f, "--.-°C --.-%")?;
        }
        if self.air_quality_valid {
            write!(
                f,
                " CO2 {:.0}ppm LPG {:.0}ppm CO {:.0}ppm NH3 {:.0}ppm",
                self.co2_ppm, self.lpg_ppm, self.co_ppm, self.nh3_ppm
            )
        } else {
            write!(f, " air quality pending")
        }
    }
}
