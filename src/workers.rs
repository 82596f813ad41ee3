//! Periodic producer loops.
//!
//! Each producer owns its sensor, runs forever on its own task or
//! thread, and performs one blocking acquisition per cycle followed by a
//! lock-guarded publish. A failed cycle publishes nothing — the store
//! keeps the last known good reading — and the next cycle is the only
//! retry there is. Producers never wait on each other.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::drivers::dht22::Dht22;
use crate::drivers::mq135::Mq135;
use crate::store::StationStore;
use crate::traits::{AnalogSource, SingleWire};

/// Cadence of the humidity/temperature producer.
const CLIMATE_INTERVAL_MS: u32 = 2_500;

/// Cadence of the gas producer.
const AIR_QUALITY_INTERVAL_MS: u32 = 2_000;

/// Humidity/temperature producer around the timing-protocol decoder.
pub struct ClimateWorker<'a, W: SingleWire, M: RawMutex> {
    sensor: Dht22<W>,
    store: &'a StationStore<M>,
}

impl<'a, W: SingleWire, M: RawMutex> ClimateWorker<'a, W, M> {
    pub fn new(sensor: Dht22<W>, store: &'a StationStore<M>) -> Self {
        Self { sensor, store }
    }

    /// One acquisition cycle: read, publish on success, log the outcome.
    pub fn poll(&mut self) {
        match self.sensor.read() {
            Ok(reading) => {
                info!("climate: {:?}", reading);
                self.store.set_climate(reading);
            }
            Err(e) => {
                warn!("climate read failed: {:?}", e);
            }
        }
    }

    /// Run forever at the climate cadence.
    pub fn run(mut self, mut delay: impl DelayNs) -> ! {
        loop {
            self.poll();
            delay.delay_ms(CLIMATE_INTERVAL_MS);
        }
    }
}

/// Gas-concentration producer around the analog estimator.
pub struct AirQualityWorker<'a, A: AnalogSource, M: RawMutex> {
    sensor: Mq135<A>,
    store: &'a StationStore<M>,
}

impl<'a, A: AnalogSource, M: RawMutex> AirQualityWorker<'a, A, M> {
    pub fn new(sensor: Mq135<A>, store: &'a StationStore<M>) -> Self {
        Self { sensor, store }
    }

    /// One sampling cycle: sample, publish on success, log the outcome.
    pub fn poll(&mut self) {
        match self.sensor.sample() {
            Ok(reading) => {
                info!(
                    "air quality: ratio {} co2 {} lpg {} co {} nh3 {}",
                    reading.ratio,
                    reading.co2_ppm,
                    reading.lpg_ppm,
                    reading.co_ppm,
                    reading.nh3_ppm
                );
                self.store.set_air_quality(reading);
            }
            Err(_) => {
                warn!("air quality sample failed");
            }
        }
    }

    /// Run forever at the gas cadence.
    pub fn run(mut self, mut delay: impl DelayNs) -> ! {
        loop {
            self.poll();
            delay.delay_ms(AIR_QUALITY_INTERVAL_MS);
        }
    }
}
