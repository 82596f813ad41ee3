#![cfg_attr(not(feature = "std"), no_std)]
//! Sensor acquisition and compensation core for an environmental station.
//!
//! Three independent producers sample the environment and publish their
//! latest validated readings to a shared, mutex-guarded store:
//!
//! * [`drivers::dht22::Dht22`] decodes the single-wire, timing-encoded
//!   humidity/temperature frame.
//! * [`drivers::bmp280::Bmp280`] drives the register-addressed barometric
//!   sensor, including device discovery and datasheet compensation.
//! * [`drivers::mq135::Mq135`] converts an analog voltage into a sensor
//!   resistance ratio and per-gas concentration estimates.
//!
//! Display and network consumers read coherent snapshots back out of
//! [`store::StationStore`] without ever observing a half-written field
//! group.
//!
//! Hardware access goes through narrow capability boundaries — the
//! [`traits::SingleWire`] line, `embedded_hal::i2c::I2c` and
//! [`traits::AnalogSource`] — so every driver can run against a simulated
//! device on the host.

pub(crate) mod fmt;

pub mod domain;

pub mod traits;

pub mod drivers;

pub mod store;

pub mod workers;
