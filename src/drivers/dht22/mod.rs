//! Decoder for the DHT22 single-wire, timing-encoded sensor frame.
//!
//! One frame is 40 bits — humidity, temperature and a checksum byte —
//! where each bit's value is encoded in how long the line stays high.
//! The sensor cannot be read more often than every two seconds, and a
//! whole frame either decodes within its deadline or the attempt is
//! abandoned; there are no retries mid-frame.

use crate::domain::temperature::Celsius;
use crate::domain::SensorAcquisition;
use crate::traits::{Direction, SingleWire};

/// Minimum interval between two successful reads, per datasheet.
const MIN_READ_INTERVAL_US: u64 = 2_000_000;

/// Host start signal: drive the line low for 20 ms.
const START_LOW_US: u32 = 20_000;

/// Host start signal: release high for ~30 µs before listening.
const START_RELEASE_US: u32 = 30;

/// Every wait inside one frame shares this deadline from frame start.
const FRAME_DEADLINE_US: u64 = 20_000;

/// A high phase longer than this encodes a 1 bit.
const BIT_ONE_THRESHOLD_US: u64 = 50;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dht22Error {
    /// Less than the minimum interval elapsed since the last successful
    /// read; the line was not touched.
    RateLimited,
    /// A wait inside the frame exceeded the frame deadline.
    TimedOut,
    /// The frame arrived but its checksum byte does not match. The raw
    /// bytes are carried for diagnostics.
    ChecksumFail { frame: [u8; 5] },
}

/// Timing-protocol decoder bound to one data line.
pub struct Dht22<W: SingleWire> {
    line: W,
    last_read_us: Option<u64>,
}

impl<W: SingleWire> Dht22<W> {
    pub fn new(line: W) -> Self {
        Self {
            line,
            last_read_us: None,
        }
    }

    /// Decode one frame into humidity and temperature.
    ///
    /// Fails fast with [`Dht22Error::RateLimited`] if called again within
    /// two seconds of the last *successful* read; failed attempts do not
    /// arm the rate limiter, so the caller's next periodic cycle may
    /// retry immediately.
    pub fn read(&mut self) -> Result<SensorAcquisition<Celsius>, Dht22Error> {
        let start = self.line.now_us();
        if let Some(last) = self.last_read_us {
            if start.saturating_sub(last) < MIN_READ_INTERVAL_US {
                return Err(Dht22Error::RateLimited);
            }
        }

        let mut frame = [0u8; 5];

        // Start signal, then hand the line to the sensor.
        self.line.set_direction(Direction::Output);
        self.line.write_level(false);
        self.line.delay_us(START_LOW_US);
        self.line.write_level(true);
        self.line.delay_us(START_RELEASE_US);
        self.line.set_direction(Direction::Input);

        let deadline = self.line.now_us() + FRAME_DEADLINE_US;

        // Sensor acknowledgment: pull-down, pull-up, then the bit train.
        self.wait_while(true, deadline)?;
        self.wait_while(false, deadline)?;
        self.wait_while(true, deadline)?;

        for i in 0..40 {
            self.wait_while(false, deadline)?;
            let high_start = self.line.now_us();
            self.wait_while(true, deadline)?;

            if self.line.now_us() - high_start > BIT_ONE_THRESHOLD_US {
                frame[i / 8] |= 1 << (7 - (i % 8));
            }
        }

        let sum = frame[0]
            .wrapping_add(frame[1])
            .wrapping_add(frame[2])
            .wrapping_add(frame[3]);
        if frame[4] != sum {
            return Err(Dht22Error::ChecksumFail { frame });
        }

        self.last_read_us = Some(self.line.now_us());
        Ok(decode(&frame))
    }

    /// Release the underlying line.
    pub fn free(self) -> W {
        self.line
    }

    fn wait_while(&mut self, level: bool, deadline: u64) -> Result<(), Dht22Error> {
        while self.line.read_level() == level {
            if self.line.now_us() > deadline {
                return Err(Dht22Error::TimedOut);
            }
        }
        Ok(())
    }
}

/// Derive physical values from a checksum-verified frame. The top bit of
/// the temperature high byte is a sign bit.
fn decode(frame: &[u8; 5]) -> SensorAcquisition<Celsius> {
    let relative_humidity = frame[0] as f32 + frame[1] as f32 / 10.0;
    let magnitude = (frame[2] & 0x7F) as f32 + frame[3] as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    SensorAcquisition {
        temperature: temperature.into(),
        relative_humidity,
    }
}
