//! Driver for the register-addressed BMP280 barometric sensor.
//!
//! Covers device discovery over the two well-known bus addresses,
//! chip-identity verification, the bring-up sequence (soft reset, settle,
//! calibration ingestion, default configuration) and compensated
//! temperature/pressure reads using the datasheet fixed-point routines.
//!
//! A register read is an address write followed by a repeated-start read;
//! a register write is a single `[register, value]` transaction. Bus
//! failures propagate without internal retries — retry policy belongs to
//! the calling task's next periodic cycle.

pub mod register;

use crate::domain::temperature::Celsius;
use crate::domain::BaroAcquisition;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use register::calibration::Calibration;
use register::config::{Config, Filter};
use register::ctrl_meas::{CtrlMeas, Mode, Oversampling};
use register::status::Status;

pub const PRIMARY_ADDR: u8 = 0x76;
pub const SECONDARY_ADDR: u8 = 0x77;

/// Chip identity every supported device must report.
pub const CHIP_ID: u8 = 0x58;

const REG_CHIP_ID: u8 = 0xD0;
const REG_RESET: u8 = 0xE0;
const REG_PRESS_MSB: u8 = 0xF7;

/// Writing this value to the reset register triggers a soft reset.
const RESET_VALUE: u8 = 0xB6;

/// The device needs this long after a soft reset before it answers.
const RESET_SETTLE_MS: u32 = 10;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp280Error<E> {
    /// Bus-level failure (no acknowledgment, arbitration loss, timeout).
    Bus(E),
    /// No device with the expected chip identity answered.
    DeviceNotFound,
    /// A device answered but identifies as a different chip.
    NotSupported(u8),
}

impl<E> From<E> for Bmp280Error<E> {
    fn from(e: E) -> Bmp280Error<E> {
        Bmp280Error::Bus(e)
    }
}

/// Operating configuration: oversampling on both channels, filter
/// coefficient and power mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub temperature_oversampling: Oversampling,
    pub pressure_oversampling: Oversampling,
    pub filter: Filter,
    pub mode: Mode,
}

impl Default for Settings {
    /// Minimum oversampling on both channels, filter disabled,
    /// continuous operation.
    fn default() -> Settings {
        Settings {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            filter: Filter::Off,
            mode: Mode::Normal,
        }
    }
}

/// One session per physical device: bus handle, discovered address,
/// calibration profile and the running fine-temperature accumulator.
pub struct Bmp280<I: I2c> {
    i2c: I,
    address: u8,
    calibration: Calibration,
    settings: Settings,
    t_fine: i32,
}

impl<I: I2c> Bmp280<I> {
    /// Probe the two well-known addresses in order and bring up the first
    /// device reporting the expected chip identity.
    pub fn probe(mut i2c: I, delay: &mut impl DelayNs) -> Result<Self, Bmp280Error<I::Error>> {
        for address in [PRIMARY_ADDR, SECONDARY_ADDR] {
            if let Ok(id) = read_chip_id(&mut i2c, address) {
                if id == CHIP_ID {
                    info!("found barometric sensor at 0x{:02x}", address);
                    return Self::bring_up(i2c, address, delay);
                }
            }
        }
        Err(Bmp280Error::DeviceNotFound)
    }

    /// Bring up the device at an explicit address. The device must both
    /// answer and report the expected chip identity.
    pub fn new(
        mut i2c: I,
        address: u8,
        delay: &mut impl DelayNs,
    ) -> Result<Self, Bmp280Error<I::Error>> {
        let id = read_chip_id(&mut i2c, address).map_err(|_| Bmp280Error::DeviceNotFound)?;
        if id != CHIP_ID {
            return Err(Bmp280Error::NotSupported(id));
        }
        Self::bring_up(i2c, address, delay)
    }

    /// Bring-up sequence after identity verification. Each step's failure
    /// aborts initialization; the calibration profile only exists once
    /// every step succeeded.
    fn bring_up(
        mut i2c: I,
        address: u8,
        delay: &mut impl DelayNs,
    ) -> Result<Self, Bmp280Error<I::Error>> {
        i2c.write(address, &[REG_RESET, RESET_VALUE])?;
        delay.delay_ms(RESET_SETTLE_MS);

        let calibration = Calibration::read(address, &mut i2c)?;

        let mut device = Self {
            i2c,
            address,
            calibration,
            settings: Settings::default(),
            t_fine: 0,
        };
        device.apply(Settings::default())?;
        Ok(device)
    }

    /// Apply new operating settings. The recorded settings change only
    /// when both register writes succeed.
    pub fn set_config(&mut self, settings: Settings) -> Result<(), Bmp280Error<I::Error>> {
        self.apply(settings)
    }

    fn apply(&mut self, settings: Settings) -> Result<(), Bmp280Error<I::Error>> {
        CtrlMeas::write(
            self.address,
            &mut self.i2c,
            CtrlMeas {
                temperature: settings.temperature_oversampling,
                pressure: settings.pressure_oversampling,
                mode: settings.mode,
            },
        )?;
        Config::write(
            self.address,
            &mut self.i2c,
            Config {
                filter: settings.filter,
            },
        )?;
        self.settings = settings;
        Ok(())
    }

    /// Read one compensated temperature/pressure pair.
    ///
    /// Temperature is compensated first: the pressure compensation
    /// consumes the resulting fine-temperature value.
    pub fn read(&mut self) -> Result<BaroAcquisition<Celsius>, Bmp280Error<I::Error>> {
        let mut buf = [0; 6];
        self.i2c.write_read(self.address, &[REG_PRESS_MSB], &mut buf)?;

        // 20-bit raw values, MSB first, bottom nibble of the low byte discarded.
        let adc_p =
            (((buf[0] as u32) << 12) | ((buf[1] as u32) << 4) | ((buf[2] as u32) >> 4)) as i32;
        let adc_t =
            (((buf[3] as u32) << 12) | ((buf[4] as u32) << 4) | ((buf[5] as u32) >> 4)) as i32;

        let (centi_celsius, t_fine) = self.calibration.compensate_temperature(adc_t);
        self.t_fine = t_fine;
        let pressure_q8 = self.calibration.compensate_pressure(adc_p, t_fine);

        Ok(BaroAcquisition {
            temperature: (centi_celsius as f32 / 100.0).into(),
            pressure: pressure_q8 as f32 / 256.0,
        })
    }

    /// Report the chip identity register.
    pub fn chip_id(&mut self) -> Result<u8, Bmp280Error<I::Error>> {
        Ok(read_chip_id(&mut self.i2c, self.address)?)
    }

    /// Put the device to sleep, leaving the other measurement-control
    /// bits untouched.
    pub fn sleep(&mut self) -> Result<(), Bmp280Error<I::Error>> {
        let reg = CtrlMeas::read(self.address, &mut self.i2c)?;
        CtrlMeas::write(
            self.address,
            &mut self.i2c,
            CtrlMeas {
                mode: Mode::Sleep,
                ..reg
            },
        )?;
        Ok(())
    }

    /// A conversion is currently running.
    pub fn is_measuring(&mut self) -> Result<bool, Bmp280Error<I::Error>> {
        Ok(Status::read(self.address, &mut self.i2c)?.measuring())
    }

    /// Calibration data is being copied to the image registers.
    pub fn is_updating(&mut self) -> Result<bool, Bmp280Error<I::Error>> {
        Ok(Status::read(self.address, &mut self.i2c)?.updating())
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Release the bus handle.
    pub fn free(self) -> I {
        self.i2c
    }
}

fn read_chip_id<I: I2c>(i2c: &mut I, address: u8) -> Result<u8, I::Error> {
    let mut buf = [0; 1];
    i2c.write_read(address, &[REG_CHIP_ID], &mut buf)?;
    Ok(buf[0])
}

#[cfg(test)]
mod tests {
    use super::register::calibration::tests::reference;
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    fn reference_block() -> Vec<u8> {
        let c = reference();
        let mut block = Vec::new();
        block.extend_from_slice(&c.dig_t1.to_le_bytes());
        block.extend_from_slice(&c.dig_t2.to_le_bytes());
        block.extend_from_slice(&c.dig_t3.to_le_bytes());
        block.extend_from_slice(&c.dig_p1.to_le_bytes());
        for p in [c.dig_p2, c.dig_p3, c.dig_p4, c.dig_p5, c.dig_p6, c.dig_p7, c.dig_p8, c.dig_p9] {
            block.extend_from_slice(&p.to_le_bytes());
        }
        block
    }

    /// Bring-up transactions at the given address: identity check, soft
    /// reset, calibration block, default configuration.
    fn bring_up_transactions(address: u8) -> Vec<Transaction> {
        vec![
            Transaction::write_read(address, vec![0xD0], vec![CHIP_ID]),
            Transaction::write(address, vec![0xE0, 0xB6]),
            Transaction::write_read(address, vec![0x88], reference_block()),
            // 1x / 1x oversampling, normal mode; filter off.
            Transaction::write(address, vec![0xF4, 0b001_001_11]),
            Transaction::write(address, vec![0xF5, 0x00]),
        ]
    }

    #[test]
    fn probe_accepts_primary_address() {
        let mut i2c = I2cMock::new(&bring_up_transactions(PRIMARY_ADDR));
        let mut delay = NoopDelay::new();
        let bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();
        assert_eq!(bmp.address(), PRIMARY_ADDR);
        assert_eq!(bmp.settings(), Settings::default());
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn probe_falls_back_to_secondary_address() {
        let mut transactions = vec![Transaction::write_read(
            PRIMARY_ADDR,
            vec![0xD0],
            vec![0x00],
        )];
        transactions.extend(bring_up_transactions(SECONDARY_ADDR));
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();
        assert_eq!(bmp.address(), SECONDARY_ADDR);
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn probe_fails_when_no_address_reports_the_expected_identity() {
        let mut i2c = I2cMock::new(&[
            Transaction::write_read(PRIMARY_ADDR, vec![0xD0], vec![0x00]),
            Transaction::write_read(SECONDARY_ADDR, vec![0xD0], vec![0x61]),
        ]);
        let mut delay = NoopDelay::new();
        // No calibration block is ever requested from the bus.
        let result = Bmp280::probe(&mut i2c, &mut delay);
        assert_eq!(result.err(), Some(Bmp280Error::DeviceNotFound));
        i2c.done();
    }

    #[test]
    fn explicit_address_with_wrong_identity_is_not_supported() {
        let mut i2c = I2cMock::new(&[Transaction::write_read(
            SECONDARY_ADDR,
            vec![0xD0],
            vec![0x61],
        )]);
        let mut delay = NoopDelay::new();
        let result = Bmp280::new(&mut i2c, SECONDARY_ADDR, &mut delay);
        assert_eq!(result.err(), Some(Bmp280Error::NotSupported(0x61)));
        i2c.done();
    }

    #[test]
    fn read_compensates_raw_block_with_reference_calibration() {
        let mut transactions = bring_up_transactions(PRIMARY_ADDR);
        transactions.push(Transaction::write_read(
            PRIMARY_ADDR,
            vec![0xF7],
            vec![0x50, 0x2A, 0x00, 0x80, 0x1E, 0x00],
        ));
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let mut bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();

        // Oracle computed independently with the datasheet fixed-point
        // routine: T = 2661 (hundredths), p = 29682650 (1/256 Pa).
        let reading = bmp.read().unwrap();
        assert!((reading.temperature.raw_value() - 26.61).abs() < 1e-3);
        assert!((reading.pressure - 115_947.85).abs() < 0.01);
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn set_config_packs_both_registers() {
        let mut transactions = bring_up_transactions(PRIMARY_ADDR);
        // 2x temperature, 16x pressure, forced; filter 4x.
        transactions.push(Transaction::write(PRIMARY_ADDR, vec![0xF4, 0b010_101_01]));
        transactions.push(Transaction::write(PRIMARY_ADDR, vec![0xF5, 0b010_00]));
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let mut bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();

        let settings = Settings {
            temperature_oversampling: Oversampling::X2,
            pressure_oversampling: Oversampling::X16,
            filter: Filter::X4,
            mode: Mode::Forced,
        };
        bmp.set_config(settings).unwrap();
        assert_eq!(bmp.settings(), settings);
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn failed_config_write_keeps_recorded_settings() {
        use embedded_hal::i2c::ErrorKind;

        let mut transactions = bring_up_transactions(PRIMARY_ADDR);
        transactions.push(Transaction::write(PRIMARY_ADDR, vec![0xF4, 0b010_010_11]));
        transactions.push(
            Transaction::write(PRIMARY_ADDR, vec![0xF5, 0b011_00]).with_error(ErrorKind::Other),
        );
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let mut bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();

        let settings = Settings {
            temperature_oversampling: Oversampling::X2,
            pressure_oversampling: Oversampling::X2,
            filter: Filter::X8,
            mode: Mode::Normal,
        };
        assert!(bmp.set_config(settings).is_err());
        assert_eq!(bmp.settings(), Settings::default());
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn sleep_preserves_oversampling_bits() {
        let mut transactions = bring_up_transactions(PRIMARY_ADDR);
        transactions.push(Transaction::write_read(
            PRIMARY_ADDR,
            vec![0xF4],
            vec![0b001_001_11],
        ));
        transactions.push(Transaction::write(PRIMARY_ADDR, vec![0xF4, 0b001_001_00]));
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let mut bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();
        bmp.sleep().unwrap();
        drop(bmp);
        i2c.done();
    }

    #[test]
    fn status_queries_decode_the_right_bits() {
        let mut transactions = bring_up_transactions(PRIMARY_ADDR);
        transactions.push(Transaction::write_read(PRIMARY_ADDR, vec![0xF3], vec![0x08]));
        transactions.push(Transaction::write_read(PRIMARY_ADDR, vec![0xF3], vec![0x01]));
        let mut i2c = I2cMock::new(&transactions);
        let mut delay = NoopDelay::new();
        let mut bmp = Bmp280::probe(&mut i2c, &mut delay).unwrap();
        assert!(bmp.is_measuring().unwrap());
        assert!(bmp.is_updating().unwrap());
        drop(bmp);
        i2c.done();
    }
}
