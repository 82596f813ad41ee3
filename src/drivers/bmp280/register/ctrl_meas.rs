use embedded_hal::i2c::I2c;

const CTRL_MEAS: u8 = 0xF4;

/// Number of internal conversions the sensor averages per sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

/// Sensor power mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Sleep,
    Forced,
    Normal,
}

/// Measurement control register: oversampling for both channels and the
/// power mode, packed into one byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlMeas {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub mode: Mode,
}

impl CtrlMeas {
    pub fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<CtrlMeas, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address, &[CTRL_MEAS], &mut buf)?;
        Ok(buf[0].into())
    }

    pub fn write<I: I2c>(address: u8, i2c: &mut I, reg: CtrlMeas) -> Result<(), I::Error> {
        i2c.write(address, &[CTRL_MEAS, reg.into()])
    }
}

impl From<Oversampling> for u8 {
    fn from(os: Oversampling) -> u8 {
        match os {
            Oversampling::Skipped => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }
}

impl From<u8> for Oversampling {
    fn from(v: u8) -> Oversampling {
        match v & 0b111 {
            0b000 => Oversampling::Skipped,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        match mode {
            Mode::Sleep => 0b00,
            Mode::Forced => 0b01,
            Mode::Normal => 0b11,
        }
    }
}

impl From<u8> for Mode {
    fn from(v: u8) -> Mode {
        match v & 0b11 {
            0b00 => Mode::Sleep,
            0b01 | 0b10 => Mode::Forced,
            _ => Mode::Normal,
        }
    }
}

impl From<u8> for CtrlMeas {
    fn from(v: u8) -> CtrlMeas {
        CtrlMeas {
            temperature: (v >> 5).into(),
            pressure: (v >> 2).into(),
            mode: v.into(),
        }
    }
}

impl From<CtrlMeas> for u8 {
    fn from(reg: CtrlMeas) -> u8 {
        (u8::from(reg.temperature) << 5) | (u8::from(reg.pressure) << 2) | u8::from(reg.mode)
    }
}
