use embedded_hal::i2c::I2c;

const STATUS: u8 = 0xF3;

/// Device status register.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    measuring: bool,
    im_update: bool,
}

impl Status {
    pub fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<Status, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address, &[STATUS], &mut buf)?;
        Ok(buf[0].into())
    }

    /// A conversion is running.
    pub fn measuring(&self) -> bool {
        self.measuring
    }

    /// Calibration data is being copied to the image registers.
    pub fn updating(&self) -> bool {
        self.im_update
    }
}

impl From<u8> for Status {
    fn from(v: u8) -> Status {
        Status {
            measuring: (v & (1 << 3)) != 0,
            im_update: (v & 1) != 0,
        }
    }
}
