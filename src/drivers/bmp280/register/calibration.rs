use embedded_hal::i2c::I2c;

// 24-byte little-endian block at 0x88: dig_T1..T3 then dig_P1..P9.
const CALIBRATION_24: u8 = 0x88;

/// Factory compensation coefficients, read once at initialization and
/// immutable afterwards.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    pub fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<Calibration, I::Error> {
        let mut buf = [0; 24];
        i2c.write_read(address, &[CALIBRATION_24], &mut buf)?;
        Ok(buf.into())
    }

    /// Datasheet temperature compensation, integer math only.
    ///
    /// Takes the 20-bit raw temperature and returns the compensated
    /// temperature in hundredths of a degree Celsius together with the
    /// fine-temperature value that the pressure compensation consumes.
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let adc_t = adc_t as i64;
        let dig_t1 = self.dig_t1 as i64;

        let var1 = (((adc_t >> 3) - (dig_t1 << 1)) * self.dig_t2 as i64) >> 11;
        let var2 = (((((adc_t >> 4) - dig_t1) * ((adc_t >> 4) - dig_t1)) >> 12)
            * self.dig_t3 as i64)
            >> 14;

        let t_fine = (var1 + var2) as i32;
        let t = (t_fine * 5 + 128) >> 8;
        (t, t_fine)
    }

    /// Datasheet pressure compensation, 64-bit fixed point.
    ///
    /// Takes the 20-bit raw pressure and the fine-temperature from
    /// [`Self::compensate_temperature`], and returns pressure in units of
    /// 1/256 Pa. A zero first-stage denominator reports exactly zero
    /// instead of dividing by it.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> u32 {
        let mut var1 = t_fine as i64 - 128000;
        let mut var2 = var1 * var1 * self.dig_p6 as i64;
        var2 += (var1 * self.dig_p5 as i64) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * self.dig_p3 as i64) >> 8) + ((var1 * self.dig_p2 as i64) << 12);
        var1 = (((1i64 << 47) + var1) * self.dig_p1 as i64) >> 33;

        if var1 == 0 {
            return 0;
        }

        let mut p = 1_048_576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = ((self.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
        var2 = ((self.dig_p8 as i64) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4);

        p as u32
    }
}

impl From<[u8; 24]> for Calibration {
    fn from(buf: [u8; 24]) -> Calibration {
        Calibration {
            dig_t1: u16::from_le_bytes([buf[0], buf[1]]),
            dig_t2: i16::from_le_bytes([buf[2], buf[3]]),
            dig_t3: i16::from_le_bytes([buf[4], buf[5]]),
            dig_p1: u16::from_le_bytes([buf[6], buf[7]]),
            dig_p2: i16::from_le_bytes([buf[8], buf[9]]),
            dig_p3: i16::from_le_bytes([buf[10], buf[11]]),
            dig_p4: i16::from_le_bytes([buf[12], buf[13]]),
            dig_p5: i16::from_le_bytes([buf[14], buf[15]]),
            dig_p6: i16::from_le_bytes([buf[16], buf[17]]),
            dig_p7: i16::from_le_bytes([buf[18], buf[19]]),
            dig_p8: i16::from_le_bytes([buf[20], buf[21]]),
            dig_p9: i16::from_le_bytes([buf[22], buf[23]]),
        }
    }
}
