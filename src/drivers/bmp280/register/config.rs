use embedded_hal::i2c::I2c;

const CONFIG: u8 = 0xF5;

/// IIR filter coefficient.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    Off,
    X2,
    X4,
    X8,
    X16,
}

/// Configuration register. The standby bits stay at their shortest
/// setting (0.5 ms); only the filter coefficient is controlled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub filter: Filter,
}

impl Config {
    pub fn write<I: I2c>(address: u8, i2c: &mut I, reg: Config) -> Result<(), I::Error> {
        i2c.write(address, &[CONFIG, reg.into()])
    }
}

impl From<Filter> for u8 {
    fn from(filter: Filter) -> u8 {
        match filter {
            Filter::Off => 0b000,
            Filter::X2 => 0b001,
            Filter::X4 => 0b010,
            Filter::X8 => 0b011,
            Filter::X16 => 0b100,
        }
    }
}

impl From<Config> for u8 {
    fn from(reg: Config) -> u8 {
        u8::from(reg.filter) << 2
    }
}
