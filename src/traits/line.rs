//! Capability boundary for a bit-banged, timing-encoded sensor line.

/// Direction of the shared data line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// A single open-drain data line plus the microsecond clock needed to
/// decode durations on it.
///
/// The decoder only ever talks to hardware through this trait, so it can
/// run against a simulated line on the host. Implementations are expected
/// to keep `now_us` monotonic and to make `read_level` cheap enough to
/// poll in a tight loop.
pub trait SingleWire {
    /// Switch the line between driving it and listening to it. Switching
    /// to input must leave the line pulled up.
    fn set_direction(&mut self, direction: Direction);

    /// Drive the line high or low. Only meaningful in output direction.
    fn write_level(&mut self, high: bool);

    /// Sample the current line level.
    fn read_level(&mut self) -> bool;

    /// Busy-wait for the given number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Current value of a monotonic microsecond clock.
    fn now_us(&mut self) -> u64;
}
