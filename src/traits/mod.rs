pub mod analog;
pub mod line;

pub use analog::AnalogSource;
pub use line::{Direction, SingleWire};
