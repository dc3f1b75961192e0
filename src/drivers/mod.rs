//! Valve relay drivers, level sensors, and peripheral helpers.

pub mod hw_init;
pub mod ir_level;
pub mod pressure;
pub mod relay;

/// Common face of the two level-sensing drivers, so the hardware adapter
/// can be assembled with either the pressure transducer or the IR beam
/// pair without the domain core noticing.
pub trait LevelSense {
    /// One raw reading, comparable against the configured thresholds.
    fn read_raw(&mut self) -> u16;
}
