/*
 * Error Module
 *
 * Configuration errors raised when a SimulationParams value cannot describe a
 * valid world. The simulation step itself never fails: numerical degeneracies
 * are handled where they occur.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A dimension, speed, radius or force that must be strictly positive.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A `[min, max]` pair whose bounds are reversed or not finite.
    #[error("{field} range is invalid: min {min} > max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The grid would need more rings than the scan allows to cover the largest radius.
    #[error(
        "cell size {cell_size} is too small for interaction radius {radius} \
         (a neighborhood scan covers at most {max_reach} cells in each direction)"
    )]
    CellTooSmall {
        cell_size: f64,
        radius: f64,
        max_reach: usize,
    },

    #[error("cell size {cell_size} exceeds the world extent {extent}")]
    CellLargerThanWorld { cell_size: f64, extent: f64 },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
