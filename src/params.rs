/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct holding every tunable value
 * of the simulation: world size, population, grid cell size and the flocking
 * constants. Parameters are loaded from YAML (any field may be omitted and
 * falls back to its default) and validated once before a flock is built.
 *
 * A YAML file overriding a few values:
 *
 *   world_width: 1200
 *   world_height: 800
 *   num_boids: 600
 *   seed: 7
 *   flocking:
 *     max_speed: 3.5
 *     alignment_fov_degrees: 220
 *     weight_variance: { min: 0.8, max: 1.2 }
 */

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::world::World;

/// Widest neighborhood scan, in cells on each side of the query cell.
pub const MAX_SCAN_REACH: usize = 3;

// Magnitudes below this are treated as zero when normalizing
pub const EPSILON: f64 = 1e-8;

/// Inclusive `[min, max]` interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

// Parameters for the simulation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub world_width: f64,
    pub world_height: f64,
    pub num_boids: usize,
    pub cell_size: f64,
    /// Seed for the simulation RNG; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub enable_parallel: bool,
    pub flocking: FlockingParams,
    // Viewer state
    pub show_debug: bool,
    pub pause_simulation: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            num_boids: 400,
            cell_size: 40.0,
            seed: None,
            enable_parallel: true,
            flocking: FlockingParams::default(),
            show_debug: false,
            pause_simulation: false,
        }
    }
}

/// Steering constants shared by every boid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlockingParams {
    pub max_speed: f64,
    pub min_speed: f64,
    pub max_force: f64,
    pub separation_distance: f64,
    pub alignment_distance: f64,
    pub cohesion_distance: f64,
    /// Neighbors closer than this are reacted to regardless of field of view.
    pub min_distance: f64,
    /// Full angular width of the view cone used by separation and alignment.
    pub alignment_fov_degrees: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    /// Half-width of the per-axis uniform noise added to every steering vector.
    pub jitter: f64,
    pub spawn_margin: f64,
    pub initial_speed: Bounds,
    pub weight_variance: Bounds,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            max_speed: 3.2,
            min_speed: 1.2,
            max_force: 0.045,
            separation_distance: 22.0,
            alignment_distance: 70.0,
            cohesion_distance: 100.0,
            min_distance: 8.0,
            alignment_fov_degrees: 200.0,
            separation_weight: 0.22,
            alignment_weight: 0.06,
            cohesion_weight: 0.16,
            jitter: 0.05,
            spawn_margin: 20.0,
            initial_speed: Bounds::new(1.0, 2.0),
            weight_variance: Bounds::new(0.9, 1.1),
        }
    }
}

/// Squared radii and the FOV cosine, computed once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringThresholds {
    pub separation_sq: f64,
    pub alignment_sq: f64,
    pub cohesion_sq: f64,
    pub min_distance_sq: f64,
    pub fov_cos: f64,
}

impl FlockingParams {
    pub fn thresholds(&self) -> SteeringThresholds {
        SteeringThresholds {
            separation_sq: self.separation_distance * self.separation_distance,
            alignment_sq: self.alignment_distance * self.alignment_distance,
            cohesion_sq: self.cohesion_distance * self.cohesion_distance,
            min_distance_sq: self.min_distance * self.min_distance,
            fov_cos: (self.alignment_fov_degrees / 2.0).to_radians().cos(),
        }
    }

    /// Largest distance at which any rule can see a neighbor.
    pub fn max_radius(&self) -> f64 {
        self.separation_distance
            .max(self.alignment_distance)
            .max(self.cohesion_distance)
            .max(self.min_distance)
    }

    /// Number of cell rings a neighborhood scan needs to cover `max_radius`.
    pub fn scan_reach(&self, cell_size: f64) -> usize {
        ((self.max_radius() / cell_size).ceil() as usize).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("flocking.max_speed", self.max_speed)?;
        positive("flocking.min_speed", self.min_speed)?;
        positive("flocking.max_force", self.max_force)?;
        positive("flocking.separation_distance", self.separation_distance)?;
        positive("flocking.alignment_distance", self.alignment_distance)?;
        positive("flocking.cohesion_distance", self.cohesion_distance)?;
        positive("flocking.min_distance", self.min_distance)?;
        within("flocking.alignment_fov_degrees", self.alignment_fov_degrees, 0.0, 360.0)?;
        positive("flocking.alignment_fov_degrees", self.alignment_fov_degrees)?;
        non_negative("flocking.separation_weight", self.separation_weight)?;
        non_negative("flocking.alignment_weight", self.alignment_weight)?;
        non_negative("flocking.cohesion_weight", self.cohesion_weight)?;
        non_negative("flocking.jitter", self.jitter)?;
        non_negative("flocking.spawn_margin", self.spawn_margin)?;

        ordered("flocking.min_speed..max_speed", Bounds::new(self.min_speed, self.max_speed))?;
        ordered("flocking.initial_speed", self.initial_speed)?;
        non_negative("flocking.initial_speed.min", self.initial_speed.min)?;
        ordered("flocking.weight_variance", self.weight_variance)?;
        non_negative("flocking.weight_variance.min", self.weight_variance.min)?;
        Ok(())
    }
}

impl SimulationParams {
    pub fn world(&self) -> World {
        World::new(self.world_width, self.world_height)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_yaml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    // Reject configurations that cannot describe a working simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("cell_size", self.cell_size)?;
        self.flocking.validate()?;

        let extent = self.world_width.min(self.world_height);
        if self.cell_size > extent {
            return Err(ConfigError::CellLargerThanWorld {
                cell_size: self.cell_size,
                extent,
            });
        }

        let reach = self.flocking.scan_reach(self.cell_size);
        if reach > MAX_SCAN_REACH {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.cell_size,
                radius: self.flocking.max_radius(),
                max_reach: MAX_SCAN_REACH,
            });
        }

        if self.has_partial_cells() {
            warn!(
                world_width = self.world_width,
                world_height = self.world_height,
                cell_size = self.cell_size,
                "world size is not a multiple of the cell size; scanning one extra ring of cells"
            );
        }

        Ok(())
    }

    /// Cell rings each neighborhood scan covers. A scan that wraps across a
    /// partial last column or row loses up to one cell of distance, so one
    /// ring is added whenever either extent has one.
    pub fn scan_reach(&self) -> usize {
        let reach = self.flocking.scan_reach(self.cell_size);
        if self.has_partial_cells() {
            reach + 1
        } else {
            reach
        }
    }

    fn has_partial_cells(&self) -> bool {
        self.world_width % self.cell_size != 0.0 || self.world_height % self.cell_size != 0.0
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        10..=5000
    }

    pub fn get_speed_range() -> std::ops::RangeInclusive<f64> {
        0.1..=10.0
    }

    pub fn get_force_range() -> std::ops::RangeInclusive<f64> {
        0.001..=0.5
    }

    pub fn get_weight_range() -> std::ops::RangeInclusive<f64> {
        0.0..=1.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f64> {
        1.0..=120.0
    }

    pub fn get_fov_range() -> std::ops::RangeInclusive<f64> {
        10.0..=360.0
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    within(field, value, 0.0, f64::INFINITY)
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn ordered(field: &'static str, bounds: Bounds) -> Result<(), ConfigError> {
    if bounds.min.is_finite() && bounds.max.is_finite() && bounds.min <= bounds.max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            min: bounds.min,
            max: bounds.max,
        })
    }
}
