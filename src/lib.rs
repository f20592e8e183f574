/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure of the flocking engine. The engine
 * has no dependency on any window or input system: drivers create a Flock,
 * call `step` once per frame and read positions and headings back.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighbor, NeighborScratch, Steering};
pub use debug::FrameStats;
pub use error::ConfigError;
pub use flock::Flock;
pub use params::{Bounds, FlockingParams, SimulationParams, MAX_SCAN_REACH};
pub use physics::{create_population, step, FrameSnapshot, StepBuffers};
pub use spatial_grid::SpatialGrid;
pub use world::World;

// Define modules
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod params;
pub mod physics;
pub mod spatial_grid;
pub mod world;

// Size of the drawn triangle
pub const BOID_SIZE: f64 = 3.0;
