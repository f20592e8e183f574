/*
 * Flock Module
 *
 * Owns everything a driver needs to run the simulation frame after frame:
 * the validated parameters, the population, the spatial grid, the seeded RNG
 * and the reusable step buffers. Renderers and the headless runner call
 * `step` once per logical frame and read boids back through `boids`.
 */

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::boid::{Boid, Steering};
use crate::debug::FrameStats;
use crate::error::ConfigError;
use crate::params::SimulationParams;
use crate::physics::{self, StepBuffers};
use crate::spatial_grid::SpatialGrid;

pub struct Flock {
    params: SimulationParams,
    boids: Vec<Boid>,
    // Hand-placed starting population restored by `reset`
    scenario: Option<Vec<Boid>>,
    grid: SpatialGrid,
    rng: ChaCha8Rng,
    buffers: StepBuffers,
    seed: u64,
    frame: u64,
    last_stats: FrameStats,
}

impl Flock {
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        Self::build(params, None)
    }

    /// Build a flock from an explicit population, e.g. a hand-placed scenario.
    /// `reset` restores this population until the population size or world
    /// changes.
    pub fn with_boids(
        params: SimulationParams,
        mut boids: Vec<Boid>,
    ) -> Result<Self, ConfigError> {
        let world = params.world();
        for boid in &mut boids {
            boid.wrap_edges(world);
        }
        Self::build(
            SimulationParams {
                num_boids: boids.len(),
                ..params
            },
            Some(boids),
        )
    }

    fn build(params: SimulationParams, scenario: Option<Vec<Boid>>) -> Result<Self, ConfigError> {
        params.validate()?;

        let seed = params.seed.unwrap_or_else(rand::random);
        let world = params.world();
        let grid = SpatialGrid::new(params.cell_size, world);

        let mut flock = Self {
            buffers: StepBuffers::with_capacity(params.num_boids),
            boids: Vec::new(),
            scenario,
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            frame: 0,
            last_stats: FrameStats::default(),
            params,
        };
        flock.populate();

        info!(
            boids = flock.boids.len(),
            width = world.width,
            height = world.height,
            cell_size = flock.params.cell_size,
            seed,
            scenario = flock.scenario.is_some(),
            "flock created"
        );
        Ok(flock)
    }

    fn populate(&mut self) {
        self.boids = match &self.scenario {
            Some(boids) => boids.clone(),
            None => physics::create_population(
                self.params.num_boids,
                self.params.world(),
                &self.params.flocking,
                &mut self.rng,
            ),
        };
    }

    /// Advance the whole population by one frame.
    pub fn step(&mut self) -> FrameStats {
        let mut stats = physics::step(
            &mut self.boids,
            &mut self.grid,
            &self.params,
            &mut self.rng,
            &mut self.buffers,
        );
        self.frame += 1;
        stats.frame = self.frame;
        self.last_stats = stats;
        stats
    }

    /// Re-seed the RNG and restore the starting population: the hand-placed
    /// scenario if there is one, otherwise a fresh random spawn.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.frame = 0;
        self.last_stats = FrameStats::default();
        self.populate();
        debug!(boids = self.boids.len(), seed = self.seed, "flock reset");
    }

    /// Replace the parameters. A changed population size, world or seed
    /// restarts the flock; everything else takes effect on the next step.
    /// A hand-placed scenario is dropped once the population size or world
    /// no longer matches it.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;
        let reshaped = params.num_boids != self.params.num_boids
            || params.world_width != self.params.world_width
            || params.world_height != self.params.world_height;
        let reseeded = matches!(params.seed, Some(seed) if seed != self.seed);

        if let Some(seed) = params.seed {
            self.seed = seed;
        }
        if reshaped {
            self.scenario = None;
        }
        self.params = params;
        if reshaped || reseeded {
            self.reset();
        }
        Ok(())
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> &FrameStats {
        &self.last_stats
    }

    /// Per-boid steering breakdown from the last step, in population order.
    pub fn last_steering(&self) -> &[Steering] {
        self.buffers.steering()
    }
}
