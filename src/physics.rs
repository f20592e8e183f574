/*
 * Physics Module
 *
 * This module advances the flock by one logical frame. Every frame runs in
 * three strictly ordered phases:
 *
 * (a) rebuild the spatial grid from the current positions,
 * (b) compute every boid's steering from a frozen snapshot of positions and
 *     velocities, then commit the new velocities,
 * (c) move every boid and wrap it onto the torus.
 *
 * No boid ever sees another boid's state from the current frame, so the result
 * does not depend on iteration order. Phase (b) is a pure map over the
 * snapshot and runs on rayon when parallel processing is enabled; the jitter
 * for every boid is drawn up front in index order so both paths produce
 * identical trajectories.
 */

use std::time::Instant;

use glam::DVec2;
use rand::Rng;
use rayon::prelude::*;
use tracing::trace;

use crate::boid::{Boid, NeighborScratch, Steering};
use crate::debug::FrameStats;
use crate::params::{FlockingParams, SimulationParams};
use crate::spatial_grid::SpatialGrid;
use crate::world::World;

// Expected candidates per neighborhood scan, used to pre-size scratch buffers
const SCRATCH_CAPACITY: usize = 64;

/// Read-only view of the previous frame shared by all steering computations.
pub struct FrameSnapshot<'a> {
    pub world: World,
    pub grid: &'a SpatialGrid,
    /// Cell rings scanned around each boid.
    pub reach: usize,
    pub positions: &'a [DVec2],
    pub velocities: &'a [DVec2],
}

/// Per-frame buffers owned by the caller and reused between steps.
#[derive(Debug, Default)]
pub struct StepBuffers {
    positions: Vec<DVec2>,
    velocities: Vec<DVec2>,
    jitter: Vec<DVec2>,
    steering: Vec<Steering>,
    scratch: NeighborScratch,
}

impl StepBuffers {
    pub fn with_capacity(boids: usize) -> Self {
        Self {
            positions: Vec::with_capacity(boids),
            velocities: Vec::with_capacity(boids),
            jitter: Vec::with_capacity(boids),
            steering: Vec::with_capacity(boids),
            scratch: NeighborScratch::with_capacity(SCRATCH_CAPACITY),
        }
    }

    /// Steering computed for each boid in the last step.
    pub fn steering(&self) -> &[Steering] {
        &self.steering
    }
}

// Create `n` boids at random positions
pub fn create_population<R: Rng + ?Sized>(
    n: usize,
    world: World,
    params: &FlockingParams,
    rng: &mut R,
) -> Vec<Boid> {
    (0..n).map(|_| Boid::random(world, params, rng)).collect()
}

/// Advance every boid by one frame. The grid is recreated if it was built
/// for a different cell size or world.
pub fn step<R: Rng + ?Sized>(
    boids: &mut [Boid],
    grid: &mut SpatialGrid,
    params: &SimulationParams,
    rng: &mut R,
    buffers: &mut StepBuffers,
) -> FrameStats {
    let started = Instant::now();
    let world = params.world();
    let flocking = &params.flocking;

    if !grid.fits(params.cell_size, world) {
        *grid = SpatialGrid::new(params.cell_size, world);
    }

    // (a) Snapshot the previous frame and rebuild the grid from it
    buffers.positions.clear();
    buffers.positions.extend(boids.iter().map(Boid::position));
    buffers.velocities.clear();
    buffers.velocities.extend(boids.iter().map(Boid::velocity));
    grid.rebuild(&buffers.positions);

    // Jitter is drawn sequentially so the parallel path stays reproducible
    let amplitude = flocking.jitter;
    buffers.jitter.clear();
    buffers.jitter.extend((0..boids.len()).map(|_| {
        let x = rng.gen_range(-amplitude..=amplitude);
        let y = rng.gen_range(-amplitude..=amplitude);
        DVec2::new(x, y)
    }));

    // (b) Compute all steering forces from the frozen snapshot
    let thresholds = flocking.thresholds();
    let snapshot = FrameSnapshot {
        world,
        grid: &*grid,
        reach: params.scan_reach(),
        positions: &buffers.positions,
        velocities: &buffers.velocities,
    };

    if params.enable_parallel {
        boids
            .par_iter()
            .enumerate()
            .zip(buffers.jitter.par_iter())
            .map_init(
                || NeighborScratch::with_capacity(SCRATCH_CAPACITY),
                |scratch, ((i, boid), &jitter)| {
                    boid.compute_steering(i, &snapshot, flocking, &thresholds, jitter, scratch)
                },
            )
            .collect_into_vec(&mut buffers.steering);
    } else {
        buffers.steering.clear();
        for (i, boid) in boids.iter().enumerate() {
            let steering = boid.compute_steering(
                i,
                &snapshot,
                flocking,
                &thresholds,
                buffers.jitter[i],
                &mut buffers.scratch,
            );
            buffers.steering.push(steering);
        }
    }

    // Every read is done; commit velocities
    for (boid, steering) in boids.iter_mut().zip(&buffers.steering) {
        boid.apply_steering(steering.force, flocking);
    }

    // (c) Integrate positions
    if params.enable_parallel {
        boids.par_iter_mut().for_each(|boid| boid.move_and_wrap(world));
    } else {
        for boid in boids.iter_mut() {
            boid.move_and_wrap(world);
        }
    }

    let mut stats = FrameStats::summarize(boids, &buffers.steering, started.elapsed());
    stats.max_cell_occupancy = grid.max_occupancy();
    trace!(
        boids = stats.boids,
        candidates = stats.neighbor_candidates,
        max_cell = stats.max_cell_occupancy,
        mean_speed = stats.mean_speed,
        "frame stepped"
    );
    stats
}
