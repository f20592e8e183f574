/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors that are in view (or very close)
 * 2. Alignment: Steer towards the average heading of neighbors in view
 * 3. Cohesion: Steer towards the average position of all nearby neighbors
 *
 * All three rules are evaluated in a single pass over the candidates found in
 * the spatial grid, against a frozen snapshot of the previous frame.
 */

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::params::{FlockingParams, SteeringThresholds, EPSILON};
use crate::physics::FrameSnapshot;
use crate::world::World;

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    position: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    alignment_weight_variance: f64,
    cohesion_weight_variance: f64,
}

/// A candidate neighbor with its wrap-corrected offset from the observing boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub offset: DVec2,
    pub distance_squared: f64,
}

/// Reusable buffers for one boid's neighbor scan. Owned by the frame
/// orchestrator (one per worker thread) and cleared before every boid.
#[derive(Debug, Default)]
pub struct NeighborScratch {
    candidates: Vec<usize>,
    neighbors: Vec<Neighbor>,
}

impl NeighborScratch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(capacity),
            neighbors: Vec::with_capacity(capacity),
        }
    }

    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.neighbors.clear();
    }
}

/// Outcome of one boid's steering computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub separation: DVec2,
    pub alignment: DVec2,
    pub cohesion: DVec2,
    /// Weighted, jittered and force-limited sum of the three rules.
    pub force: DVec2,
    pub candidates: usize,
    pub separation_count: usize,
    pub alignment_count: usize,
    pub cohesion_count: usize,
}

impl Boid {
    pub fn new(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: DVec2::ZERO,
            alignment_weight_variance: 1.0,
            cohesion_weight_variance: 1.0,
        }
    }

    pub fn with_weight_variance(mut self, alignment: f64, cohesion: f64) -> Self {
        self.alignment_weight_variance = alignment;
        self.cohesion_weight_variance = cohesion;
        self
    }

    // Spawn at a random spot away from the edges, heading in a random direction
    pub fn random<R: Rng + ?Sized>(world: World, params: &FlockingParams, rng: &mut R) -> Self {
        let margin_x = params.spawn_margin.min(world.width / 2.0);
        let margin_y = params.spawn_margin.min(world.height / 2.0);
        let x = rng.gen_range(margin_x..=world.width - margin_x);
        let y = rng.gen_range(margin_y..=world.height - margin_y);

        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(params.initial_speed.min..=params.initial_speed.max);
        let velocity = DVec2::from_angle(angle) * speed;

        let variance = params.weight_variance;
        let alignment = rng.gen_range(variance.min..=variance.max);
        let cohesion = rng.gen_range(variance.min..=variance.max);

        Self::new(world.wrap_position(DVec2::new(x, y)), velocity)
            .with_weight_variance(alignment, cohesion)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Steering force applied by the most recent update.
    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    /// Direction of travel in radians, for orienting the drawn shape.
    pub fn heading(&self) -> f64 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn alignment_weight_variance(&self) -> f64 {
        self.alignment_weight_variance
    }

    pub fn cohesion_weight_variance(&self) -> f64 {
        self.cohesion_weight_variance
    }

    /// Vertices of a triangle pointing along the heading: the tip sits
    /// `2.5 * size` ahead, the two base corners `size` away at +-2.5 rad.
    pub fn triangle(&self, size: f64) -> [DVec2; 3] {
        let angle = self.heading();
        [
            self.position + DVec2::from_angle(angle) * (size * 2.5),
            self.position + DVec2::from_angle(angle + 2.5) * size,
            self.position + DVec2::from_angle(angle - 2.5) * size,
        ]
    }

    // Integrate position and wrap it back onto the torus
    pub fn move_and_wrap(&mut self, world: World) {
        self.position += self.velocity;
        self.wrap_edges(world);
    }

    pub fn wrap_edges(&mut self, world: World) {
        self.position = world.wrap_position(self.position);
    }

    /// Collect every other boid in the grid neighborhood, with wrapped offsets.
    pub fn gather_neighbors(
        &self,
        index: usize,
        snapshot: &FrameSnapshot,
        scratch: &mut NeighborScratch,
    ) {
        scratch.clear();
        snapshot
            .grid
            .query(self.position, snapshot.reach, &mut scratch.candidates);

        let NeighborScratch {
            candidates,
            neighbors,
        } = scratch;

        for &other in candidates.iter() {
            if other == index {
                continue;
            }
            let offset = snapshot.world.displacement(self.position, snapshot.positions[other]);
            neighbors.push(Neighbor {
                index: other,
                offset,
                distance_squared: offset.length_squared(),
            });
        }
    }

    /// Compute this boid's steering force from the frozen snapshot without
    /// mutating anything but the scratch buffers.
    pub fn compute_steering(
        &self,
        index: usize,
        snapshot: &FrameSnapshot,
        params: &FlockingParams,
        thresholds: &SteeringThresholds,
        jitter: DVec2,
        scratch: &mut NeighborScratch,
    ) -> Steering {
        self.gather_neighbors(index, snapshot, scratch);

        let heading = unit_or(self.velocity, DVec2::X);

        let mut separation_sum = DVec2::ZERO;
        let mut alignment_sum = DVec2::ZERO;
        let mut cohesion_sum = DVec2::ZERO;
        let mut separation_count = 0;
        let mut alignment_count = 0;
        let mut cohesion_count = 0;

        // Process all neighbors in a single pass
        for neighbor in scratch.neighbors() {
            let d_squared = neighbor.distance_squared;

            let in_view = if d_squared > EPSILON {
                neighbor.offset.dot(heading) / d_squared.sqrt() > thresholds.fov_cos
            } else {
                true
            };
            let noticed = in_view || d_squared < thresholds.min_distance_sq;

            // Separation
            if d_squared < thresholds.separation_sq && noticed && d_squared > EPSILON {
                separation_sum -= neighbor.offset / d_squared.sqrt();
                separation_count += 1;
            }

            // Alignment
            if d_squared < thresholds.alignment_sq && noticed {
                alignment_sum += snapshot.velocities[neighbor.index];
                alignment_count += 1;
            }

            // Cohesion ignores the view cone
            if d_squared < thresholds.cohesion_sq {
                cohesion_sum += self.position + neighbor.offset;
                cohesion_count += 1;
            }
        }

        let separation = if separation_count > 0 {
            self.steer_towards(separation_sum / separation_count as f64, params.max_speed)
        } else {
            DVec2::ZERO
        };

        let alignment = if alignment_count > 0 {
            self.steer_towards(alignment_sum / alignment_count as f64, params.max_speed)
        } else {
            DVec2::ZERO
        };

        let cohesion = if cohesion_count > 0 {
            let center = cohesion_sum / cohesion_count as f64;
            self.steer_towards(center - self.position, params.max_speed)
        } else {
            DVec2::ZERO
        };

        let force = separation * params.separation_weight
            + alignment * (params.alignment_weight * self.alignment_weight_variance)
            + cohesion * (params.cohesion_weight * self.cohesion_weight_variance)
            + jitter;

        Steering {
            separation,
            alignment,
            cohesion,
            force: limit(force, params.max_force),
            candidates: scratch.neighbors().len(),
            separation_count,
            alignment_count,
            cohesion_count,
        }
    }

    // Reynolds steering: desired velocity at full speed minus current velocity
    fn steer_towards(&self, desired: DVec2, max_speed: f64) -> DVec2 {
        let length = desired.length();
        if length > EPSILON {
            desired * (max_speed / length) - self.velocity
        } else {
            DVec2::ZERO
        }
    }

    /// Commit a steering force: record it, add it to the velocity and keep
    /// the speed within `[min_speed, max_speed]`.
    pub fn apply_steering(&mut self, force: DVec2, params: &FlockingParams) {
        let previous = self.velocity;
        self.acceleration = force;
        self.velocity += force;

        let speed = self.velocity.length();
        if speed > params.max_speed {
            self.velocity *= params.max_speed / speed;
        } else if speed < params.min_speed {
            // A velocity cancelled to zero keeps its previous direction
            let direction = if speed > EPSILON {
                self.velocity / speed
            } else {
                unit_or(previous, DVec2::X)
            };
            self.velocity = direction * params.min_speed;
        }
    }
}

#[inline]
fn unit_or(v: DVec2, fallback: DVec2) -> DVec2 {
    let length = v.length();
    if length > EPSILON {
        v / length
    } else {
        fallback
    }
}

#[inline]
fn limit(v: DVec2, max: f64) -> DVec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}
