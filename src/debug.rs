/*
 * Debug Information Module
 *
 * This module defines the FrameStats struct that summarizes one simulation
 * step. It is logged by the headless runner and shown by the viewer overlay.
 *
 * Includes metrics for:
 * - Frame number and population
 * - Grid candidates scanned, the fullest cell and neighbors used by each rule
 * - Average speed and the strongest steering force applied
 * - Wall-clock time spent in the step
 */

use std::time::Duration;

use crate::boid::{Boid, Steering};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub boids: usize,
    pub neighbor_candidates: usize,
    pub max_cell_occupancy: usize,
    pub mean_separation_neighbors: f64,
    pub mean_alignment_neighbors: f64,
    pub mean_cohesion_neighbors: f64,
    pub mean_speed: f64,
    pub max_force: f64,
    pub elapsed: Duration,
}

impl FrameStats {
    pub fn summarize(boids: &[Boid], steering: &[Steering], elapsed: Duration) -> Self {
        if boids.is_empty() {
            return Self {
                elapsed,
                ..Self::default()
            };
        }

        let n = boids.len() as f64;
        let mut stats = Self {
            boids: boids.len(),
            elapsed,
            ..Self::default()
        };

        for s in steering {
            stats.neighbor_candidates += s.candidates;
            stats.mean_separation_neighbors += s.separation_count as f64;
            stats.mean_alignment_neighbors += s.alignment_count as f64;
            stats.mean_cohesion_neighbors += s.cohesion_count as f64;
            stats.max_force = stats.max_force.max(s.force.length());
        }
        stats.mean_separation_neighbors /= n;
        stats.mean_alignment_neighbors /= n;
        stats.mean_cohesion_neighbors /= n;
        stats.mean_speed = boids.iter().map(|b| b.velocity().length()).sum::<f64>() / n;

        stats
    }
}
