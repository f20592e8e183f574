/*
 * World Module
 *
 * The simulation plane is a torus: the left edge is identified with the right
 * edge and the top with the bottom. Every displacement between two boids goes
 * through `wrap_delta` so that boids near opposite edges see each other as
 * neighbors.
 */

use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Shortest signed displacement equivalent to `delta` on the torus.
    #[inline]
    pub fn wrap_delta(&self, delta: DVec2) -> DVec2 {
        DVec2::new(
            wrap_axis_delta(delta.x, self.width),
            wrap_axis_delta(delta.y, self.height),
        )
    }

    /// Displacement from `from` to `to`, wrap-corrected.
    #[inline]
    pub fn displacement(&self, from: DVec2, to: DVec2) -> DVec2 {
        self.wrap_delta(to - from)
    }

    // Bring a point back into [0, width) x [0, height)
    #[inline]
    pub fn wrap_position(&self, position: DVec2) -> DVec2 {
        DVec2::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    pub fn contains(&self, position: DVec2) -> bool {
        (0.0..self.width).contains(&position.x) && (0.0..self.height).contains(&position.y)
    }
}

#[inline]
fn wrap_axis_delta(d: f64, extent: f64) -> f64 {
    let half = extent / 2.0;
    if d > half {
        d - extent
    } else if d < -half {
        d + extent
    } else {
        d
    }
}

#[inline]
fn wrap_axis(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid of a tiny negative value rounds up to exactly `extent`
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
