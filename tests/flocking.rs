use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use torus_boids::{
    create_population, step, Boid, ConfigError, Flock, FlockingParams, SimulationParams,
    SpatialGrid, StepBuffers, World,
};

/// Parameters with jitter switched off so single steps are predictable
pub fn quiet_params() -> SimulationParams {
    SimulationParams {
        seed: Some(1),
        enable_parallel: false,
        flocking: FlockingParams {
            jitter: 0.0,
            ..FlockingParams::default()
        },
        ..SimulationParams::default()
    }
}

/// Run `frames` steps of a fresh seeded population
pub fn simulate(params: &SimulationParams, seed: u64, frames: usize) -> Vec<Vec<Boid>> {
    let world = params.world();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut boids = create_population(params.num_boids, world, &params.flocking, &mut rng);
    let mut grid = SpatialGrid::new(params.cell_size, world);
    let mut buffers = StepBuffers::default();

    let mut history = Vec::with_capacity(frames);
    for _ in 0..frames {
        step(&mut boids, &mut grid, params, &mut rng, &mut buffers);
        history.push(boids.clone());
    }
    history
}

// ==================================================================================
// Configuration
// ==================================================================================

#[test]
fn bundled_config_loads_and_matches_defaults() {
    let params = SimulationParams::from_yaml_str(include_str!("../config/flock.yaml")).unwrap();
    let defaults = SimulationParams::default();

    assert_eq!(params.flocking, defaults.flocking);
    assert_eq!(params.world(), World::new(800.0, 600.0));
    assert_eq!(params.seed, Some(20240601));
}

#[test]
fn flock_rejects_structurally_invalid_config() {
    let too_small = SimulationParams {
        cell_size: 10.0,
        ..SimulationParams::default()
    };
    assert!(matches!(Flock::new(too_small), Err(ConfigError::CellTooSmall { .. })));

    let mut negative = SimulationParams::default();
    negative.flocking.min_speed = -0.5;
    assert!(matches!(Flock::new(negative), Err(ConfigError::NonPositive { .. })));
}

// ==================================================================================
// Invariants over many frames
// ==================================================================================

#[test]
fn positions_stay_on_the_torus_and_speeds_in_bounds() {
    let params = SimulationParams {
        num_boids: 250,
        ..SimulationParams::default()
    };
    let world = params.world();
    let limits = &params.flocking;

    for frame in simulate(&params, 17, 120) {
        for boid in &frame {
            let p = boid.position();
            assert!(p.x >= 0.0 && p.x < world.width, "x out of range: {}", p.x);
            assert!(p.y >= 0.0 && p.y < world.height, "y out of range: {}", p.y);

            let speed = boid.velocity().length();
            assert!(speed >= limits.min_speed - 1e-9 && speed <= limits.max_speed + 1e-9);
            assert!(boid.acceleration().length() <= limits.max_force + 1e-12);
        }
    }
}

#[test]
fn identical_seeds_give_bit_identical_trajectories() {
    let params = SimulationParams {
        num_boids: 150,
        ..SimulationParams::default()
    };
    assert_eq!(simulate(&params, 5, 50), simulate(&params, 5, 50));
}

#[test]
fn weight_variances_never_change() {
    let params = SimulationParams {
        num_boids: 50,
        ..SimulationParams::default()
    };
    let history = simulate(&params, 23, 30);
    let first = &history[0];
    let last = &history[history.len() - 1];

    for (a, b) in first.iter().zip(last) {
        assert_eq!(a.alignment_weight_variance(), b.alignment_weight_variance());
        assert_eq!(a.cohesion_weight_variance(), b.cohesion_weight_variance());
    }
}

// ==================================================================================
// Scenarios
// ==================================================================================

#[test]
fn boids_across_the_edge_repel_through_the_short_path() {
    // Facing each other across x = 0
    let boids = vec![
        Boid::new(DVec2::new(5.0, 300.0), DVec2::new(-2.0, 0.0)),
        Boid::new(DVec2::new(795.0, 300.0), DVec2::new(2.0, 0.0)),
    ];
    let mut flock = Flock::with_boids(quiet_params(), boids).unwrap();
    flock.step();

    // Each is pushed back towards the world interior
    assert!(flock.boids()[0].acceleration().x > 0.0);
    assert!(flock.boids()[1].acceleration().x < 0.0);
}

#[test]
fn lone_boid_moves_in_a_straight_line_without_jitter() {
    let boids = vec![Boid::new(DVec2::new(100.0, 100.0), DVec2::new(1.5, 0.5))];
    let mut flock = Flock::with_boids(quiet_params(), boids).unwrap();
    for _ in 0..10 {
        flock.step();
    }

    let boid = &flock.boids()[0];
    assert_eq!(boid.acceleration(), DVec2::ZERO);
    assert_eq!(boid.velocity(), DVec2::new(1.5, 0.5));
    assert!((boid.position() - DVec2::new(115.0, 105.0)).length() < 1e-9);
}

#[test]
fn lone_boid_acceleration_is_bounded_jitter() {
    let params = SimulationParams {
        seed: Some(77),
        ..SimulationParams::default()
    };
    let boids = vec![Boid::new(DVec2::new(400.0, 300.0), DVec2::new(2.0, 0.0))];
    let mut flock = Flock::with_boids(params, boids).unwrap();

    for _ in 0..50 {
        let stats = flock.step();
        assert_eq!(stats.mean_cohesion_neighbors, 0.0);
        let a = flock.boids()[0].acceleration();
        assert!(a.length() <= 0.045 + 1e-12);
        assert!(a.x.abs() <= 0.05 && a.y.abs() <= 0.05);
    }
}

#[test]
fn very_close_neighbor_behind_is_avoided() {
    // Follower 5 units behind the leader's tail, both heading +x
    let boids = vec![
        Boid::new(DVec2::new(300.0, 300.0), DVec2::new(2.0, 0.0)),
        Boid::new(DVec2::new(295.0, 300.0), DVec2::new(2.0, 0.0)),
    ];
    let mut flock = Flock::with_boids(quiet_params(), boids).unwrap();
    flock.step();

    // Leader sees the follower only because it is inside min_distance
    let leader = flock.last_steering()[0];
    assert_eq!(leader.separation_count, 1);
    assert!(leader.separation.x > 0.0);
    assert_eq!(flock.last_stats().mean_separation_neighbors, 1.0);
}

#[test]
fn cohesion_pulls_distant_pair_together() {
    let boids = vec![
        Boid::new(DVec2::new(300.0, 300.0), DVec2::new(0.0, 2.0)),
        Boid::new(DVec2::new(380.0, 300.0), DVec2::new(0.0, 2.0)),
    ];
    let mut flock = Flock::with_boids(quiet_params(), boids).unwrap();
    let start = flock.boids()[1].position().x - flock.boids()[0].position().x;
    for _ in 0..20 {
        flock.step();
    }
    let end = flock.boids()[1].position().x - flock.boids()[0].position().x;
    assert!(end < start);
}

#[test]
fn cohesion_reaches_across_a_partial_column() {
    // 810 wide: the last grid column is only 10 units wide
    let params = SimulationParams {
        world_width: 810.0,
        ..quiet_params()
    };
    let boids = vec![
        Boid::new(DVec2::new(1.0, 300.0), DVec2::new(0.0, 2.0)),
        Boid::new(DVec2::new(711.5, 300.0), DVec2::new(0.0, 2.0)),
    ];
    let mut flock = Flock::with_boids(params, boids).unwrap();
    flock.step();

    // Wrapped distance is 99.5, inside the cohesion radius
    let steering = flock.last_steering();
    assert_eq!(steering[0].cohesion_count, 1);
    assert_eq!(steering[1].cohesion_count, 1);
}
