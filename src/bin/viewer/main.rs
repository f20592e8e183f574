/*
 * Boid Flocking Simulation - Viewer
 *
 * Opens a window the size of the world and runs one simulation step per
 * update. The simulation controls panel adjusts the flocking parameters live;
 * every change is validated before the flock picks it up.
 *
 * Build with `cargo run --release --features viewer --bin viewer [config.yaml]`.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, warn};

use torus_boids::{Flock, SimulationParams};

mod renderer;
mod ui;

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub egui: Egui,
    pub fps: f32,
}

fn main() {
    init_tracing();
    nannou::app(model).update(update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_params() -> SimulationParams {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationParams::default();
    };
    match SimulationParams::load(&path) {
        Ok(params) => params,
        Err(err) => {
            error!(%err, %path, "could not load configuration");
            std::process::exit(1);
        }
    }
}

fn model(app: &App) -> Model {
    let params = load_params();

    // Create the main window with the world's size
    let window_id = app
        .new_window()
        .title("Boid Flocking Simulation")
        .size(params.world_width as u32, params.world_height as u32)
        .view(renderer::view)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let flock = match Flock::new(params) {
        Ok(flock) => flock,
        Err(err) => {
            error!(%err, "invalid simulation parameters");
            std::process::exit(1);
        }
    };

    Model {
        flock,
        egui,
        fps: 0.0,
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    model.fps = app.fps();

    let mut params = model.flock.params().clone();
    let actions = ui::update_ui(
        &mut model.egui,
        &mut params,
        model.flock.last_stats(),
        model.fps,
    );

    if params != *model.flock.params() {
        if let Err(err) = model.flock.set_params(params) {
            warn!(%err, "ignoring parameter change");
        }
    }

    if actions.reset {
        model.flock.reset();
    }

    if !model.flock.params().pause_simulation || actions.single_step {
        model.flock.step();
    }
}

// Handle raw window events for egui
fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
