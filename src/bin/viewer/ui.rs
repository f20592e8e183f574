/*
 * UI Module
 *
 * Simulation controls drawn with nannou_egui. The panel edits a copy of the
 * parameters; the caller decides whether the edited copy is applied.
 */

use nannou_egui::{egui, Egui};

use torus_boids::{FrameStats, SimulationParams};

#[derive(Debug, Default, Clone, Copy)]
pub struct UiActions {
    pub reset: bool,
    pub single_step: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    stats: &FrameStats,
    fps: f32,
) -> UiActions {
    let mut actions = UiActions::default();
    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Boid Parameters", |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut params.num_boids,
                        SimulationParams::get_num_boids_range(),
                    )
                    .text("Number of Boids"),
                );
                if ui.button("Reset Boids").clicked() {
                    actions.reset = true;
                }
                let flocking = &mut params.flocking;
                ui.add(
                    egui::Slider::new(&mut flocking.max_speed, SimulationParams::get_speed_range())
                        .text("Max Speed"),
                );
                ui.add(
                    egui::Slider::new(&mut flocking.min_speed, SimulationParams::get_speed_range())
                        .text("Min Speed"),
                );
                ui.add(
                    egui::Slider::new(&mut flocking.max_force, SimulationParams::get_force_range())
                        .text("Max Force"),
                );
            });

            ui.collapsing("Flocking Behavior", |ui| {
                let flocking = &mut params.flocking;
                ui.add(
                    egui::Slider::new(
                        &mut flocking.separation_weight,
                        SimulationParams::get_weight_range(),
                    )
                    .text("Separation Weight"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.alignment_weight,
                        SimulationParams::get_weight_range(),
                    )
                    .text("Alignment Weight"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.cohesion_weight,
                        SimulationParams::get_weight_range(),
                    )
                    .text("Cohesion Weight"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.separation_distance,
                        SimulationParams::get_radius_range(),
                    )
                    .text("Separation Radius"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.alignment_distance,
                        SimulationParams::get_radius_range(),
                    )
                    .text("Alignment Radius"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.cohesion_distance,
                        SimulationParams::get_radius_range(),
                    )
                    .text("Cohesion Radius"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut flocking.alignment_fov_degrees,
                        SimulationParams::get_fov_range(),
                    )
                    .text("Field of View"),
                );
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");
                ui.separator();
                ui.label(format!("FPS: {:.1}", fps));
                ui.label(format!("Step time: {:.2} ms", stats.elapsed.as_secs_f64() * 1000.0));
                ui.label(format!("Grid candidates: {}", stats.neighbor_candidates));
                ui.label(format!("Fullest cell: {}", stats.max_cell_occupancy));
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.horizontal(|ui| {
                ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
                if params.pause_simulation && ui.button("Step").clicked() {
                    actions.single_step = true;
                }
            });
        });

    actions
}

pub fn debug_lines(stats: &FrameStats, fps: f32) -> [String; 6] {
    [
        format!("FPS: {:.1}", fps),
        format!("Frame: {}", stats.frame),
        format!("Boids: {}", stats.boids),
        format!("Mean speed: {:.2}", stats.mean_speed),
        format!(
            "Neighbors sep/ali/coh: {:.1} / {:.1} / {:.1}",
            stats.mean_separation_neighbors,
            stats.mean_alignment_neighbors,
            stats.mean_cohesion_neighbors
        ),
        format!("Max force: {:.4}", stats.max_force),
    ]
}
