/*
 * Renderer Module
 *
 * Draws each boid as an oriented triangle. World coordinates have their
 * origin in the top-left corner with y pointing down; nannou's origin is the
 * window centre with y pointing up.
 */

use glam::DVec2;
use nannou::prelude::*;

use torus_boids::BOID_SIZE;

use crate::ui;
use crate::Model;

fn to_screen(p: DVec2, width: f64, height: f64) -> Point2 {
    pt2((p.x - width / 2.0) as f32, (height / 2.0 - p.y) as f32)
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let params = model.flock.params();
    let (width, height) = (params.world_width, params.world_height);

    for boid in model.flock.boids() {
        let points = boid.triangle(BOID_SIZE).map(|p| to_screen(p, width, height));
        draw.polygon().color(rgb(173u8, 216, 230)).points(points);
    }

    if params.show_debug {
        // Spatial grid cell boundaries
        let grid = model.flock.grid();
        let grid_color = rgba(1.0, 1.0, 1.0, 0.08);
        for col in 1..grid.cols() {
            let x = col as f64 * grid.cell_size();
            draw.line()
                .start(to_screen(DVec2::new(x, 0.0), width, height))
                .end(to_screen(DVec2::new(x, height), width, height))
                .color(grid_color);
        }
        for row in 1..grid.rows() {
            let y = row as f64 * grid.cell_size();
            draw.line()
                .start(to_screen(DVec2::new(0.0, y), width, height))
                .end(to_screen(DVec2::new(width, y), width, height))
                .color(grid_color);
        }

        if let Some(first) = model.flock.boids().first() {
            let centre = to_screen(first.position(), width, height);
            let flocking = &params.flocking;

            // Interaction radii of the first boid
            for (radius, color) in [
                (flocking.separation_distance, RED),
                (flocking.alignment_distance, GREEN),
                (flocking.cohesion_distance, BLUE),
            ] {
                draw.ellipse()
                    .xy(centre)
                    .radius(radius as f32)
                    .no_fill()
                    .stroke(color)
                    .stroke_weight(1.0);
            }

            let tip = to_screen(first.position() + first.velocity() * 5.0, width, height);
            draw.arrow().start(centre).end(tip).color(YELLOW).stroke_weight(2.0);
        }

        let window_rect = app.window_rect();
        let margin = 20.0;
        let line_height = 20.0;
        for (i, text) in ui::debug_lines(model.flock.last_stats(), model.fps).iter().enumerate() {
            draw.text(text)
                .x_y(
                    window_rect.left() + margin + 100.0,
                    window_rect.top() - margin - i as f32 * line_height,
                )
                .w(200.0)
                .left_justify()
                .color(WHITE)
                .font_size(14);
        }
    }

    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}
