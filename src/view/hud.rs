use egui::Context;
use crate::controller::FrameView;

/// Build the debug overlay for one frame and return egui output
pub fn build_hud(ctx: &Context, raw_input: egui::RawInput, frame: &FrameView<'_>) -> egui::FullOutput {
    ctx.run(raw_input, |ctx| {
        if frame.camera_policy == "freelook" {
            draw_crosshair(ctx);
        }
        draw_debug_window(ctx, frame);
    })
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    painter.line_segment(
        [egui::Pos2::new(center.x - size, center.y), egui::Pos2::new(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::Pos2::new(center.x, center.y - size), egui::Pos2::new(center.x, center.y + size)],
        stroke,
    );
}

fn draw_debug_window(ctx: &Context, frame: &FrameView<'_>) {
    let ball = &frame.world.ball;
    let cam = &frame.world.camera;

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", frame.stats.fps)).small());
            ui.label(
                egui::RichText::new(format!(
                    "Ball: x: {:.2} y: {:.2} z: {:.2}",
                    ball.position.x, ball.position.y, ball.position.z
                ))
                .small(),
            );
            ui.label(
                egui::RichText::new(format!(
                    "Vel: x: {:.2} y: {:.2} z: {:.2}",
                    ball.velocity.x, ball.velocity.y, ball.velocity.z
                ))
                .small(),
            );
            ui.label(egui::RichText::new(if ball.airborne { "Airborne" } else { "Grounded" }).small());
            if frame.collision.hit() {
                ui.label(
                    egui::RichText::new(format!("Blocked by {} obstacle(s)", frame.collision.overlaps))
                        .small()
                        .color(egui::Color32::LIGHT_RED),
                );
            }
            ui.label(
                egui::RichText::new(format!(
                    "Camera: {} yaw: {:.0} pitch: {:.0}",
                    frame.camera_policy,
                    cam.yaw.to_degrees(),
                    cam.pitch.to_degrees()
                ))
                .small(),
            );
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("WASD / Arrows - Move").small());
            ui.label(egui::RichText::new("Space - Jump").small());
            ui.label(egui::RichText::new("Click - Capture mouse, Esc - Release").small());
        });
}
