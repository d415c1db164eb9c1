use glam::Mat4;

use crate::config::DemoConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::collision::{CollisionOutcome, CollisionResolver};
use crate::controller::input::{InputEvent, InputProcessor, InputState, MovementFlags};
use crate::controller::motion::{sanitize_dt, MotionIntegrator, MotionReport};
use crate::error::RenderError;
use crate::model::World;

/// Draws one frame from the simulation's transforms.
///
/// Geometry and materials are the renderer's business; the loop only hands
/// over where things are and how the camera sees them.
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError>;

    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Everything a renderer needs for one frame
pub struct FrameView<'a> {
    pub world: &'a World,
    pub view_proj: Mat4,
    pub stats: &'a FrameStats,
    pub collision: CollisionOutcome,
    pub camera_policy: &'static str,
}

impl FrameView<'_> {
    pub fn ball_transform(&self) -> Mat4 {
        self.world.ball.transform()
    }

    pub fn obstacle_transforms(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.world.obstacles.iter().map(|o| o.transform())
    }

    pub fn ground_transform(&self) -> Mat4 {
        self.world.ground_transform()
    }
}

/// Frame timing, with FPS averaged over one-second windows
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub frame_count: u64,
    pub fps: f32,
    pub last_dt: f32,
    window_frames: u32,
    window_time: f32,
}

impl FrameStats {
    fn record(&mut self, dt: f32) {
        self.frame_count += 1;
        self.last_dt = dt;
        self.window_frames += 1;
        self.window_time += dt;
        if self.window_time >= 1.0 {
            self.fps = self.window_frames as f32 / self.window_time;
            self.window_frames = 0;
            self.window_time = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame has run yet
    Idle,
    Running,
}

/// Result of the simulation half of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepSummary {
    pub motion: MotionReport,
    pub collision: CollisionOutcome,
}

/// Per-frame orchestration: dt, motion, collision, camera, render
pub struct FrameLoop {
    state: LoopState,
    last_time: f64,
    max_dt: f32,
    pub stats: FrameStats,
    pub input_processor: InputProcessor,
    pub integrator: MotionIntegrator,
    pub resolver: CollisionResolver,
    pub camera_controller: CameraController,
    last_collision: CollisionOutcome,
}

impl FrameLoop {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            state: LoopState::Idle,
            last_time: 0.0,
            max_dt: config.max_dt,
            stats: FrameStats::default(),
            input_processor: InputProcessor::new(config.key_bindings.clone()),
            integrator: MotionIntegrator::new(config.motion.clone()),
            resolver: CollisionResolver::new(config.collision),
            camera_controller: CameraController::new(config.camera),
            last_collision: CollisionOutcome::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Route a host input event through the key bindings
    pub fn handle_event(&self, input: &mut InputState, event: &InputEvent) {
        self.input_processor.handle_event(input, event);
    }

    /// Seconds since the previous tick. The first tick starts the clock and
    /// returns 0; later ticks are clamped to `[0, max_dt]`.
    pub fn advance_clock(&mut self, now_secs: f64) -> f32 {
        if !now_secs.is_finite() {
            return 0.0;
        }
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                self.last_time = now_secs;
                tracing::info!("frame loop running");
                0.0
            }
            LoopState::Running => {
                let raw = (now_secs - self.last_time) as f32;
                // a clock that jumped backwards restarts from here
                self.last_time = now_secs;
                sanitize_dt(raw).min(self.max_dt)
            }
        }
    }

    /// Simulation half of a tick: integrate, collide, then place the camera.
    pub fn update(&mut self, dt: f32, input: &mut InputState, world: &mut World) -> StepSummary {
        let dt = sanitize_dt(dt);
        let flags = self.input_processor.movement(input);
        let ball_flags = if self.camera_controller.policy.drives_ball() {
            flags
        } else {
            MovementFlags::default()
        };
        // the request stays pending until a frame with elapsed time consumes it
        let jump = dt > 0.0 && input.take_jump();

        let motion = self.integrator.step(&mut world.ball, ball_flags, jump, dt);
        let collision = self.resolver.resolve(&mut world.ball, &world.obstacles, &motion);
        if collision.hit() && !self.last_collision.hit() {
            tracing::debug!(overlaps = collision.overlaps, pos = ?world.ball.position, "ball hit obstacle");
        }
        self.last_collision = collision;

        let look = input.consume_look();
        self.camera_controller.update(&mut world.camera, &world.ball, look, flags, dt);

        StepSummary { motion, collision }
    }

    /// One full frame. Render failures are logged and the loop carries on.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        now_secs: f64,
        input: &mut InputState,
        world: &mut World,
        renderer: &mut R,
    ) -> StepSummary {
        let dt = self.advance_clock(now_secs);
        let summary = self.update(dt, input, world);
        self.stats.record(dt);

        let world: &World = world;
        let frame = FrameView {
            world,
            view_proj: world.camera.view_proj(),
            stats: &self.stats,
            collision: summary.collision,
            camera_policy: self.camera_controller.policy.name(),
        };
        if let Err(e) = renderer.render(&frame) {
            tracing::warn!(error = %e, frame = self.stats.frame_count, "frame not rendered");
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_tick_starts_clock() {
        let mut frame_loop = FrameLoop::new(&DemoConfig::default());
        assert_eq!(frame_loop.state(), LoopState::Idle);
        assert_eq!(frame_loop.advance_clock(12.0), 0.0);
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_relative_eq!(frame_loop.advance_clock(12.016), 0.016, epsilon = 1e-5);
    }

    #[test]
    fn test_clock_anomalies_are_clamped() {
        let mut frame_loop = FrameLoop::new(&DemoConfig::default());
        frame_loop.advance_clock(5.0);
        assert_eq!(frame_loop.advance_clock(4.0), 0.0, "backwards clock");
        assert_relative_eq!(frame_loop.advance_clock(10.0), 0.1, epsilon = 1e-6);
        assert_eq!(frame_loop.advance_clock(f64::NAN), 0.0);
        assert_relative_eq!(frame_loop.advance_clock(10.05), 0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_fps_window() {
        let mut stats = FrameStats::default();
        for _ in 0..60 {
            stats.record(0.02);
        }
        assert_eq!(stats.frame_count, 60);
        assert_relative_eq!(stats.fps, 50.0, epsilon = 0.5);
    }
}
