use glam::{Vec2, Vec3};
use crate::controller::input::MovementFlags;
use crate::model::Ball;

/// How the vertical jump arc is integrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpModel {
    /// `v.y += gravity * dt`, frame-rate independent
    #[default]
    Gravity,
    /// Fixed per-frame launch step with a constant per-frame decrement.
    /// Frame-rate dependent; reproduces the first jump demo exactly.
    FixedDecrement,
}

/// Tuning for ball movement. Units are world units and seconds unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    /// Horizontal acceleration while a movement key is held (u/s²)
    pub acceleration: f32,
    /// Horizontal velocity decay rate (1/s)
    pub damping_rate: f32,
    /// Vertical acceleration, negative is down (u/s²)
    pub gravity: f32,
    /// Launch speed for the gravity model (u/s)
    pub jump_speed: f32,
    pub jump_model: JumpModel,
    /// Launch step for the fixed-decrement model (u/frame)
    pub fixed_jump_step: f32,
    /// Per-frame decrement for the fixed-decrement model (u/frame²)
    pub fixed_decrement: f32,
    pub max_fall_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            acceleration: 300.0,
            damping_rate: 10.0,
            gravity: -9.8,
            jump_speed: 5.0,
            jump_model: JumpModel::Gravity,
            fixed_jump_step: 0.5,
            fixed_decrement: 0.05,
            max_fall_speed: 50.0,
        }
    }
}

/// Horizontal axes that input pushed on this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrivenAxes {
    pub x: bool,
    pub z: bool,
}

/// What the integrator did this frame, consumed by the collision step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReport {
    /// Horizontal displacement applied this frame (y is always 0)
    pub displacement: Vec3,
    pub driven: DrivenAxes,
    pub jumped: bool,
    pub landed: bool,
}

/// Unit (or zero) direction on the ground plane from opposed key pairs.
///
/// `x` is world X (right), `y` is world Z; forward is -Z.
pub fn input_direction(flags: MovementFlags) -> Vec2 {
    let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
    let dir = Vec2::new(
        axis(flags.right, flags.left),
        axis(flags.backward, flags.forward),
    );
    dir.normalize_or_zero()
}

/// Treat clock anomalies (negative, NaN, infinite) as no elapsed time
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Integrates ball velocity and position from input
pub struct MotionIntegrator {
    pub config: MotionConfig,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// One full motion step: input acceleration, horizontal integration with
    /// damping, then the jump state machine and ground clamp.
    ///
    /// A zero `dt` leaves the ball untouched.
    pub fn step(
        &self,
        ball: &mut Ball,
        movement: MovementFlags,
        jump_requested: bool,
        dt: f32,
    ) -> MotionReport {
        let dt = sanitize_dt(dt);
        if dt == 0.0 {
            return MotionReport::default();
        }

        let dir = input_direction(movement);
        self.apply_input(ball, dir, dt);
        let displacement = self.integrate_horizontal(ball, dt);
        let (jumped, landed) = self.integrate_vertical(ball, jump_requested, dt);

        MotionReport {
            displacement,
            driven: DrivenAxes { x: dir.x != 0.0, z: dir.y != 0.0 },
            jumped,
            landed,
        }
    }

    /// `v += dir * accel * dt` on the ground plane
    pub fn apply_input(&self, ball: &mut Ball, dir: Vec2, dt: f32) {
        let dv = dir * self.config.acceleration * dt;
        ball.velocity.x += dv.x;
        ball.velocity.z += dv.y;
    }

    /// Moves the ball horizontally by `v * dt`, then damps horizontal velocity.
    /// Returns the displacement applied.
    pub fn integrate_horizontal(&self, ball: &mut Ball, dt: f32) -> Vec3 {
        let displacement = Vec3::new(ball.velocity.x * dt, 0.0, ball.velocity.z * dt);
        ball.position += displacement;

        // first-order decay; clamped so a long frame stops rather than reverses
        let factor = (1.0 - self.config.damping_rate * dt).max(0.0);
        ball.velocity.x *= factor;
        ball.velocity.z *= factor;

        displacement
    }

    /// Grounded/Airborne state machine. Returns (jumped, landed).
    ///
    /// The jump request is checked against the state at the start of the
    /// frame; the ground clamp runs last, so landing wins over a request made
    /// in the same frame.
    pub fn integrate_vertical(&self, ball: &mut Ball, jump_requested: bool, dt: f32) -> (bool, bool) {
        let cfg = &self.config;
        let mut jumped = false;

        if jump_requested && !ball.airborne {
            ball.airborne = true;
            ball.velocity.y = match cfg.jump_model {
                JumpModel::Gravity => cfg.jump_speed,
                JumpModel::FixedDecrement => cfg.fixed_jump_step,
            };
            jumped = true;
            tracing::debug!(pos = ?ball.position, "jump");
        }

        if ball.airborne {
            match cfg.jump_model {
                JumpModel::Gravity => {
                    ball.velocity.y = (ball.velocity.y + cfg.gravity * dt).max(-cfg.max_fall_speed);
                    ball.position.y += ball.velocity.y * dt;
                }
                JumpModel::FixedDecrement => {
                    ball.velocity.y -= cfg.fixed_decrement;
                    ball.position.y += ball.velocity.y;
                }
            }
        }

        let was_airborne = ball.airborne;
        let rest = ball.rest_height();
        if ball.position.y <= rest {
            ball.position.y = rest;
            ball.velocity.y = 0.0;
            ball.airborne = false;
        }

        (jumped, was_airborne && !ball.airborne)
    }
}
