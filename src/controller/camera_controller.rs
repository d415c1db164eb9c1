use glam::Vec3;
use std::f32::consts::FRAC_PI_2;
use crate::controller::input::MovementFlags;
use crate::model::{Ball, Camera};

/// Camera behaviour, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPolicy {
    /// Constant offset from the ball, always looking at it
    FixedOffset { offset: Vec3 },
    /// Circles the ball; horizontal mouse motion turns the orbit
    OrbitFollow { radius: f32, height: f32 },
    /// Detached fly camera steered by mouse and movement keys
    FreeLook { move_speed: f32 },
}

impl Default for CameraPolicy {
    fn default() -> Self {
        // camera at (0, 5, 10) with the ball resting at (0, 1, 0)
        CameraPolicy::FixedOffset { offset: Vec3::new(0.0, 4.0, 10.0) }
    }
}

impl CameraPolicy {
    pub fn orbit() -> Self {
        CameraPolicy::OrbitFollow { radius: 10.0, height: 4.0 }
    }

    pub fn free_look() -> Self {
        CameraPolicy::FreeLook { move_speed: 10.0 }
    }

    /// Whether movement keys steer the ball. Free-look spends them on the camera.
    pub fn drives_ball(&self) -> bool {
        !matches!(self, CameraPolicy::FreeLook { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CameraPolicy::FixedOffset { .. } => "fixed",
            CameraPolicy::OrbitFollow { .. } => "orbit",
            CameraPolicy::FreeLook { .. } => "freelook",
        }
    }
}

/// Produces the camera transform each frame from the ball and look input
pub struct CameraController {
    pub policy: CameraPolicy,
    pub mouse_sensitivity: f32,
    orbit_yaw: f32,
}

impl CameraController {
    pub fn new(policy: CameraPolicy) -> Self {
        Self {
            policy,
            mouse_sensitivity: 0.002,
            orbit_yaw: 0.0,
        }
    }

    pub fn orbit_yaw(&self) -> f32 {
        self.orbit_yaw
    }

    pub fn update(
        &mut self,
        camera: &mut Camera,
        ball: &Ball,
        look: (f32, f32),
        movement: MovementFlags,
        dt: f32,
    ) {
        match self.policy {
            CameraPolicy::FixedOffset { offset } => {
                camera.eye = ball.position + offset;
                camera.set_look_at(ball.position);
            }
            CameraPolicy::OrbitFollow { radius, height } => {
                // mouse right swings the view right
                self.orbit_yaw -= look.0 * self.mouse_sensitivity;
                let arm = Vec3::new(radius * self.orbit_yaw.sin(), height, radius * self.orbit_yaw.cos());
                camera.eye = ball.position + arm;
                camera.set_look_at(ball.position);
            }
            CameraPolicy::FreeLook { move_speed } => {
                camera.release_look_at();
                self.apply_look(camera, look.0, look.1);
                self.update_movement(camera, movement, move_speed * dt);
            }
        }
    }

    /// Apply mouse look delta to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        camera.yaw += dx * self.mouse_sensitivity;
        camera.pitch = (camera.pitch - dy * self.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Fly along the camera's own basis
    pub fn update_movement(&self, camera: &mut Camera, movement: MovementFlags, distance: f32) {
        let forward = camera.forward();
        let right = camera.right();
        let mut cam_move = Vec3::ZERO;

        if movement.forward {
            cam_move += forward;
        }
        if movement.backward {
            cam_move -= forward;
        }
        if movement.left {
            cam_move -= right;
        }
        if movement.right {
            cam_move += right;
        }

        if cam_move.length_squared() > 0.0 {
            camera.eye += cam_move.normalize() * distance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ball_at(pos: Vec3) -> Ball {
        let mut ball = Ball::default();
        ball.position = pos;
        ball
    }

    #[test]
    fn test_fixed_offset_tracks_ball() {
        let mut controller = CameraController::new(CameraPolicy::default());
        let mut camera = Camera::new(800, 600);
        let ball = ball_at(Vec3::new(3.0, 1.0, -2.0));

        controller.update(&mut camera, &ball, (50.0, 20.0), MovementFlags::default(), 0.016);
        assert_eq!(camera.eye, Vec3::new(3.0, 5.0, 8.0));
        assert_eq!(camera.target(), ball.position);
    }

    #[test]
    fn test_orbit_accumulates_yaw_and_keeps_distance() {
        let mut controller = CameraController::new(CameraPolicy::orbit());
        let mut camera = Camera::new(800, 600);
        let ball = ball_at(Vec3::new(1.0, 1.0, 1.0));

        controller.update(&mut camera, &ball, (0.0, 0.0), MovementFlags::default(), 0.016);
        assert_relative_eq!(camera.eye.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, 11.0, epsilon = 1e-5);

        // a quarter turn worth of mouse motion
        let dx = FRAC_PI_2 / controller.mouse_sensitivity;
        controller.update(&mut camera, &ball, (dx, 0.0), MovementFlags::default(), 0.016);
        assert_relative_eq!(controller.orbit_yaw(), -FRAC_PI_2, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.x, -9.0, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.y, 5.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, 1.0, epsilon = 1e-4);

        let flat = Vec3::new(camera.eye.x - ball.position.x, 0.0, camera.eye.z - ball.position.z);
        assert_relative_eq!(flat.length(), 10.0, epsilon = 1e-4);
        assert_eq!(camera.target(), ball.position);
    }

    #[test]
    fn test_free_look_clamps_pitch() {
        let mut controller = CameraController::new(CameraPolicy::free_look());
        let mut camera = Camera::new(800, 600);
        let ball = Ball::default();

        controller.update(&mut camera, &ball, (0.0, -100_000.0), MovementFlags::default(), 0.016);
        assert_relative_eq!(camera.pitch, FRAC_PI_2);
        controller.update(&mut camera, &ball, (0.0, 100_000.0), MovementFlags::default(), 0.016);
        assert_relative_eq!(camera.pitch, -FRAC_PI_2);
        assert!(camera.look_target.is_none());
    }

    #[test]
    fn test_free_look_flies_independently_of_ball() {
        let mut controller = CameraController::new(CameraPolicy::free_look());
        let mut camera = Camera::new(800, 600);
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        let start = camera.eye;
        let ball = ball_at(Vec3::new(-20.0, 1.0, 7.0));

        let movement = MovementFlags { forward: true, right: true, ..MovementFlags::default() };
        controller.update(&mut camera, &ball, (0.0, 0.0), movement, 0.5);

        // 10 u/s for half a second along the normalized diagonal of +X and +Z
        let moved = camera.eye - start;
        assert_relative_eq!(moved.length(), 5.0, epsilon = 1e-4);
        assert_relative_eq!(moved.x, moved.z, epsilon = 1e-4);
        assert!(moved.x > 0.0);
        assert!(!CameraPolicy::free_look().drives_ball());
    }
}
