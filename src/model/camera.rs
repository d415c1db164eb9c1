use glam::{Mat4, Vec3};

/// Slightly less than π/2 to avoid gimbal lock when building the view basis
const PITCH_LIMIT: f32 = 1.5533;

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Explicit point to look at; `None` means look along yaw/pitch.
    pub look_target: Option<Vec3>,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut cam = Self {
            eye: Vec3::new(0.0, 5.0, 10.0),
            yaw: 0.0,
            pitch: 0.0,
            look_target: None,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            aspect: 1.0,
            z_near: 0.1,
            z_far: 1000.0,
        };
        cam.set_aspect(width, height);
        cam.set_look_at(Vec3::ZERO);
        cam
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    pub fn target(&self) -> Vec3 {
        self.look_target.unwrap_or_else(|| self.eye + self.forward())
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        // a minimized window reports 0x0
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target(), self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * self.view()
    }

    /// Aim at `target` and keep yaw/pitch in sync with the new direction.
    pub fn set_look_at(&mut self, target: Vec3) {
        let dir = target - self.eye;
        if dir.length_squared() > f32::EPSILON {
            let dir = dir.normalize();
            self.yaw = dir.z.atan2(dir.x);
            self.pitch = dir.y.asin();
        }
        self.look_target = Some(target);
    }

    /// Drop any look target and steer by yaw/pitch only.
    pub fn release_look_at(&mut self) {
        self.look_target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_camera_looks_at_origin() {
        let cam = Camera::new(800, 600);
        assert_eq!(cam.eye, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(cam.target(), Vec3::ZERO);
        assert_relative_eq!(cam.aspect, 800.0 / 600.0);

        // forward from yaw/pitch agrees with the look direction
        let expected = (Vec3::ZERO - cam.eye).normalize();
        let fwd = cam.forward();
        assert_relative_eq!(fwd.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(fwd.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(fwd.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_size_keeps_previous_aspect() {
        let mut cam = Camera::new(1280, 720);
        cam.set_aspect(0, 0);
        assert_relative_eq!(cam.aspect, 1280.0 / 720.0);
    }

    #[test]
    fn test_release_look_at_follows_yaw() {
        let mut cam = Camera::new(800, 600);
        cam.release_look_at();
        cam.yaw = 0.0;
        cam.pitch = 0.0;
        assert_relative_eq!(cam.target().x, cam.eye.x + 1.0, epsilon = 1e-6);
        assert_relative_eq!(cam.right().z, 1.0, epsilon = 1e-6);
    }
}
