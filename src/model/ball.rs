use glam::{Mat4, Vec3};
use crate::model::Aabb;

/// The player-controlled sphere
#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub airborne: bool,
}

impl Ball {
    /// A ball of the given radius resting on the ground plane at (x, z).
    pub fn new(radius: f32, x: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, radius, z),
            velocity: Vec3::ZERO,
            radius,
            airborne: false,
        }
    }

    /// Height of the centre when the ball sits on the ground (y = 0).
    pub fn rest_height(&self) -> f32 {
        self.radius
    }

    pub fn is_grounded(&self) -> bool {
        !self.airborne
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(self.radius))
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.radius),
            glam::Quat::IDENTITY,
            self.position,
        )
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}
