use glam::{Mat4, Vec3};
use crate::model::{Ball, Camera, Obstacle, ObstacleLayout};

/// Half the side of the square ground plane (a 50x50 plane)
pub const GROUND_HALF_SIZE: f32 = 25.0;

/// The whole simulation: one ball, fixed obstacles, ground and camera.
///
/// Every per-frame step borrows this mutably; nothing else holds scene state.
pub struct World {
    pub ball: Ball,
    pub obstacles: Vec<Obstacle>,
    pub ground_half_size: f32,
    pub camera: Camera,
}

impl World {
    pub fn new(layout: &ObstacleLayout, width: u32, height: u32) -> Self {
        let obstacles = layout.build();
        tracing::info!(count = obstacles.len(), ?layout, "obstacles placed");
        Self {
            ball: Ball::default(),
            obstacles,
            ground_half_size: GROUND_HALF_SIZE,
            camera: Camera::new(width, height),
        }
    }

    /// Ground quad lies in the XZ plane; the renderer's plane mesh is unit sized.
    pub fn ground_transform(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.ground_half_size * 2.0, 1.0, self.ground_half_size * 2.0))
    }
}
