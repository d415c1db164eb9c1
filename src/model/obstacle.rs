use glam::{Mat4, Vec3};
use crate::model::Aabb;

/// Static box the ball can bump into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl Obstacle {
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self { position, half_extents }
    }

    /// Unit cube resting on the ground plane at (x, z).
    pub fn unit_cube(x: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, 0.5, z), Vec3::splat(0.5))
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.half_extents * 2.0,
            glam::Quat::IDENTITY,
            self.position,
        )
    }
}

/// How obstacles are placed when the world is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleLayout {
    /// Five unit cubes in a row along X, 5 units apart, centred on the origin.
    Row,
    /// Unit cubes scattered over the ground from a seeded generator.
    Scattered { count: usize, seed: u32, half_range: f32 },
}

impl Default for ObstacleLayout {
    fn default() -> Self {
        ObstacleLayout::Row
    }
}

/// Keep scattered boxes away from the spawn point.
const SPAWN_CLEARANCE: f32 = 3.0;

impl ObstacleLayout {
    pub fn build(&self) -> Vec<Obstacle> {
        match *self {
            ObstacleLayout::Row => (0..5)
                .map(|i| Obstacle::unit_cube(i as f32 * 5.0 - 10.0, 0.0))
                .collect(),
            ObstacleLayout::Scattered { count, seed, half_range } => {
                let mut rng = Xorshift32::new(seed);
                let mut obstacles = Vec::with_capacity(count);
                // bounded so a tiny range can't spin forever
                let mut attempts = count * 16;
                while obstacles.len() < count && attempts > 0 {
                    attempts -= 1;
                    let x = rng.next_range(-half_range, half_range);
                    let z = rng.next_range(-half_range, half_range);
                    if x.hypot(z) < SPAWN_CLEARANCE {
                        continue;
                    }
                    obstacles.push(Obstacle::unit_cube(x, z));
                }
                if obstacles.len() < count {
                    tracing::warn!(
                        requested = count,
                        placed = obstacles.len(),
                        "scatter range too small for requested obstacle count"
                    );
                }
                obstacles
            }
        }
    }
}

/// Deterministic xorshift32 generator; same seed, same layout.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { 1 } else { seed } }
    }

    fn next_f32(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x as f32 / u32::MAX as f32
    }

    fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}
