// MODEL: simulation state
pub mod aabb;
pub mod ball;
pub mod camera;
pub mod obstacle;
pub mod world;

pub use aabb::Aabb;
pub use ball::Ball;
pub use camera::Camera;
pub use obstacle::{Obstacle, ObstacleLayout};
pub use world::{World, GROUND_HALF_SIZE};
