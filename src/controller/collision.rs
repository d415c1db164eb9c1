use crate::controller::motion::MotionReport;
use crate::model::{Ball, Obstacle};

/// What happens to the ball when its box overlaps an obstacle.
///
/// Neither policy resolves penetration depth or slides along faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionResponse {
    /// Zero horizontal velocity for the frame
    #[default]
    HardStop,
    /// Undo this frame's horizontal displacement on the axes input was driving
    RevertDisplacement,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Number of obstacles overlapping the ball this frame
    pub overlaps: usize,
}

impl CollisionOutcome {
    pub fn hit(&self) -> bool {
        self.overlaps > 0
    }
}

pub struct CollisionResolver {
    pub response: CollisionResponse,
}

impl CollisionResolver {
    pub fn new(response: CollisionResponse) -> Self {
        Self { response }
    }

    /// Test the ball against every obstacle and apply the response once if
    /// anything overlaps. Boxes are rebuilt from current positions each call.
    /// Vertical motion is never touched, so jumping over boxes is allowed.
    pub fn resolve(&self, ball: &mut Ball, obstacles: &[Obstacle], motion: &MotionReport) -> CollisionOutcome {
        let ball_box = ball.aabb();
        let overlaps = obstacles
            .iter()
            .filter(|o| ball_box.intersects(&o.aabb()))
            .count();

        if overlaps == 0 {
            return CollisionOutcome::default();
        }

        match self.response {
            CollisionResponse::HardStop => {
                ball.velocity.x = 0.0;
                ball.velocity.z = 0.0;
            }
            CollisionResponse::RevertDisplacement => {
                if motion.driven.x {
                    ball.position.x -= motion.displacement.x;
                }
                if motion.driven.z {
                    ball.position.z -= motion.displacement.z;
                }
            }
        }
        tracing::trace!(overlaps, response = ?self.response, pos = ?ball.position, "collision");

        CollisionOutcome { overlaps }
    }
}
