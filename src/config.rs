//! Startup configuration.
//!
//! The defaults are a fixed-offset camera, hard-stop
//! collisions, gravity jumps and a row of five boxes. Native builds read
//! overrides from `ROLLBALL_*` environment variables, web builds from the page
//! query string. The chosen policies stay fixed for the whole session.

use crate::controller::{CameraPolicy, CollisionResponse, JumpModel, KeyBindings, MotionConfig};
use crate::model::ObstacleLayout;

/// Default seed for `scatter` without an explicit seed
const DEFAULT_SCATTER_SEED: u32 = 1337;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub camera: CameraPolicy,
    pub collision: CollisionResponse,
    pub motion: MotionConfig,
    pub obstacles: ObstacleLayout,
    pub key_bindings: KeyBindings,
    /// Upper bound on a single frame's dt (s)
    pub max_dt: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            camera: CameraPolicy::default(),
            collision: CollisionResponse::default(),
            motion: MotionConfig::default(),
            obstacles: ObstacleLayout::default(),
            key_bindings: KeyBindings::default(),
            max_dt: 0.1,
        }
    }
}

impl DemoConfig {
    /// Defaults overridden by `ROLLBALL_CAMERA`, `ROLLBALL_COLLISION`,
    /// `ROLLBALL_JUMP` and `ROLLBALL_OBSTACLES`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for (env_key, key) in [
            ("ROLLBALL_CAMERA", "camera"),
            ("ROLLBALL_COLLISION", "collision"),
            ("ROLLBALL_JUMP", "jump"),
            ("ROLLBALL_OBSTACLES", "obstacles"),
        ] {
            if let Ok(value) = std::env::var(env_key) {
                config.apply(key, &value);
            }
        }
        config
    }

    /// Defaults overridden by a URL query such as `?camera=orbit&jump=fixed`
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            config.apply(key, value);
        }
        config
    }

    /// Apply one `key=value` override; unknown keys or values are logged and skipped
    pub fn apply(&mut self, key: &str, value: &str) {
        let value = value.trim().to_ascii_lowercase();
        let applied = match key.trim() {
            "camera" => parse_camera(&value).map(|c| self.camera = c),
            "collision" => parse_collision(&value).map(|c| self.collision = c),
            "jump" => parse_jump(&value).map(|j| self.motion.jump_model = j),
            "obstacles" => parse_obstacles(&value).map(|o| self.obstacles = o),
            _ => {
                tracing::warn!(key, "unknown config key");
                return;
            }
        };
        if applied.is_none() {
            tracing::warn!(key, value = %value, "unrecognized config value, keeping default");
        }
    }
}

fn parse_camera(value: &str) -> Option<CameraPolicy> {
    match value {
        "fixed" | "follow" => Some(CameraPolicy::default()),
        "orbit" => Some(CameraPolicy::orbit()),
        "freelook" | "free" => Some(CameraPolicy::free_look()),
        _ => None,
    }
}

fn parse_collision(value: &str) -> Option<CollisionResponse> {
    match value {
        "stop" | "hardstop" => Some(CollisionResponse::HardStop),
        "revert" => Some(CollisionResponse::RevertDisplacement),
        _ => None,
    }
}

fn parse_jump(value: &str) -> Option<JumpModel> {
    match value {
        "gravity" => Some(JumpModel::Gravity),
        "fixed" => Some(JumpModel::FixedDecrement),
        _ => None,
    }
}

fn parse_obstacles(value: &str) -> Option<ObstacleLayout> {
    let (kind, seed) = match value.split_once(':') {
        Some((kind, seed)) => (kind, Some(seed.parse::<u32>().ok()?)),
        None => (value, None),
    };
    match kind {
        "row" if seed.is_none() => Some(ObstacleLayout::Row),
        "scatter" => Some(ObstacleLayout::Scattered {
            count: 12,
            seed: seed.unwrap_or(DEFAULT_SCATTER_SEED),
            half_range: 20.0,
        }),
        _ => None,
    }
}
