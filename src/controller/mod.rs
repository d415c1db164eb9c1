// CONTROLLER: Input, per-frame simulation steps and the update loop
pub mod input;
pub mod motion;
pub mod collision;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, InputProcessor, KeyBindings, MovementFlags};
pub use motion::{JumpModel, MotionConfig, MotionIntegrator, MotionReport};
pub use collision::{CollisionOutcome, CollisionResolver, CollisionResponse};
pub use camera_controller::{CameraController, CameraPolicy};
pub use frame_loop::{FrameLoop, FrameStats, FrameView, LoopState, Renderer, StepSummary};
