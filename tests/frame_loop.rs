use approx::assert_relative_eq;
use glam::{Mat4, Vec3};

use rollball::config::DemoConfig;
use rollball::controller::{
    CameraPolicy, CollisionResponse, FrameLoop, FrameView, InputEvent, InputState, LoopState, Renderer,
};
use rollball::error::RenderError;
use rollball::model::{ObstacleLayout, World};

const DT: f64 = 1.0 / 60.0;
const OPEN_FIELD: Vec3 = Vec3::new(2.5, 1.0, 12.0);

/// Keeps what the loop handed over so tests can inspect it
#[derive(Default)]
struct RecordingRenderer {
    frames: usize,
    ball_positions: Vec<Vec3>,
    view_projs: Vec<Mat4>,
    obstacle_draws: usize,
    fail_next: bool,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(RenderError::Surface(wgpu::SurfaceError::Timeout));
        }
        self.frames += 1;
        self.ball_positions.push(frame.world.ball.position);
        self.view_projs.push(frame.view_proj);
        self.obstacle_draws = frame.obstacle_transforms().count();
        Ok(())
    }
}

struct Harness {
    frame_loop: FrameLoop,
    input: InputState,
    world: World,
    renderer: RecordingRenderer,
    now: f64,
}

impl Harness {
    fn new(config: DemoConfig) -> Self {
        let world = World::new(&config.obstacles, 800, 600);
        Self {
            frame_loop: FrameLoop::new(&config),
            input: InputState::new(),
            world,
            renderer: RecordingRenderer::default(),
            now: 100.0,
        }
    }

    /// Ball resting between two row boxes, well clear of all of them
    fn in_open_field(mut self) -> Self {
        self.world.ball.position = OPEN_FIELD;
        self
    }

    fn send(&mut self, event: InputEvent) {
        self.frame_loop.handle_event(&mut self.input, &event);
    }

    fn press(&mut self, code: &str) {
        self.send(InputEvent::KeyDown(code.to_string()));
    }

    fn release(&mut self, code: &str) {
        self.send(InputEvent::KeyUp(code.to_string()));
    }

    fn tick(&mut self) {
        self.frame_loop
            .tick(self.now, &mut self.input, &mut self.world, &mut self.renderer);
        self.now += DT;
    }

    fn run(&mut self, frames: usize) {
        for _ in 0..frames {
            self.tick();
        }
    }
}

#[test]
fn test_first_tick_starts_loop_without_moving() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.press("KeyW");
    assert_eq!(h.frame_loop.state(), LoopState::Idle);

    h.tick();
    assert_eq!(h.frame_loop.state(), LoopState::Running);
    assert_eq!(h.renderer.frames, 1);
    assert_eq!(h.world.ball.position, OPEN_FIELD);
    assert_eq!(h.renderer.obstacle_draws, 5);
}

#[test]
fn test_forward_key_rolls_ball_away_from_camera() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.tick();
    h.press("KeyW");
    h.run(30);
    let z_held = h.world.ball.position.z;
    assert!(z_held < 12.0);
    assert!(h.world.ball.velocity.z < 0.0);
    assert_relative_eq!(h.world.ball.position.x, OPEN_FIELD.x);

    // released: damping brings it to a stop
    h.release("KeyW");
    h.run(300);
    assert!(h.world.ball.velocity.z.abs() < 1e-3);
    assert!(h.world.ball.position.z < z_held);
}

#[test]
fn test_diagonal_is_not_faster() {
    let mut straight = Harness::new(DemoConfig::default()).in_open_field();
    let mut diagonal = Harness::new(DemoConfig::default()).in_open_field();
    straight.tick();
    diagonal.tick();
    straight.press("KeyW");
    diagonal.press("KeyW");
    diagonal.press("KeyD");
    straight.run(10);
    diagonal.run(10);

    let v_straight = straight.world.ball.velocity.length();
    let v_diagonal = diagonal.world.ball.velocity.length();
    assert_relative_eq!(v_straight, v_diagonal, epsilon = 1e-3);
}

#[test]
fn test_jump_leaves_ground_and_lands_at_rest_height() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.tick();
    h.press("Space");
    h.tick();
    assert!(h.world.ball.airborne);
    assert!(h.world.ball.position.y > 1.0);

    // holding space does not chain jumps
    h.run(240);
    assert!(!h.world.ball.airborne);
    assert_eq!(h.world.ball.position.y, 1.0);
    assert_eq!(h.world.ball.velocity.y, 0.0);
    let peak = h.renderer.ball_positions.iter().map(|p| p.y).fold(0.0, f32::max);
    assert!(peak > 2.0);

    h.release("Space");
    h.press("Space");
    h.tick();
    assert!(h.world.ball.airborne, "a fresh press jumps again");
}

#[test]
fn test_hard_stop_against_row_box() {
    let mut h = Harness::new(DemoConfig::default());
    h.world.ball.position = Vec3::new(2.0, 1.0, 0.0);
    h.tick();
    h.press("KeyD");

    let mut first_hit = None;
    for _ in 0..120 {
        let summary = h
            .frame_loop
            .tick(h.now, &mut h.input, &mut h.world, &mut h.renderer);
        h.now += DT;
        if summary.collision.hit() {
            first_hit = Some(h.world.ball.position.x);
            break;
        }
    }
    // box at x = 5 spans [4.5, 5.5]
    let x = first_hit.expect("ball never reached the box");
    assert!(x + 1.0 >= 4.5 && x < 5.0);
    assert_eq!(h.world.ball.velocity.x, 0.0);
    assert_eq!(h.world.ball.velocity.z, 0.0);
}

#[test]
fn test_revert_keeps_ball_outside_row_box() {
    let config = DemoConfig {
        collision: CollisionResponse::RevertDisplacement,
        ..DemoConfig::default()
    };
    let mut h = Harness::new(config);
    h.world.ball.position = Vec3::new(2.0, 1.0, 0.0);
    h.tick();
    h.press("KeyD");
    h.run(120);

    let ball = h.world.ball.aabb();
    assert!(h.world.obstacles.iter().all(|o| !ball.intersects(&o.aabb())));
    assert!(h.world.ball.position.x > 2.0);
}

#[test]
fn test_spawn_overlap_still_resolves() {
    // the default row puts a box at the origin, under the ball
    let mut h = Harness::new(DemoConfig::default());
    h.tick();
    h.press("KeyS");
    h.tick();
    let summary = h
        .frame_loop
        .tick(h.now, &mut h.input, &mut h.world, &mut h.renderer);
    assert!(summary.collision.hit());
    assert_eq!(h.world.ball.velocity.z, 0.0);
    assert!(h.world.ball.position.z > 0.0);
}

#[test]
fn test_fixed_camera_follows_ball() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.tick();
    h.press("KeyA");
    h.run(20);
    let ball = h.world.ball.position;
    assert_relative_eq!(h.world.camera.eye.x, ball.x + 0.0, epsilon = 1e-5);
    assert_relative_eq!(h.world.camera.eye.y, ball.y + 4.0, epsilon = 1e-5);
    assert_relative_eq!(h.world.camera.eye.z, ball.z + 10.0, epsilon = 1e-5);
    assert_eq!(h.renderer.view_projs.last(), Some(&h.world.camera.view_proj()));
}

#[test]
fn test_orbit_camera_turns_with_locked_mouse() {
    let config = DemoConfig { camera: CameraPolicy::orbit(), ..DemoConfig::default() };
    let mut h = Harness::new(config).in_open_field();
    h.tick();

    // unlocked motion is ignored
    h.send(InputEvent::MouseMove { dx: 200.0, dy: 0.0 });
    h.tick();
    assert_eq!(h.frame_loop.camera_controller.orbit_yaw(), 0.0);

    h.send(InputEvent::PointerLockChanged { locked: true });
    h.send(InputEvent::MouseMove { dx: 200.0, dy: 50.0 });
    h.tick();
    assert_relative_eq!(h.frame_loop.camera_controller.orbit_yaw(), -0.4, epsilon = 1e-6);

    let ball = h.world.ball.position;
    let eye = h.world.camera.eye;
    assert_relative_eq!(eye.y - ball.y, 4.0, epsilon = 1e-5);
    assert_relative_eq!(Vec3::new(eye.x - ball.x, 0.0, eye.z - ball.z).length(), 10.0, epsilon = 1e-4);
}

#[test]
fn test_free_look_moves_camera_not_ball() {
    let config = DemoConfig { camera: CameraPolicy::free_look(), ..DemoConfig::default() };
    let mut h = Harness::new(config).in_open_field();
    h.tick();
    let eye_before = h.world.camera.eye;
    h.press("KeyW");
    h.run(30);

    assert_eq!(h.world.ball.position, OPEN_FIELD);
    assert_eq!(h.world.ball.velocity, Vec3::ZERO);
    assert!(h.world.camera.eye.distance(eye_before) > 1.0);
}

#[test]
fn test_render_error_does_not_stop_loop() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.tick();
    h.renderer.fail_next = true;
    h.press("KeyW");
    h.tick();
    assert_eq!(h.renderer.frames, 1);
    assert_eq!(h.frame_loop.stats.frame_count, 2);

    h.tick();
    assert_eq!(h.renderer.frames, 2);
    assert!(h.world.ball.position.z < 12.0);
}

#[test]
fn test_focus_loss_releases_keys() {
    let mut h = Harness::new(DemoConfig::default()).in_open_field();
    h.tick();
    h.press("KeyW");
    h.run(5);
    h.send(InputEvent::FocusLost);
    h.run(300);
    assert!(h.world.ball.velocity.length() < 1e-3);
}

#[test]
fn test_scattered_layout_is_reproducible() {
    let config = DemoConfig {
        obstacles: ObstacleLayout::Scattered { count: 12, seed: 7, half_range: 20.0 },
        ..DemoConfig::default()
    };
    let a = Harness::new(config.clone());
    let b = Harness::new(config);
    assert_eq!(a.world.obstacles.len(), 12);
    assert_eq!(a.world.obstacles, b.world.obstacles);
    let spawn = a.world.ball.aabb();
    assert!(a.world.obstacles.iter().all(|o| !spawn.intersects(&o.aabb())));
}
