use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

// Import from the library crate
use rollball::{
    config::DemoConfig,
    controller::{FrameLoop, InputEvent, InputState, Renderer},
    error::AppError,
    logging,
    model::World,
    view::{GpuContext, WgpuRenderer},
};

/// Everything that exists once the window is up
struct Running {
    window: Arc<Window>,
    renderer: WgpuRenderer,
    world: World,
}

struct App {
    config: DemoConfig,
    frame_loop: FrameLoop,
    input: InputState,
    start: Instant,
    running: Option<Running>,
    mouse_locked: bool,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let frame_loop = FrameLoop::new(&config);
        Self {
            config,
            frame_loop,
            input: InputState::new(),
            start: Instant::now(),
            running: None,
            mouse_locked: false,
        }
    }

    fn create_running(&self, event_loop: &ActiveEventLoop) -> Result<Running, AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Rollball")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();

        let gpu = pollster::block_on(GpuContext::new_native(window.clone(), size.width, size.height))?;
        let mut renderer = WgpuRenderer::new(gpu);
        renderer.set_pixels_per_point(window.scale_factor() as f32);
        let world = World::new(&self.config.obstacles, size.width, size.height);

        Ok(Running { window, renderer, world })
    }

    fn set_mouse_locked(&mut self, locked: bool) {
        let Some(running) = &self.running else { return };
        let window = &running.window;
        if locked {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!(error = %e, "cursor grab unavailable");
                return;
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!(error = %e, "cursor release failed");
        }
        window.set_cursor_visible(!locked);
        self.mouse_locked = locked;
        self.dispatch(InputEvent::PointerLockChanged { locked });
    }

    fn dispatch(&mut self, event: InputEvent) {
        self.frame_loop.handle_event(&mut self.input, &event);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else { return };
        // winit's KeyCode names match `KeyboardEvent.code` ("KeyW", "Space", ...)
        let key = format!("{code:?}");
        match event.state {
            ElementState::Pressed => {
                if self.frame_loop.input_processor.is_release_pointer(&key) && self.mouse_locked {
                    self.set_mouse_locked(false);
                }
                self.dispatch(InputEvent::KeyDown(key));
            }
            ElementState::Released => self.dispatch(InputEvent::KeyUp(key)),
        }
    }

    fn redraw(&mut self) {
        let now = self.start.elapsed().as_secs_f64();
        let Some(running) = &mut self.running else { return };
        self.frame_loop.tick(now, &mut self.input, &mut running.world, &mut running.renderer);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.create_running(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!(error = %e, "startup failed");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(running) = &mut self.running {
                    running.world.camera.set_aspect(size.width, size.height);
                    running.renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(running) = &mut self.running {
                    running.renderer.set_pixels_per_point(scale_factor as f32);
                }
            }
            WindowEvent::Focused(false) => {
                self.dispatch(InputEvent::FocusLost);
                if self.mouse_locked {
                    self.set_mouse_locked(false);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if !self.mouse_locked {
                    self.set_mouse_locked(true);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.dispatch(InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn main() -> Result<(), AppError> {
    logging::init();

    let config = DemoConfig::from_env();
    tracing::info!(?config, "starting");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
