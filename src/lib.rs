// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};
#[cfg(target_arch = "wasm32")]
use web_sys::{Window, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Event, HtmlElement};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};

#[cfg(target_arch = "wasm32")]
use config::DemoConfig;
#[cfg(target_arch = "wasm32")]
use controller::{FrameLoop, InputEvent, InputProcessor, InputState, Renderer};
#[cfg(target_arch = "wasm32")]
use model::World;
#[cfg(target_arch = "wasm32")]
use view::{GpuContext, WgpuRenderer};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();
    let (window, document, canvas) = init_canvas()?;
    setup_app(&window, &document, &canvas).await
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let query = window.location().search().unwrap_or_default();
    let config = DemoConfig::from_query(&query);
    tracing::info!(?config, "starting");

    let gpu = GpuContext::new(canvas, canvas.width(), canvas.height()).await?;
    let width = gpu.config.width;
    let height = gpu.config.height;

    let mut renderer = WgpuRenderer::new(gpu);
    renderer.set_pixels_per_point(window.device_pixel_ratio() as f32);
    let mut world = World::new(&config.obstacles, width, height);
    let mut frame_loop = FrameLoop::new(&config);
    let input_state = Rc::new(RefCell::new(InputState::new()));
    let pending_resize: Rc<Cell<Option<(u32, u32)>>> = Rc::new(Cell::new(None));

    setup_input_listeners(
        document,
        window,
        canvas,
        input_state.clone(),
        frame_loop.input_processor.clone(),
    )?;
    setup_resize_listener(window, canvas, pending_resize.clone())?;

    // Continuous redraw using requestAnimationFrame
    let f = RcCellCallback::new(window.clone(), {
        let performance = window.performance();
        move || {
            if let Some((w, h)) = pending_resize.take() {
                world.camera.set_aspect(w, h);
                renderer.resize(w, h);
            }
            let now = performance.as_ref().map(|p| p.now() / 1000.0).unwrap_or(0.0);
            let mut input = input_state.borrow_mut();
            frame_loop.tick(now, &mut input, &mut world, &mut renderer);
        }
    });
    f.start();

    Ok(())
}

/// Register DOM listeners that feed host events into the shared input state
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    window: &Window,
    canvas: &HtmlCanvasElement,
    input_state: Rc<RefCell<InputState>>,
    input_processor: InputProcessor,
) -> Result<(), JsValue> {
    // Keyboard down
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let document_for_exit = document.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let event = controller::input::wasm::keyboard_event_to_input(&e, true);
            if let InputEvent::KeyDown(code) = &event {
                if input_processor.is_release_pointer(code) {
                    document_for_exit.exit_pointer_lock();
                }
                // keep arrows and space from scrolling the page
                if input_processor.is_game_key(code) {
                    e.prevent_default();
                }
            }
            input_processor.handle_event(&mut input_state.borrow_mut(), &event);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keyboard up
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let event = controller::input::wasm::keyboard_event_to_input(&e, false);
            input_processor.handle_event(&mut input_state.borrow_mut(), &event);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }

    // Focus loss - clear all keys
    {
        let input_state = input_state.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            input_state.borrow_mut().process_event(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Visibility change - clear all keys
    {
        let input_state = input_state.clone();
        let visibility = Closure::wrap(Box::new(move |_e: Event| {
            input_state.borrow_mut().process_event(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
        visibility.forget();
    }

    // Pointer lock change
    {
        let input_state = input_state.clone();
        let doc_pl = document.clone();
        let plc = Closure::wrap(Box::new(move |_e: Event| {
            let locked = doc_pl.pointer_lock_element().is_some();
            input_state.borrow_mut().process_event(&InputEvent::PointerLockChanged { locked });
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback("pointerlockchange", plc.as_ref().unchecked_ref())?;
        plc.forget();
    }

    // Canvas click to enter pointer lock
    {
        let canvas_click = canvas.clone();
        let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
            if let Ok(html_el) = canvas_click.clone().dyn_into::<HtmlElement>() {
                html_el.request_pointer_lock();
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
    }

    // Mouse move (ignored by the input state unless the pointer is locked)
    {
        let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
            let event = controller::input::wasm::mouse_move_to_input(&e);
            input_state.borrow_mut().process_event(&event);
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
        mm.forget();
    }

    Ok(())
}

/// Keep the canvas matched to the window; the frame loop applies the new size
#[cfg(target_arch = "wasm32")]
fn setup_resize_listener(
    window: &Window,
    canvas: &HtmlCanvasElement,
    pending: Rc<Cell<Option<(u32, u32)>>>,
) -> Result<(), JsValue> {
    let window_for_size = window.clone();
    let canvas = canvas.clone();
    let resize = Closure::wrap(Box::new(move |_e: Event| {
        let (w, h) = canvas_size(&window_for_size);
        canvas.set_width(w);
        canvas.set_height(h);
        pending.set(Some((w, h)));
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();
    Ok(())
}

/// Physical pixel size of the window's viewport
#[cfg(target_arch = "wasm32")]
fn canvas_size(window: &Window) -> (u32, u32) {
    let dpr = window.device_pixel_ratio();
    let css = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let w = (css(window.inner_width()) * dpr).round().max(1.0) as u32;
    let h = (css(window.inner_height()) * dpr).round().max(1.0) as u32;
    (w, h)
}

#[cfg(target_arch = "wasm32")]
fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or(error::AppError::Host("no global `window`"))?;
    let document = window.document().ok_or(error::AppError::Host("no document on window"))?;
    let body = document.body().ok_or(error::AppError::Host("no body on document"))?;
    let canvas_el = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    let (width, height) = canvas_size(&window);
    canvas_el.set_width(width);
    canvas_el.set_height(height);
    canvas_el.style().set_property("width", "100vw")?;
    canvas_el.style().set_property("height", "100vh")?;
    canvas_el.style().set_property("display", "block")?;
    body.append_child(&canvas_el)?;
    Ok((window, document, canvas_el))
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}

#[cfg(target_arch = "wasm32")]
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            // Recursively schedule next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!(error = ?e, "requestAnimationFrame failed, loop stopped");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            if let Err(e) = self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                tracing::error!(error = ?e, "requestAnimationFrame failed, loop not started");
            }
        }

        // Leak the closure to keep it alive
        std::mem::forget(callback);
    }
}
