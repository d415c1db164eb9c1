use thiserror::Error;

/// Failures while bringing up the window, surface or GPU
#[derive(Debug, Error)]
pub enum AppError {
    #[error("host environment missing: {0}")]
    Host(&'static str),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Failures drawing a single frame. The loop logs these and keeps going.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface was lost or outdated and has been reconfigured; the next frame should draw.
    #[error("surface reconfigured after {0:?}")]
    Reconfigured(wgpu::SurfaceError),

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}

#[cfg(target_arch = "wasm32")]
impl From<AppError> for wasm_bindgen::JsValue {
    fn from(e: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
