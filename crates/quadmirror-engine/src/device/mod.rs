//! GPU device, offscreen canvas and window surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (windowed or headless)
//! - owning the fixed-size canvas every render targets
//! - configuring a window surface and presenting the canvas onto it

mod canvas;
mod error;
mod gpu;
mod surface;

pub use canvas::Canvas;
pub use error::SurfaceErrorAction;
pub use gpu::{Gpu, GpuInit};
pub use surface::WindowSurface;
