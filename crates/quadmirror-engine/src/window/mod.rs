//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single fixed-size window, and presents
//! the rendered canvas onto it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeEvent};
pub use winit::dpi::PhysicalSize;
