//! QuadMirror engine crate.
//!
//! Renders one image as a textured quad into the four quadrants of a canvas,
//! each with its own mirroring. Core operations run against a `GlContext`;
//! `device`, `window` and `headless` supply the wgpu-backed one.

pub mod device;
pub mod gl;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod window;

pub mod headless;
pub mod image_source;
pub mod scene;
