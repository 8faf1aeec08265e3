//! Shader program lifecycle: compile, link and teardown on failure.
//!
//! Stage handles are move-only, so a stage is consumed exactly once, either by
//! the linker or by release. [`initialize`] is the entry point callers use.

mod error;
mod init;
mod program;
mod shader;

pub use error::PipelineError;
pub use init::initialize;
pub use program::{link, LinkedProgram};
pub use shader::{compile, CompiledStage, ShaderSource};
