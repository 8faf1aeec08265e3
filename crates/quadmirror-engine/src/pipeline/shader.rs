use crate::gl::{GlContext, ShaderId, ShaderStage};

use super::PipelineError;

/// Shader text tagged with the stage it is written for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderSource<'a> {
    pub stage: ShaderStage,
    pub text: &'a str,
}

impl<'a> ShaderSource<'a> {
    pub const fn vertex(text: &'a str) -> Self {
        Self { stage: ShaderStage::Vertex, text }
    }

    pub const fn fragment(text: &'a str) -> Self {
        Self { stage: ShaderStage::Fragment, text }
    }
}

/// A compiled shader object.
///
/// Neither `Clone` nor `Copy`: it is consumed exactly once, either by
/// [`link`](super::link) or by [`CompiledStage::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct CompiledStage {
    id: ShaderId,
    stage: ShaderStage,
}

impl CompiledStage {
    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Deletes the shader object.
    pub fn release(self, gl: &mut impl GlContext) {
        gl.delete_shader(self.id);
    }
}

/// Compiles one stage.
///
/// On failure the diagnostic log is written to the `error` log, the shader
/// object is deleted and the log is returned in [`PipelineError::Compile`].
pub fn compile(
    gl: &mut impl GlContext,
    source: ShaderSource<'_>,
) -> Result<CompiledStage, PipelineError> {
    let id = gl.create_shader(source.stage)?;
    gl.shader_source(id, source.text);
    gl.compile_shader(id);

    if gl.shader_compile_status(id) {
        log::debug!("{} shader {} compiled", source.stage, id.0);
        return Ok(CompiledStage { id, stage: source.stage });
    }

    let log = gl.shader_info_log(id);
    log::error!("{} shader compile failed:\n{log}", source.stage);
    gl.delete_shader(id);
    Err(PipelineError::Compile { stage: source.stage, log })
}
