use crate::gl::{GlContext, ProgramId, ShaderId, ShaderStage};

use super::{CompiledStage, PipelineError};

/// A successfully linked program.
///
/// Only [`link`] constructs one, so anything holding a `LinkedProgram` can
/// activate it. The attached stages stay alive for the program's lifetime.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkedProgram {
    id: ProgramId,
    vertex: ShaderId,
    fragment: ShaderId,
}

impl LinkedProgram {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Shader objects owned through this program (vertex, fragment).
    pub fn stages(&self) -> (ShaderId, ShaderId) {
        (self.vertex, self.fragment)
    }

    /// Makes this program current for subsequent draws.
    pub fn activate(&self, gl: &mut impl GlContext) {
        gl.use_program(Some(self.id));
    }
}

/// Attaches both stages to a new program and links it.
///
/// On failure the link log is written to the `error` log and the program and
/// both shader objects are deleted before returning [`PipelineError::Link`].
pub fn link(
    gl: &mut impl GlContext,
    vertex: CompiledStage,
    fragment: CompiledStage,
) -> Result<LinkedProgram, PipelineError> {
    debug_assert_eq!(vertex.stage(), ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage(), ShaderStage::Fragment);

    let id = match gl.create_program() {
        Ok(id) => id,
        Err(e) => {
            vertex.release(gl);
            fragment.release(gl);
            return Err(e.into());
        }
    };
    gl.attach_shader(id, vertex.id());
    gl.attach_shader(id, fragment.id());
    gl.link_program(id);

    if gl.program_link_status(id) {
        log::debug!("program {} linked", id.0);
        return Ok(LinkedProgram { id, vertex: vertex.id(), fragment: fragment.id() });
    }

    let log = gl.program_info_log(id);
    log::error!("program link failed:\n{log}");
    gl.delete_program(id);
    vertex.release(gl);
    fragment.release(gl);
    Err(PipelineError::Link { log })
}
