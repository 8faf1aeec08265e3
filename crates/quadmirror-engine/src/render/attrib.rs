use crate::gl::GlContext;
use crate::pipeline::{LinkedProgram, PipelineError};

/// Enabled vertex attribute slot of a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeSlot(pub u32);

impl AttributeSlot {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Resolves `name` in `program` and enables the slot for array reads.
///
/// The program should already be active. Enabling is idempotent, so binding
/// the same name twice yields the same slot.
pub fn bind_attribute(
    gl: &mut impl GlContext,
    program: &LinkedProgram,
    name: &str,
) -> Result<AttributeSlot, PipelineError> {
    let Some(index) = gl.attrib_location(program.id(), name) else {
        log::error!("attribute `{name}` not found in program {}", program.id().0);
        return Err(PipelineError::UnknownAttribute { name: name.to_string() });
    };

    gl.enable_vertex_attrib_array(index);
    log::trace!("attribute `{name}` bound to slot {index}");
    Ok(AttributeSlot(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::pipeline::initialize;

    fn ready() -> (RecordingGl, LinkedProgram) {
        let mut gl = RecordingGl::new();
        let program = initialize(&mut gl, "vs", "fs").unwrap();
        program.activate(&mut gl);
        (gl, program)
    }

    #[test]
    fn known_attribute_is_resolved_and_enabled() {
        let (mut gl, program) = ready();
        let slot = bind_attribute(&mut gl, &program, "a_tex_coord").unwrap();

        assert_eq!(slot, AttributeSlot(1));
        assert_eq!(gl.calls.last(), Some(&Call::EnableVertexAttribArray(1)));
    }

    #[test]
    fn rebinding_yields_same_slot() {
        let (mut gl, program) = ready();
        let a = bind_attribute(&mut gl, &program, "a_position").unwrap();
        let b = bind_attribute(&mut gl, &program, "a_position").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_attribute_is_an_error() {
        let (mut gl, program) = ready();
        let before = gl.calls.len();

        let err = bind_attribute(&mut gl, &program, "a_normal").unwrap_err();
        assert_eq!(err, PipelineError::UnknownAttribute { name: "a_normal".into() });
        assert_eq!(gl.calls.len(), before);
    }
}
