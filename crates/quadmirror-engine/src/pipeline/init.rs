use crate::gl::GlContext;

use super::{compile, link, LinkedProgram, PipelineError, ShaderSource};

/// Compiles both stages and links them into a program.
///
/// Both stages are always compiled so that each diagnostic reaches the log.
/// If either fails the linker is never invoked and a sibling stage that did
/// compile is released. The first failing stage (vertex before fragment) is
/// the returned error.
pub fn initialize(
    gl: &mut impl GlContext,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<LinkedProgram, PipelineError> {
    let vertex = compile(gl, ShaderSource::vertex(vertex_src));
    let fragment = compile(gl, ShaderSource::fragment(fragment_src));

    match (vertex, fragment) {
        (Ok(vertex), Ok(fragment)) => link(gl, vertex, fragment),
        (Err(e), Ok(fragment)) => {
            fragment.release(gl);
            Err(e)
        }
        (Ok(vertex), Err(e)) => {
            vertex.release(gl);
            Err(e)
        }
        (Err(e), Err(_)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::gl::ShaderStage;

    fn link_calls(gl: &RecordingGl) -> usize {
        gl.count(|c| matches!(c, Call::LinkProgram(_)))
    }

    fn created_shaders(gl: &RecordingGl) -> Vec<crate::gl::ShaderId> {
        gl.calls
            .iter()
            .filter_map(|c| match c {
                Call::CreateShader(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    // ── failure paths ─────────────────────────────────────────────────────

    #[test]
    fn vertex_failure_never_links() {
        let mut gl = RecordingGl::new().rejecting_stage(ShaderStage::Vertex);
        let err = initialize(&mut gl, "vs", "fs").unwrap_err();

        assert!(matches!(err, PipelineError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(link_calls(&gl), 0);
        assert_eq!(gl.count(|c| matches!(c, Call::CreateProgram(_))), 0);
    }

    #[test]
    fn fragment_failure_never_links() {
        let mut gl = RecordingGl::new().rejecting_stage(ShaderStage::Fragment);
        let err = initialize(&mut gl, "vs", "fs").unwrap_err();

        assert!(matches!(err, PipelineError::Compile { stage: ShaderStage::Fragment, .. }));
        assert_eq!(link_calls(&gl), 0);
    }

    #[test]
    fn failed_compile_releases_every_stage() {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            let mut gl = RecordingGl::new().rejecting_stage(stage);
            let _ = initialize(&mut gl, "vs", "fs");

            let mut created = created_shaders(&gl);
            let mut deleted = gl.deleted_shaders();
            created.sort_by_key(|s| s.0);
            deleted.sort_by_key(|s| s.0);
            assert_eq!(created, deleted, "stage {stage} left a shader alive");
        }
    }

    #[test]
    fn both_failures_report_vertex_first() {
        let mut gl = RecordingGl::new()
            .rejecting_stage(ShaderStage::Vertex)
            .rejecting_stage(ShaderStage::Fragment);
        let err = initialize(&mut gl, "vs", "fs").unwrap_err();

        assert!(matches!(err, PipelineError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(gl.count(|c| matches!(c, Call::CompileShader(_))), 2);
        assert_eq!(gl.deleted_shaders().len(), 2);
        assert_eq!(link_calls(&gl), 0);
    }

    #[test]
    fn link_failure_is_returned() {
        let mut gl = RecordingGl::new().rejecting_link();
        let err = initialize(&mut gl, "vs", "fs").unwrap_err();
        assert!(matches!(err, PipelineError::Link { .. }));
        assert_eq!(link_calls(&gl), 1);
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn success_resolves_known_attribute() {
        let mut gl = RecordingGl::new();
        let program = initialize(&mut gl, "vs", "fs").unwrap();

        let slot = gl.attrib_location(program.id(), "a_position");
        assert_eq!(slot, Some(0));
        assert!(gl.deleted_shaders().is_empty());
    }
}
