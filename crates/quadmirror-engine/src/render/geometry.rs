use crate::gl::{AttribLayout, BufferId, BufferUsage, GlContext, GlError};

use super::AttributeSlot;

/// Vertices per quad: two triangles, no index buffer.
pub const QUAD_VERTICES: usize = 6;

/// Positions and texture coordinates for one quad, vertex for vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadGeometry {
    pub positions: [[f32; 2]; QUAD_VERTICES],
    pub uvs: [[f32; 2]; QUAD_VERTICES],
}

/// Array buffer that is fully overwritten by every [`upload`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GeometryBuffer(BufferId);

impl GeometryBuffer {
    pub fn new(gl: &mut impl GlContext) -> Result<Self, GlError> {
        gl.create_buffer().map(Self)
    }

    pub fn id(self) -> BufferId {
        self.0
    }
}

/// Replaces `buffer` with `points` and points `slot` at it as tightly packed
/// `vec2<f32>`.
pub fn upload(
    gl: &mut impl GlContext,
    slot: AttributeSlot,
    buffer: GeometryBuffer,
    points: &[[f32; 2]],
) -> Result<(), GlError> {
    gl.bind_array_buffer(Some(buffer.id()));
    gl.buffer_data(bytemuck::cast_slice(points), BufferUsage::StaticDraw)?;
    gl.vertex_attrib_pointer_f32(slot.index(), AttribLayout::FLOAT2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::gl::Primitive;

    #[test]
    fn upload_then_draw_submits_six_float2_vertices() {
        let mut gl = RecordingGl::new();
        let buffer = GeometryBuffer::new(&mut gl).unwrap();
        let points = [
            [-0.9, 0.9],
            [-0.9, 0.1],
            [-0.1, 0.1],
            [-0.1, 0.1],
            [-0.1, 0.9],
            [-0.9, 0.9],
        ];

        upload(&mut gl, AttributeSlot(0), buffer, &points).unwrap();
        gl.draw_arrays(Primitive::Triangles, 0, QUAD_VERTICES as u32).unwrap();

        let flat: Vec<f32> = points.iter().flatten().copied().collect();
        assert_eq!(
            gl.calls[1..],
            [
                Call::BindArrayBuffer(Some(buffer.id())),
                Call::BufferData(flat, BufferUsage::StaticDraw),
                Call::VertexAttribPointer(
                    0,
                    AttribLayout { components: 2, normalized: false, stride: 8, offset: 0 }
                ),
                Call::DrawArrays(Primitive::Triangles, 0, 6),
            ]
        );
    }

    #[test]
    fn upload_replaces_previous_contents() {
        let mut gl = RecordingGl::new();
        let buffer = GeometryBuffer::new(&mut gl).unwrap();

        upload(&mut gl, AttributeSlot(1), buffer, &[[0.0, 0.0]; 6]).unwrap();
        upload(&mut gl, AttributeSlot(1), buffer, &[[1.0, 1.0]; 6]).unwrap();

        let last_data = gl.calls.iter().rev().find_map(|c| match c {
            Call::BufferData(d, _) => Some(d.clone()),
            _ => None,
        });
        assert_eq!(last_data, Some(vec![1.0; 12]));
    }
}
