//! One-shot scene bootstrap: everything between "image ready" and the four
//! quadrant draws.

use crate::gl::{GlContext, TextureId};
use crate::image_source::ImageSource;
use crate::pipeline::{initialize, LinkedProgram, PipelineError};
use crate::render::{bind_attribute, render_all, upload_texture, AttributeSlot, GeometryBuffer};

pub const VERTEX_SHADER: &str = include_str!("shaders/quad.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/quad.frag.wgsl");

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const TEX_COORD_ATTRIBUTE: &str = "a_tex_coord";

/// GPU objects created by [`draw_mirrored`], kept so the frame can be redrawn.
#[derive(Debug)]
pub struct MirrorScene {
    program: LinkedProgram,
    position: AttributeSlot,
    tex_coord: AttributeSlot,
    texture: TextureId,
    position_buffer: GeometryBuffer,
    tex_coord_buffer: GeometryBuffer,
}

impl MirrorScene {
    pub fn program(&self) -> &LinkedProgram {
        &self.program
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Re-issues the clear and the four quadrant draws.
    pub fn redraw(&self, gl: &mut impl GlContext) -> Result<(), PipelineError> {
        self.program.activate(gl);
        gl.bind_texture(Some(self.texture));
        render_all(
            gl,
            &self.program,
            self.position,
            self.tex_coord,
            self.position_buffer,
            self.tex_coord_buffer,
        )?;
        Ok(())
    }
}

/// Builds the program, uploads `image` and draws it mirrored into all four
/// quadrants.
///
/// A pipeline failure aborts before any texture, buffer or draw call is
/// issued.
pub fn draw_mirrored(
    gl: &mut impl GlContext,
    image: &ImageSource,
) -> Result<MirrorScene, PipelineError> {
    let program = initialize(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
    program.activate(gl);

    let position = bind_attribute(gl, &program, POSITION_ATTRIBUTE)?;
    let tex_coord = bind_attribute(gl, &program, TEX_COORD_ATTRIBUTE)?;

    let texture = upload_texture(gl, image)?;
    let position_buffer = GeometryBuffer::new(gl)?;
    let tex_coord_buffer = GeometryBuffer::new(gl)?;

    render_all(gl, &program, position, tex_coord, position_buffer, tex_coord_buffer)?;
    log::info!("rendered {}x{} image into four quadrants", image.width(), image.height());

    Ok(MirrorScene {
        program,
        position,
        tex_coord,
        texture,
        position_buffer,
        tex_coord_buffer,
    })
}
