//! GL-style graphics context capability.
//!
//! Every core operation takes a `&mut impl GlContext` as its first argument
//! instead of reaching for an ambient context. The object model follows GL:
//! shaders, programs, buffers and textures are named by integer handles and
//! mutated through bind points (array buffer, texture unit 0, current program).
//!
//! - `wgpu_gl` is the production implementation (WGSL shaders, wgpu draws)
//! - `recording` is a call-recording double used by tests

mod error;
mod types;
pub mod wgpu_gl;

#[cfg(test)]
pub(crate) mod recording;

pub use error::GlError;
pub use types::{
    AttribLayout, BufferId, BufferUsage, ClearColor, Filter, Primitive, ProgramId, ShaderId,
    ShaderStage, TexParam, TextureId, Wrap,
};

/// Graphics context capability handle.
///
/// Status queries (`shader_compile_status`, `program_link_status`) and info
/// logs are how compile/link failures surface; `Err` is reserved for misuse
/// of the context or backend faults.
pub trait GlContext {
    // ── shaders ───────────────────────────────────────────────────────────

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GlError>;
    fn shader_source(&mut self, shader: ShaderId, source: &str);
    fn compile_shader(&mut self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&mut self, shader: ShaderId);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&mut self) -> Result<ProgramId, GlError>;
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn link_program(&mut self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&mut self, program: ProgramId);
    fn use_program(&mut self, program: Option<ProgramId>);

    // ── vertex attributes ─────────────────────────────────────────────────

    /// Location of a named vertex input, or `None` if the program does not
    /// declare it (or is not linked).
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    /// Enables an attribute slot for vertex-array reads. Idempotent.
    fn enable_vertex_attrib_array(&mut self, index: u32);

    /// Associates `index` with the buffer currently bound to the array
    /// target, read as `f32` components per `layout`.
    fn vertex_attrib_pointer_f32(&mut self, index: u32, layout: AttribLayout)
        -> Result<(), GlError>;

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<BufferId, GlError>;
    fn bind_array_buffer(&mut self, buffer: Option<BufferId>);

    /// Replaces the entire contents of the bound array buffer.
    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) -> Result<(), GlError>;

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self) -> Result<TextureId, GlError>;
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn tex_parameter(&mut self, param: TexParam) -> Result<(), GlError>;

    /// When set, rows are reversed during subsequent `tex_image_2d` uploads.
    fn set_unpack_flip_y(&mut self, flip: bool);

    /// Uploads tightly packed RGBA8 pixels into the bound texture.
    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), GlError>;

    // ── output ────────────────────────────────────────────────────────────

    fn clear_color(&mut self, color: ClearColor);

    /// Clears the color target to the current clear color.
    fn clear(&mut self) -> Result<(), GlError>;

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32) -> Result<(), GlError>;
}
