//! Call-recording `GlContext` double.
//!
//! Every call is appended to `calls` in order. Compile outcomes are scripted
//! per stage and link outcomes per context; linked programs expose a fixed
//! attribute table.

use std::collections::{HashMap, HashSet};

use super::{
    AttribLayout, BufferId, BufferUsage, ClearColor, GlContext, GlError, Primitive, ProgramId,
    ShaderId, ShaderStage, TexParam, TextureId,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateShader(ShaderId, ShaderStage),
    ShaderSource(ShaderId, String),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    EnableVertexAttribArray(u32),
    VertexAttribPointer(u32, AttribLayout),
    CreateBuffer(BufferId),
    BindArrayBuffer(Option<BufferId>),
    BufferData(Vec<f32>, BufferUsage),
    CreateTexture(TextureId),
    BindTexture(Option<TextureId>),
    TexParameter(TexParam),
    UnpackFlipY(bool),
    TexImage2d(u32, u32),
    ClearColor(ClearColor),
    Clear,
    DrawArrays(Primitive, u32, u32),
}

pub(crate) struct RecordingGl {
    pub calls: Vec<Call>,
    next_id: u32,
    rejected_stages: HashSet<ShaderStage>,
    reject_link: bool,
    attributes: Vec<(&'static str, u32)>,
    shaders: HashMap<ShaderId, (ShaderStage, bool)>,
    programs: HashMap<ProgramId, bool>,
    bound_buffer: Option<BufferId>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 1,
            rejected_stages: HashSet::new(),
            reject_link: false,
            attributes: vec![("a_position", 0), ("a_tex_coord", 1)],
            shaders: HashMap::new(),
            programs: HashMap::new(),
            bound_buffer: None,
        }
    }

    /// Every shader of `stage` fails to compile.
    pub fn rejecting_stage(mut self, stage: ShaderStage) -> Self {
        self.rejected_stages.insert(stage);
        self
    }

    /// Every program fails to link.
    pub fn rejecting_link(mut self) -> Self {
        self.reject_link = true;
        self
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn deleted_shaders(&self) -> Vec<ShaderId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::DeleteShader(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn alloc(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GlContext for RecordingGl {
    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GlError> {
        let id = ShaderId(self.alloc());
        self.shaders.insert(id, (stage, false));
        self.calls.push(Call::CreateShader(id, stage));
        Ok(id)
    }

    fn shader_source(&mut self, shader: ShaderId, source: &str) {
        self.calls.push(Call::ShaderSource(shader, source.to_string()));
    }

    fn compile_shader(&mut self, shader: ShaderId) {
        if let Some((stage, compiled)) = self.shaders.get_mut(&shader) {
            *compiled = !self.rejected_stages.contains(stage);
        }
        self.calls.push(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.shaders.get(&shader).is_some_and(|(_, ok)| *ok)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        match self.shaders.get(&shader) {
            Some((stage, false)) => format!("error: rejected {stage} source"),
            _ => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> Result<ProgramId, GlError> {
        let id = ProgramId(self.alloc());
        self.programs.insert(id, false);
        self.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        self.calls.push(Call::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: ProgramId) {
        let ok = !self.reject_link;
        if let Some(linked) = self.programs.get_mut(&program) {
            *linked = ok;
        }
        self.calls.push(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program).copied().unwrap_or(false)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: varying `v_tex_coord` has no matching output".to_string()
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        self.calls.push(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(Call::UseProgram(program));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        if !self.program_link_status(program) {
            return None;
        }
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, loc)| *loc)
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(Call::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(
        &mut self,
        index: u32,
        layout: AttribLayout,
    ) -> Result<(), GlError> {
        if self.bound_buffer.is_none() {
            return Err(GlError::NoBuffer);
        }
        self.calls.push(Call::VertexAttribPointer(index, layout));
        Ok(())
    }

    fn create_buffer(&mut self) -> Result<BufferId, GlError> {
        let id = BufferId(self.alloc());
        self.calls.push(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&mut self, buffer: Option<BufferId>) {
        self.bound_buffer = buffer;
        self.calls.push(Call::BindArrayBuffer(buffer));
    }

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) -> Result<(), GlError> {
        if self.bound_buffer.is_none() {
            return Err(GlError::NoBuffer);
        }
        let floats = data
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        self.calls.push(Call::BufferData(floats, usage));
        Ok(())
    }

    fn create_texture(&mut self) -> Result<TextureId, GlError> {
        let id = TextureId(self.alloc());
        self.calls.push(Call::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn tex_parameter(&mut self, param: TexParam) -> Result<(), GlError> {
        self.calls.push(Call::TexParameter(param));
        Ok(())
    }

    fn set_unpack_flip_y(&mut self, flip: bool) {
        self.calls.push(Call::UnpackFlipY(flip));
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, _rgba: &[u8]) -> Result<(), GlError> {
        self.calls.push(Call::TexImage2d(width, height));
        Ok(())
    }

    fn clear_color(&mut self, color: ClearColor) {
        self.calls.push(Call::ClearColor(color));
    }

    fn clear(&mut self) -> Result<(), GlError> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32) -> Result<(), GlError> {
        self.calls.push(Call::DrawArrays(mode, first, count));
        Ok(())
    }
}
