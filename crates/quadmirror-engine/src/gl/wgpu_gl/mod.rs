//! `GlContext` implemented on wgpu.
//!
//! Shader text is WGSL. Compilation and linking run through naga (see
//! `reflect`), so diagnostics exist before any wgpu object is created.
//! GL bind-point state (current program, array buffer, texture unit 0,
//! attribute table) is tracked here and turned into a render pipeline,
//! bind group and vertex buffer set at each `draw_arrays`.
//!
//! Each `clear` / `draw_arrays` is submitted immediately. `buffer_data` always
//! allocates fresh storage, so a draw keeps reading the contents that were
//! current when it was issued.

mod reflect;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::device::Canvas;

use self::reflect::{CompiledShader, InterfaceVar, ResourceKind, ResourceSlot};
use super::{
    AttribLayout, BufferId, BufferUsage, ClearColor, Filter, GlContext, GlError, Primitive,
    ProgramId, ShaderId, ShaderStage, TexParam, TextureId, Wrap,
};

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: Option<Rc<CompiledShader>>,
    info_log: String,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<ShaderId>,
    binary: Option<ProgramBinary>,
    info_log: String,
}

/// Linked program: both stages plus the pipelines built for it so far.
struct ProgramBinary {
    vertex: Rc<CompiledShader>,
    fragment: Rc<CompiledShader>,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
    resources: Vec<ResourceSlot>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

#[derive(Default)]
struct BufferObject {
    storage: Option<wgpu::Buffer>,
    len: u64,
}

struct TextureObject {
    image: Option<(wgpu::Texture, wgpu::TextureView)>,
    min_filter: Filter,
    mag_filter: Filter,
    wrap_s: Wrap,
    wrap_t: Wrap,
    sampler: Option<wgpu::Sampler>,
}

impl Default for TextureObject {
    fn default() -> Self {
        Self {
            image: None,
            min_filter: Filter::Nearest,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::Repeat,
            wrap_t: Wrap::Repeat,
            sampler: None,
        }
    }
}

#[derive(Debug, Default)]
struct AttribState {
    enabled: bool,
    source: Option<(BufferId, AttribLayout)>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    primitive: Primitive,
    attribs: Vec<(u32, AttribLayout)>,
}

/// GL-style context drawing into a [`Canvas`] with a wgpu device.
pub struct WgpuGl<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    canvas: &'a Canvas,

    next_id: u32,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, BufferObject>,
    textures: HashMap<u32, TextureObject>,
    attribs: BTreeMap<u32, AttribState>,

    current_program: Option<ProgramId>,
    array_buffer: Option<BufferId>,
    bound_texture: Option<TextureId>,
    unpack_flip_y: bool,
    clear_color: ClearColor,
}

impl<'a> WgpuGl<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, canvas: &'a Canvas) -> Self {
        Self {
            device,
            queue,
            canvas,
            next_id: 1,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            attribs: BTreeMap::new(),
            current_program: None,
            array_buffer: None,
            bound_texture: None,
            unpack_flip_y: false,
            clear_color: ClearColor { r: 0.0, g: 0.0, b: 0.0, a: 0.0 },
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn bound_texture_mut(&mut self) -> Result<&mut TextureObject, GlError> {
        let id = self.bound_texture.ok_or(GlError::NoTexture)?;
        self.textures
            .get_mut(&id.0)
            .ok_or(GlError::InvalidHandle("texture", id.0))
    }

    fn link(&self, program: ProgramId) -> Result<ProgramBinary, String> {
        let obj = self
            .programs
            .get(&program.0)
            .ok_or_else(|| format!("error: unknown program {}", program.0))?;

        let mut vertex = None;
        let mut fragment = None;
        for id in &obj.attached {
            let shader = self
                .shaders
                .get(&id.0)
                .ok_or_else(|| format!("error: attached shader {} no longer exists", id.0))?;
            let compiled = shader.compiled.clone().ok_or_else(|| {
                format!("error: attached {} shader {} is not compiled", shader.stage, id.0)
            })?;
            let slot = match shader.stage {
                ShaderStage::Vertex => &mut vertex,
                ShaderStage::Fragment => &mut fragment,
            };
            if slot.replace(compiled).is_some() {
                return Err(format!("error: more than one {} shader attached", shader.stage));
            }
        }

        let vertex = vertex.ok_or("error: no vertex shader attached")?;
        let fragment = fragment.ok_or("error: no fragment shader attached")?;
        let resources = reflect::link(&vertex, &fragment)?;

        let vertex_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadmirror vertex stage"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(vertex.source.as_str())),
        });
        let fragment_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadmirror fragment stage"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(fragment.source.as_str())),
        });

        Ok(ProgramBinary {
            vertex,
            fragment,
            vertex_module,
            fragment_module,
            resources,
            pipelines: HashMap::new(),
        })
    }
}

impl GlContext for WgpuGl<'_> {
    // ── shaders ───────────────────────────────────────────────────────────

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GlError> {
        let id = self.alloc_id();
        self.shaders.insert(
            id,
            ShaderObject { stage, source: String::new(), compiled: None, info_log: String::new() },
        );
        Ok(ShaderId(id))
    }

    fn shader_source(&mut self, shader: ShaderId, source: &str) {
        if let Some(obj) = self.shaders.get_mut(&shader.0) {
            obj.source = source.to_string();
        }
    }

    fn compile_shader(&mut self, shader: ShaderId) {
        let Some(obj) = self.shaders.get_mut(&shader.0) else { return };
        match reflect::compile(obj.stage, &obj.source) {
            Ok(compiled) => {
                obj.compiled = Some(Rc::new(compiled));
                obj.info_log.clear();
            }
            Err(log) => {
                obj.compiled = None;
                obj.info_log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.shaders.get(&shader.0).is_some_and(|s| s.compiled.is_some())
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.shaders
            .get(&shader.0)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader.0);
    }

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&mut self) -> Result<ProgramId, GlError> {
        let id = self.alloc_id();
        self.programs.insert(id, ProgramObject::default());
        Ok(ProgramId(id))
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        if let Some(obj) = self.programs.get_mut(&program.0) {
            if !obj.attached.contains(&shader) {
                obj.attached.push(shader);
            }
        }
    }

    fn link_program(&mut self, program: ProgramId) {
        let outcome = self.link(program);
        let Some(obj) = self.programs.get_mut(&program.0) else { return };
        match outcome {
            Ok(binary) => {
                obj.binary = Some(binary);
                obj.info_log.clear();
            }
            Err(log) => {
                obj.binary = None;
                obj.info_log = log;
            }
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program.0).is_some_and(|p| p.binary.is_some())
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.programs
            .get(&program.0)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program.0);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
    }

    // ── vertex attributes ─────────────────────────────────────────────────

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        self.programs
            .get(&program.0)?
            .binary
            .as_ref()?
            .vertex
            .input_location(name)
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.attribs.entry(index).or_default().enabled = true;
    }

    fn vertex_attrib_pointer_f32(
        &mut self,
        index: u32,
        layout: AttribLayout,
    ) -> Result<(), GlError> {
        let source = describe_attrib(self.array_buffer, index, layout)?;
        self.attribs.entry(index).or_default().source = Some(source);
        Ok(())
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&mut self) -> Result<BufferId, GlError> {
        let id = self.alloc_id();
        self.buffers.insert(id, BufferObject::default());
        Ok(BufferId(id))
    }

    fn bind_array_buffer(&mut self, buffer: Option<BufferId>) {
        self.array_buffer = buffer;
    }

    fn buffer_data(&mut self, data: &[u8], _usage: BufferUsage) -> Result<(), GlError> {
        let id = self.array_buffer.ok_or(GlError::NoBuffer)?;
        let obj = self
            .buffers
            .get_mut(&id.0)
            .ok_or(GlError::InvalidHandle("buffer", id.0))?;

        obj.len = data.len() as u64;
        obj.storage = (!data.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quadmirror array buffer"),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        });
        Ok(())
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self) -> Result<TextureId, GlError> {
        let id = self.alloc_id();
        self.textures.insert(id, TextureObject::default());
        Ok(TextureId(id))
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.bound_texture = texture;
    }

    fn tex_parameter(&mut self, param: TexParam) -> Result<(), GlError> {
        let tex = self.bound_texture_mut()?;
        match param {
            TexParam::MinFilter(f) => tex.min_filter = f,
            TexParam::MagFilter(f) => tex.mag_filter = f,
            TexParam::WrapS(w) => tex.wrap_s = w,
            TexParam::WrapT(w) => tex.wrap_t = w,
        }
        tex.sampler = None;
        Ok(())
    }

    fn set_unpack_flip_y(&mut self, flip: bool) {
        self.unpack_flip_y = flip;
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), GlError> {
        self.bound_texture_mut()?;
        let row = rgba_row_len(width, height, rgba.len())?;

        let pixels: Cow<'_, [u8]> = if self.unpack_flip_y {
            Cow::Owned(flip_rows(rgba, row))
        } else {
            Cow::Borrowed(rgba)
        };

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadmirror image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            texture.as_image_copy(),
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.bound_texture_mut()?.image = Some((texture, view));
        Ok(())
    }

    // ── output ────────────────────────────────────────────────────────────

    fn clear_color(&mut self, color: ClearColor) {
        self.clear_color = color;
    }

    fn clear(&mut self) -> Result<(), GlError> {
        let c = self.clear_color;
        let color = wgpu::Color { r: c.r as f64, g: c.g as f64, b: c.b as f64, a: c.a as f64 };
        submit_canvas_pass(self.device, self.queue, self.canvas, wgpu::LoadOp::Clear(color), |_| {});
        Ok(())
    }

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32) -> Result<(), GlError> {
        if count == 0 {
            return Ok(());
        }
        let program_id = self.current_program.ok_or(GlError::NoProgram)?;
        let device = self.device;
        let format = self.canvas.format();

        let binary = self
            .programs
            .get_mut(&program_id.0)
            .and_then(|p| p.binary.as_mut())
            .ok_or(GlError::NoProgram)?;

        // Resolve every vertex input to (location, layout, storage).
        let mut inputs: Vec<_> = binary.vertex.inputs.iter().collect();
        inputs.sort_by_key(|v| v.location);

        let mut attribs = Vec::with_capacity(inputs.len());
        let mut vertex_buffers = Vec::with_capacity(inputs.len());
        for input in inputs {
            let (buffer_id, layout) = resolve_attrib(&self.attribs, input)?;

            let buffer = self
                .buffers
                .get(&buffer_id.0)
                .ok_or(GlError::InvalidHandle("buffer", buffer_id.0))?;
            let needed = bytes_read(layout, first, count)?;
            let storage = buffer
                .storage
                .as_ref()
                .filter(|_| buffer.len >= needed)
                .ok_or_else(|| {
                    GlError::backend(format!(
                        "draw reads {needed} bytes from attribute `{}`, buffer holds {}",
                        input.name, buffer.len
                    ))
                })?;

            attribs.push((input.location, layout));
            vertex_buffers.push(storage);
        }

        let key = PipelineKey { primitive: mode, attribs };
        if !binary.pipelines.contains_key(&key) {
            log::debug!("building render pipeline for {:?}", key);
            let pipeline = build_pipeline(device, binary, &key, format);
            binary.pipelines.insert(key.clone(), pipeline);
        }
        let Some(pipeline) = binary.pipelines.get(&key) else {
            return Err(GlError::backend("render pipeline cache miss"));
        };

        let bind_group = if binary.resources.is_empty() {
            None
        } else {
            let tex_id = self.bound_texture.ok_or(GlError::NoTexture)?;
            let tex = self
                .textures
                .get_mut(&tex_id.0)
                .ok_or(GlError::InvalidHandle("texture", tex_id.0))?;
            if tex.sampler.is_none() {
                tex.sampler = Some(create_sampler(device, tex));
            }
            let (Some((_, view)), Some(sampler)) = (tex.image.as_ref(), tex.sampler.as_ref())
            else {
                return Err(GlError::backend("bound texture has no image data"));
            };

            let entries: Vec<wgpu::BindGroupEntry<'_>> = binary
                .resources
                .iter()
                .map(|slot| wgpu::BindGroupEntry {
                    binding: slot.binding,
                    resource: match slot.kind {
                        ResourceKind::Texture => wgpu::BindingResource::TextureView(view),
                        ResourceKind::Sampler => wgpu::BindingResource::Sampler(sampler),
                    },
                })
                .collect();

            Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("quadmirror texture bind group"),
                layout: &pipeline.get_bind_group_layout(0),
                entries: &entries,
            }))
        };

        submit_canvas_pass(device, self.queue, self.canvas, wgpu::LoadOp::Load, |rpass| {
            rpass.set_pipeline(pipeline);
            if let Some(bg) = bind_group.as_ref() {
                rpass.set_bind_group(0, bg, &[]);
            }
            for (slot, storage) in vertex_buffers.iter().enumerate() {
                rpass.set_vertex_buffer(slot as u32, storage.slice(..));
            }
            rpass.draw(first..first + count, 0..1);
        });
        Ok(())
    }
}

/// Validates an attribute description against the bound array buffer.
fn describe_attrib(
    array_buffer: Option<BufferId>,
    index: u32,
    layout: AttribLayout,
) -> Result<(BufferId, AttribLayout), GlError> {
    let buffer = array_buffer.ok_or(GlError::NoBuffer)?;
    if !(1..=4).contains(&layout.components) {
        return Err(GlError::backend(format!(
            "attribute {index}: {} components (expected 1..=4)",
            layout.components
        )));
    }
    if layout.offset + layout.components as u32 * 4 > layout.effective_stride() {
        return Err(GlError::backend(format!(
            "attribute {index}: offset {} does not fit in stride {}",
            layout.offset,
            layout.effective_stride()
        )));
    }
    Ok((buffer, layout))
}

/// Source of a vertex input at draw time: enabled, described, matching type.
fn resolve_attrib(
    attribs: &BTreeMap<u32, AttribState>,
    input: &InterfaceVar,
) -> Result<(BufferId, AttribLayout), GlError> {
    let state = attribs
        .get(&input.location)
        .filter(|s| s.enabled)
        .ok_or_else(|| {
            GlError::backend(format!(
                "attribute `{}` (location {}) is not enabled",
                input.name, input.location
            ))
        })?;
    let (buffer, layout) = state.source.ok_or_else(|| {
        GlError::backend(format!("attribute `{}` has no buffer described", input.name))
    })?;
    if reflect::float_components(&input.ty) != Some(layout.components) {
        return Err(GlError::backend(format!(
            "attribute `{}` is described with {} components, shader declares a different type",
            input.name, layout.components
        )));
    }
    Ok((buffer, layout))
}

/// Bytes of an attribute buffer that drawing `first..first + count` reads.
///
/// `count` must be non-zero.
fn bytes_read(layout: AttribLayout, first: u32, count: u32) -> Result<u64, GlError> {
    let end = first.checked_add(count).ok_or_else(|| {
        GlError::backend(format!("vertex range {first} + {count} overflows"))
    })?;
    Ok(layout.offset as u64
        + (end - 1) as u64 * layout.effective_stride() as u64
        + layout.components as u64 * 4)
}

/// Row length in bytes of a tightly packed RGBA8 image, after checking the
/// data covers exactly `width` x `height` pixels.
fn rgba_row_len(width: u32, height: u32, len: usize) -> Result<usize, GlError> {
    if width == 0 || height == 0 {
        return Err(GlError::backend("texture dimensions must be non-zero"));
    }
    let row = width as usize * 4;
    let expected = row * height as usize;
    if len != expected {
        return Err(GlError::backend(format!(
            "texture data is {len} bytes, expected {expected} for {width}x{height} RGBA8"
        )));
    }
    Ok(row)
}

/// Reverses the row order of `pixels`, `row` bytes per row.
fn flip_rows(pixels: &[u8], row: usize) -> Vec<u8> {
    let mut flipped = Vec::with_capacity(pixels.len());
    for r in pixels.chunks_exact(row).rev() {
        flipped.extend_from_slice(r);
    }
    flipped
}

/// Records one render pass over the canvas and submits it immediately.
fn submit_canvas_pass(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    canvas: &Canvas,
    load: wgpu::LoadOp<wgpu::Color>,
    record: impl FnOnce(&mut wgpu::RenderPass<'_>),
) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("quadmirror draw encoder"),
    });
    {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadmirror canvas pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: canvas.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        record(&mut rpass);
    }
    queue.submit(std::iter::once(encoder.finish()));
}

fn build_pipeline(
    device: &wgpu::Device,
    binary: &ProgramBinary,
    key: &PipelineKey,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let attributes: Vec<[wgpu::VertexAttribute; 1]> = key
        .attribs
        .iter()
        .map(|(location, layout)| {
            [wgpu::VertexAttribute {
                format: vertex_format(layout.components),
                offset: layout.offset as u64,
                shader_location: *location,
            }]
        })
        .collect();

    let buffers: Vec<wgpu::VertexBufferLayout<'_>> = key
        .attribs
        .iter()
        .zip(&attributes)
        .map(|((_, layout), attrs)| wgpu::VertexBufferLayout {
            array_stride: layout.effective_stride() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: attrs,
        })
        .collect();

    let topology = match key.primitive {
        Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quadmirror program pipeline"),
        // Bind group layouts are derived from the shaders.
        layout: None,

        vertex: wgpu::VertexState {
            module: &binary.vertex_module,
            entry_point: Some(binary.vertex.entry_point.as_str()),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &binary.fragment_module,
            entry_point: Some(binary.fragment.entry_point.as_str()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn vertex_format(components: u8) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

fn create_sampler(device: &wgpu::Device, tex: &TextureObject) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("quadmirror texture sampler"),
        address_mode_u: address_mode(tex.wrap_s),
        address_mode_v: address_mode(tex.wrap_t),
        mag_filter: filter_mode(tex.mag_filter),
        min_filter: filter_mode(tex.min_filter),
        ..Default::default()
    })
}

fn address_mode(wrap: Wrap) -> wgpu::AddressMode {
    match wrap {
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        Wrap::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn filter_mode(filter: Filter) -> wgpu::FilterMode {
    match filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_inputs() -> Vec<InterfaceVar> {
        let vs = reflect::compile(ShaderStage::Vertex, crate::scene::VERTEX_SHADER).unwrap();
        let mut inputs = vs.inputs;
        inputs.sort_by_key(|v| v.location);
        inputs
    }

    // ── texture upload ────────────────────────────────────────────────────

    #[test]
    fn flip_rows_reverses_row_order() {
        // 2x3 image, one distinct byte value per row.
        let pixels: Vec<u8> = [1u8, 2, 3].iter().flat_map(|&v| [v; 8]).collect();
        let flipped = flip_rows(&pixels, 8);

        assert_eq!(&flipped[..8], &[3; 8]);
        assert_eq!(&flipped[8..16], &[2; 8]);
        assert_eq!(&flipped[16..], &[1; 8]);
    }

    #[test]
    fn flip_rows_keeps_pixels_within_a_row() {
        let pixels = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(flip_rows(&pixels, 8), pixels.to_vec());
    }

    #[test]
    fn rgba_row_len_checks_data_length() {
        assert_eq!(rgba_row_len(2, 3, 24), Ok(8));
        assert!(matches!(rgba_row_len(2, 3, 23), Err(GlError::Backend(m)) if m.contains("23 bytes")));
        assert!(rgba_row_len(0, 3, 0).is_err());
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn describe_without_bound_buffer_is_no_buffer() {
        assert_eq!(describe_attrib(None, 0, AttribLayout::FLOAT2), Err(GlError::NoBuffer));
    }

    #[test]
    fn describe_rejects_bad_layouts() {
        let buffer = Some(BufferId(7));
        let five = AttribLayout { components: 5, ..AttribLayout::FLOAT2 };
        let past_stride = AttribLayout { offset: 4, ..AttribLayout::FLOAT2 };

        assert_eq!(
            describe_attrib(buffer, 0, AttribLayout::FLOAT2),
            Ok((BufferId(7), AttribLayout::FLOAT2))
        );
        assert!(describe_attrib(buffer, 0, five).is_err());
        assert!(describe_attrib(buffer, 0, past_stride).is_err());
    }

    #[test]
    fn draw_needs_enabled_and_described_attribute() {
        let position = &quad_inputs()[0];
        let mut attribs = BTreeMap::new();

        let err = resolve_attrib(&attribs, position).unwrap_err();
        assert!(matches!(err, GlError::Backend(m) if m.contains("not enabled")));

        attribs.insert(0, AttribState { enabled: true, source: None });
        let err = resolve_attrib(&attribs, position).unwrap_err();
        assert!(matches!(err, GlError::Backend(m) if m.contains("no buffer described")));

        attribs.insert(
            0,
            AttribState { enabled: true, source: Some((BufferId(3), AttribLayout::FLOAT2)) },
        );
        assert_eq!(resolve_attrib(&attribs, position), Ok((BufferId(3), AttribLayout::FLOAT2)));
    }

    #[test]
    fn described_but_disabled_attribute_is_rejected() {
        let tex_coord = &quad_inputs()[1];
        let mut attribs = BTreeMap::new();
        attribs.insert(
            1,
            AttribState { enabled: false, source: Some((BufferId(3), AttribLayout::FLOAT2)) },
        );
        assert!(resolve_attrib(&attribs, tex_coord).is_err());
    }

    #[test]
    fn component_count_must_match_shader_type() {
        let position = &quad_inputs()[0];
        let float3 = AttribLayout { components: 3, stride: 12, ..AttribLayout::FLOAT2 };
        let mut attribs = BTreeMap::new();
        attribs.insert(0, AttribState { enabled: true, source: Some((BufferId(3), float3)) });

        let err = resolve_attrib(&attribs, position).unwrap_err();
        assert!(matches!(err, GlError::Backend(m) if m.contains("3 components")));
    }

    // ── draw range ────────────────────────────────────────────────────────

    #[test]
    fn bytes_read_for_one_quad() {
        assert_eq!(bytes_read(AttribLayout::FLOAT2, 0, 6), Ok(48));
        assert_eq!(bytes_read(AttribLayout::FLOAT2, 2, 1), Ok(24));
    }

    #[test]
    fn bytes_read_rejects_overflowing_range() {
        let err = bytes_read(AttribLayout::FLOAT2, u32::MAX - 2, 6).unwrap_err();
        assert!(matches!(err, GlError::Backend(m) if m.contains("overflows")));
    }
}
