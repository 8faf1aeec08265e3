use std::fmt;

/// Shader object handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderId(pub u32);

/// Program object handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Buffer object handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Texture object handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Pipeline stage a shader object belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Usage hint passed with `buffer_data`.
///
/// Only static uploads exist: every `buffer_data` replaces the storage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    StaticDraw,
}

/// Describes how an enabled attribute reads `f32` components from the bound buffer.
///
/// `stride == 0` means tightly packed (`components * 4` bytes).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribLayout {
    pub components: u8,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
}

impl AttribLayout {
    /// Tightly packed `vec2<f32>`, no normalization, zero offset.
    pub const FLOAT2: AttribLayout = AttribLayout {
        components: 2,
        normalized: false,
        stride: 2 * std::mem::size_of::<f32>() as u32,
        offset: 0,
    };

    /// Effective stride in bytes.
    pub fn effective_stride(&self) -> u32 {
        if self.stride == 0 {
            self.components as u32 * std::mem::size_of::<f32>() as u32
        } else {
            self.stride
        }
    }
}

/// Primitive assembly mode for `draw_arrays`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Triangles,
}

/// Texture sampling filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Texture coordinate wrap mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
}

/// A single sampler parameter applied to the bound texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TexParam {
    MinFilter(Filter),
    MagFilter(Filter),
    WrapS(Wrap),
    WrapT(Wrap),
}

/// Linear RGBA clear color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const OPAQUE_BLACK: ClearColor = ClearColor { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
}
