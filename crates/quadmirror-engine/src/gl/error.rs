use std::fmt;

/// Error reported by a [`GlContext`](super::GlContext) operation.
///
/// Shader compile and link failures are not errors at this level; they are
/// reported through the compile/link status queries and info logs.
#[derive(Debug, Clone, PartialEq)]
pub enum GlError {
    /// The handle does not name a live object of the expected kind.
    InvalidHandle(&'static str, u32),
    /// A draw was issued without an active, successfully linked program.
    NoProgram,
    /// A buffer operation was issued with no buffer bound to the array target.
    NoBuffer,
    /// A texture operation was issued with no texture bound.
    NoTexture,
    /// Backend-specific failure (allocation, unsupported state, validation).
    Backend(String),
}

impl GlError {
    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        GlError::Backend(msg.into())
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlError::InvalidHandle(kind, id) => write!(f, "invalid {kind} handle {id}"),
            GlError::NoProgram => f.write_str("no linked program is active"),
            GlError::NoBuffer => f.write_str("no buffer bound to the array target"),
            GlError::NoTexture => f.write_str("no texture bound"),
            GlError::Backend(msg) => write!(f, "graphics backend error: {msg}"),
        }
    }
}

impl std::error::Error for GlError {}
