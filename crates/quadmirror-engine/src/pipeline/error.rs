use std::fmt;

use crate::gl::{GlError, ShaderStage};

/// Failure while building or wiring a shader program.
///
/// `Compile` and `Link` are expected outcomes for bad shader text and carry
/// the backend's diagnostic log. Callers abort the render on any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
    UnknownAttribute { name: String },
    Gl(GlError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Compile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {}", log.trim_end())
            }
            PipelineError::Link { log } => {
                write!(f, "shader program failed to link: {}", log.trim_end())
            }
            PipelineError::UnknownAttribute { name } => {
                write!(f, "program declares no vertex attribute named `{name}`")
            }
            PipelineError::Gl(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Gl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GlError> for PipelineError {
    fn from(e: GlError) -> Self {
        PipelineError::Gl(e)
    }
}
