// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::math::Extent2D;
use crate::renderer::traits::GlVersion;
use std::fmt;

/// An error related to the loading or compilation of a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// An error occurred while trying to load the shader source from a path.
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// The underlying I/O or source error.
        source_error: String,
    },
    /// The shader source failed to compile or link.
    CompilationError {
        /// A descriptive label for the shader.
        label: String,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path, source_error } => {
                write!(
                    f,
                    "Failed to load shader source from '{path}': {source_error}"
                )
            }
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The requested size cannot back a resource.
    InvalidSize(Extent2D),
    /// The backend ran out of memory for the resource.
    OutOfMemory,
    /// The framebuffer is incomplete after attaching its color buffer.
    IncompleteFramebuffer(String),
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidSize(size) => {
                write!(f, "Invalid resource size {}x{}.", size.width, size.height)
            }
            ResourceError::OutOfMemory => write!(f, "Out of GPU memory."),
            ResourceError::IncompleteFramebuffer(msg) => {
                write!(f, "Incomplete framebuffer: {msg}")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error raised while initializing a filter.
#[derive(Debug)]
pub enum RenderError {
    /// The context does not reach the required feature level.
    UnsupportedContext {
        /// The feature level the filter needs.
        required: GlVersion,
        /// The feature level the context reports.
        found: GlVersion,
    },
    /// The requested viewport size is unusable.
    InvalidSize(Extent2D),
    /// A render target could not be allocated.
    RenderTargetFailed {
        /// The label of the target that failed.
        label: String,
        /// The backend error.
        source: ResourceError,
    },
    /// A shader program could not be loaded.
    Shader(ShaderError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnsupportedContext { required, found } => {
                write!(
                    f,
                    "OpenGL {required} not supported (context provides {found})"
                )
            }
            RenderError::InvalidSize(size) => {
                write!(
                    f,
                    "Invalid viewport size {}x{}",
                    size.width, size.height
                )
            }
            RenderError::RenderTargetFailed { label, source } => {
                write!(f, "Render target '{label}' initialization failed: {source}")
            }
            RenderError::Shader(err) => write!(f, "Shader program unavailable: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::RenderTargetFailed { source, .. } => Some(source),
            RenderError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::Shader(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::LoadError {
            path: "shaders/EDL/edl_shade.frag".to_string(),
            source_error: "File not found".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to load shader source from 'shaders/EDL/edl_shade.frag': File not found"
        );

        let err_comp = ShaderError::CompilationError {
            label: "EDL/edl_mix".to_string(),
            details: "Syntax error at line 5".to_string(),
        };
        assert_eq!(
            format!("{err_comp}"),
            "Shader compilation failed for 'EDL/edl_mix': Syntax error at line 5"
        );
    }

    #[test]
    fn render_error_wraps_shader_error() {
        let render_err: RenderError = ShaderError::CompilationError {
            label: "EDL/edl_shade".to_string(),
            details: "boom".to_string(),
        }
        .into();
        assert_eq!(
            format!("{render_err}"),
            "Shader program unavailable: Shader compilation failed for 'EDL/edl_shade': boom"
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn render_target_failure_display() {
        let err = RenderError::RenderTargetFailed {
            label: "EDL 1:2".to_string(),
            source: ResourceError::InvalidSize(Extent2D::new(0, 4)),
        };
        assert_eq!(
            format!("{err}"),
            "Render target 'EDL 1:2' initialization failed: Invalid resource size 0x4."
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn unsupported_context_display() {
        let err = RenderError::UnsupportedContext {
            required: GlVersion::GL_3_0,
            found: GlVersion::GL_2_1,
        };
        assert_eq!(
            format!("{err}"),
            "OpenGL 3.0 not supported (context provides 2.1)"
        );
        assert!(err.source().is_none());
    }
}
