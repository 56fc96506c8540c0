// Copyright 2025 the drawmark authors
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

//! The hierarchy of error types for the graphics contract.
//!
//! Shader and pipeline failures carry the driver diagnostic text verbatim;
//! a failed compile or link is terminal for that resource.

use crate::gfx::program::ProgramId;
use std::fmt;

/// An error raised while compiling a shader module.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source failed to compile into a backend-specific module.
    CompilationError {
        /// A descriptive label for the shader, if available.
        label: String,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
    /// The specified entry point is not present in the shader module.
    InvalidEntryPoint {
        /// The entry point name that was not found.
        entry_point: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ShaderError::InvalidEntryPoint { entry_point } => {
                write!(f, "Invalid shader entry point '{entry_point}'")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error raised while linking a shader program or building pipeline state.
#[derive(Debug)]
pub enum PipelineError {
    /// The graphics backend failed to build the pipeline state object.
    CompilationFailed {
        /// A descriptive label for the pipeline, if available.
        label: Option<String>,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// The referenced program handle is not valid.
    InvalidProgram {
        /// The offending program ID.
        id: ProgramId,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::CompilationFailed { label, details } => {
                write!(
                    f,
                    "Pipeline compilation failed for '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    details
                )
            }
            PipelineError::InvalidProgram { id } => {
                write!(f, "Invalid program handle: {id:?}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error raised while creating or using a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// The handle used to reference a resource is invalid.
    InvalidHandle,
    /// An error originating from the specific graphics backend.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Pipeline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

/// A frame-level error from the graphics device.
#[derive(Debug)]
pub enum DeviceError {
    /// Failed to acquire the next surface frame for rendering.
    SurfaceAcquisitionFailed(String),
    /// A frame operation was issued outside a `begin_frame`/`end_frame` pair.
    NoActiveFrame,
    /// The graphics device was lost and needs to be reinitialized.
    DeviceLost,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            DeviceError::NoActiveFrame => {
                write!(f, "Frame operation issued without an active frame.")
            }
            DeviceError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
        }
    }
}

impl std::error::Error for DeviceError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationError {
            label: "BenchShader".to_string(),
            details: "syntax error at line 5".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for 'BenchShader': syntax error at line 5"
        );
    }

    #[test]
    fn resource_error_wraps_shader_error() {
        let shader_err = ShaderError::InvalidEntryPoint {
            entry_point: "vs_missing".to_string(),
        };
        let res_err: ResourceError = shader_err.into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Invalid shader entry point 'vs_missing'"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn resource_error_wraps_pipeline_error() {
        let pipeline_err = PipelineError::InvalidProgram { id: ProgramId(7) };
        let res_err: ResourceError = pipeline_err.into();
        assert!(format!("{res_err}").contains("ProgramId(7)"));
        assert!(res_err.source().is_some());
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::SurfaceAcquisitionFailed("timeout".to_string());
        assert_eq!(
            format!("{err}"),
            "Failed to acquire surface for rendering: timeout"
        );
    }
}
