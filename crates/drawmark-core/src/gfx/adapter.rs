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

//! Adapter and driver identification.
//!
//! A driver-overhead benchmark is meaningless without knowing which driver
//! produced the numbers, so the session logs this once at initialization.

use std::fmt;

/// The graphics API family a backend sits on top of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsBackendType {
    /// Vulkan.
    Vulkan,
    /// Metal.
    Metal,
    /// Direct3D 12.
    Dx12,
    /// OpenGL or OpenGL ES.
    OpenGl,
    /// A software or test backend.
    #[default]
    Software,
}

/// The physical category of the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterDeviceType {
    /// A discrete GPU.
    DiscreteGpu,
    /// An integrated GPU.
    IntegratedGpu,
    /// A CPU / software rasterizer.
    Cpu,
    /// Unknown or virtualized hardware.
    #[default]
    Unknown,
}

/// Standardized, backend-agnostic information about a graphics adapter.
#[derive(Debug, Clone, Default)]
pub struct GraphicsAdapterInfo {
    /// The adapter name as reported by the driver (e.g., "NVIDIA GeForce RTX 4090").
    pub name: String,
    /// The graphics API backend in use.
    pub backend_type: GraphicsBackendType,
    /// The physical type of the adapter.
    pub device_type: AdapterDeviceType,
    /// The driver identification string, when the backend exposes one.
    pub driver_info: String,
}

impl fmt::Display for GraphicsAdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {:?})",
            self.name, self.backend_type, self.device_type
        )?;
        if !self.driver_info.is_empty() {
            write!(f, " driver: {}", self.driver_info)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_info_display_includes_driver_when_present() {
        let info = GraphicsAdapterInfo {
            name: "Test Adapter".to_string(),
            backend_type: GraphicsBackendType::Vulkan,
            device_type: AdapterDeviceType::DiscreteGpu,
            driver_info: "1.2.3".to_string(),
        };
        let rendered = format!("{info}");
        assert!(rendered.contains("Test Adapter"));
        assert!(rendered.contains("driver: 1.2.3"));
    }

    #[test]
    fn adapter_info_display_omits_empty_driver() {
        let info = GraphicsAdapterInfo {
            name: "Soft".to_string(),
            ..Default::default()
        };
        assert!(!format!("{info}").contains("driver:"));
    }
}
