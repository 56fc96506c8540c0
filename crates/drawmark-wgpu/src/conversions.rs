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

use drawmark_core::gfx::{
    AdapterDeviceType, BufferUsage, Color, CompareFunction, GraphicsBackendType,
};

/// A local extension trait to convert the core contract's types into
/// wgpu-compatible types. This avoids Rust's orphan rules while keeping an
/// idiomatic `.into_wgpu()` syntax.
pub(crate) trait IntoWgpu<T> {
    /// Consumes self and converts it into a wgpu-compatible type.
    fn into_wgpu(self) -> T;
}

impl IntoWgpu<wgpu::BufferUsages> for BufferUsage {
    fn into_wgpu(self) -> wgpu::BufferUsages {
        let mut usages = wgpu::BufferUsages::empty();
        if self.contains(BufferUsage::VERTEX) {
            usages |= wgpu::BufferUsages::VERTEX;
        }
        if self.contains(BufferUsage::INDEX) {
            usages |= wgpu::BufferUsages::INDEX;
        }
        if self.contains(BufferUsage::UNIFORM) {
            usages |= wgpu::BufferUsages::UNIFORM;
        }
        if self.contains(BufferUsage::COPY_DST) {
            usages |= wgpu::BufferUsages::COPY_DST;
        }
        if self.contains(BufferUsage::COPY_SRC) {
            usages |= wgpu::BufferUsages::COPY_SRC;
        }
        usages
    }
}

impl IntoWgpu<wgpu::CompareFunction> for CompareFunction {
    fn into_wgpu(self) -> wgpu::CompareFunction {
        match self {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

impl IntoWgpu<wgpu::Color> for Color {
    fn into_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// Maps a wgpu backend identifier onto the core contract's enum.
pub(crate) fn backend_type(backend: wgpu::Backend) -> GraphicsBackendType {
    match backend {
        wgpu::Backend::Vulkan => GraphicsBackendType::Vulkan,
        wgpu::Backend::Metal => GraphicsBackendType::Metal,
        wgpu::Backend::Dx12 => GraphicsBackendType::Dx12,
        wgpu::Backend::Gl => GraphicsBackendType::OpenGl,
        _ => GraphicsBackendType::Software,
    }
}

/// Maps a wgpu device-type identifier onto the core contract's enum.
pub(crate) fn device_type(device_type: wgpu::DeviceType) -> AdapterDeviceType {
    match device_type {
        wgpu::DeviceType::DiscreteGpu => AdapterDeviceType::DiscreteGpu,
        wgpu::DeviceType::IntegratedGpu => AdapterDeviceType::IntegratedGpu,
        wgpu::DeviceType::Cpu => AdapterDeviceType::Cpu,
        _ => AdapterDeviceType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_usage_combination_converts() {
        let usages: wgpu::BufferUsages =
            (BufferUsage::INDEX | BufferUsage::COPY_DST).into_wgpu();
        assert!(usages.contains(wgpu::BufferUsages::INDEX));
        assert!(usages.contains(wgpu::BufferUsages::COPY_DST));
        assert!(!usages.contains(wgpu::BufferUsages::VERTEX));
    }

    #[test]
    fn compare_function_converts() {
        assert_eq!(
            CompareFunction::NotEqual.into_wgpu(),
            wgpu::CompareFunction::NotEqual
        );
        assert_eq!(
            CompareFunction::Always.into_wgpu(),
            wgpu::CompareFunction::Always
        );
    }

    #[test]
    fn color_converts_to_f64_channels() {
        let color: wgpu::Color = Color::new(1.0, 0.5, 0.0, 1.0).into_wgpu();
        assert_eq!(color.r, 1.0);
        assert!((color.g - 0.5).abs() < 1e-6);
    }
}
