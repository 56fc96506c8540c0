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

//! The graphics-device trait the benchmark drives.

use crate::gfx::adapter::GraphicsAdapterInfo;
use crate::gfx::buffer::{BufferDescriptor, BufferId};
use crate::gfx::error::{DeviceError, ResourceError};
use crate::gfx::program::{ProgramDescriptor, ProgramId};
use crate::gfx::state::{Color, CompareFunction, ScissorRect};
use std::fmt::Debug;
use std::ops::Range;

/// The submission surface the benchmark drives.
///
/// The contract deliberately mirrors an immediate-mode driver interface:
/// stateful setters followed by [`draw_indexed`](DrawDevice::draw_indexed)
/// calls, bracketed by a frame. Resource creation is fallible and happens
/// once at session initialization; the per-draw operations are infallible
/// because the measured loops assume valid resources and must not branch on
/// error paths inside the timed window.
///
/// Implementations are free to realize state changes however their API
/// requires (a wgpu backend swaps cached pipeline variants where a GL
/// backend would flip a single state value); the benchmark only cares that
/// each setter reaches the driver before the next draw.
pub trait DrawDevice: Debug {
    /// Returns standardized information about the underlying adapter.
    fn adapter_info(&self) -> GraphicsAdapterInfo;

    /// Compiles and links a shader program.
    fn create_program(
        &mut self,
        descriptor: &ProgramDescriptor,
    ) -> Result<ProgramId, ResourceError>;

    /// Creates a GPU buffer initialized with the given data.
    fn create_buffer_with_data(
        &mut self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Re-uploads the full contents of an existing buffer.
    ///
    /// This sits inside the measured window of the buffer re-upload
    /// scenario, so it must enqueue the transfer and return without
    /// blocking on completion.
    fn upload_buffer(&mut self, id: BufferId, data: &[u8]);

    /// Sets the viewport to the given drawable size in pixels.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Begins a frame, clearing the color target to `clear_color`.
    fn begin_frame(&mut self, clear_color: Color) -> Result<(), DeviceError>;

    /// Ends the frame, submitting all recorded work for execution.
    fn end_frame(&mut self);

    /// Selects the shader program for subsequent draws.
    fn use_program(&mut self, program: ProgramId);

    /// Binds the vertex buffer at a byte offset for subsequent draws.
    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64);

    /// Binds the index buffer for subsequent draws (16-bit indices).
    fn bind_index_buffer(&mut self, buffer: BufferId);

    /// Sets the uniform draw color.
    fn set_color(&mut self, color: Color);

    /// Sets the scissor rectangle.
    fn set_scissor(&mut self, rect: ScissorRect);

    /// Enables or disables the depth test.
    fn set_depth_test(&mut self, enabled: bool);

    /// Sets the depth comparison function.
    fn set_depth_compare(&mut self, compare: CompareFunction);

    /// Enables or disables the stencil test.
    fn set_stencil_test(&mut self, enabled: bool);

    /// Sets the stencil comparison function, reference value, and read mask.
    fn set_stencil_function(&mut self, compare: CompareFunction, reference: u32, mask: u32);

    /// Records one indexed draw over the given index range.
    fn draw_indexed(&mut self, indices: Range<u32>);
}
