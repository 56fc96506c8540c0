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

//! The benchmark session: resource setup and the per-frame step.

use crate::bench::report::ReportSink;
use crate::bench::samples::SampleSet;
use crate::bench::scenario::Scenario;
use crate::bench::scheduler::ScenarioScheduler;
use crate::bench::{INSTANCE_COUNT, SAMPLE_WINDOW};
use crate::gfx::{
    BufferDescriptor, BufferId, BufferUsage, Color, CompareFunction, DeviceError, DrawDevice,
    ProgramDescriptor, ProgramId, ResourceError, ScissorRect, ShaderSourceData,
};
use crate::utils::timer::Stopwatch;
use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;

/// Floats per triangle instance in the vertex buffer (3 vertices, xy each).
const FLOATS_PER_INSTANCE: usize = 6;

/// Byte stride of one triangle instance in the vertex buffer.
const INSTANCE_STRIDE: u64 = (FLOATS_PER_INSTANCE * size_of::<f32>()) as u64;

/// Index buffer entry count. Indices are the identity sequence, so any
/// 3-index slice addresses one triangle of the vertex buffer directly.
const INDEX_COUNT: usize = u16::MAX as usize;

/// The one shader module every program is built from. The two fragment
/// entry points differ only in how they permute the uniform color's
/// channels, which gives the program-change scenario two distinct programs
/// without a second source text.
const TRIANGLE_SHADER: &str = r#"
struct DrawUniforms {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> draw: DrawUniforms;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return draw.color;
}

@fragment
fn fs_swizzled() -> @location(0) vec4<f32> {
    return vec4<f32>(draw.color.b, draw.color.r, draw.color.g, draw.color.a);
}
"#;

/// An error raised by the benchmark session.
#[derive(Debug)]
pub enum SessionError {
    /// `step` was called before a successful `init`.
    NotInitialized,
    /// Resource creation failed during initialization.
    Initialization(ResourceError),
    /// A frame-level device error occurred.
    Device(DeviceError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotInitialized => {
                write!(f, "Benchmark session stepped before initialization.")
            }
            SessionError::Initialization(err) => {
                write!(f, "Benchmark session initialization failed: {err}")
            }
            SessionError::Device(err) => write!(f, "Benchmark session device error: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Initialization(err) => Some(err),
            SessionError::Device(err) => Some(err),
            SessionError::NotInitialized => None,
        }
    }
}

impl From<ResourceError> for SessionError {
    fn from(err: ResourceError) -> Self {
        SessionError::Initialization(err)
    }
}

impl From<DeviceError> for SessionError {
    fn from(err: DeviceError) -> Self {
        SessionError::Device(err)
    }
}

/// GPU handles created once at initialization and owned for the session
/// lifetime. Never reallocated per frame.
#[derive(Debug, Clone, Copy)]
struct RenderResources {
    program: ProgramId,
    program_swizzled: ProgramId,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
}

/// The benchmark session: owns the device, the scenario rotation, the
/// sample buffers, and the GPU resources.
///
/// The host calls [`init`](Self::init) once with the drawable size, then
/// [`step`](Self::step) once per rendered frame. All state lives here; two
/// sessions can coexist without interfering.
#[derive(Debug)]
pub struct BenchSession<D: DrawDevice, S: ReportSink> {
    device: D,
    sink: S,
    scheduler: ScenarioScheduler,
    samples: SampleSet,
    resources: Option<RenderResources>,
    /// Host copy of the index data, re-sent by the re-upload scenario.
    index_scratch: Vec<u8>,
    surface_size: (u32, u32),
}

impl<D: DrawDevice, S: ReportSink> BenchSession<D, S> {
    /// Creates an uninitialized session around a device and a report sink.
    pub fn new(device: D, sink: S) -> Self {
        Self {
            device,
            sink,
            scheduler: ScenarioScheduler::new(),
            samples: SampleSet::new(SAMPLE_WINDOW, INSTANCE_COUNT),
            resources: None,
            index_scratch: Vec::new(),
            surface_size: (0, 0),
        }
    }

    /// Read access to the device, mainly for inspection in tests.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the device, for host-driven concerns such as
    /// surface resizes between frames.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Whether [`init`](Self::init) has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    /// Builds the GPU resources and sets the viewport.
    ///
    /// Compiles both shader programs, fills the vertex buffer with
    /// [`INSTANCE_COUNT`] identical triangles and the index buffer with the
    /// identity sequence, and logs the adapter the run executes on. A second
    /// call is a warned no-op; existing handles stay valid.
    pub fn init(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        if self.resources.is_some() {
            log::warn!("BenchSession: init called twice, keeping existing resources");
            return Ok(());
        }

        let info = self.device.adapter_info();
        log::info!("BenchSession: running on {info}");

        let program = self.device.create_program(&ProgramDescriptor {
            label: Some("bench-triangle"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed(TRIANGLE_SHADER)),
            vertex_entry_point: "vs_main",
            fragment_entry_point: "fs_main",
        })?;
        let program_swizzled = self.device.create_program(&ProgramDescriptor {
            label: Some("bench-triangle-swizzled"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed(TRIANGLE_SHADER)),
            vertex_entry_point: "vs_main",
            fragment_entry_point: "fs_swizzled",
        })?;

        // Every instance is the same small triangle; scenarios that walk the
        // buffer rely only on the per-instance stride, not the geometry.
        let mut vertices = Vec::with_capacity(INSTANCE_COUNT * FLOATS_PER_INSTANCE);
        for _ in 0..INSTANCE_COUNT {
            vertices.extend_from_slice(&[0.0f32, 0.1, -0.1, -0.1, 0.1, -0.1]);
        }
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let vertex_buffer = self.device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("bench-vertices")),
                size: vertex_bytes.len() as u64,
                usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
            },
            vertex_bytes,
        )?;

        let indices: Vec<u16> = (0..INDEX_COUNT as u16).collect();
        let index_scratch = bytemuck::cast_slice(&indices).to_vec();
        let index_buffer = self.device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("bench-indices")),
                size: index_scratch.len() as u64,
                usage: BufferUsage::INDEX | BufferUsage::COPY_DST,
            },
            &index_scratch,
        )?;

        self.device.set_viewport(width, height);
        self.surface_size = (width, height);
        self.index_scratch = index_scratch;
        self.resources = Some(RenderResources {
            program,
            program_swizzled,
            vertex_buffer,
            index_buffer,
        });
        Ok(())
    }

    /// Runs one frame: warm-up draw, the current slot's scenario bodies with
    /// timing, sample recording, flush handling, scheduler advance.
    pub fn step(&mut self) -> Result<(), SessionError> {
        let Some(res) = self.resources else {
            return Err(SessionError::NotInitialized);
        };

        self.device.begin_frame(Color::BLACK)?;
        self.bind_default_state(res);
        self.warm_up_draw(res);

        match self.scheduler.current_scenario() {
            // Slot 0 measures the two single-batch variants back to back.
            Scenario::SingleBatch => {
                let elapsed = self.body_single_batch(res);
                self.samples.record(Scenario::SingleBatch, elapsed);
                let elapsed = self.body_single_batch_reupload(res);
                self.samples.record(Scenario::SingleBatchReupload, elapsed);
            }
            Scenario::SameMeshSameRange => {
                let elapsed = self.body_same_mesh_same_range(res);
                self.samples.record(Scenario::SameMeshSameRange, elapsed);
            }
            Scenario::SameMeshDifferentRange => {
                let elapsed = self.body_same_mesh_different_range(res);
                self.samples
                    .record(Scenario::SameMeshDifferentRange, elapsed);
            }
            Scenario::DifferentMeshes => {
                let elapsed = self.body_different_meshes(res);
                self.samples.record(Scenario::DifferentMeshes, elapsed);
            }
            Scenario::ScissorChange => {
                let elapsed = self.body_scissor_change(res);
                self.samples.record(Scenario::ScissorChange, elapsed);
            }
            Scenario::ColorChange => {
                let elapsed = self.body_color_change(res);
                self.samples.record(Scenario::ColorChange, elapsed);
            }
            Scenario::DepthFuncChange => {
                let elapsed = self.body_depth_func_change(res);
                self.samples.record(Scenario::DepthFuncChange, elapsed);
            }
            Scenario::StencilFuncChange => {
                let elapsed = self.body_stencil_func_change(res);
                self.samples.record(Scenario::StencilFuncChange, elapsed);
            }
            Scenario::ShaderProgramChange => {
                let elapsed = self.body_shader_program_change(res);
                self.samples.record(Scenario::ShaderProgramChange, elapsed);
            }
            // The reupload variant runs inside slot 0 above.
            Scenario::SingleBatchReupload => {}
            Scenario::Flush => {
                if let Some(report) = self.samples.note_flush_slot() {
                    self.sink.emit(&report);
                }
            }
        }

        self.scheduler.advance();
        self.device.end_frame();
        Ok(())
    }

    /// Per-frame baseline: default program, red color, both mesh buffers.
    fn bind_default_state(&mut self, res: RenderResources) {
        self.device.use_program(res.program);
        self.device.set_color(Color::RED);
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        self.device.bind_index_buffer(res.index_buffer);
    }

    /// Unmeasured draw of the last instance, run before every frame's
    /// measured work to prime driver and command caches.
    fn warm_up_draw(&mut self, res: RenderResources) {
        let offset = (INSTANCE_COUNT as u64 - 1) * INSTANCE_STRIDE;
        self.device.bind_vertex_buffer(res.vertex_buffer, offset);
        self.device.draw_indexed(0..3);
    }

    fn body_single_batch(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        self.device.draw_indexed(0..(INSTANCE_COUNT * 3) as u32);
        watch.elapsed_us()
    }

    /// Same batch, but the index upload sits inside the measured window.
    fn body_single_batch_reupload(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device
            .upload_buffer(res.index_buffer, &self.index_scratch);
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        self.device.draw_indexed(0..(INSTANCE_COUNT * 3) as u32);
        watch.elapsed_us()
    }

    fn body_same_mesh_same_range(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        for _ in 0..INSTANCE_COUNT {
            self.device.draw_indexed(0..3);
        }
        watch.elapsed_us()
    }

    fn body_same_mesh_different_range(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        for i in 0..INSTANCE_COUNT as u32 {
            self.device.draw_indexed(i * 3..i * 3 + 3);
        }
        watch.elapsed_us()
    }

    fn body_different_meshes(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        for i in 0..INSTANCE_COUNT as u64 {
            self.device
                .bind_vertex_buffer(res.vertex_buffer, i * INSTANCE_STRIDE);
            self.device.draw_indexed(0..3);
        }
        watch.elapsed_us()
    }

    fn body_scissor_change(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        for i in 0..INSTANCE_COUNT as u32 {
            self.device
                .set_scissor(ScissorRect::new(0, 0, 10 + i, 10 + i));
            self.device.draw_indexed(0..3);
        }
        let elapsed = watch.elapsed_us();
        // The scissor applies to every later draw, so restore the full
        // surface outside the timed window.
        let (width, height) = self.surface_size;
        self.device
            .set_scissor(ScissorRect::new(0, 0, width, height));
        elapsed
    }

    fn body_color_change(&mut self, res: RenderResources) -> u64 {
        let n = INSTANCE_COUNT as f32;
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        for i in 0..INSTANCE_COUNT {
            self.device
                .set_color(Color::new(1.0, (n - i as f32) / n, 0.0, 1.0));
            self.device.draw_indexed(0..3);
        }
        watch.elapsed_us()
    }

    /// Depth test is enabled and disabled outside the timed window; only the
    /// comparison-function flips are measured.
    fn body_depth_func_change(&mut self, res: RenderResources) -> u64 {
        self.device.set_depth_test(true);
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        let mut toggle = false;
        for _ in 0..INSTANCE_COUNT {
            self.device.set_depth_compare(if toggle {
                CompareFunction::Equal
            } else {
                CompareFunction::NotEqual
            });
            self.device.draw_indexed(0..3);
            toggle = !toggle;
        }
        let elapsed = watch.elapsed_us();
        self.device.set_depth_test(false);
        elapsed
    }

    fn body_stencil_func_change(&mut self, res: RenderResources) -> u64 {
        self.device.set_stencil_test(true);
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        let mut toggle = false;
        for i in 0..INSTANCE_COUNT as u32 {
            let compare = if toggle {
                CompareFunction::Equal
            } else {
                CompareFunction::NotEqual
            };
            self.device.set_stencil_function(compare, i % 256, 0xFF);
            self.device.draw_indexed(0..3);
            toggle = !toggle;
        }
        let elapsed = watch.elapsed_us();
        self.device.set_stencil_test(false);
        elapsed
    }

    fn body_shader_program_change(&mut self, res: RenderResources) -> u64 {
        let watch = Stopwatch::new();
        self.device.bind_vertex_buffer(res.vertex_buffer, 0);
        let mut toggle = false;
        for _ in 0..INSTANCE_COUNT {
            self.device.use_program(if toggle {
                res.program
            } else {
                res.program_swizzled
            });
            self.device.draw_indexed(0..3);
            toggle = !toggle;
        }
        watch.elapsed_us()
    }
}
