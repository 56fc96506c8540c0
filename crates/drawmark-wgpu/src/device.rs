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

//! The `DrawDevice` implementation on top of wgpu.
//!
//! The contract's stateful setters map onto wgpu as follows:
//!
//! - depth/stencil/program toggles select a render-pipeline variant, built
//!   lazily per state combination and cached for the process lifetime;
//! - the uniform draw color writes into a dynamic-offset ring inside one
//!   uniform buffer, one fresh slot per `set_color` call, so every draw in a
//!   frame sees its own value without a buffer reallocation;
//! - scissor rectangle and stencil reference are native dynamic render-pass
//!   state and pass straight through.
//!
//! Pipeline variants may be created mid-pass: `RenderPass::forget_lifetime`
//! detaches the pass from the encoder borrow, and pipeline creation happens
//! on the device, not the encoder.

use crate::context::{WgpuContext, DEPTH_STENCIL_FORMAT};
use crate::conversions::{backend_type, device_type, IntoWgpu};
use drawmark_core::gfx::{
    BufferDescriptor, BufferId, Color, CompareFunction, DeviceError, DrawDevice,
    GraphicsAdapterInfo, PipelineError, ProgramDescriptor, ProgramId, ResourceError, ScissorRect,
    ShaderError, ShaderSourceData,
};
use std::collections::HashMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Byte stride between color slots in the uniform ring. Matches the
/// guaranteed minimum uniform-offset alignment, so it is valid everywhere.
const UNIFORM_STRIDE: u64 = 256;

/// Slots in the uniform ring. Each `set_color` in a frame takes one; the
/// color-change scenario needs `INSTANCE_COUNT + 1` per frame.
const COLOR_SLOTS: u64 = 256;

#[derive(Debug)]
struct ProgramEntry {
    module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
    label: String,
}

/// The state combination a render-pipeline variant is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramId,
    depth_test: bool,
    depth_compare: CompareFunction,
    stencil_test: bool,
    stencil_compare: CompareFunction,
    stencil_read_mask: u32,
}

/// Current pipeline-relevant state, mutated by the contract's setters.
#[derive(Debug)]
struct DrawState {
    program: ProgramId,
    depth_test: bool,
    depth_compare: CompareFunction,
    stencil_test: bool,
    stencil_compare: CompareFunction,
    stencil_read_mask: u32,
    /// The cached pipeline no longer matches; rebind before the next draw.
    pipeline_dirty: bool,
}

impl DrawState {
    fn new() -> Self {
        Self {
            program: ProgramId(0),
            depth_test: false,
            depth_compare: CompareFunction::Less,
            stencil_test: false,
            stencil_compare: CompareFunction::Always,
            stencil_read_mask: 0xFF,
            pipeline_dirty: true,
        }
    }

    fn pipeline_key(&self) -> PipelineKey {
        PipelineKey {
            program: self.program,
            depth_test: self.depth_test,
            depth_compare: self.depth_compare,
            stencil_test: self.stencil_test,
            stencil_compare: self.stencil_compare,
            stencil_read_mask: self.stencil_read_mask,
        }
    }
}

#[derive(Debug)]
struct FrameInFlight {
    surface_texture: wgpu::SurfaceTexture,
    encoder: wgpu::CommandEncoder,
    pass: wgpu::RenderPass<'static>,
}

/// The wgpu-backed graphics device driven by the benchmark session.
#[derive(Debug)]
pub struct WgpuDrawDevice {
    ctx: WgpuContext,
    programs: Vec<ProgramEntry>,
    buffers: Vec<wgpu::Buffer>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    state: DrawState,
    frame: Option<FrameInFlight>,
    next_color_slot: u64,
}

impl WgpuDrawDevice {
    /// Wraps an initialized context, creating the shared uniform ring and
    /// the pipeline layout all variants are built against.
    pub fn new(ctx: WgpuContext) -> Self {
        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("drawmark-uniform-layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(16),
                        },
                        count: None,
                    }],
                });

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("drawmark-color-ring"),
            size: COLOR_SLOTS * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("drawmark-uniform-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(16),
                }),
            }],
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("drawmark-pipeline-layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        Self {
            ctx,
            programs: Vec::new(),
            buffers: Vec::new(),
            uniform_buffer,
            bind_group,
            pipeline_layout,
            pipelines: HashMap::new(),
            state: DrawState::new(),
            frame: None,
            next_color_slot: 0,
        }
    }

    /// Shared access to the context, for hosts that need surface details.
    pub fn context(&self) -> &WgpuContext {
        &self.ctx
    }

    fn build_pipeline(
        ctx: &WgpuContext,
        programs: &[ProgramEntry],
        layout: &wgpu::PipelineLayout,
        key: &PipelineKey,
    ) -> Result<wgpu::RenderPipeline, ResourceError> {
        let entry = programs
            .get(key.program.0)
            .ok_or(PipelineError::InvalidProgram { id: key.program })?;
        log::debug!(
            "WgpuDrawDevice: building pipeline variant for '{}' ({key:?})",
            entry.label
        );

        let stencil = if key.stencil_test {
            let face = wgpu::StencilFaceState {
                compare: key.stencil_compare.into_wgpu(),
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: wgpu::StencilOperation::Keep,
            };
            wgpu::StencilState {
                front: face,
                back: face,
                read_mask: key.stencil_read_mask,
                write_mask: 0,
            }
        } else {
            wgpu::StencilState::default()
        };

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{}-variant", entry.label)),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &entry.module,
                    entry_point: Some(entry.vertex_entry.as_str()),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_STENCIL_FORMAT,
                    // The benchmark reads nothing back; writes stay off so
                    // repeated draws of the same triangle keep passing.
                    depth_write_enabled: false,
                    depth_compare: if key.depth_test {
                        key.depth_compare.into_wgpu()
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil,
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &entry.module,
                    entry_point: Some(entry.fragment_entry.as_str()),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_config.format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
                cache: None,
            });
        Ok(pipeline)
    }
}

impl DrawDevice for WgpuDrawDevice {
    fn adapter_info(&self) -> GraphicsAdapterInfo {
        let info = self.ctx.adapter.get_info();
        GraphicsAdapterInfo {
            name: info.name.clone(),
            backend_type: backend_type(info.backend),
            device_type: device_type(info.device_type),
            driver_info: info.driver_info.clone(),
        }
    }

    fn create_program(
        &mut self,
        descriptor: &ProgramDescriptor,
    ) -> Result<ProgramId, ResourceError> {
        let ShaderSourceData::Wgsl(ref source) = descriptor.source;
        let label = descriptor.label.unwrap_or("unnamed-program");

        // An error scope turns the otherwise-async validation failure into
        // a synchronous result the session can act on.
        self.ctx
            .device
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.clone()),
            });
        if let Some(error) = pollster::block_on(self.ctx.device.pop_error_scope()) {
            return Err(ShaderError::CompilationError {
                label: label.to_string(),
                details: error.to_string(),
            }
            .into());
        }

        let id = ProgramId(self.programs.len());
        self.programs.push(ProgramEntry {
            module,
            vertex_entry: descriptor.vertex_entry_point.to_string(),
            fragment_entry: descriptor.fragment_entry_point.to_string(),
            label: label.to_string(),
        });
        log::info!("WgpuDrawDevice: created shader program '{label}' with ID {id:?}");
        Ok(id)
    }

    fn create_buffer_with_data(
        &mut self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let buffer = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: descriptor.label.as_deref(),
                contents: data,
                usage: descriptor.usage.into_wgpu(),
            });
        let id = BufferId(self.buffers.len());
        self.buffers.push(buffer);
        log::info!(
            "WgpuDrawDevice: created buffer '{}' with ID {id:?}, size {} bytes",
            descriptor.label.as_deref().unwrap_or_default(),
            data.len()
        );
        Ok(id)
    }

    fn upload_buffer(&mut self, id: BufferId, data: &[u8]) {
        match self.buffers.get(id.0) {
            Some(buffer) => self.ctx.queue.write_buffer(buffer, 0, data),
            None => log::warn!("WgpuDrawDevice: upload to unknown buffer {id:?}"),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn begin_frame(&mut self, clear_color: Color) -> Result<(), DeviceError> {
        if self.frame.is_some() {
            log::warn!("WgpuDrawDevice: begin_frame with a frame in flight, discarding it");
            self.frame = None;
        }

        let surface_texture = self.ctx.surface.get_current_texture().map_err(|e| match e {
            wgpu::SurfaceError::Lost => DeviceError::DeviceLost,
            other => DeviceError::SurfaceAcquisitionFailed(other.to_string()),
        })?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("drawmark-frame-encoder"),
            });

        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("drawmark-frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.into_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        self.frame = Some(FrameInFlight {
            surface_texture,
            encoder,
            pass,
        });
        // Pass-scoped bindings reset every frame.
        self.state.pipeline_dirty = true;
        self.next_color_slot = 0;
        Ok(())
    }

    fn end_frame(&mut self) {
        let Some(FrameInFlight {
            surface_texture,
            encoder,
            pass,
        }) = self.frame.take()
        else {
            log::warn!("WgpuDrawDevice: end_frame without an active frame");
            return;
        };
        drop(pass);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn use_program(&mut self, program: ProgramId) {
        if self.state.program != program {
            self.state.program = program;
            self.state.pipeline_dirty = true;
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("WgpuDrawDevice: bind_vertex_buffer outside a frame");
            return;
        };
        match self.buffers.get(buffer.0) {
            Some(wgpu_buffer) => frame.pass.set_vertex_buffer(0, wgpu_buffer.slice(offset..)),
            None => log::warn!("WgpuDrawDevice: bind of unknown vertex buffer {buffer:?}"),
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("WgpuDrawDevice: bind_index_buffer outside a frame");
            return;
        };
        match self.buffers.get(buffer.0) {
            Some(wgpu_buffer) => frame
                .pass
                .set_index_buffer(wgpu_buffer.slice(..), wgpu::IndexFormat::Uint16),
            None => log::warn!("WgpuDrawDevice: bind of unknown index buffer {buffer:?}"),
        }
    }

    fn set_color(&mut self, color: Color) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("WgpuDrawDevice: set_color outside a frame");
            return;
        };
        if self.next_color_slot >= COLOR_SLOTS {
            // Each slot is written at most once per frame so queued writes
            // land before submission; reusing a slot would break that.
            log::warn!("WgpuDrawDevice: color ring exhausted, clamping to the final slot");
            self.next_color_slot = COLOR_SLOTS - 1;
        }
        let offset = self.next_color_slot * UNIFORM_STRIDE;
        self.ctx
            .queue
            .write_buffer(&self.uniform_buffer, offset, bytemuck::bytes_of(&color));
        frame
            .pass
            .set_bind_group(0, &self.bind_group, &[offset as u32]);
        self.next_color_slot += 1;
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("WgpuDrawDevice: set_scissor outside a frame");
            return;
        };
        // wgpu validates the rect against the attachment, so clamp.
        let (surface_width, surface_height) = (
            self.ctx.surface_config.width,
            self.ctx.surface_config.height,
        );
        let x = rect.x.min(surface_width);
        let y = rect.y.min(surface_height);
        let width = rect.width.min(surface_width - x);
        let height = rect.height.min(surface_height - y);
        frame.pass.set_scissor_rect(x, y, width, height);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        if self.state.depth_test != enabled {
            self.state.depth_test = enabled;
            self.state.pipeline_dirty = true;
        }
    }

    fn set_depth_compare(&mut self, compare: CompareFunction) {
        if self.state.depth_compare != compare {
            self.state.depth_compare = compare;
            self.state.pipeline_dirty = true;
        }
    }

    fn set_stencil_test(&mut self, enabled: bool) {
        if self.state.stencil_test != enabled {
            self.state.stencil_test = enabled;
            self.state.pipeline_dirty = true;
        }
    }

    fn set_stencil_function(&mut self, compare: CompareFunction, reference: u32, mask: u32) {
        if self.state.stencil_compare != compare || self.state.stencil_read_mask != mask {
            self.state.stencil_compare = compare;
            self.state.stencil_read_mask = mask;
            self.state.pipeline_dirty = true;
        }
        if let Some(frame) = self.frame.as_mut() {
            frame.pass.set_stencil_reference(reference);
        }
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("WgpuDrawDevice: draw_indexed outside a frame");
            return;
        };
        if self.state.pipeline_dirty {
            let key = self.state.pipeline_key();
            if !self.pipelines.contains_key(&key) {
                match Self::build_pipeline(&self.ctx, &self.programs, &self.pipeline_layout, &key)
                {
                    Ok(pipeline) => {
                        self.pipelines.insert(key, pipeline);
                    }
                    Err(err) => {
                        log::error!("WgpuDrawDevice: pipeline variant creation failed: {err}");
                        return;
                    }
                }
            }
            frame.pass.set_pipeline(&self.pipelines[&key]);
            self.state.pipeline_dirty = false;
        }
        frame.pass.draw_indexed(indices, 0, 0..1);
    }
}
