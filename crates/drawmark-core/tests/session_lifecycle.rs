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

//! End-to-end session tests against a recording fake device.

use drawmark_core::bench::scenario::Scenario;
use drawmark_core::bench::{INSTANCE_COUNT, SAMPLE_WINDOW};
use drawmark_core::gfx::{
    BufferDescriptor, BufferId, Color, CompareFunction, DeviceError, DrawDevice,
    GraphicsAdapterInfo, ProgramDescriptor, ProgramId, ResourceError, ScissorRect,
};
use drawmark_core::{BenchSession, FlushReport, ReportSink, SessionError};
use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

/// One submission-level call observed by the fake device.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    BeginFrame,
    EndFrame,
    UseProgram(ProgramId),
    BindVertexBuffer(BufferId, u64),
    BindIndexBuffer(BufferId),
    SetColor(Color),
    SetScissor(ScissorRect),
    SetDepthTest(bool),
    SetDepthCompare(CompareFunction),
    SetStencilTest(bool),
    SetStencilFunction(CompareFunction, u32, u32),
    UploadBuffer(BufferId, usize),
    DrawIndexed(Range<u32>),
}

/// A `DrawDevice` that records every call instead of talking to a GPU.
#[derive(Debug, Default)]
struct RecordingDevice {
    calls: Vec<Call>,
    programs_created: usize,
    buffers_created: usize,
    viewport: Option<(u32, u32)>,
}

impl RecordingDevice {
    fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::DrawIndexed(_)))
            .count()
    }

    fn calls_since_last_begin(&self) -> &[Call] {
        let start = self
            .calls
            .iter()
            .rposition(|call| *call == Call::BeginFrame)
            .map(|index| index + 1)
            .unwrap_or(0);
        &self.calls[start..]
    }
}

impl DrawDevice for RecordingDevice {
    fn adapter_info(&self) -> GraphicsAdapterInfo {
        GraphicsAdapterInfo {
            name: "Recording Device".to_string(),
            ..Default::default()
        }
    }

    fn create_program(
        &mut self,
        _descriptor: &ProgramDescriptor,
    ) -> Result<ProgramId, ResourceError> {
        self.programs_created += 1;
        Ok(ProgramId(self.programs_created))
    }

    fn create_buffer_with_data(
        &mut self,
        _descriptor: &BufferDescriptor,
        _data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.buffers_created += 1;
        Ok(BufferId(self.buffers_created))
    }

    fn upload_buffer(&mut self, id: BufferId, data: &[u8]) {
        self.calls.push(Call::UploadBuffer(id, data.len()));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn begin_frame(&mut self, _clear_color: Color) -> Result<(), DeviceError> {
        self.calls.push(Call::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::EndFrame);
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(Call::UseProgram(program));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64) {
        self.calls.push(Call::BindVertexBuffer(buffer, offset));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.calls.push(Call::BindIndexBuffer(buffer));
    }

    fn set_color(&mut self, color: Color) {
        self.calls.push(Call::SetColor(color));
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.calls.push(Call::SetScissor(rect));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(Call::SetDepthTest(enabled));
    }

    fn set_depth_compare(&mut self, compare: CompareFunction) {
        self.calls.push(Call::SetDepthCompare(compare));
    }

    fn set_stencil_test(&mut self, enabled: bool) {
        self.calls.push(Call::SetStencilTest(enabled));
    }

    fn set_stencil_function(&mut self, compare: CompareFunction, reference: u32, mask: u32) {
        self.calls
            .push(Call::SetStencilFunction(compare, reference, mask));
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        self.calls.push(Call::DrawIndexed(indices));
    }
}

/// A sink that shares its collected reports with the test body.
#[derive(Debug, Default, Clone)]
struct VecSink {
    reports: Rc<RefCell<Vec<FlushReport>>>,
}

impl ReportSink for VecSink {
    fn emit(&mut self, report: &FlushReport) {
        self.reports.borrow_mut().push(report.clone());
    }
}

fn initialized_session() -> (BenchSession<RecordingDevice, VecSink>, VecSink) {
    let sink = VecSink::default();
    let mut session = BenchSession::new(RecordingDevice::default(), sink.clone());
    session.init(800, 600).expect("init succeeds");
    (session, sink)
}

#[test]
fn step_before_init_fails_fast() {
    let mut session = BenchSession::new(RecordingDevice::default(), VecSink::default());
    match session.step() {
        Err(SessionError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {other:?}"),
    }
    // Nothing reached the device.
    assert!(session.device().calls.is_empty());
}

#[test]
fn init_creates_two_programs_and_two_buffers() {
    let (session, _sink) = initialized_session();
    assert_eq!(session.device().programs_created, 2);
    assert_eq!(session.device().buffers_created, 2);
    assert_eq!(session.device().viewport, Some((800, 600)));
    assert!(session.is_initialized());
}

#[test]
fn double_init_keeps_existing_resources() {
    let (mut session, _sink) = initialized_session();
    session.init(800, 600).expect("second init is a no-op");
    assert_eq!(session.device().programs_created, 2);
    assert_eq!(session.device().buffers_created, 2);
}

#[test]
fn every_frame_starts_with_a_warm_up_draw() {
    let (mut session, _sink) = initialized_session();
    let warm_up_offset = (INSTANCE_COUNT as u64 - 1) * 6 * 4;
    for _ in 0..Scenario::SLOT_COUNT {
        session.step().expect("step succeeds");
        let frame = session.device().calls_since_last_begin();
        // Default state, then the warm-up bind + draw of the last instance.
        let draw_position = frame
            .iter()
            .position(|call| matches!(call, Call::DrawIndexed(_)))
            .expect("frame contains at least the warm-up draw");
        assert_eq!(frame[draw_position], Call::DrawIndexed(0..3));
        assert!(frame[..draw_position]
            .iter()
            .any(|call| matches!(call, Call::BindVertexBuffer(_, offset) if *offset == warm_up_offset)));
    }
}

#[test]
fn flush_frame_only_draws_the_warm_up() {
    let (mut session, _sink) = initialized_session();
    // Slots 0..=8 run scenario bodies; slot 9 is the flush.
    for _ in 0..Scenario::SLOT_COUNT - 1 {
        session.step().expect("step succeeds");
    }
    let draws_before = session.device().draw_count();
    session.step().expect("flush slot succeeds");
    assert_eq!(session.device().draw_count(), draws_before + 1);
}

#[test]
fn state_toggles_are_balanced_per_frame() {
    let (mut session, _sink) = initialized_session();
    for _ in 0..Scenario::SLOT_COUNT {
        session.step().expect("step succeeds");
    }
    let enables = |target: bool, call: &Call| match call {
        Call::SetDepthTest(enabled) => *enabled == target,
        _ => false,
    };
    let calls = &session.device().calls;
    assert_eq!(calls.iter().filter(|c| enables(true, c)).count(), 1);
    assert_eq!(calls.iter().filter(|c| enables(false, c)).count(), 1);
    // Depth enable precedes every compare-function flip, disable follows.
    let enable_at = calls.iter().position(|c| enables(true, c)).unwrap();
    let disable_at = calls.iter().position(|c| enables(false, c)).unwrap();
    let compares: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Call::SetDepthCompare(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(compares.len(), INSTANCE_COUNT);
    assert!(compares.iter().all(|i| *i > enable_at && *i < disable_at));
}

#[test]
fn stencil_reference_walks_modulo_256() {
    let (mut session, _sink) = initialized_session();
    for _ in 0..Scenario::SLOT_COUNT {
        session.step().expect("step succeeds");
    }
    let references: Vec<u32> = session
        .device()
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::SetStencilFunction(_, reference, mask) => {
                assert_eq!(*mask, 0xFF);
                Some(*reference)
            }
            _ => None,
        })
        .collect();
    assert_eq!(references.len(), INSTANCE_COUNT);
    assert!(references
        .iter()
        .enumerate()
        .all(|(i, reference)| *reference == (i as u32) % 256));
}

#[test]
fn reupload_sends_the_full_index_data() {
    let (mut session, _sink) = initialized_session();
    session.step().expect("slot 0 succeeds");
    let uploads: Vec<usize> = session
        .device()
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::UploadBuffer(_, len) => Some(*len),
            _ => None,
        })
        .collect();
    assert_eq!(uploads, vec![u16::MAX as usize * 2]);
}

#[test]
fn thousand_steps_produce_exactly_one_flush_report() {
    let (mut session, sink) = initialized_session();
    for step in 1..=SAMPLE_WINDOW * Scenario::SLOT_COUNT {
        session.step().expect("step succeeds");
        let reports = sink.reports.borrow().len();
        if step < SAMPLE_WINDOW * Scenario::SLOT_COUNT {
            assert_eq!(reports, 0, "no report before step {step}");
        }
    }
    let reports = sink.reports.borrow();
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report.instance_count, INSTANCE_COUNT);
    assert_eq!(report.medians.len(), Scenario::MEASURED.len());
    for ((label, _), scenario) in report.medians.iter().zip(Scenario::MEASURED.iter()) {
        assert_eq!(*label, scenario.label());
    }
}

#[test]
fn sessions_do_not_share_state() {
    let (mut first, first_sink) = initialized_session();
    let (mut second, second_sink) = initialized_session();
    for _ in 0..Scenario::SLOT_COUNT {
        first.step().expect("step succeeds");
    }
    second.step().expect("step succeeds");
    assert!(first.device().draw_count() > second.device().draw_count());
    assert!(first_sink.reports.borrow().is_empty());
    assert!(second_sink.reports.borrow().is_empty());
}
