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

//! The fixed set of draw-pattern scenarios under benchmark.

/// One draw-pattern variant.
///
/// The variants differ in what changes between consecutive draw
/// submissions; each isolates one source of per-call driver overhead.
/// Ordering is fixed: it determines both the frame rotation and the key
/// order of the flush report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// One submission draws all instances at once (baseline).
    SingleBatch,
    /// Like [`SingleBatch`](Self::SingleBatch), but the index buffer is
    /// re-uploaded inside the measured window, isolating upload cost.
    SingleBatchReupload,
    /// N submissions of the identical 3-vertex range, no state changes.
    SameMeshSameRange,
    /// N submissions, each indexing a disjoint 3-vertex slice.
    SameMeshDifferentRange,
    /// N submissions, each re-pointing the vertex buffer to a new offset.
    DifferentMeshes,
    /// N submissions with the scissor rectangle changed before each draw.
    ScissorChange,
    /// N submissions with the uniform color changed before each draw.
    ColorChange,
    /// N submissions with the depth function toggled before each draw.
    DepthFuncChange,
    /// N submissions with the stencil function toggled before each draw.
    StencilFuncChange,
    /// N submissions with the shader program toggled before each draw.
    ShaderProgramChange,
    /// The slot that gates aggregation; it draws nothing and is never
    /// measured.
    Flush,
}

impl Scenario {
    /// Number of frame slots in one full rotation.
    ///
    /// The two single-batch variants share slot 0, as the reupload variant
    /// only makes sense measured back-to-back with its baseline; every
    /// other variant owns a slot.
    pub const SLOT_COUNT: usize = 10;

    /// The measured scenarios, in rotation and report order.
    pub const MEASURED: [Scenario; 10] = [
        Scenario::SingleBatch,
        Scenario::SingleBatchReupload,
        Scenario::SameMeshSameRange,
        Scenario::SameMeshDifferentRange,
        Scenario::DifferentMeshes,
        Scenario::ScissorChange,
        Scenario::ColorChange,
        Scenario::DepthFuncChange,
        Scenario::StencilFuncChange,
        Scenario::ShaderProgramChange,
    ];

    /// Returns the scenario that owns the given frame slot.
    ///
    /// Slot indices wrap nowhere here; callers pass `0..SLOT_COUNT`.
    pub fn for_slot(slot: usize) -> Scenario {
        debug_assert!(slot < Self::SLOT_COUNT);
        match slot {
            0 => Scenario::SingleBatch,
            1 => Scenario::SameMeshSameRange,
            2 => Scenario::SameMeshDifferentRange,
            3 => Scenario::DifferentMeshes,
            4 => Scenario::ScissorChange,
            5 => Scenario::ColorChange,
            6 => Scenario::DepthFuncChange,
            7 => Scenario::StencilFuncChange,
            8 => Scenario::ShaderProgramChange,
            _ => Scenario::Flush,
        }
    }

    /// The fixed report key for this scenario.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::SingleBatch => "single_batch",
            Scenario::SingleBatchReupload => "single_batch_reupload",
            Scenario::SameMeshSameRange => "same_mesh_same_range",
            Scenario::SameMeshDifferentRange => "same_mesh_different_range",
            Scenario::DifferentMeshes => "different_meshes",
            Scenario::ScissorChange => "scissor_change",
            Scenario::ColorChange => "color_change",
            Scenario::DepthFuncChange => "depth_func_change",
            Scenario::StencilFuncChange => "stencil_func_change",
            Scenario::ShaderProgramChange => "shader_program_change",
            Scenario::Flush => "flush",
        }
    }

    /// The index of this scenario within [`Self::MEASURED`], if measured.
    pub fn measured_index(&self) -> Option<usize> {
        Self::MEASURED.iter().position(|s| s == self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_maps_to_a_scenario() {
        let mut seen = Vec::new();
        for slot in 0..Scenario::SLOT_COUNT {
            seen.push(Scenario::for_slot(slot));
        }
        // Slot 0 is the single-batch pair, slot 9 the flush; no duplicates.
        assert_eq!(seen.len(), Scenario::SLOT_COUNT);
        assert_eq!(seen[0], Scenario::SingleBatch);
        assert_eq!(seen[9], Scenario::Flush);
        for window in seen.windows(2) {
            assert_ne!(window[0], window[1]);
        }
    }

    #[test]
    fn measured_scenarios_exclude_flush() {
        assert!(!Scenario::MEASURED.contains(&Scenario::Flush));
        assert_eq!(Scenario::MEASURED.len(), 10);
    }

    #[test]
    fn measured_index_matches_report_order() {
        assert_eq!(Scenario::SingleBatch.measured_index(), Some(0));
        assert_eq!(Scenario::SingleBatchReupload.measured_index(), Some(1));
        assert_eq!(Scenario::ShaderProgramChange.measured_index(), Some(9));
        assert_eq!(Scenario::Flush.measured_index(), None);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = Scenario::MEASURED.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Scenario::MEASURED.len());
    }
}
