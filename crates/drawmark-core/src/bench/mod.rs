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

//! The benchmark driver: scenario rotation, timing capture, and median
//! reporting.
//!
//! One frame of work looks like this: an unmeasured warm-up draw, the
//! scenario bodies selected by the [`scheduler`], a stopwatch around each
//! body's submission loop, and the elapsed microseconds appended to that
//! scenario's buffer in [`samples`]. Every full rotation lands once on the
//! flush slot, which reduces all buffers to their medians and emits one
//! [`report`] line when the sample window is full.

pub mod report;
pub mod samples;
pub mod scenario;
pub mod scheduler;
pub mod session;

/// Number of triangle instances drawn by every scenario body.
pub const INSTANCE_COUNT: usize = 100;

/// Number of samples collected per scenario before a flush is emitted.
pub const SAMPLE_WINDOW: usize = 100;
