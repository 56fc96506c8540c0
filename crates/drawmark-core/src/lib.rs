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

//! # Drawmark Core
//!
//! Backend-agnostic core of the draw-call overhead micro-benchmark: the
//! graphics-device contract that scenario bodies are written against, the
//! benchmark session itself (scenario rotation, per-scenario timing, median
//! reporting), and the small utilities they share.
//!
//! A host platform supplies two things: a [`gfx::DrawDevice`] implementation
//! and a per-frame heartbeat. Everything else lives here.

#![warn(missing_docs)]

pub mod bench;
pub mod gfx;
pub mod utils;

pub use bench::report::{FlushReport, LogSink, ReportSink};
pub use bench::session::{BenchSession, SessionError};
pub use utils::timer::Stopwatch;
