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

//! # Drawmark wgpu backend
//!
//! A `wgpu`-based implementation of the core
//! [`DrawDevice`](drawmark_core::gfx::DrawDevice) contract. The contract is
//! immediate-mode; wgpu is not. The bridge: pipeline state toggles become
//! cached render-pipeline variants swapped before the next draw, and the
//! per-draw uniform color becomes a dynamic-offset ring in one uniform
//! buffer. See [`device`] for the details.

pub mod context;
mod conversions;
pub mod device;

pub use context::WgpuContext;
pub use device::WgpuDrawDevice;
