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

//! Backend-agnostic graphics contracts.
//!
//! The benchmark core never talks to a graphics API directly; it records
//! submissions through the [`DrawDevice`] trait using the opaque handles and
//! plain-data descriptors defined here. Concrete backends live in sibling
//! crates.

pub mod adapter;
pub mod buffer;
pub mod device;
pub mod error;
pub mod program;
pub mod state;

pub use self::adapter::*;
pub use self::buffer::*;
pub use self::device::*;
pub use self::error::*;
pub use self::program::*;
pub use self::state::*;
