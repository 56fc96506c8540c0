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

//! Shader program descriptors and handles.

use std::borrow::Cow;

/// The source data for a shader program.
#[derive(Debug, Clone)]
pub enum ShaderSourceData<'a> {
    /// WGSL source text.
    Wgsl(Cow<'a, str>),
}

/// Describes a complete shader program (vertex + fragment stage pair).
///
/// Both entry points are resolved against the same source module, which is
/// how the benchmark gets its two color-permuting programs from one shader
/// text.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// An optional debug label for the program.
    pub label: Option<&'a str>,
    /// The shader source.
    pub source: ShaderSourceData<'a>,
    /// The vertex stage entry point.
    pub vertex_entry_point: &'a str,
    /// The fragment stage entry point.
    pub fragment_entry_point: &'a str,
}

/// An opaque handle to a compiled and linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_descriptor_holds_entry_points() {
        let descriptor = ProgramDescriptor {
            label: Some("bench"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed("fn main() {}")),
            vertex_entry_point: "vs_main",
            fragment_entry_point: "fs_main",
        };
        assert_eq!(descriptor.vertex_entry_point, "vs_main");
        assert_eq!(descriptor.fragment_entry_point, "fs_main");
        let ShaderSourceData::Wgsl(ref source) = descriptor.source;
        assert!(source.contains("main"));
    }

    #[test]
    fn program_id_equality() {
        assert_eq!(ProgramId(1), ProgramId(1));
        assert_ne!(ProgramId(1), ProgramId(2));
    }
}
