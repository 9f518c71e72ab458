// Copyright 2025 eraflo
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

use crate::math::{Vec2, Vec3};
use std::path::{Path, PathBuf};

/// The directory shader programs are loaded from.
///
/// Programs are addressed by a logical name such as `EDL/edl_shade`; the
/// backend decides which files (and extensions) back that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSourceLocation {
    base_path: PathBuf,
}

impl ShaderSourceLocation {
    /// Creates a location rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// The root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolves a logical program name and a file extension to a path.
    pub fn resolve(&self, name: &str, extension: &str) -> PathBuf {
        self.base_path.join(format!("{name}.{extension}"))
    }
}

/// An opaque handle to a resolved uniform inside a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformLocation(pub i32);

/// A value written to a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    /// A signed integer, also used for sampler units and boolean flags.
    Int(i32),
    /// A single float.
    Float(f32),
    /// A `vec3`.
    Vec3(Vec3),
    /// An array of `vec2`.
    Vec2Array(&'a [Vec2]),
}

impl UniformValue<'_> {
    /// Encodes a boolean flag the way GLSL `int` flags expect it.
    #[inline]
    pub fn flag(enabled: bool) -> Self {
        UniformValue::Int(i32::from(enabled))
    }

    /// Returns the value as a flat list of floats (integers are converted).
    pub fn to_floats(&self) -> Vec<f32> {
        match self {
            UniformValue::Int(v) => vec![*v as f32],
            UniformValue::Float(v) => vec![*v],
            UniformValue::Vec3(v) => v.to_array().to_vec(),
            UniformValue::Vec2Array(values) => bytemuck::cast_slice::<Vec2, f32>(values).to_vec(),
        }
    }
}
