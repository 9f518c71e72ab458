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

use dome_core::math::Extent2D;
use dome_core::renderer::GlVersion;
use std::collections::HashSet;

/// Failures injected into a [`HeadlessContext`](super::HeadlessContext).
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessFaults {
    /// The feature level the context reports.
    pub gl_version: GlVersion,
    /// Zero-based index of the render-target allocation that fails.
    /// Creations and reallocations are both counted.
    pub fail_allocation: Option<usize>,
    /// Logical program names that fail to compile.
    pub failing_programs: HashSet<String>,
    /// Sizes at which smoothing sub-filters fail to initialize.
    pub smoothing_failure_sizes: Vec<Extent2D>,
    /// Uniforms reported as inactive by every program.
    pub omitted_uniforms: HashSet<String>,
}

impl Default for HeadlessFaults {
    fn default() -> Self {
        Self {
            gl_version: GlVersion::new(3, 3),
            fail_allocation: None,
            failing_programs: HashSet::new(),
            smoothing_failure_sizes: Vec::new(),
            omitted_uniforms: HashSet::new(),
        }
    }
}

impl HeadlessFaults {
    /// Reports `version` as the context feature level.
    pub fn with_gl_version(mut self, version: GlVersion) -> Self {
        self.gl_version = version;
        self
    }

    /// Fails the `index`-th render-target allocation (zero-based).
    pub fn failing_allocation(mut self, index: usize) -> Self {
        self.fail_allocation = Some(index);
        self
    }

    /// Fails compilation of the program registered under `name`.
    pub fn failing_program(mut self, name: impl Into<String>) -> Self {
        self.failing_programs.insert(name.into());
        self
    }

    /// Fails smoothing sub-filters initialized at `size`.
    pub fn failing_smoothing_at(mut self, size: Extent2D) -> Self {
        self.smoothing_failure_sizes.push(size);
        self
    }

    /// Reports the uniform `name` as inactive.
    pub fn omitting_uniform(mut self, name: impl Into<String>) -> Self {
        self.omitted_uniforms.insert(name.into());
        self
    }
}
