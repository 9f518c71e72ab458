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

//! Per-frame camera parameters consumed by screen-space filters.

use serde::{Deserialize, Serialize};

/// The projection used to render the depth buffer a filter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// A perspective projection; depth cues come from foreshortening.
    #[default]
    Perspective,
    /// An orthographic (parallel) projection.
    Orthographic,
}

/// Viewport parameters, read by a filter each frame and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportParameters {
    /// The projection the scene was rendered with.
    pub projection: ProjectionMode,
    /// The current zoom factor (strictly positive).
    pub zoom: f32,
    /// The near clipping plane.
    pub z_near: f32,
    /// The far clipping plane.
    pub z_far: f32,
}

impl ViewportParameters {
    /// Returns `true` for a perspective projection.
    #[inline]
    pub fn is_perspective(&self) -> bool {
        self.projection == ProjectionMode::Perspective
    }
}

impl Default for ViewportParameters {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Perspective,
            zoom: 1.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}
