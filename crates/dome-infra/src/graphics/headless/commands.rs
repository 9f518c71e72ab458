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

use dome_core::math::{Extent2D, ScreenRect};
use dome_core::renderer::{SmoothingParams, TextureId, TextureUnit};

/// A command recorded by the headless backend, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessCommand {
    /// The caller's state was saved.
    PushState,
    /// The caller's state was restored.
    PopState,
    /// A pixel-exact orthographic projection was installed.
    ScreenProjection(Extent2D),
    /// A render target became the render destination.
    BeginTarget(TextureId),
    /// A render target stopped being the render destination.
    EndTarget(TextureId),
    /// A program was made current.
    BindProgram(String),
    /// A program was released.
    ReleaseProgram(String),
    /// A uniform was written.
    SetUniform {
        /// Label of the program.
        program: String,
        /// Name of the uniform.
        name: String,
        /// The value, flattened to floats.
        value: Vec<f32>,
    },
    /// A texture unit was bound (`Some`) or unbound (`None`).
    BindTexture {
        /// The unit.
        unit: TextureUnit,
        /// The texture.
        texture: Option<TextureId>,
    },
    /// A quad was drawn.
    DrawQuad {
        /// The covered rectangle.
        rect: ScreenRect,
        /// The texture bound to the primary unit at draw time.
        source: Option<TextureId>,
    },
    /// A smoothing sub-filter ran.
    Smooth {
        /// The scene depth.
        depth: TextureId,
        /// The smoothed texture.
        input: TextureId,
        /// The texture written.
        output: TextureId,
        /// The kernel used.
        params: SmoothingParams,
    },
}

impl HeadlessCommand {
    /// Returns `true` for commands that produce pixels.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            HeadlessCommand::DrawQuad { .. } | HeadlessCommand::Smooth { .. }
        )
    }
}
