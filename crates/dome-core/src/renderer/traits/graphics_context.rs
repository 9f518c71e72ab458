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

use crate::math::{Extent2D, ScreenRect};
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use crate::renderer::traits::{RenderTarget, ShaderProgram, SmoothingFilter};
use std::fmt::{self, Debug};

/// An OpenGL-equivalent feature level reported by a graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlVersion {
    /// The major version.
    pub major: u8,
    /// The minor version.
    pub minor: u8,
}

impl GlVersion {
    /// Fixed-function pipeline with shader support, enough to issue a frame.
    pub const GL_2_1: Self = Self::new(2, 1);
    /// Framebuffer objects as a core feature, required to allocate targets.
    pub const GL_3_0: Self = Self::new(3, 0);

    /// Creates a new version.
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The graphics context a screen-space filter issues its commands to.
///
/// It owns the global, fixed-function state (bound textures, matrix stacks,
/// enabled capabilities) and acts as a factory for the resources a filter
/// owns. Every call is assumed to come from the thread the context is current on.
pub trait GraphicsContext: Debug {
    /// Returns the feature level of this context.
    fn gl_version(&self) -> GlVersion;

    /// Returns `true` if the context is at least as capable as `required`.
    fn supports(&self, required: GlVersion) -> bool {
        self.gl_version() >= required
    }

    /// Allocates a new off-screen color target.
    /// ## Errors
    /// * `ResourceError` - If the backend could not allocate the target.
    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<Box<dyn RenderTarget>, ResourceError>;

    /// Loads, compiles and links the program registered under `name`.
    /// ## Errors
    /// * `ShaderError` - If the source could not be read or compiled.
    fn load_shader_program(
        &mut self,
        location: &ShaderSourceLocation,
        name: &str,
    ) -> Result<Box<dyn ShaderProgram>, ShaderError>;

    /// Creates an uninitialized edge-preserving smoothing filter.
    fn create_smoothing_filter(&mut self) -> Box<dyn SmoothingFilter>;

    /// Saves every piece of state a frame may touch (attributes, projection
    /// and model-view matrices).
    fn push_state(&mut self);

    /// Restores the state saved by the matching [`GraphicsContext::push_state`].
    fn pop_state(&mut self);

    /// Replaces projection and model-view with a pixel-exact orthographic
    /// projection over `[0, width] x [0, height]` and a unit depth range.
    fn load_screen_projection(&mut self, size: Extent2D);

    /// Binds `texture` to `unit` and enables 2D texturing on it, or unbinds
    /// and disables the unit when `texture` is `None`.
    fn bind_texture(&mut self, unit: TextureUnit, texture: Option<TextureId>);

    /// Draws a quad covering `rect`, with texture coordinates spanning `[0, 1]`.
    fn draw_quad(&mut self, rect: ScreenRect);

    /// Draws `texture` from the primary unit as a quad covering `rect`, then
    /// unbinds the primary unit.
    fn draw_texture(&mut self, texture: TextureId, rect: ScreenRect) {
        self.bind_texture(TextureUnit::PRIMARY, Some(texture));
        self.draw_quad(rect);
        self.bind_texture(TextureUnit::PRIMARY, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_order_by_major_then_minor() {
        assert!(GlVersion::GL_3_0 > GlVersion::GL_2_1);
        assert!(GlVersion::new(4, 6) >= GlVersion::GL_3_0);
        assert!(GlVersion::new(2, 9) < GlVersion::GL_3_0);
        assert_eq!(GlVersion::GL_2_1.to_string(), "2.1");
    }
}
