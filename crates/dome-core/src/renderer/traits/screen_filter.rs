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

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::RenderError;
use crate::renderer::traits::GraphicsContext;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A screen-space filter: consumes a depth and a color texture and renders
/// its result into textures it owns.
pub trait ScreenFilter: Debug {
    /// A human-readable description of the filter.
    fn description(&self) -> &str;

    /// Creates a fresh, uninitialized filter carrying over the user-tunable
    /// parameters of this one. GPU resources are never shared.
    fn clone_filter(&self) -> Box<dyn ScreenFilter>;

    /// Allocates (or resizes) every GPU resource for a `size` viewport.
    /// ## Errors
    /// * `RenderError` - If a required resource could not be created. The
    ///   filter is left uninitialized in that case.
    fn initialize(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter: FilterMode,
        shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError>;

    /// Same as [`ScreenFilter::initialize`] with RGBA8 targets and linear filtering.
    fn initialize_default(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError> {
        self.initialize(
            ctx,
            size,
            TextureFormat::Rgba8Unorm,
            FilterMode::Linear,
            shaders,
        )
    }

    /// Renders one frame.
    fn shade(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        depth: TextureId,
        color: TextureId,
        viewport: &ViewportParameters,
    );

    /// The final output texture, if one has been produced.
    fn texture(&self) -> Option<TextureId>;

    /// Releases every GPU resource. Idempotent.
    fn reset(&mut self);
}

/// Parameters of an edge-preserving (bilateral) smoothing kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Half size of the kernel, in pixels.
    pub half_size: u32,
    /// Spatial standard deviation, in pixels.
    pub sigma: f32,
    /// Depth standard deviation.
    pub sigma_z: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            half_size: 1,
            sigma: 1.0,
            sigma_z: 0.2,
        }
    }
}

/// An edge-preserving smoothing sub-filter.
pub trait SmoothingFilter: ScreenFilter {
    /// Sets the kernel parameters used by the next [`ScreenFilter::shade`].
    fn set_params(&mut self, params: SmoothingParams);

    /// When enabled, the filter renders with the caller's viewport and
    /// projection instead of installing its own.
    fn use_existing_viewport(&mut self, enabled: bool);
}
