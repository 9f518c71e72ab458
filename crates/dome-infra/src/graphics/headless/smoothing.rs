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

use super::state::SharedState;
use super::HeadlessCommand;
use dome_core::math::{Extent2D, ScreenRect};
use dome_core::renderer::{
    FilterMode, GraphicsContext, RenderError, RenderTarget, RenderTargetDescriptor, ResourceError,
    ScreenFilter, ShaderSourceLocation, SmoothingFilter, SmoothingParams, TextureFormat,
    TextureId, TextureUnit, ViewportParameters,
};
use std::borrow::Cow;
use std::fmt;

const SMOOTHING_LABEL: &str = "Bilateral smoothing";
const DEPTH_UNIT: TextureUnit = TextureUnit(1);

/// Edge-preserving smoothing for the headless backend.
///
/// Owns one render target at the size it was initialized with. Applying the
/// filter records a [`HeadlessCommand::Smooth`] followed by a textured quad.
pub struct HeadlessSmoothingFilter {
    state: SharedState,
    params: SmoothingParams,
    existing_viewport: bool,
    target: Option<Box<dyn RenderTarget>>,
}

impl HeadlessSmoothingFilter {
    pub(crate) fn new(state: SharedState) -> Self {
        Self {
            state,
            params: SmoothingParams::default(),
            existing_viewport: false,
            target: None,
        }
    }

    /// The kernel used by the next application.
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Returns `true` if the filter renders with the caller's viewport.
    pub fn uses_existing_viewport(&self) -> bool {
        self.existing_viewport
    }

    fn allocate(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        match self.target.as_mut() {
            Some(target) => target.reallocate(descriptor),
            None => {
                self.target = Some(ctx.create_render_target(descriptor)?);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for HeadlessSmoothingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessSmoothingFilter")
            .field("params", &self.params)
            .field("existing_viewport", &self.existing_viewport)
            .field("target", &self.target)
            .finish()
    }
}

impl ScreenFilter for HeadlessSmoothingFilter {
    fn description(&self) -> &str {
        "Bilateral smoothing (headless)"
    }

    fn clone_filter(&self) -> Box<dyn ScreenFilter> {
        let mut filter = Self::new(self.state.clone());
        filter.params = self.params;
        Box::new(filter)
    }

    fn initialize(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter: FilterMode,
        _shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError> {
        let injected = self
            .state
            .borrow()
            .faults
            .smoothing_failure_sizes
            .contains(&size);
        if injected {
            self.reset();
            return Err(RenderError::RenderTargetFailed {
                label: SMOOTHING_LABEL.to_string(),
                source: ResourceError::BackendError(format!(
                    "smoothing unavailable at {}x{}",
                    size.width, size.height
                )),
            });
        }
        if size.is_empty() {
            return Err(RenderError::InvalidSize(size));
        }

        let descriptor = RenderTargetDescriptor {
            label: Some(Cow::Borrowed(SMOOTHING_LABEL)),
            size,
            format,
            filter,
        };
        self.allocate(ctx, &descriptor).map_err(|source| {
            self.target = None;
            RenderError::RenderTargetFailed {
                label: SMOOTHING_LABEL.to_string(),
                source,
            }
        })
    }

    fn shade(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        depth: TextureId,
        color: TextureId,
        _viewport: &ViewportParameters,
    ) {
        let Some(target) = self.target.as_mut() else {
            return;
        };
        let size = target.size();

        if !self.existing_viewport {
            ctx.push_state();
            ctx.load_screen_projection(size);
        }

        self.state.borrow_mut().record(HeadlessCommand::Smooth {
            depth,
            input: color,
            output: target.color_texture(),
            params: self.params,
        });
        target.begin();
        ctx.bind_texture(DEPTH_UNIT, Some(depth));
        ctx.draw_texture(color, ScreenRect::covering(size));
        ctx.bind_texture(DEPTH_UNIT, None);
        target.end();

        if !self.existing_viewport {
            ctx.pop_state();
        }
    }

    fn texture(&self) -> Option<TextureId> {
        self.target.as_ref().map(|target| target.color_texture())
    }

    fn reset(&mut self) {
        self.target = None;
    }
}

impl SmoothingFilter for HeadlessSmoothingFilter {
    fn set_params(&mut self, params: SmoothingParams) {
        self.params = params;
    }

    fn use_existing_viewport(&mut self, enabled: bool) {
        self.existing_viewport = enabled;
    }
}
