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

//! Per-level edge-preserving smoothing.

use super::settings::SmoothingSettings;
use dome_core::math::Extent2D;
use dome_core::renderer::{
    FilterMode, GraphicsContext, ShaderSourceLocation, SmoothingFilter, SmoothingParams,
    TextureFormat, TextureId, ViewportParameters,
};

/// The smoothing configuration of one cascade level and its sub-filter.
///
/// The sub-filter is created lazily by [`SmoothingConfig::prepare`] and
/// always runs at its level's resolution.
#[derive(Debug)]
pub struct SmoothingConfig {
    enabled: bool,
    params: SmoothingParams,
    filter: Option<Box<dyn SmoothingFilter>>,
}

impl SmoothingConfig {
    pub(crate) fn from_settings(settings: &SmoothingSettings) -> Self {
        Self {
            enabled: settings.enabled,
            params: settings.params(),
            filter: None,
        }
    }

    /// Whether the level is smoothed. Cleared when the sub-filter fails.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The kernel pushed into the sub-filter before every application.
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Returns `true` if a sub-filter currently exists.
    pub fn is_active(&self) -> bool {
        self.filter.is_some()
    }

    /// The output of the sub-filter, if it has produced one.
    pub fn texture(&self) -> Option<TextureId> {
        self.filter.as_ref().and_then(|filter| filter.texture())
    }

    /// Creates or resizes the sub-filter for a level of `size`.
    ///
    /// A disabled level drops its sub-filter. A sub-filter that fails to
    /// initialize is dropped and the level is disabled for good.
    pub(crate) fn prepare(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter_mode: FilterMode,
        shaders: &ShaderSourceLocation,
        label: &str,
    ) {
        if !self.enabled {
            self.release();
            return;
        }

        let mut filter = match self.filter.take() {
            Some(filter) => filter,
            None => ctx.create_smoothing_filter(),
        };
        filter.set_params(self.params);

        match filter.initialize(ctx, size, format, filter_mode, shaders) {
            Ok(()) => {
                filter.use_existing_viewport(true);
                self.filter = Some(filter);
            }
            Err(e) => {
                log::warn!(
                    "EdlFilter: smoothing of level '{}' disabled ({}x{}): {}",
                    label,
                    size.width,
                    size.height,
                    e
                );
                filter.reset();
                self.enabled = false;
            }
        }
    }

    /// Drops the sub-filter. The `enabled` flag is kept.
    pub(crate) fn release(&mut self) {
        if let Some(mut filter) = self.filter.take() {
            filter.reset();
        }
    }

    /// Smooths `color` (a level's shading output) using the scene `depth`.
    /// Does nothing when no sub-filter exists.
    pub(crate) fn apply(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        depth: TextureId,
        color: TextureId,
        viewport: &ViewportParameters,
    ) {
        if let Some(filter) = self.filter.as_mut() {
            filter.set_params(self.params);
            filter.shade(ctx, depth, color, viewport);
        }
    }
}
