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

//! Eye-dome lighting: a screen-space shading filter for point clouds.
//!
//! The filter derives an ambient-occlusion-like term from depth
//! discontinuities between each pixel and its neighbours, at full, half and
//! quarter resolution. The coarse levels are optionally smoothed with an
//! edge-preserving filter, then the three levels are blended into a single
//! full-resolution composite.

pub mod cascade;
pub mod composite;
pub mod settings;
pub mod shaders;
pub mod shading;
pub mod smoothing;

pub use cascade::{Resolution, ResultStage, LEVEL_COUNT};
pub use settings::{EdlSettings, SmoothingSettings};
pub use smoothing::SmoothingConfig;

use cascade::{Level, LEVEL_SPECS, MIX_LABEL};
use composite::{mix_levels, MixUniform};
use dome_core::math::{Extent2D, Vec2, Vec3};
use dome_core::renderer::{
    CachedProgram, FilterMode, FrameStateGuard, GlVersion, GraphicsContext, RenderError,
    RenderTarget, RenderTargetDescriptor, ScreenFilter, ShaderSourceLocation, TextureFormat,
    TextureId, ViewportParameters,
};
use shaders::{MIX_PROGRAM, SHADE_PROGRAM};
use shading::{neighbour_offsets, shade_level, ShadeFrame, ShadeUniform, NEIGHBOUR_COUNT};
use std::borrow::Cow;

/// Description reported by [`EdlFilter`].
pub const EDL_DESCRIPTION: &str =
    "EyeDome Lighting (disable normals and increase points size for a better result!)";

/// Feature level needed to allocate the cascade.
pub const REQUIRED_INIT_VERSION: GlVersion = GlVersion::GL_3_0;

/// Feature level needed to render a frame.
pub const REQUIRED_FRAME_VERSION: GlVersion = GlVersion::GL_2_1;

/// Frames are skipped when either screen dimension is below this value.
pub const MIN_SHADE_SIZE: u32 = 4;

/// The eye-dome lighting filter.
///
/// Owns its render-target cascade, the shading and mix programs and the
/// smoothing sub-filters. Every resource is released by [`EdlFilter::reset`],
/// which also runs on drop.
#[derive(Debug)]
pub struct EdlFilter {
    screen: Extent2D,
    levels: [Level; LEVEL_COUNT],
    mix_target: Option<Box<dyn RenderTarget>>,
    shade_program: Option<CachedProgram<ShadeUniform>>,
    mix_program: Option<CachedProgram<MixUniform>>,
    strength: f32,
    light_dir: Vec3,
    neighbours: [Vec2; NEIGHBOUR_COUNT],
}

impl Default for EdlFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl EdlFilter {
    /// Creates an uninitialized filter with the default settings.
    pub fn new() -> Self {
        Self::with_settings(&EdlSettings::default())
    }

    /// Creates an uninitialized filter from `settings`.
    pub fn with_settings(settings: &EdlSettings) -> Self {
        let levels = std::array::from_fn(|k| {
            Level::new(
                LEVEL_SPECS[k],
                SmoothingConfig::from_settings(&settings.smoothing[k]),
            )
        });

        Self {
            screen: Extent2D::ZERO,
            levels,
            mix_target: None,
            shade_program: None,
            mix_program: None,
            strength: settings.strength,
            light_dir: shading::light_direction(settings.light_theta, settings.light_phi),
            neighbours: neighbour_offsets(),
        }
    }

    /// Strength of the exponential falloff.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Sets the strength of the exponential falloff.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// The unit light direction.
    pub fn light_direction(&self) -> Vec3 {
        self.light_dir
    }

    /// Sets the light direction from an azimuth `theta` and a polar angle
    /// `phi`, both in radians.
    pub fn set_light_direction(&mut self, theta: f32, phi: f32) {
        self.light_dir = shading::light_direction(theta, phi);
    }

    /// The neighbour offsets sampled around each pixel.
    pub fn neighbours(&self) -> &[Vec2; NEIGHBOUR_COUNT] {
        &self.neighbours
    }

    /// The viewport size of the last successful initialization, or zero.
    pub fn screen_size(&self) -> Extent2D {
        self.screen
    }

    /// Returns `true` once the cascade has been allocated.
    pub fn is_initialized(&self) -> bool {
        self.levels[0].target.is_some()
    }

    /// The smoothing configuration of a level.
    pub fn smoothing(&self, level: Resolution) -> &SmoothingConfig {
        &self.levels[level.index()].smoothing
    }

    /// The allocated size of a level's render target.
    pub fn level_size(&self, level: Resolution) -> Option<Extent2D> {
        self.levels[level.index()]
            .target
            .as_ref()
            .map(|target| target.size())
    }

    /// The allocated size of the composite target.
    pub fn composite_size(&self) -> Option<Extent2D> {
        self.mix_target.as_ref().map(|target| target.size())
    }

    /// Returns the texture produced by `stage`, if any.
    pub fn result_texture(&self, stage: ResultStage) -> Option<TextureId> {
        match stage {
            ResultStage::Composite => self.mix_target.as_ref().map(|t| t.color_texture()),
            ResultStage::Shaded(level) => self.levels[level.index()].raw_texture(),
            ResultStage::Smoothed(level) => self.levels[level.index()].smoothing.texture(),
        }
    }

    /// Returns the texture of stage `index`: 0 is the composite, 1 to 3 the
    /// raw levels and 4 to 6 the smoothed levels. Out-of-range indices
    /// yield `None`.
    pub fn result_texture_at(&self, index: usize) -> Option<TextureId> {
        ResultStage::from_index(index).and_then(|stage| self.result_texture(stage))
    }

    /// The composite texture.
    pub fn texture(&self) -> Option<TextureId> {
        self.result_texture(ResultStage::Composite)
    }

    /// Allocates or resizes every resource for a `size` viewport.
    ///
    /// Programs are loaded from `shaders` the first time only. Smoothing
    /// failures disable the affected level and are not reported as errors.
    /// ## Errors
    /// * `RenderError` - If the context is too old, `size` is empty, or a
    ///   render target or program could not be created. Every resource is
    ///   released in that case and the filter may be initialized again.
    pub fn initialize(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter: FilterMode,
        shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError> {
        match self.allocate(ctx, size, format, filter, shaders) {
            Ok(()) => {
                log::info!(
                    "EdlFilter: initialized at {}x{} ({:?}, {:?})",
                    size.width,
                    size.height,
                    format,
                    filter
                );
                Ok(())
            }
            Err(e) => {
                log::error!("EdlFilter: initialization failed: {e}");
                self.reset();
                Err(e)
            }
        }
    }

    /// Same as [`EdlFilter::initialize`] with RGBA8 targets and linear filtering.
    /// ## Errors
    /// * `RenderError` - See [`EdlFilter::initialize`].
    pub fn initialize_default(
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

    fn allocate(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter: FilterMode,
        shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError> {
        if !ctx.supports(REQUIRED_INIT_VERSION) {
            return Err(RenderError::UnsupportedContext {
                required: REQUIRED_INIT_VERSION,
                found: ctx.gl_version(),
            });
        }
        if size.is_empty() {
            return Err(RenderError::InvalidSize(size));
        }

        for level in &mut self.levels {
            let descriptor = RenderTargetDescriptor {
                label: Some(Cow::Borrowed(level.spec.label)),
                size: level.spec.target_size_for(size),
                format,
                filter,
            };
            ensure_target(ctx, &mut level.target, &descriptor)?;
        }
        let descriptor = RenderTargetDescriptor {
            label: Some(Cow::Borrowed(MIX_LABEL)),
            size,
            format,
            filter,
        };
        ensure_target(ctx, &mut self.mix_target, &descriptor)?;

        if self.shade_program.is_none() {
            let program = ctx.load_shader_program(shaders, SHADE_PROGRAM)?;
            self.shade_program = Some(CachedProgram::new(program));
        }
        if self.mix_program.is_none() {
            let program = ctx.load_shader_program(shaders, MIX_PROGRAM)?;
            self.mix_program = Some(CachedProgram::new(program));
        }

        self.screen = size;

        for level in &mut self.levels {
            level.smoothing.prepare(
                ctx,
                level.spec.target_size_for(size),
                format,
                filter,
                shaders,
                level.spec.label,
            );
        }

        Ok(())
    }

    /// Renders one frame from the scene `depth` and `color` textures.
    ///
    /// The frame is skipped when the filter is not initialized, the viewport
    /// is smaller than [`MIN_SHADE_SIZE`] or the context is too old. The
    /// caller's state is restored on return.
    pub fn shade(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        depth: TextureId,
        color: TextureId,
        viewport: &ViewportParameters,
    ) {
        let screen = self.screen;
        if screen.min_component() < MIN_SHADE_SIZE {
            log::trace!(
                "EdlFilter: skipping frame, viewport {}x{} too small",
                screen.width,
                screen.height
            );
            return;
        }
        if !self.is_initialized() {
            log::trace!("EdlFilter: skipping frame, not initialized");
            return;
        }
        if !ctx.supports(REQUIRED_FRAME_VERSION) {
            log::trace!(
                "EdlFilter: skipping frame, context {} below {}",
                ctx.gl_version(),
                REQUIRED_FRAME_VERSION
            );
            return;
        }

        let (Some(shade_program), Some(mix_program), Some(mix_target)) = (
            self.shade_program.as_mut(),
            self.mix_program.as_mut(),
            self.mix_target.as_mut(),
        ) else {
            log::trace!("EdlFilter: skipping frame, programs not loaded");
            return;
        };

        let frame = ShadeFrame {
            depth,
            color,
            viewport,
            strength: self.strength,
            light_dir: self.light_dir,
            neighbours: &self.neighbours,
        };

        let mut gl = FrameStateGuard::screen_space(ctx, screen);

        for level in &mut self.levels {
            let Some(target) = level.target.as_mut() else {
                continue;
            };
            shade_level(
                &mut *gl,
                shade_program,
                &mut **target,
                &level.spec,
                level.spec.size_for(screen),
                &frame,
            );
        }

        // Every level is shaded before any smoothing sub-filter runs.
        for level in &mut self.levels {
            let Some(raw) = level.raw_texture() else {
                continue;
            };
            level.smoothing.apply(&mut *gl, depth, raw, viewport);
        }

        let levels = &self.levels;
        let [Some(full), Some(half), Some(quarter)] =
            [0, 1, 2].map(|k| levels[k].output_texture())
        else {
            return;
        };
        mix_levels(
            &mut *gl,
            mix_program,
            &mut **mix_target,
            screen,
            depth,
            [full, half, quarter],
        );
    }

    /// Releases every resource and clears the viewport size. Idempotent.
    pub fn reset(&mut self) {
        for level in &mut self.levels {
            level.smoothing.release();
            level.target = None;
        }
        self.mix_target = None;
        self.shade_program = None;
        self.mix_program = None;
        self.screen = Extent2D::ZERO;
    }
}

fn ensure_target(
    ctx: &mut dyn GraphicsContext,
    slot: &mut Option<Box<dyn RenderTarget>>,
    descriptor: &RenderTargetDescriptor<'_>,
) -> Result<(), RenderError> {
    let result = if let Some(target) = slot.as_mut() {
        target.reallocate(descriptor)
    } else {
        ctx.create_render_target(descriptor)
            .map(|target| *slot = Some(target))
    };

    result.map_err(|source| RenderError::RenderTargetFailed {
        label: descriptor.label_or_default().to_string(),
        source,
    })
}

impl Clone for EdlFilter {
    /// Copies strength and light direction only. GPU resources are never
    /// shared and smoothing returns to its defaults.
    fn clone(&self) -> Self {
        let mut filter = Self::new();
        filter.strength = self.strength;
        filter.light_dir = self.light_dir;
        filter
    }
}

impl Drop for EdlFilter {
    fn drop(&mut self) {
        self.reset();
    }
}

impl ScreenFilter for EdlFilter {
    fn description(&self) -> &str {
        EDL_DESCRIPTION
    }

    fn clone_filter(&self) -> Box<dyn ScreenFilter> {
        Box::new(self.clone())
    }

    fn initialize(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        size: Extent2D,
        format: TextureFormat,
        filter: FilterMode,
        shaders: &ShaderSourceLocation,
    ) -> Result<(), RenderError> {
        EdlFilter::initialize(self, ctx, size, format, filter, shaders)
    }

    fn shade(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        depth: TextureId,
        color: TextureId,
        viewport: &ViewportParameters,
    ) {
        EdlFilter::shade(self, ctx, depth, color, viewport);
    }

    fn texture(&self) -> Option<TextureId> {
        EdlFilter::texture(self)
    }

    fn reset(&mut self) {
        EdlFilter::reset(self);
    }
}
