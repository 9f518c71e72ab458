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

//! The per-level shading pass.
//!
//! Each level reads the scene depth and color at full resolution and writes
//! an obscurance term into its own render target, sampled with the level's
//! pixel scale.

use super::cascade::LevelSpec;
use dome_core::math::{Extent2D, ScreenRect, Vec2, Vec3};
use dome_core::renderer::{
    CachedProgram, GraphicsContext, RenderTarget, TextureId, TextureUnit, UniformSlot,
    UniformValue, ViewportParameters,
};

/// Lighting modulation used with a perspective projection.
pub const PERSPECTIVE_LIGHT_MODULATION: f32 = 3.0;

/// Orthographic zoom factors below this value are clamped.
pub const MIN_ORTHO_ZOOM: f64 = 0.7;

/// Number of neighbours sampled around each pixel.
pub const NEIGHBOUR_COUNT: usize = 8;

/// Texture unit the depth texture is sampled from.
pub const DEPTH_UNIT: TextureUnit = TextureUnit::PRIMARY;

/// Texture unit the color texture is sampled from.
pub const COLOR_UNIT: TextureUnit = TextureUnit(1);

/// Uniforms of the shading program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeUniform {
    /// Color sampler.
    Color,
    /// Depth sampler.
    Depth,
    /// Level width.
    Width,
    /// Level height.
    Height,
    /// Lighting modulation factor.
    Zoom,
    /// 1 for a perspective projection, 0 otherwise.
    PerspectiveMode,
    /// Level pixel scale.
    PixelScale,
    /// Strength of the exponential falloff.
    ExpScale,
    /// Near plane.
    ZNear,
    /// Far plane.
    ZFar,
    /// Light direction.
    LightDir,
    /// Neighbour offsets.
    Neighbours,
}

impl UniformSlot for ShadeUniform {
    const ALL: &'static [Self] = &[
        ShadeUniform::Color,
        ShadeUniform::Depth,
        ShadeUniform::Width,
        ShadeUniform::Height,
        ShadeUniform::Zoom,
        ShadeUniform::PerspectiveMode,
        ShadeUniform::PixelScale,
        ShadeUniform::ExpScale,
        ShadeUniform::ZNear,
        ShadeUniform::ZFar,
        ShadeUniform::LightDir,
        ShadeUniform::Neighbours,
    ];

    fn name(self) -> &'static str {
        match self {
            ShadeUniform::Color => "s1_color",
            ShadeUniform::Depth => "s2_depth",
            ShadeUniform::Width => "Sx",
            ShadeUniform::Height => "Sy",
            ShadeUniform::Zoom => "Zoom",
            ShadeUniform::PerspectiveMode => "PerspectiveMode",
            ShadeUniform::PixelScale => "Pix_scale",
            ShadeUniform::ExpScale => "Exp_scale",
            ShadeUniform::ZNear => "Zm",
            ShadeUniform::ZFar => "ZM",
            ShadeUniform::LightDir => "Light_dir",
            ShadeUniform::Neighbours => "Neigh_pos_2D",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The lighting modulation factor for a viewport.
///
/// Perspective views use a constant; orthographic views scale with the
/// square root of twice the zoom, clamped below at [`MIN_ORTHO_ZOOM`].
pub fn light_modulation(viewport: &ViewportParameters) -> f32 {
    if viewport.is_perspective() {
        PERSPECTIVE_LIGHT_MODULATION
    } else {
        let zoom = f64::from(viewport.zoom).max(MIN_ORTHO_ZOOM);
        (2.0 * zoom).sqrt() as f32
    }
}

/// Unit offsets at 45 degree increments, starting on the +X axis.
pub fn neighbour_offsets() -> [Vec2; NEIGHBOUR_COUNT] {
    std::array::from_fn(|c| {
        let angle = c as f64 * std::f64::consts::FRAC_PI_4;
        Vec2::new(angle.cos() as f32, angle.sin() as f32)
    })
}

/// The unit light direction for an azimuth `theta` and polar angle `phi`.
pub fn light_direction(theta: f32, phi: f32) -> Vec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Values shared by the three levels of one frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShadeFrame<'a> {
    pub(crate) depth: TextureId,
    pub(crate) color: TextureId,
    pub(crate) viewport: &'a ViewportParameters,
    pub(crate) strength: f32,
    pub(crate) light_dir: Vec3,
    pub(crate) neighbours: &'a [Vec2; NEIGHBOUR_COUNT],
}

/// Renders one level of the cascade into `target`.
pub(crate) fn shade_level(
    ctx: &mut dyn GraphicsContext,
    program: &mut CachedProgram<ShadeUniform>,
    target: &mut dyn RenderTarget,
    spec: &LevelSpec,
    size: Extent2D,
    frame: &ShadeFrame<'_>,
) {
    target.begin();
    program.bind();

    program.set(ShadeUniform::Color, UniformValue::Int(COLOR_UNIT.as_sampler()));
    program.set(ShadeUniform::Depth, UniformValue::Int(DEPTH_UNIT.as_sampler()));
    program.set(ShadeUniform::Width, UniformValue::Float(size.width as f32));
    program.set(ShadeUniform::Height, UniformValue::Float(size.height as f32));
    program.set(
        ShadeUniform::Zoom,
        UniformValue::Float(light_modulation(frame.viewport)),
    );
    program.set(
        ShadeUniform::PerspectiveMode,
        UniformValue::flag(frame.viewport.is_perspective()),
    );
    program.set(ShadeUniform::PixelScale, UniformValue::Float(spec.pixel_scale));
    program.set(ShadeUniform::ExpScale, UniformValue::Float(frame.strength));
    program.set(ShadeUniform::ZNear, UniformValue::Float(frame.viewport.z_near));
    program.set(ShadeUniform::ZFar, UniformValue::Float(frame.viewport.z_far));
    program.set(ShadeUniform::LightDir, UniformValue::Vec3(frame.light_dir));
    program.set(
        ShadeUniform::Neighbours,
        UniformValue::Vec2Array(frame.neighbours),
    );

    ctx.bind_texture(COLOR_UNIT, Some(frame.color));
    ctx.draw_texture(frame.depth, ScreenRect::covering(size));
    ctx.bind_texture(COLOR_UNIT, None);

    program.release();
    target.end();
}
