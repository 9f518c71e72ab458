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

//! The composite pass: blends the three levels into the full-resolution target.

use super::cascade::{LEVEL_COUNT, LEVEL_SPECS};
use dome_core::math::{Extent2D, ScreenRect};
use dome_core::renderer::{
    CachedProgram, GraphicsContext, RenderTarget, TextureId, TextureUnit, UniformSlot,
    UniformValue,
};

/// Zero the composite alpha where the depth buffer holds the far plane.
pub const ABSORB_ENABLED: bool = true;

/// Texture units the level outputs are read from, full resolution first.
pub const LEVEL_UNITS: [TextureUnit; LEVEL_COUNT] =
    [TextureUnit::PRIMARY, TextureUnit(1), TextureUnit(2)];

/// Texture unit the scene depth is read from.
pub const MIX_DEPTH_UNIT: TextureUnit = TextureUnit(3);

/// Uniforms of the mix program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixUniform {
    /// Full resolution sampler.
    Level0,
    /// Half resolution sampler.
    Level1,
    /// Quarter resolution sampler.
    Level2,
    /// Depth sampler.
    Depth,
    /// Full resolution weight.
    Weight0,
    /// Half resolution weight.
    Weight1,
    /// Quarter resolution weight.
    Weight2,
    /// Far-plane absorption flag.
    Absorb,
}

impl MixUniform {
    const SAMPLERS: [MixUniform; LEVEL_COUNT] =
        [MixUniform::Level0, MixUniform::Level1, MixUniform::Level2];
    const WEIGHTS: [MixUniform; LEVEL_COUNT] =
        [MixUniform::Weight0, MixUniform::Weight1, MixUniform::Weight2];
}

impl UniformSlot for MixUniform {
    const ALL: &'static [Self] = &[
        MixUniform::Level0,
        MixUniform::Level1,
        MixUniform::Level2,
        MixUniform::Depth,
        MixUniform::Weight0,
        MixUniform::Weight1,
        MixUniform::Weight2,
        MixUniform::Absorb,
    ];

    fn name(self) -> &'static str {
        match self {
            MixUniform::Level0 => "s2_I1",
            MixUniform::Level1 => "s2_I2",
            MixUniform::Level2 => "s2_I4",
            MixUniform::Depth => "s2_D",
            MixUniform::Weight0 => "A0",
            MixUniform::Weight1 => "A1",
            MixUniform::Weight2 => "A2",
            MixUniform::Absorb => "absorb",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Blends `levels` (one texture per level, full resolution first) into `target`.
pub(crate) fn mix_levels(
    ctx: &mut dyn GraphicsContext,
    program: &mut CachedProgram<MixUniform>,
    target: &mut dyn RenderTarget,
    size: Extent2D,
    depth: TextureId,
    levels: [TextureId; LEVEL_COUNT],
) {
    target.begin();
    program.bind();

    for (k, spec) in LEVEL_SPECS.iter().enumerate() {
        program.set(
            MixUniform::SAMPLERS[k],
            UniformValue::Int(LEVEL_UNITS[k].as_sampler()),
        );
        program.set(MixUniform::WEIGHTS[k], UniformValue::Float(spec.weight));
    }
    program.set(
        MixUniform::Depth,
        UniformValue::Int(MIX_DEPTH_UNIT.as_sampler()),
    );
    program.set(MixUniform::Absorb, UniformValue::flag(ABSORB_ENABLED));

    ctx.bind_texture(MIX_DEPTH_UNIT, Some(depth));
    ctx.bind_texture(LEVEL_UNITS[2], Some(levels[2]));
    ctx.bind_texture(LEVEL_UNITS[1], Some(levels[1]));
    ctx.draw_texture(levels[0], ScreenRect::covering(size));
    ctx.bind_texture(LEVEL_UNITS[1], None);
    ctx.bind_texture(LEVEL_UNITS[2], None);
    ctx.bind_texture(MIX_DEPTH_UNIT, None);

    program.release();
    target.end();
}
