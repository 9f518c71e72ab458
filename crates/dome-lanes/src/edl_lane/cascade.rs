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

//! The fixed three-level render-target cascade.

use super::smoothing::SmoothingConfig;
use dome_core::math::Extent2D;
use dome_core::renderer::{RenderTarget, TextureId};

/// Number of resolution levels in the cascade.
pub const LEVEL_COUNT: usize = 3;

/// Static description of one cascade level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    /// Resolution divisor as a shift: the level is `(width >> shift, height >> shift)`.
    pub shift: u32,
    /// Size of one level pixel in full-resolution pixels.
    pub pixel_scale: f32,
    /// Contribution of the level to the composite.
    pub weight: f32,
    /// Debug label of the level's render target.
    pub label: &'static str,
}

impl LevelSpec {
    /// The exact size of this level for a `screen` viewport.
    #[inline]
    pub fn size_for(&self, screen: Extent2D) -> Extent2D {
        screen.downscaled(self.shift)
    }

    /// The size the level's render target is allocated with.
    ///
    /// Viewports smaller than 4 pixels would produce empty coarse levels;
    /// those are kept at one pixel so allocation stays valid. Frames are
    /// never shaded at such sizes.
    #[inline]
    pub fn target_size_for(&self, screen: Extent2D) -> Extent2D {
        self.size_for(screen).at_least(1)
    }
}

/// Full, half and quarter resolution, in shading order.
pub const LEVEL_SPECS: [LevelSpec; LEVEL_COUNT] = [
    LevelSpec {
        shift: 0,
        pixel_scale: 1.0,
        weight: 1.0,
        label: "EDL 1:1",
    },
    LevelSpec {
        shift: 1,
        pixel_scale: 2.0,
        weight: 0.5,
        label: "EDL 1:2",
    },
    LevelSpec {
        shift: 2,
        pixel_scale: 4.0,
        weight: 0.25,
        label: "EDL 1:4",
    },
];

/// Label of the full-resolution composite target.
pub const MIX_LABEL: &str = "EDL mix";

/// Identifies one cascade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// `width x height`.
    Full,
    /// `width/2 x height/2`.
    Half,
    /// `width/4 x height/4`.
    Quarter,
}

impl Resolution {
    /// Every level, in shading order.
    pub const ALL: [Resolution; LEVEL_COUNT] =
        [Resolution::Full, Resolution::Half, Resolution::Quarter];

    /// Position of the level in the cascade.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The static description of the level.
    #[inline]
    pub fn spec(self) -> &'static LevelSpec {
        &LEVEL_SPECS[self.index()]
    }
}

/// One of the seven textures a frame produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStage {
    /// The final composite (index 0).
    Composite,
    /// The raw shading output of a level (indices 1 to 3).
    Shaded(Resolution),
    /// The smoothed output of a level (indices 4 to 6).
    Smoothed(Resolution),
}

impl ResultStage {
    /// Maps a stage index in `[0, 6]` to a stage.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ResultStage::Composite),
            1..=3 => Some(ResultStage::Shaded(Resolution::ALL[index - 1])),
            4..=6 => Some(ResultStage::Smoothed(Resolution::ALL[index - 4])),
            _ => None,
        }
    }

    /// The stage index in `[0, 6]`.
    pub fn index(self) -> usize {
        match self {
            ResultStage::Composite => 0,
            ResultStage::Shaded(level) => 1 + level.index(),
            ResultStage::Smoothed(level) => 4 + level.index(),
        }
    }
}

/// A cascade level: its render target and its smoothing configuration.
#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) spec: LevelSpec,
    pub(crate) target: Option<Box<dyn RenderTarget>>,
    pub(crate) smoothing: SmoothingConfig,
}

impl Level {
    pub(crate) fn new(spec: LevelSpec, smoothing: SmoothingConfig) -> Self {
        Self {
            spec,
            target: None,
            smoothing,
        }
    }

    /// The raw shading output.
    pub(crate) fn raw_texture(&self) -> Option<TextureId> {
        self.target.as_ref().map(|target| target.color_texture())
    }

    /// The texture the composite reads: smoothed when a sub-filter exists.
    pub(crate) fn output_texture(&self) -> Option<TextureId> {
        self.smoothing.texture().or_else(|| self.raw_texture())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_constants_follow_a_geometric_falloff() {
        let scales: Vec<f32> = LEVEL_SPECS.iter().map(|spec| spec.pixel_scale).collect();
        let weights: Vec<f32> = LEVEL_SPECS.iter().map(|spec| spec.weight).collect();
        assert_eq!(scales, vec![1.0, 2.0, 4.0]);
        assert_eq!(weights, vec![1.0, 0.5, 0.25]);
        for spec in &LEVEL_SPECS {
            assert_eq!(spec.pixel_scale, (1u32 << spec.shift) as f32);
        }
    }

    #[test]
    fn level_sizes_are_shifted_screen_sizes() {
        let screen = Extent2D::new(1920, 1081);
        assert_eq!(Resolution::Full.spec().size_for(screen), screen);
        assert_eq!(
            Resolution::Half.spec().size_for(screen),
            Extent2D::new(960, 540)
        );
        assert_eq!(
            Resolution::Quarter.spec().size_for(screen),
            Extent2D::new(480, 270)
        );
    }

    #[test]
    fn target_size_never_collapses_to_zero() {
        let screen = Extent2D::new(3, 3);
        assert_eq!(
            Resolution::Quarter.spec().target_size_for(screen),
            Extent2D::new(1, 1)
        );
        assert_eq!(
            Resolution::Full.spec().target_size_for(screen),
            Extent2D::new(3, 3)
        );
    }

    #[test]
    fn stage_indices_round_trip() {
        for index in 0..7 {
            let stage = ResultStage::from_index(index).unwrap();
            assert_eq!(stage.index(), index);
        }
        assert_eq!(ResultStage::from_index(7), None);
        assert_eq!(
            ResultStage::from_index(5),
            Some(ResultStage::Smoothed(Resolution::Half))
        );
    }
}
