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

//! Defines data structures related to textures and off-screen render targets.

use crate::math::Extent2D;
use std::borrow::Cow;

/// Defines the memory format of pixels in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// Four 8-bit unsigned normalized components (RGBA).
    #[default]
    Rgba8Unorm,
    /// Four 16-bit float components.
    Rgba16Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// One 32-bit float component.
    R32Float,
    /// A 32-bit float depth format.
    Depth32Float,
}

impl TextureFormat {
    /// Returns the size in bytes of a single pixel for this format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::R32Float => 4,
            TextureFormat::Depth32Float => 4,
        }
    }

    /// Returns `true` if this format can back a color attachment.
    pub fn is_color(&self) -> bool {
        !matches!(self, TextureFormat::Depth32Float)
    }
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation. Returns a weighted average of the four nearest texels.
    #[default]
    Linear,
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// The index of a texture unit (sampler slot) on the graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    /// The unit that quad draws sample from.
    pub const PRIMARY: Self = Self(0);

    /// Returns the unit index as the integer a sampler uniform expects.
    #[inline]
    pub const fn as_sampler(self) -> i32 {
        self.0 as i32
    }
}

/// A descriptor used to allocate or reallocate a render target.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensions of the color attachment.
    pub size: Extent2D,
    /// The internal format of the color attachment.
    pub format: TextureFormat,
    /// The minification and magnification filter of the color attachment.
    pub filter: FilterMode,
}

impl RenderTargetDescriptor<'_> {
    /// Returns the label, or `"unnamed"` when none was given.
    pub fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }
}
