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

//! Provides integer extents and rectangles for textures, targets and viewports.
//!
//! These types use `u32` components, making them suitable for pixel-based
//! sizes and offsets.

/// A two-dimensional extent, typically representing width and height.
///
/// This is used for render-target dimensions and screen sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// An extent with both components set to zero.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Creates a new extent.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either component is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Divides both components by `2^shift` (`width >> shift`, `height >> shift`).
    #[inline]
    pub const fn downscaled(&self, shift: u32) -> Self {
        Self {
            width: self.width >> shift,
            height: self.height >> shift,
        }
    }

    /// Returns an extent where each component is at least `min`.
    #[inline]
    pub fn at_least(&self, min: u32) -> Self {
        Self {
            width: self.width.max(min),
            height: self.height.max(min),
        }
    }

    /// Returns the smallest of the two components.
    #[inline]
    pub fn min_component(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle in screen pixels, with its origin at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenRect {
    /// The x-coordinate of the lower-left corner.
    pub x: u32,
    /// The y-coordinate of the lower-left corner.
    pub y: u32,
    /// The size of the rectangle.
    pub size: Extent2D,
}

impl ScreenRect {
    /// Creates a rectangle anchored at the origin that covers `size`.
    #[inline]
    pub const fn covering(size: Extent2D) -> Self {
        Self { x: 0, y: 0, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downscaled_halves_per_shift() {
        let size = Extent2D::new(101, 64);
        assert_eq!(size.downscaled(0), Extent2D::new(101, 64));
        assert_eq!(size.downscaled(1), Extent2D::new(50, 32));
        assert_eq!(size.downscaled(2), Extent2D::new(25, 16));
    }

    #[test]
    fn at_least_clamps_each_component() {
        let size = Extent2D::new(3, 0).downscaled(2);
        assert!(size.is_empty());
        assert_eq!(size.at_least(1), Extent2D::new(1, 1));
        assert_eq!(Extent2D::new(8, 2).min_component(), 2);
    }

    #[test]
    fn covering_rect_starts_at_origin() {
        let rect = ScreenRect::covering(Extent2D::new(10, 20));
        assert_eq!((rect.x, rect.y), (0, 0));
        assert_eq!(rect.size, Extent2D::new(10, 20));
    }
}
