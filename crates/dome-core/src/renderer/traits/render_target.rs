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
use crate::renderer::api::{FilterMode, RenderTargetDescriptor, TextureFormat, TextureId};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// An off-screen color buffer that can be rendered into and then sampled.
///
/// The GPU objects behind a target are released when it is dropped.
pub trait RenderTarget: Debug {
    /// The current size of the color attachment.
    fn size(&self) -> Extent2D;

    /// The internal format of the color attachment.
    fn format(&self) -> TextureFormat;

    /// The filtering mode of the color attachment.
    fn filter_mode(&self) -> FilterMode;

    /// Reallocates the color attachment in place with a new size, format and filter.
    /// ## Errors
    /// * `ResourceError` - If the new attachment could not be allocated. The
    ///   target is left without a usable attachment in that case.
    fn reallocate(&mut self, descriptor: &RenderTargetDescriptor<'_>)
        -> Result<(), ResourceError>;

    /// Makes this target the active render destination.
    fn begin(&mut self);

    /// Restores the default render destination.
    fn end(&mut self);

    /// The texture holding the rendered color.
    fn color_texture(&self) -> TextureId;
}
