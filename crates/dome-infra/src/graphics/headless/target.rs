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
use dome_core::math::Extent2D;
use dome_core::renderer::{
    FilterMode, RenderTarget, RenderTargetDescriptor, ResourceError, TextureFormat, TextureId,
};
use std::fmt;

/// A render target of the headless backend. Frees its texture on drop.
pub struct HeadlessTarget {
    state: SharedState,
    texture: TextureId,
    label: String,
    size: Extent2D,
    format: TextureFormat,
    filter: FilterMode,
}

impl HeadlessTarget {
    pub(crate) fn new(
        state: SharedState,
        texture: TextureId,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Self {
        Self {
            state,
            texture,
            label: descriptor.label_or_default().to_string(),
            size: descriptor.size,
            format: descriptor.format,
            filter: descriptor.filter,
        }
    }

    /// The debug label of the target.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for HeadlessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessTarget")
            .field("label", &self.label)
            .field("texture", &self.texture)
            .field("size", &self.size)
            .finish()
    }
}

impl RenderTarget for HeadlessTarget {
    fn size(&self) -> Extent2D {
        self.size
    }

    fn format(&self) -> TextureFormat {
        self.format
    }

    fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    fn reallocate(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        self.state
            .borrow_mut()
            .reallocate_texture(self.texture, descriptor)?;
        self.size = descriptor.size;
        self.format = descriptor.format;
        self.filter = descriptor.filter;
        log::debug!(
            "HeadlessTarget: Resized '{}' to {}x{}",
            self.label,
            self.size.width,
            self.size.height
        );
        Ok(())
    }

    fn begin(&mut self) {
        self.state
            .borrow_mut()
            .record(HeadlessCommand::BeginTarget(self.texture));
    }

    fn end(&mut self) {
        self.state
            .borrow_mut()
            .record(HeadlessCommand::EndTarget(self.texture));
    }

    fn color_texture(&self) -> TextureId {
        self.texture
    }
}

impl Drop for HeadlessTarget {
    fn drop(&mut self) {
        self.state.borrow_mut().free_texture(self.texture);
        log::debug!(
            "HeadlessTarget: Destroyed '{}' with ID: {:?}",
            self.label,
            self.texture
        );
    }
}
