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

use super::{HeadlessCommand, HeadlessFaults};
use dome_core::math::Extent2D;
use dome_core::renderer::{
    FilterMode, RenderTargetDescriptor, ResourceError, TextureFormat, TextureId, TextureUnit,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// A texture currently alive in the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTexture {
    /// Debug label.
    pub label: String,
    /// Current size.
    pub size: Extent2D,
    /// Pixel format.
    pub format: TextureFormat,
    /// Filtering mode.
    pub filter: FilterMode,
}

impl LiveTexture {
    fn from_descriptor(descriptor: &RenderTargetDescriptor<'_>) -> Self {
        Self {
            label: descriptor.label_or_default().to_string(),
            size: descriptor.size,
            format: descriptor.format,
            filter: descriptor.filter,
        }
    }

    /// Memory the texture would occupy on a GPU.
    pub fn size_in_bytes(&self) -> usize {
        self.size.width as usize * self.size.height as usize * self.format.bytes_per_pixel() as usize
    }
}

pub(crate) type SharedState = Rc<RefCell<HeadlessState>>;

/// Everything the handles of one context share.
#[derive(Debug, Default)]
pub(crate) struct HeadlessState {
    pub(crate) faults: HeadlessFaults,
    pub(crate) commands: Vec<HeadlessCommand>,
    pub(crate) textures: HashMap<TextureId, LiveTexture>,
    pub(crate) bound_units: BTreeMap<TextureUnit, TextureId>,
    pub(crate) state_depth: usize,
    pub(crate) live_programs: usize,
    next_texture_id: usize,
    allocation_attempts: usize,
}

impl HeadlessState {
    pub(crate) fn shared(faults: HeadlessFaults) -> SharedState {
        Rc::new(RefCell::new(Self {
            faults,
            ..Self::default()
        }))
    }

    pub(crate) fn record(&mut self, command: HeadlessCommand) {
        self.commands.push(command);
    }

    pub(crate) fn replace_faults(&mut self, faults: HeadlessFaults) {
        self.faults = faults;
        self.allocation_attempts = 0;
    }

    /// Counts one allocation attempt and checks it against the faults.
    fn check_allocation(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        let attempt = self.allocation_attempts;
        self.allocation_attempts += 1;

        if descriptor.size.is_empty() {
            return Err(ResourceError::InvalidSize(descriptor.size));
        }
        if !descriptor.format.is_color() {
            return Err(ResourceError::IncompleteFramebuffer(format!(
                "{:?} cannot back a color attachment",
                descriptor.format
            )));
        }
        if self.faults.fail_allocation == Some(attempt) {
            return Err(ResourceError::OutOfMemory);
        }
        Ok(())
    }

    pub(crate) fn allocate_texture(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        self.check_allocation(descriptor)?;
        Ok(self.insert_texture(LiveTexture::from_descriptor(descriptor)))
    }

    pub(crate) fn insert_texture(&mut self, texture: LiveTexture) -> TextureId {
        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        id
    }

    pub(crate) fn reallocate_texture(
        &mut self,
        id: TextureId,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<(), ResourceError> {
        self.check_allocation(descriptor)?;
        match self.textures.get_mut(&id) {
            Some(texture) => {
                *texture = LiveTexture::from_descriptor(descriptor);
                Ok(())
            }
            None => Err(ResourceError::BackendError(format!(
                "texture {id:?} is not alive"
            ))),
        }
    }

    pub(crate) fn free_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_none() {
            log::warn!("HeadlessContext: texture {id:?} freed twice");
        }
        self.bound_units.retain(|_, bound| *bound != id);
    }
}
