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

//! Scoped save/restore of the caller's fixed-function state.

use crate::math::Extent2D;
use crate::renderer::traits::GraphicsContext;
use std::ops::{Deref, DerefMut};

/// Pushes the context state on creation and pops it on drop.
///
/// While alive, the guard dereferences to the context, so every command of a
/// frame is issued through it. The state is restored on every exit path,
/// early returns included.
pub struct FrameStateGuard<'a> {
    ctx: &'a mut dyn GraphicsContext,
}

impl<'a> FrameStateGuard<'a> {
    /// Saves the current state and installs a pixel-exact orthographic
    /// projection spanning `[0, size.width] x [0, size.height]`, depth `[0, 1]`.
    pub fn screen_space(ctx: &'a mut dyn GraphicsContext, size: Extent2D) -> Self {
        ctx.push_state();
        ctx.load_screen_projection(size);
        Self { ctx }
    }
}

impl<'a> Deref for FrameStateGuard<'a> {
    type Target = dyn GraphicsContext + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'a> DerefMut for FrameStateGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for FrameStateGuard<'_> {
    fn drop(&mut self) {
        self.ctx.pop_state();
    }
}
