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

//! Defines the capability contracts a screen-space filter is written against.
//!
//! - [`GraphicsContext`]: global state, capability query and resource factory.
//! - [`RenderTarget`]: an off-screen color buffer.
//! - [`ShaderProgram`]: a linked program with named uniforms.
//! - [`ScreenFilter`] / [`SmoothingFilter`]: multi-pass filters built on the above.

mod graphics_context;
mod render_target;
mod screen_filter;
mod shader_program;

pub use self::graphics_context::{GlVersion, GraphicsContext};
pub use self::render_target::RenderTarget;
pub use self::screen_filter::{ScreenFilter, SmoothingFilter, SmoothingParams};
pub use self::shader_program::ShaderProgram;
