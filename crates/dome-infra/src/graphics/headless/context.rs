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

use super::program::declared_uniforms;
use super::state::{HeadlessState, SharedState};
use super::{
    HeadlessCommand, HeadlessFaults, HeadlessProgram, HeadlessSmoothingFilter, HeadlessTarget,
    LiveTexture,
};
use dome_core::math::{Extent2D, ScreenRect};
use dome_core::renderer::{
    FilterMode, GlVersion, GraphicsContext, RenderTarget, RenderTargetDescriptor, ResourceError,
    ShaderError, ShaderProgram, ShaderSourceLocation, SmoothingFilter, TextureFormat, TextureId,
    TextureUnit,
};
use std::fmt;

/// Shader stages a program is assembled from, by file extension.
const SHADER_STAGES: [&str; 2] = ["vert", "frag"];

/// A graphics context that records commands instead of executing them.
///
/// Clones share the same state, which lets a test keep a handle for
/// introspection while a filter drives another.
#[derive(Clone)]
pub struct HeadlessContext {
    state: SharedState,
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessContext {
    /// Creates a context without injected failures, reporting OpenGL 3.3.
    pub fn new() -> Self {
        Self::with_faults(HeadlessFaults::default())
    }

    /// Creates a context with the given failures.
    pub fn with_faults(faults: HeadlessFaults) -> Self {
        Self {
            state: HeadlessState::shared(faults),
        }
    }

    /// Replaces the injected failures and restarts allocation counting.
    pub fn set_faults(&self, faults: HeadlessFaults) {
        self.state.borrow_mut().replace_faults(faults);
    }

    /// Registers an externally produced texture, such as a scene depth buffer.
    pub fn import_texture(&self, label: &str, size: Extent2D, format: TextureFormat) -> TextureId {
        self.state.borrow_mut().insert_texture(LiveTexture {
            label: label.to_string(),
            size,
            format,
            filter: FilterMode::Nearest,
        })
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> Vec<HeadlessCommand> {
        self.state.borrow().commands.clone()
    }

    /// Returns and clears the recorded commands.
    pub fn take_commands(&self) -> Vec<HeadlessCommand> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    /// Every value written to the uniform `name` of `program`, in order.
    pub fn uniform_writes(&self, program: &str, name: &str) -> Vec<Vec<f32>> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter_map(|command| match command {
                HeadlessCommand::SetUniform {
                    program: p,
                    name: n,
                    value,
                } if p == program && n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of textures currently alive.
    pub fn live_texture_count(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Describes a live texture.
    pub fn texture(&self, id: TextureId) -> Option<LiveTexture> {
        self.state.borrow().textures.get(&id).cloned()
    }

    /// Memory the live textures would occupy on a GPU.
    pub fn allocated_bytes(&self) -> usize {
        self.state
            .borrow()
            .textures
            .values()
            .map(LiveTexture::size_in_bytes)
            .sum()
    }

    /// Number of programs currently alive.
    pub fn live_program_count(&self) -> usize {
        self.state.borrow().live_programs
    }

    /// Depth of the saved-state stack.
    pub fn state_depth(&self) -> usize {
        self.state.borrow().state_depth
    }

    /// The texture bound to `unit`.
    pub fn bound_texture(&self, unit: TextureUnit) -> Option<TextureId> {
        self.state.borrow().bound_units.get(&unit).copied()
    }

    /// Number of texture units with a texture bound.
    pub fn bound_unit_count(&self) -> usize {
        self.state.borrow().bound_units.len()
    }

    fn record(&self, command: HeadlessCommand) {
        self.state.borrow_mut().record(command);
    }
}

impl fmt::Debug for HeadlessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessContext")
            .field("gl_version", &state.faults.gl_version)
            .field("live_textures", &state.textures.len())
            .field("live_programs", &state.live_programs)
            .field("state_depth", &state.state_depth)
            .field("commands", &state.commands.len())
            .finish()
    }
}

impl GraphicsContext for HeadlessContext {
    fn gl_version(&self) -> GlVersion {
        self.state.borrow().faults.gl_version
    }

    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<Box<dyn RenderTarget>, ResourceError> {
        let id = self.state.borrow_mut().allocate_texture(descriptor)?;
        log::debug!(
            "HeadlessContext: Created render target '{}' ({}x{}) with ID: {:?}",
            descriptor.label_or_default(),
            descriptor.size.width,
            descriptor.size.height,
            id
        );
        Ok(Box::new(HeadlessTarget::new(
            self.state.clone(),
            id,
            descriptor,
        )))
    }

    fn load_shader_program(
        &mut self,
        location: &ShaderSourceLocation,
        name: &str,
    ) -> Result<Box<dyn ShaderProgram>, ShaderError> {
        let mut uniforms: Vec<String> = Vec::new();
        for stage in SHADER_STAGES {
            let path = location.resolve(name, stage);
            let source =
                std::fs::read_to_string(&path).map_err(|e| ShaderError::LoadError {
                    path: path.display().to_string(),
                    source_error: e.to_string(),
                })?;
            for uniform in declared_uniforms(&source) {
                if !uniforms.iter().any(|known| known == uniform) {
                    uniforms.push(uniform.to_string());
                }
            }
        }

        let state = self.state.borrow();
        if state.faults.failing_programs.contains(name) {
            return Err(ShaderError::CompilationError {
                label: name.to_string(),
                details: "compilation rejected by the headless backend".to_string(),
            });
        }
        uniforms.retain(|uniform| !state.faults.omitted_uniforms.contains(uniform));
        drop(state);

        log::debug!(
            "HeadlessContext: Linked program '{}' with {} active uniforms",
            name,
            uniforms.len()
        );
        Ok(Box::new(HeadlessProgram::new(
            self.state.clone(),
            name,
            uniforms,
        )))
    }

    fn create_smoothing_filter(&mut self) -> Box<dyn SmoothingFilter> {
        Box::new(HeadlessSmoothingFilter::new(self.state.clone()))
    }

    fn push_state(&mut self) {
        let mut state = self.state.borrow_mut();
        state.state_depth += 1;
        state.record(HeadlessCommand::PushState);
    }

    fn pop_state(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.state_depth == 0 {
            log::warn!("HeadlessContext: pop_state without a matching push_state");
        } else {
            state.state_depth -= 1;
        }
        state.record(HeadlessCommand::PopState);
    }

    fn load_screen_projection(&mut self, size: Extent2D) {
        self.record(HeadlessCommand::ScreenProjection(size));
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: Option<TextureId>) {
        let mut state = self.state.borrow_mut();
        match texture {
            Some(id) => {
                state.bound_units.insert(unit, id);
            }
            None => {
                state.bound_units.remove(&unit);
            }
        }
        state.record(HeadlessCommand::BindTexture { unit, texture });
    }

    fn draw_quad(&mut self, rect: ScreenRect) {
        let mut state = self.state.borrow_mut();
        let source = state.bound_units.get(&TextureUnit::PRIMARY).copied();
        state.record(HeadlessCommand::DrawQuad { rect, source });
    }
}
