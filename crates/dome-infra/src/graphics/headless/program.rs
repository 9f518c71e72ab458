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
use dome_core::renderer::{ShaderProgram, UniformLocation, UniformValue};
use std::fmt;

/// A linked program of the headless backend.
///
/// The active uniforms are the `uniform` declarations found in the program
/// sources; a location is the position of a name in that list.
pub struct HeadlessProgram {
    state: SharedState,
    label: String,
    uniforms: Vec<String>,
}

impl HeadlessProgram {
    pub(crate) fn new(state: SharedState, label: &str, uniforms: Vec<String>) -> Self {
        state.borrow_mut().live_programs += 1;
        Self {
            state,
            label: label.to_string(),
            uniforms,
        }
    }

    /// The active uniform names, in location order.
    pub fn active_uniforms(&self) -> &[String] {
        &self.uniforms
    }
}

/// Extracts the uniform names declared in a GLSL source, arrays included
/// (`uniform vec2 offsets[8];` yields `offsets`).
pub(crate) fn declared_uniforms(source: &str) -> impl Iterator<Item = &str> {
    source.lines().filter_map(|line| {
        let declaration = line.trim().strip_prefix("uniform ")?;
        let declaration = declaration.split(';').next()?;
        let name = declaration.split_whitespace().last()?;
        name.split('[').next()
    })
}

impl fmt::Debug for HeadlessProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessProgram")
            .field("label", &self.label)
            .field("uniforms", &self.uniforms)
            .finish()
    }
}

impl ShaderProgram for HeadlessProgram {
    fn label(&self) -> &str {
        &self.label
    }

    fn bind(&mut self) {
        self.state
            .borrow_mut()
            .record(HeadlessCommand::BindProgram(self.label.clone()));
    }

    fn release(&mut self) {
        self.state
            .borrow_mut()
            .record(HeadlessCommand::ReleaseProgram(self.label.clone()));
    }

    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .position(|uniform| uniform == name)
            .map(|index| UniformLocation(index as i32))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue<'_>) {
        let Some(name) = usize::try_from(location.0)
            .ok()
            .and_then(|index| self.uniforms.get(index))
        else {
            log::warn!(
                "HeadlessProgram: '{}' has no uniform at location {}",
                self.label,
                location.0
            );
            return;
        };
        self.state.borrow_mut().record(HeadlessCommand::SetUniform {
            program: self.label.clone(),
            name: name.clone(),
            value: value.to_floats(),
        });
    }
}

impl Drop for HeadlessProgram {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.live_programs = state.live_programs.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_declarations_are_parsed() {
        let source = "#version 120\n\
            uniform sampler2D s2_depth;\n\
            uniform vec2  Neigh_pos_2D[8];\n\
            varying vec2 uv;\n\
              uniform int   absorb; // flag\n\
            void main() {}\n";
        let names: Vec<&str> = declared_uniforms(source).collect();
        assert_eq!(names, vec!["s2_depth", "Neigh_pos_2D", "absorb"]);
    }
}
