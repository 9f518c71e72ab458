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

use crate::renderer::api::{UniformLocation, UniformValue};
use std::fmt::Debug;

/// A linked shader program. Released when dropped.
pub trait ShaderProgram: Debug {
    /// A human-readable label, usually the logical program name.
    fn label(&self) -> &str;

    /// Makes the program current.
    fn bind(&mut self);

    /// Restores the fixed-function program.
    fn release(&mut self);

    /// Resolves an active uniform by name.
    fn uniform_location(&self, name: &str) -> Option<UniformLocation>;

    /// Writes a uniform of the currently bound program.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue<'_>);
}
