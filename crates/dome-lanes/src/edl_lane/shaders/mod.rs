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

//! Built-in shader sources for the eye-dome lighting lane.
//!
//! Programs are requested from the graphics context by logical name; a
//! backend resolves the name against a [`ShaderSourceLocation`], usually as
//! `<base>/<name>.vert` and `<base>/<name>.frag`.

use dome_core::renderer::ShaderSourceLocation;

/// Logical name of the per-level shading program.
pub const SHADE_PROGRAM: &str = "EDL/edl_shade";

/// Logical name of the composite (mix) program.
pub const MIX_PROGRAM: &str = "EDL/edl_mix";

/// The directory holding the bundled `EDL/` sources.
pub fn bundled_location() -> ShaderSourceLocation {
    ShaderSourceLocation::new(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
}
