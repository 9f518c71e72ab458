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

//! A CPU-only backend that records commands instead of issuing them.
//!
//! Every handle created by a [`HeadlessContext`] shares the same state, so
//! dropping a render target or a program is visible from the context.
//! The state lives behind `Rc<RefCell<..>>`: the backend is single-threaded
//! like the contexts it stands in for.

mod commands;
mod context;
mod faults;
mod program;
mod smoothing;
mod state;
mod target;

pub use self::commands::HeadlessCommand;
pub use self::context::HeadlessContext;
pub use self::faults::HeadlessFaults;
pub use self::program::HeadlessProgram;
pub use self::smoothing::HeadlessSmoothingFilter;
pub use self::state::LiveTexture;
pub use self::target::HeadlessTarget;
