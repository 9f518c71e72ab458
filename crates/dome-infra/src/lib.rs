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

//! # Dome Infra
//!
//! Concrete backends for the contracts defined in `dome-core`.
//!
//! The [`graphics::headless`] backend implements every renderer trait on the
//! CPU. It records the commands a filter issues instead of executing them and
//! can inject failures, which makes it the backend of choice for tests and
//! for running filters without a display.

#![warn(missing_docs)]

pub mod graphics;

pub use graphics::headless::{HeadlessCommand, HeadlessContext, HeadlessFaults};
