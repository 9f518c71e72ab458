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

//! A typed cache of uniform locations for a linked shader program.
//!
//! Locations are resolved once, when the program is wrapped, and then looked
//! up by a small `Copy` enum instead of by name on every frame.

use crate::renderer::api::shader::{UniformLocation, UniformValue};
use crate::renderer::traits::ShaderProgram;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A closed set of uniforms declared by one shader program.
///
/// `index` must be the position of the slot inside [`UniformSlot::ALL`].
pub trait UniformSlot: Copy + Debug + 'static {
    /// Every slot, in index order.
    const ALL: &'static [Self];

    /// The uniform name as declared in the shader source.
    fn name(self) -> &'static str;

    /// The position of this slot in [`UniformSlot::ALL`].
    fn index(self) -> usize;
}

/// A shader program paired with the resolved locations of its uniforms.
#[derive(Debug)]
pub struct CachedProgram<U: UniformSlot> {
    program: Box<dyn ShaderProgram>,
    locations: Vec<Option<UniformLocation>>,
    _slots: PhantomData<U>,
}

impl<U: UniformSlot> CachedProgram<U> {
    /// Wraps `program` and resolves every slot of `U`.
    ///
    /// Slots the program does not expose (e.g. optimized away by the driver)
    /// are kept as `None` and silently skipped by [`CachedProgram::set`].
    pub fn new(program: Box<dyn ShaderProgram>) -> Self {
        let locations = U::ALL
            .iter()
            .map(|slot| {
                let location = program.uniform_location(slot.name());
                if location.is_none() {
                    log::debug!(
                        "Program '{}' has no active uniform '{}'",
                        program.label(),
                        slot.name()
                    );
                }
                location
            })
            .collect();

        Self {
            program,
            locations,
            _slots: PhantomData,
        }
    }

    /// The label of the underlying program.
    pub fn label(&self) -> &str {
        self.program.label()
    }

    /// Returns the cached location of `slot`.
    pub fn location(&self, slot: U) -> Option<UniformLocation> {
        self.locations.get(slot.index()).copied().flatten()
    }

    /// Makes the program current.
    pub fn bind(&mut self) {
        self.program.bind();
    }

    /// Releases the program.
    pub fn release(&mut self) {
        self.program.release();
    }

    /// Writes `value` to `slot` on the currently bound program.
    pub fn set(&mut self, slot: U, value: UniformValue<'_>) {
        if let Some(location) = self.location(slot) {
            self.program.set_uniform(location, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum TestSlot {
        Alpha,
        Beta,
    }

    impl UniformSlot for TestSlot {
        const ALL: &'static [Self] = &[TestSlot::Alpha, TestSlot::Beta];

        fn name(self) -> &'static str {
            match self {
                TestSlot::Alpha => "alpha",
                TestSlot::Beta => "beta",
            }
        }

        fn index(self) -> usize {
            self as usize
        }
    }

    #[derive(Debug)]
    struct MockProgram {
        writes: Rc<RefCell<Vec<(UniformLocation, Vec<f32>)>>>,
    }

    impl ShaderProgram for MockProgram {
        fn label(&self) -> &str {
            "mock"
        }
        fn bind(&mut self) {}
        fn release(&mut self) {}
        fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
            (name == "alpha").then_some(UniformLocation(7))
        }
        fn set_uniform(&mut self, location: UniformLocation, value: UniformValue<'_>) {
            self.writes.borrow_mut().push((location, value.to_floats()));
        }
    }

    #[test]
    fn resolves_locations_once_and_skips_missing() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let mut program = CachedProgram::<TestSlot>::new(Box::new(MockProgram {
            writes: writes.clone(),
        }));

        assert_eq!(program.location(TestSlot::Alpha), Some(UniformLocation(7)));
        assert_eq!(program.location(TestSlot::Beta), None);

        program.set(TestSlot::Alpha, UniformValue::Float(2.5));
        program.set(TestSlot::Beta, UniformValue::Int(1));

        assert_eq!(*writes.borrow(), vec![(UniformLocation(7), vec![2.5])]);
        assert_eq!(program.label(), "mock");
    }
}
