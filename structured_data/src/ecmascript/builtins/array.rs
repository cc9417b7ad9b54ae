// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.1 Array Objects](https://tc39.es/ecma262/#sec-array-objects)
//!
//! Arrays are dense lists of values. They are the argument and result type
//! of the TypedArray operations that take or produce plain lists.

use crate::{
    ecmascript::{
        abstract_operations::operations_on_objects::create_array_from_list,
        execution::Agent,
        types::Value,
    },
    heap::indexes::ArrayIndex,
};

#[derive(Debug, Clone, Default)]
pub struct ArrayHeapData {
    pub(crate) elements: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Array(pub(crate) ArrayIndex);

impl Array {
    pub fn from_slice(agent: &mut Agent, elements: &[Value]) -> Self {
        create_array_from_list(agent, elements)
    }

    pub fn len(self, agent: &Agent) -> usize {
        agent[self].elements.len()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent[self].elements.is_empty()
    }

    /// Returns the element at `index`, or undefined past the end.
    pub fn get(self, agent: &Agent, index: usize) -> Value {
        agent[self]
            .elements
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    pub fn as_slice(self, agent: &Agent) -> &[Value] {
        &agent[self].elements
    }
}
