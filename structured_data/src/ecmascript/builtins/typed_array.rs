// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.2 TypedArray Objects](https://tc39.es/ecma262/#sec-typedarray-objects)

pub(crate) mod bulk_operations;
pub mod data;

use self::data::TypedArrayHeapData;
use crate::{
    ecmascript::{
        builtins::{
            array_buffer::{ArrayBuffer, is_detached_buffer, throw_detached_error},
            indexed_collections::typed_array_objects::{
                abstract_operations::{
                    allocate_typed_array, initialize_typed_array_from_array_buffer,
                    initialize_typed_array_from_list, initialize_typed_array_from_typed_array,
                    read_typed_array_element, typed_array_get_element, typed_array_set_element,
                    write_typed_array_element,
                },
                typed_array_constructors::typed_array_constructor,
            },
        },
        execution::{Agent, JsResult},
        types::{ElementType, Numeric, Value},
    },
    heap::indexes::TypedArrayIndex,
};

/// A dense, index-addressed view of one [`ElementType`] over an
/// [`ArrayBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedArray(pub(crate) TypedArrayIndex);

impl TypedArray {
    /// Creates a TypedArray of `length` zeroed elements over a new buffer.
    pub fn new(agent: &mut Agent, element_type: ElementType, length: usize) -> JsResult<Self> {
        allocate_typed_array(agent, element_type, length)
    }

    /// Creates a TypedArray viewing `buffer` from `byte_offset`. Without a
    /// `length` the view extends to the end of the buffer.
    pub fn from_buffer(
        agent: &mut Agent,
        element_type: ElementType,
        buffer: ArrayBuffer,
        byte_offset: usize,
        length: Option<usize>,
    ) -> JsResult<Self> {
        initialize_typed_array_from_array_buffer(
            agent,
            element_type,
            buffer,
            Value::Number(byte_offset as f64),
            length.map_or(Value::Undefined, |length| Value::Number(length as f64)),
        )
    }

    /// Creates a TypedArray holding the elements of `source` converted to
    /// `element_type`, over a new buffer.
    pub fn from_typed_array(
        agent: &mut Agent,
        element_type: ElementType,
        source: TypedArray,
    ) -> JsResult<Self> {
        initialize_typed_array_from_typed_array(agent, element_type, source)
    }

    /// Creates a TypedArray from a list of values, coercing each.
    pub fn from_values(
        agent: &mut Agent,
        element_type: ElementType,
        values: &[Value],
    ) -> JsResult<Self> {
        initialize_typed_array_from_list(agent, element_type, values)
    }

    /// Runs the `%TypedArray%` constructor of `element_type` with the given
    /// arguments.
    pub fn construct(
        agent: &mut Agent,
        element_type: ElementType,
        arguments: &[Value],
    ) -> JsResult<Self> {
        typed_array_constructor(agent, element_type, arguments)
    }

    pub fn element_type(self, agent: &Agent) -> ElementType {
        agent[self].element_type
    }

    pub fn viewed_array_buffer(self, agent: &Agent) -> ArrayBuffer {
        agent[self].viewed_array_buffer
    }

    pub fn is_detached(self, agent: &Agent) -> bool {
        is_detached_buffer(agent, agent[self].viewed_array_buffer)
    }

    /// Frees the heap slot of the view unless an ArrayIterator is still
    /// iterating it. The viewed buffer is left alone.
    pub fn release(self, agent: &mut Agent) -> bool {
        agent.heap.release_typed_array(self)
    }

    /// Byte offset into the viewed buffer; zero once detached.
    pub fn byte_offset(self, agent: &Agent) -> usize {
        if self.is_detached(agent) {
            0
        } else {
            agent[self].byte_offset
        }
    }

    /// Byte length of the view; zero once detached.
    pub fn byte_length(self, agent: &Agent) -> usize {
        if self.is_detached(agent) {
            0
        } else {
            agent[self].byte_length
        }
    }

    /// Number of elements; zero once detached.
    pub fn array_length(self, agent: &Agent) -> usize {
        if self.is_detached(agent) {
            0
        } else {
            agent[self].array_length
        }
    }

    pub(crate) fn heap_data(self, agent: &Agent) -> &TypedArrayHeapData {
        &agent[self]
    }

    /// Reads the element at `index`. Indices past the end read as `None`;
    /// reading through a detached buffer is a TypeError.
    pub fn get(self, agent: &mut Agent, index: usize) -> JsResult<Option<Numeric>> {
        if self.is_detached(agent) {
            return Err(throw_detached_error(agent));
        }
        if index >= agent[self].array_length {
            return Ok(None);
        }
        Ok(Some(read_typed_array_element(agent, self, index)))
    }

    /// ### [10.4.5.15 TypedArrayGetElement ( O, index )](https://tc39.es/ecma262/#sec-typedarraygetelement)
    ///
    /// Reads the element at `index`, or `None` if `index` is not a valid
    /// integer index or the buffer is detached.
    pub fn get_element(self, agent: &Agent, index: f64) -> Option<Numeric> {
        typed_array_get_element(agent, self, index)
    }

    /// Coerces `value` to the element type and writes it at `index`.
    ///
    /// Writes past the end are ignored. Writing through a detached buffer,
    /// including one detached by the coercion itself, is a TypeError.
    pub fn set(self, agent: &mut Agent, index: usize, value: Value) -> JsResult<()> {
        if self.is_detached(agent) {
            return Err(throw_detached_error(agent));
        }
        let element_type = agent[self].element_type;
        let numeric = element_type.coerce(agent, value)?;
        if self.is_detached(agent) {
            return Err(throw_detached_error(agent));
        }
        if index >= agent[self].array_length {
            return Ok(());
        }
        write_typed_array_element(agent, self, index, &numeric);
        Ok(())
    }

    /// ### [10.4.5.16 TypedArraySetElement ( O, index, value )](https://tc39.es/ecma262/#sec-typedarraysetelement)
    ///
    /// Coerces `value` and writes it at `index` if `index` is a valid
    /// integer index afterwards; otherwise does nothing. Throws a TypeError
    /// if the buffer is detached once `value` has been coerced.
    pub fn set_element(self, agent: &mut Agent, index: f64, value: Value) -> JsResult<()> {
        typed_array_set_element(agent, self, index, value)
    }

    /// Reads all elements.
    pub fn to_vec(self, agent: &mut Agent) -> JsResult<Vec<Numeric>> {
        if self.is_detached(agent) {
            return Err(throw_detached_error(agent));
        }
        let len = agent[self].array_length;
        Ok((0..len)
            .map(|index| read_typed_array_element(agent, self, index))
            .collect())
    }

    /// The value of the `constructor` property of this TypedArray, which
    /// drives species construction. Undefined unless set.
    pub fn get_constructor(self, agent: &Agent) -> Value {
        agent
            .heap
            .typed_array_constructors
            .get(&self)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_constructor(self, agent: &mut Agent, value: Value) {
        agent.heap.typed_array_constructors.insert(self, value);
    }
}
