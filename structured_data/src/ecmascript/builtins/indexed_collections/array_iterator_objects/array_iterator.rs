// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        builtins::{
            array::Array,
            indexed_collections::typed_array_objects::abstract_operations::make_typed_array_with_buffer_witness_record,
            typed_array::TypedArray,
        },
        execution::{Agent, ExceptionType, JsResult},
        types::Value,
    },
    heap::{CreateHeapData, indexes::ArrayIteratorIndex},
};

/// ### [23.1.5.1 CreateArrayIterator ( array, kind )](https://tc39.es/ecma262/#sec-createarrayiterator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayIterator(pub(crate) ArrayIteratorIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionIteratorKind {
    Key,
    Value,
    KeyAndValue,
}

#[derive(Debug, Clone)]
pub struct ArrayIteratorHeapData {
    /// The iterated TypedArray. `None` once the iterator has returned.
    pub(crate) array: Option<TypedArray>,
    pub(crate) next_index: usize,
    pub(crate) kind: CollectionIteratorKind,
}

impl ArrayIterator {
    pub(crate) fn from_typed_array(
        agent: &mut Agent,
        array: TypedArray,
        kind: CollectionIteratorKind,
    ) -> Self {
        agent.heap.create(ArrayIteratorHeapData {
            array: Some(array),
            next_index: 0,
            kind,
        })
    }

    pub fn kind(self, agent: &Agent) -> CollectionIteratorKind {
        agent[self].kind
    }

    /// Advances the iterator, returning `None` when it is done.
    ///
    /// A TypedArray whose buffer is detached before the iterator has
    /// returned is a TypeError. A finished iterator stays finished.
    pub fn next(self, agent: &mut Agent) -> JsResult<Option<Value>> {
        // 1. b. NOTE: `array` is None once the closure has returned.
        let Some(array) = agent[self].array else {
            return Ok(None);
        };
        let index = agent[self].next_index;
        // i. If array has a [[TypedArrayName]] internal slot, then
        //   1. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(array, seq-cst).
        let ta_record = make_typed_array_with_buffer_witness_record(agent, array);
        //   2. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
        if ta_record.is_typed_array_out_of_bounds(agent) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "TypedArray out of bounds",
            ));
        }
        //   3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // iii. If index ≥ len, return NormalCompletion(undefined).
        if index >= len {
            agent[self].array = None;
            return Ok(None);
        }
        // iv. Let indexNumber be 𝔽(index).
        let index_number = Value::Number(index as f64);
        // vi. Set index to index + 1.
        agent[self].next_index = index + 1;
        let result = match agent[self].kind {
            // v. If kind is key, then
            //   1. Let result be indexNumber.
            CollectionIteratorKind::Key => index_number,
            // vi. Else,
            //   1. Let elementKey be ! ToString(indexNumber).
            //   2. Let elementValue be ? Get(array, elementKey).
            //   3. If kind is value, then
            //     a. Let result be elementValue.
            //   4. Else,
            //     a. Assert: kind is key+value.
            //     b. Let result be CreateArrayFromList(« indexNumber, elementValue »).
            kind => {
                let element_value = array
                    .get_element(agent, index as f64)
                    .map_or(Value::Undefined, Value::from);
                if kind == CollectionIteratorKind::Value {
                    element_value
                } else {
                    Array::from_slice(agent, &[index_number, element_value]).into()
                }
            }
        };
        // vii. Perform ? GeneratorYield(CreateIteratorResultObject(result, false)).
        Ok(Some(result))
    }
}

/// Adapts an [`ArrayIterator`] into a Rust iterator over its results.
pub struct IntoValues<'a> {
    agent: &'a mut Agent,
    iterator: ArrayIterator,
}

impl Iterator for IntoValues<'_> {
    type Item = JsResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next(self.agent).transpose()
    }
}

impl ArrayIterator {
    pub fn values(self, agent: &mut Agent) -> IntoValues<'_> {
        IntoValues {
            agent,
            iterator: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::types::ElementType;

    #[test]
    fn iterates_keys_values_and_entries() {
        let mut agent = Agent::default();
        let ta = TypedArray::from_values(
            &mut agent,
            ElementType::Int16,
            &[Value::Number(7.0), Value::Number(-3.0)],
        )
        .unwrap();

        let keys = ArrayIterator::from_typed_array(&mut agent, ta, CollectionIteratorKind::Key);
        let keys: Vec<Value> = keys.values(&mut agent).map(Result::unwrap).collect();
        assert_eq!(keys, vec![Value::Number(0.0), Value::Number(1.0)]);

        let values = ArrayIterator::from_typed_array(&mut agent, ta, CollectionIteratorKind::Value);
        let values: Vec<Value> = values.values(&mut agent).map(Result::unwrap).collect();
        assert_eq!(values, vec![Value::Number(7.0), Value::Number(-3.0)]);

        let entries =
            ArrayIterator::from_typed_array(&mut agent, ta, CollectionIteratorKind::KeyAndValue);
        let Some(Value::Array(entry)) = entries.next(&mut agent).unwrap() else {
            panic!("expected an entry array");
        };
        assert_eq!(
            entry.as_slice(&agent),
            &[Value::Number(0.0), Value::Number(7.0)]
        );
    }

    #[test]
    fn detaching_stops_an_unfinished_iterator() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, ElementType::Uint8, 2).unwrap();
        let iterator = ArrayIterator::from_typed_array(&mut agent, ta, CollectionIteratorKind::Value);
        assert_eq!(iterator.next(&mut agent).unwrap(), Some(Value::Number(0.0)));
        ta.viewed_array_buffer(&agent).detach(&mut agent);
        let error = iterator.next(&mut agent).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    }

    #[test]
    fn finished_iterator_ignores_detach() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, ElementType::Uint8, 1).unwrap();
        let iterator = ArrayIterator::from_typed_array(&mut agent, ta, CollectionIteratorKind::Key);
        assert!(iterator.next(&mut agent).unwrap().is_some());
        assert!(iterator.next(&mut agent).unwrap().is_none());
        ta.viewed_array_buffer(&agent).detach(&mut agent);
        assert!(iterator.next(&mut agent).unwrap().is_none());
    }
}
