// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub(crate) mod indexes;

use ahash::RandomState;
use hashbrown::HashMap;

use self::indexes::{
    ArrayBufferIndex, ArrayIndex, ArrayIteratorIndex, DataViewIndex, ErrorIndex, FunctionIndex,
    ObjectIndex, TypedArrayIndex,
};
use crate::ecmascript::{
    builtins::{
        array::{Array, ArrayHeapData},
        array_buffer::{ArrayBuffer, ArrayBufferHeapData},
        data_view::{DataView, data::DataViewHeapData},
        error::{Error, ErrorHeapData},
        indexed_collections::array_iterator_objects::array_iterator::{
            ArrayIterator, ArrayIteratorHeapData,
        },
        typed_array::{TypedArray, data::TypedArrayHeapData},
    },
    types::{Function, FunctionHeapData, ObjectHeapData, OrdinaryObject, Value},
};

/// Arena storage for every object kind the engine knows about.
///
/// Objects are referred to by Copy index handles. The arenas never shrink:
/// a handle stays valid for the lifetime of its [`Agent`] unless its slot is
/// explicitly released, after which indexing with it panics.
///
/// [`Agent`]: crate::ecmascript::execution::Agent
#[derive(Debug, Default)]
pub struct Heap {
    pub(crate) array_buffers: Vec<Option<ArrayBufferHeapData>>,
    pub(crate) arrays: Vec<Option<ArrayHeapData>>,
    pub(crate) array_iterators: Vec<Option<ArrayIteratorHeapData>>,
    pub(crate) data_views: Vec<Option<DataViewHeapData>>,
    pub(crate) errors: Vec<Option<ErrorHeapData>>,
    pub(crate) functions: Vec<Option<FunctionHeapData>>,
    pub(crate) objects: Vec<Option<ObjectHeapData>>,
    pub(crate) typed_arrays: Vec<Option<TypedArrayHeapData>>,
    /// Values of the `constructor` property of individual TypedArray
    /// objects. Absent entries read as undefined.
    pub(crate) typed_array_constructors: HashMap<TypedArray, Value, RandomState>,
}

pub trait CreateHeapData<T, F> {
    /// Creates a heap object from the given data and returns a handle to it.
    fn create(&mut self, data: T) -> F;
}

macro_rules! impl_create_heap_data {
    ($data: ty, $handle: ident, $index: ident, $field: ident) => {
        impl CreateHeapData<$data, $handle> for Heap {
            fn create(&mut self, data: $data) -> $handle {
                self.$field.push(Some(data));
                $handle($index::last(&self.$field))
            }
        }
    };
}

impl_create_heap_data!(ArrayBufferHeapData, ArrayBuffer, ArrayBufferIndex, array_buffers);
impl_create_heap_data!(ArrayHeapData, Array, ArrayIndex, arrays);
impl_create_heap_data!(
    ArrayIteratorHeapData,
    ArrayIterator,
    ArrayIteratorIndex,
    array_iterators
);
impl_create_heap_data!(DataViewHeapData, DataView, DataViewIndex, data_views);
impl_create_heap_data!(ErrorHeapData, Error, ErrorIndex, errors);
impl_create_heap_data!(FunctionHeapData, Function, FunctionIndex, functions);
impl_create_heap_data!(ObjectHeapData, OrdinaryObject, ObjectIndex, objects);
impl_create_heap_data!(TypedArrayHeapData, TypedArray, TypedArrayIndex, typed_arrays);

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Implements `Index` and `IndexMut` from a handle to its heap data, both on
/// the [`Heap`] and on the [`Agent`] that owns it.
///
/// [`Agent`]: crate::ecmascript::execution::Agent
macro_rules! impl_heap_index {
    ($handle: ident, $data: ty, $field: ident) => {
        impl core::ops::Index<$handle> for Heap {
            type Output = $data;

            fn index(&self, index: $handle) -> &Self::Output {
                self.$field
                    .get(index.0.into_index())
                    .expect(concat!(stringify!($handle), " out of bounds"))
                    .as_ref()
                    .expect(concat!(stringify!($handle), " slot empty"))
            }
        }

        impl core::ops::IndexMut<$handle> for Heap {
            fn index_mut(&mut self, index: $handle) -> &mut Self::Output {
                self.$field
                    .get_mut(index.0.into_index())
                    .expect(concat!(stringify!($handle), " out of bounds"))
                    .as_mut()
                    .expect(concat!(stringify!($handle), " slot empty"))
            }
        }

        impl core::ops::Index<$handle> for crate::ecmascript::execution::Agent {
            type Output = $data;

            fn index(&self, index: $handle) -> &Self::Output {
                &self.heap[index]
            }
        }

        impl core::ops::IndexMut<$handle> for crate::ecmascript::execution::Agent {
            fn index_mut(&mut self, index: $handle) -> &mut Self::Output {
                &mut self.heap[index]
            }
        }
    };
}

impl_heap_index!(ArrayBuffer, ArrayBufferHeapData, array_buffers);
impl_heap_index!(Array, ArrayHeapData, arrays);
impl_heap_index!(ArrayIterator, ArrayIteratorHeapData, array_iterators);
impl_heap_index!(DataView, DataViewHeapData, data_views);
impl_heap_index!(Error, ErrorHeapData, errors);
impl_heap_index!(Function, FunctionHeapData, functions);
impl_heap_index!(OrdinaryObject, ObjectHeapData, objects);
impl_heap_index!(TypedArray, TypedArrayHeapData, typed_arrays);

impl Heap {
    /// Borrows the storage of two distinct ArrayBuffers at once, the first
    /// shared and the second exclusively.
    pub(crate) fn array_buffer_pair_mut(
        &mut self,
        source: ArrayBuffer,
        target: ArrayBuffer,
    ) -> (&ArrayBufferHeapData, &mut ArrayBufferHeapData) {
        let source_index = source.0.into_index();
        let target_index = target.0.into_index();
        assert_ne!(source_index, target_index);
        if source_index < target_index {
            let (low, high) = self.array_buffers.split_at_mut(target_index);
            (
                low[source_index].as_ref().expect("ArrayBuffer slot empty"),
                high[0].as_mut().expect("ArrayBuffer slot empty"),
            )
        } else {
            let (low, high) = self.array_buffers.split_at_mut(source_index);
            (
                high[0].as_ref().expect("ArrayBuffer slot empty"),
                low[target_index].as_mut().expect("ArrayBuffer slot empty"),
            )
        }
    }
}

impl Heap {
    /// Empties the slot of `buffer` if no TypedArray or DataView views it.
    /// Returns false, leaving the heap untouched, while a view remains.
    pub(crate) fn release_array_buffer(&mut self, buffer: ArrayBuffer) -> bool {
        let viewed = self
            .typed_arrays
            .iter()
            .flatten()
            .any(|data| data.viewed_array_buffer == buffer)
            || self
                .data_views
                .iter()
                .flatten()
                .any(|data| data.viewed_array_buffer == buffer);
        if viewed {
            return false;
        }
        release_slot(&mut self.array_buffers, buffer.0.into_index())
    }

    /// Empties the slot of `typed_array` and drops its `constructor` value if
    /// no unfinished ArrayIterator still iterates it.
    pub(crate) fn release_typed_array(&mut self, typed_array: TypedArray) -> bool {
        let iterated = self
            .array_iterators
            .iter()
            .flatten()
            .any(|data| data.array == Some(typed_array));
        if iterated || !release_slot(&mut self.typed_arrays, typed_array.0.into_index()) {
            return false;
        }
        self.typed_array_constructors.remove(&typed_array);
        true
    }

    /// Empties the slot of `data_view`.
    pub(crate) fn release_data_view(&mut self, data_view: DataView) -> bool {
        release_slot(&mut self.data_views, data_view.0.into_index())
    }
}

fn release_slot<T>(slots: &mut [Option<T>], index: usize) -> bool {
    slots
        .get_mut(index)
        .and_then(Option::take)
        .is_some()
}

#[cfg(test)]
mod tests {
    use crate::ecmascript::{
        builtins::{array_buffer::ArrayBuffer, data_view::DataView, typed_array::TypedArray},
        execution::Agent,
        types::{ElementType, Value},
    };

    #[test]
    fn array_buffer_is_released_once_its_views_are() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        let ta = TypedArray::from_buffer(&mut agent, ElementType::Uint8, buffer, 0, None).unwrap();
        let dv = DataView::new(&mut agent, buffer, 0, None).unwrap();
        ta.set_constructor(&mut agent, Value::from(1));

        assert!(!agent.heap.release_array_buffer(buffer));
        assert!(agent.heap.release_typed_array(ta));
        assert!(agent.heap.typed_array_constructors.is_empty());
        assert!(!agent.heap.release_array_buffer(buffer));
        assert!(agent.heap.release_data_view(dv));
        assert!(agent.heap.release_array_buffer(buffer));
        assert!(agent.heap.array_buffers[buffer.0.into_index()].is_none());

        assert!(!agent.heap.release_array_buffer(buffer));
        assert!(!agent.heap.release_typed_array(ta));
        assert!(!agent.heap.release_data_view(dv));
    }

    #[test]
    fn iterated_typed_array_is_kept() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, ElementType::Int8, 1).unwrap();
        let Value::ArrayIterator(values) = agent.invoke(ta.into(), "values", &[]).unwrap() else {
            panic!("expected an ArrayIterator");
        };
        assert!(!agent.heap.release_typed_array(ta));
        assert!(values.next(&mut agent).unwrap().is_some());
        assert!(values.next(&mut agent).unwrap().is_none());
        assert!(agent.heap.release_typed_array(ta));
    }

    #[test]
    #[should_panic(expected = "ArrayBuffer slot empty")]
    fn released_handle_panics_on_use() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 1).unwrap();
        assert!(agent.heap.release_array_buffer(buffer));
        buffer.byte_length(&agent);
    }
}
