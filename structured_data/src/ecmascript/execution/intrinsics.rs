// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [6.1.7.4 Well-Known Intrinsic Objects](https://tc39.es/ecma262/#sec-well-known-intrinsic-objects)

use crate::{
    ecmascript::{
        builtins::{
            Behaviour, MethodTable, create_builtin_function,
            indexed_collections::{
                array_iterator_objects::array_iterator_prototype::ArrayIteratorPrototype,
                typed_array_objects::{
                    typed_array_constructors::{
                        BigInt64ArrayConstructor, BigUint64ArrayConstructor,
                        BuiltinTypedArrayConstructor, Float32ArrayConstructor,
                        Float64ArrayConstructor, Int8ArrayConstructor, Int16ArrayConstructor,
                        Int32ArrayConstructor, TypedArrayConstructors, Uint8ArrayConstructor,
                        Uint8ClampedArrayConstructor, Uint16ArrayConstructor,
                        Uint32ArrayConstructor,
                    },
                    typed_array_intrinsic_object::TypedArrayPrototype,
                },
            },
            structured_data::{
                array_buffer_objects::{
                    array_buffer_constructor::ArrayBufferConstructor,
                    array_buffer_prototype::ArrayBufferPrototype,
                },
                data_view_objects::{
                    data_view_constructor::DataViewConstructor,
                    data_view_prototype::DataViewPrototype,
                },
            },
        },
        types::{ElementType, Function, Value},
    },
    heap::Heap,
};

/// The intrinsic constructors and prototype method tables of an [`Agent`].
///
/// [`Agent`]: super::Agent
#[derive(Debug)]
pub(crate) struct Intrinsics {
    array_buffer_prototype: MethodTable,
    array_buffer_statics: MethodTable,
    array_iterator_prototype: MethodTable,
    data_view_prototype: MethodTable,
    typed_array_prototype: MethodTable,
    typed_array_statics: MethodTable,
    array_buffer_constructor: Function,
    data_view_constructor: Function,
    /// %Int8Array% through %Float64Array%, indexed by [`ElementType`].
    typed_array_constructors: [Function; ElementType::ALL.len()],
}

fn typed_array_constructor_entry<B: BuiltinTypedArrayConstructor + 'static>(
    heap: &mut Heap,
) -> Function {
    let function = create_builtin_function::<B>(heap);
    tracing::trace!(element_type = ?B::ELEMENT_TYPE, "created TypedArray constructor");
    function
}

impl Intrinsics {
    pub(crate) fn new(heap: &mut Heap) -> Self {
        let mut array_buffer_prototype = MethodTable::default();
        ArrayBufferPrototype::create_intrinsic(&mut array_buffer_prototype);
        let mut array_buffer_statics = MethodTable::default();
        ArrayBufferConstructor::create_intrinsic(&mut array_buffer_statics);
        let mut array_iterator_prototype = MethodTable::default();
        ArrayIteratorPrototype::create_intrinsic(&mut array_iterator_prototype);
        let mut data_view_prototype = MethodTable::default();
        DataViewPrototype::create_intrinsic(&mut data_view_prototype);
        let mut typed_array_prototype = MethodTable::default();
        TypedArrayPrototype::create_intrinsic(&mut typed_array_prototype);
        let mut typed_array_statics = MethodTable::default();
        TypedArrayConstructors::create_intrinsic(&mut typed_array_statics);

        // Order follows the discriminants of ElementType.
        let typed_array_constructors = [
            typed_array_constructor_entry::<Int8ArrayConstructor>(heap),
            typed_array_constructor_entry::<Uint8ArrayConstructor>(heap),
            typed_array_constructor_entry::<Uint8ClampedArrayConstructor>(heap),
            typed_array_constructor_entry::<Int16ArrayConstructor>(heap),
            typed_array_constructor_entry::<Uint16ArrayConstructor>(heap),
            typed_array_constructor_entry::<Int32ArrayConstructor>(heap),
            typed_array_constructor_entry::<Uint32ArrayConstructor>(heap),
            typed_array_constructor_entry::<BigInt64ArrayConstructor>(heap),
            typed_array_constructor_entry::<BigUint64ArrayConstructor>(heap),
            typed_array_constructor_entry::<Float32ArrayConstructor>(heap),
            typed_array_constructor_entry::<Float64ArrayConstructor>(heap),
        ];

        Self {
            array_buffer_prototype,
            array_buffer_statics,
            array_iterator_prototype,
            data_view_prototype,
            typed_array_prototype,
            typed_array_statics,
            array_buffer_constructor: create_builtin_function::<ArrayBufferConstructor>(heap),
            data_view_constructor: create_builtin_function::<DataViewConstructor>(heap),
            typed_array_constructors,
        }
    }

    /// %ArrayBuffer%
    pub(crate) fn array_buffer_constructor(&self) -> Function {
        self.array_buffer_constructor
    }

    /// %DataView%
    pub(crate) fn data_view_constructor(&self) -> Function {
        self.data_view_constructor
    }

    /// The intrinsic constructor of TypedArrays with the given element type.
    pub(crate) fn typed_array_constructor(&self, element_type: ElementType) -> Function {
        self.typed_array_constructors[element_type as usize]
    }

    /// Returns the element type of `function` if it is one of the intrinsic
    /// TypedArray constructors.
    pub(crate) fn typed_array_constructor_element_type(
        &self,
        function: Function,
    ) -> Option<ElementType> {
        ElementType::ALL
            .into_iter()
            .find(|element_type| self.typed_array_constructor(*element_type) == function)
    }

    fn method_table_of(&self, value: &Value) -> Option<&MethodTable> {
        match value {
            Value::ArrayBuffer(_) => Some(&self.array_buffer_prototype),
            Value::ArrayIterator(_) => Some(&self.array_iterator_prototype),
            Value::DataView(_) => Some(&self.data_view_prototype),
            Value::TypedArray(_) => Some(&self.typed_array_prototype),
            Value::Function(f) if *f == self.array_buffer_constructor => {
                Some(&self.array_buffer_statics)
            }
            Value::Function(f) if self.typed_array_constructor_element_type(*f).is_some() => {
                Some(&self.typed_array_statics)
            }
            _ => None,
        }
    }

    /// Looks up the built-in method `name` on the intrinsic object that
    /// `value` inherits from.
    pub(crate) fn lookup_method(&self, value: &Value, name: &str) -> Option<Behaviour> {
        self.method_table_of(value)?.get(name)
    }

    /// The `length` property of the built-in method `name`.
    pub(crate) fn method_length(&self, value: &Value, name: &str) -> Option<u8> {
        self.method_table_of(value)?.length_of(name)
    }

    /// Names of the built-in methods available on `value`.
    pub(crate) fn method_names(&self, value: &Value) -> Vec<&'static str> {
        let mut names = self
            .method_table_of(value)
            .map(|table| table.names().collect::<Vec<_>>())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::Agent;

    #[test]
    fn typed_array_constructors_follow_element_types() {
        let agent = Agent::default();
        for element_type in ElementType::ALL {
            let constructor = agent.intrinsics.typed_array_constructor(element_type);
            assert_eq!(constructor.name(&agent), element_type.constructor_name());
            assert_eq!(
                agent
                    .intrinsics
                    .typed_array_constructor_element_type(constructor),
                Some(element_type)
            );
        }
        let array_buffer = agent.intrinsics.array_buffer_constructor();
        assert_eq!(
            agent
                .intrinsics
                .typed_array_constructor_element_type(array_buffer),
            None
        );
    }

    #[test]
    fn prototype_method_lengths() {
        let agent = Agent::default();
        let constructor = agent.intrinsics.typed_array_constructor(ElementType::Uint8);
        assert_eq!(
            agent
                .intrinsics
                .method_length(&Value::Function(constructor), "from"),
            Some(1)
        );
        assert!(
            agent
                .intrinsics
                .method_names(&Value::Function(constructor))
                .contains(&"BYTES_PER_ELEMENT")
        );
        assert_eq!(
            agent
                .intrinsics
                .method_length(&Value::Function(agent.intrinsics.data_view_constructor()), "from"),
            None
        );
    }
}
