// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.2.5 The TypedArray Constructors](https://tc39.es/ecma262/#sec-typedarray-constructors)

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, get_index, length_of_array_like},
        testing_and_comparison::is_callable,
        type_conversion::to_index,
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, MethodTable,
        indexed_collections::typed_array_objects::abstract_operations::{
            allocate_typed_array, initialize_typed_array_from_array_buffer,
            initialize_typed_array_from_array_like, initialize_typed_array_from_list,
            initialize_typed_array_from_typed_array, typed_array_create_from_constructor,
            typed_array_set_element, validate_typed_array,
        },
        typed_array::TypedArray,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{ElementType, Function, Value},
};

/// Marks a builtin as the intrinsic constructor of a TypedArray element
/// type.
pub(crate) trait BuiltinTypedArrayConstructor: Builtin {
    const ELEMENT_TYPE: ElementType;
}

macro_rules! typed_array_constructor_builtin {
    ($name: ident, $element_type: ident, $function: ident) => {
        pub(crate) struct $name;
        impl Builtin for $name {
            const NAME: &'static str = ElementType::$element_type.constructor_name();

            const LENGTH: u8 = 3;

            const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayConstructors::$function);
        }
        impl BuiltinTypedArrayConstructor for $name {
            const ELEMENT_TYPE: ElementType = ElementType::$element_type;
        }

        impl TypedArrayConstructors {
            fn $function(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                typed_array_constructor(agent, ElementType::$element_type, arguments.0)
                    .map(Value::from)
            }
        }
    };
}

pub(crate) struct TypedArrayConstructors;

typed_array_constructor_builtin!(Int8ArrayConstructor, Int8, int8_array_constructor);
typed_array_constructor_builtin!(Uint8ArrayConstructor, Uint8, uint8_array_constructor);
typed_array_constructor_builtin!(
    Uint8ClampedArrayConstructor,
    Uint8Clamped,
    uint8_clamped_array_constructor
);
typed_array_constructor_builtin!(Int16ArrayConstructor, Int16, int16_array_constructor);
typed_array_constructor_builtin!(Uint16ArrayConstructor, Uint16, uint16_array_constructor);
typed_array_constructor_builtin!(Int32ArrayConstructor, Int32, int32_array_constructor);
typed_array_constructor_builtin!(Uint32ArrayConstructor, Uint32, uint32_array_constructor);
typed_array_constructor_builtin!(BigInt64ArrayConstructor, BigInt64, big_int64_array_constructor);
typed_array_constructor_builtin!(
    BigUint64ArrayConstructor,
    BigUint64,
    big_uint64_array_constructor
);
typed_array_constructor_builtin!(Float32ArrayConstructor, Float32, float32_array_constructor);
typed_array_constructor_builtin!(Float64ArrayConstructor, Float64, float64_array_constructor);

struct TypedArrayFrom;
impl Builtin for TypedArrayFrom {
    const NAME: &'static str = "from";

    const LENGTH: u8 = 1;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayConstructors::from);
}

struct TypedArrayOf;
impl Builtin for TypedArrayOf {
    const NAME: &'static str = "of";

    const LENGTH: u8 = 0;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayConstructors::of);
}

struct TypedArrayBytesPerElement;
impl Builtin for TypedArrayBytesPerElement {
    const NAME: &'static str = "BYTES_PER_ELEMENT";

    const LENGTH: u8 = 0;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayConstructors::bytes_per_element);
}

impl TypedArrayConstructors {
    /// ### [23.2.2.1 %TypedArray%.from ( source \[ , mapper \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.from)
    fn from(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let source = arguments.get(0);
        let mapper = arguments.get(1);
        let this_arg = arguments.get(2);
        // 1. Let C be the this value.
        // 2. If IsConstructor(C) is false, throw a TypeError exception.
        let c = require_constructor(agent, &this_value)?;
        // 3. If mapper is undefined, then
        //   a. Let mapping be false.
        // 4. Else,
        //   a. If IsCallable(mapper) is false, throw a TypeError exception.
        //   b. Let mapping be true.
        let mapping = if mapper.is_undefined() {
            None
        } else if is_callable(&mapper) {
            Some(mapper)
        } else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "The mapper is not a function",
            ));
        };
        // 5. Let usingIterator be ? GetMethod(source, %Symbol.iterator%).
        // 6. If usingIterator is not undefined, then
        if let Some(values) = iterable_to_list(agent, &source)? {
            // a. Let values be ? IteratorToList(? GetIteratorFromMethod(source, usingIterator)).
            // b. Let len be the number of elements in values.
            let len = values.len();
            // c. Let targetObj be ? TypedArrayCreateFromConstructor(C, « 𝔽(len) »).
            let target_obj =
                typed_array_create_from_constructor(agent, c, &[Value::Number(len as f64)])?;
            // d. Let k be 0.
            // e. Repeat, while k < len,
            for (k, k_value) in values.into_iter().enumerate() {
                // i. Let Pk be ! ToString(𝔽(k)).
                // ii. Let kValue be the first element of values.
                // iii. Remove the first element from values.
                // iv. If mapping is true, then
                //   1. Let mappedValue be ? Call(mapper, thisArg, « kValue, 𝔽(k) »).
                // v. Else,
                //   1. Let mappedValue be kValue.
                let mapped_value = match &mapping {
                    Some(mapper) => call_function(
                        agent,
                        mapper.clone(),
                        this_arg.clone(),
                        &[k_value, Value::Number(k as f64)],
                    )?,
                    None => k_value,
                };
                // vi. Perform ? Set(targetObj, Pk, mappedValue, true).
                typed_array_set_element(agent, target_obj, k as f64, mapped_value)?;
                // vii. Set k to k + 1.
            }
            // f. Assert: values is now an empty List.
            // g. Return targetObj.
            return Ok(target_obj.into());
        }
        // 7. NOTE: source is not an iterable object, so assume it is already
        //    an array-like object.
        // 8. Let arrayLike be ! ToObject(source).
        if source.is_undefined() || source.is_null() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot convert undefined or null to object",
            ));
        }
        // 9. Let len be ? LengthOfArrayLike(arrayLike).
        let len = length_of_array_like(agent, &source)?;
        // 10. Let targetObj be ? TypedArrayCreateFromConstructor(C, « 𝔽(len) »).
        let target_obj =
            typed_array_create_from_constructor(agent, c, &[Value::Number(len as f64)])?;
        // 11. Let k be 0.
        // 12. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ? Get(arrayLike, Pk).
            let k_value = get_index(agent, &source, k)?;
            // c. If mapping is true, then
            //   i. Let mappedValue be ? Call(mapper, thisArg, « kValue, 𝔽(k) »).
            // d. Else,
            //   i. Let mappedValue be kValue.
            let mapped_value = match &mapping {
                Some(mapper) => call_function(
                    agent,
                    mapper.clone(),
                    this_arg.clone(),
                    &[k_value, Value::Number(k as f64)],
                )?,
                None => k_value,
            };
            // e. Perform ? Set(targetObj, Pk, mappedValue, true).
            typed_array_set_element(agent, target_obj, k as f64, mapped_value)?;
            // f. Set k to k + 1.
        }
        // 13. Return targetObj.
        Ok(target_obj.into())
    }

    /// ### [23.2.2.2 %TypedArray%.of ( ...items )](https://tc39.es/ecma262/#sec-%typedarray%.of)
    fn of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let len be the number of elements in items.
        let len = arguments.len();
        // 2. Let C be the this value.
        // 3. If IsConstructor(C) is false, throw a TypeError exception.
        let c = require_constructor(agent, &this_value)?;
        // 4. Let newObj be ? TypedArrayCreateFromConstructor(C, « 𝔽(len) »).
        let new_obj = typed_array_create_from_constructor(agent, c, &[Value::Number(len as f64)])?;
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for (k, k_value) in arguments.iter().enumerate() {
            // a. Let kValue be items[k].
            // b. Let Pk be ! ToString(𝔽(k)).
            // c. Perform ? Set(newObj, Pk, kValue, true).
            typed_array_set_element(agent, new_obj, k as f64, k_value.clone())?;
            // d. Set k to k + 1.
        }
        // 7. Return newObj.
        Ok(new_obj.into())
    }

    /// ### [23.2.6.1 TypedArray.BYTES_PER_ELEMENT](https://tc39.es/ecma262/#sec-typedarray.bytes_per_element)
    fn bytes_per_element(
        agent: &mut Agent,
        this_value: Value,
        _: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Function(f) = this_value else {
            return Ok(Value::Undefined);
        };
        Ok(agent
            .intrinsics
            .typed_array_constructor_element_type(f)
            .map_or(Value::Undefined, |element_type| {
                Value::Number(element_type.element_size() as f64)
            }))
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table
            .register::<TypedArrayFrom>()
            .register::<TypedArrayOf>()
            .register::<TypedArrayBytesPerElement>();
    }
}

fn require_constructor(agent: &mut Agent, c: &Value) -> JsResult<Function> {
    match c {
        Value::Function(f) => Ok(*f),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "this is not a constructor",
        )),
    }
}

/// Collects the values produced by iterating `source`, or returns `None` if
/// `source` is not iterable.
fn iterable_to_list(agent: &mut Agent, source: &Value) -> JsResult<Option<Vec<Value>>> {
    match source {
        Value::Array(array) => Ok(Some(array.as_slice(agent).to_vec())),
        Value::TypedArray(_) => {
            let ta_record = validate_typed_array(agent, source)?;
            Ok(Some(
                ta_record
                    .object
                    .to_vec(agent)?
                    .into_iter()
                    .map(Value::from)
                    .collect(),
            ))
        }
        Value::ArrayIterator(iterator) => {
            let mut values = Vec::new();
            while let Some(value) = iterator.next(agent)? {
                values.push(value);
            }
            Ok(Some(values))
        }
        _ => Ok(None),
    }
}

/// ### [23.2.5.1 TypedArray ( ...args )](https://tc39.es/ecma262/#sec-typedarray)
///
/// Runs the intrinsic constructor of `element_type` with `args`.
pub(crate) fn typed_array_constructor(
    agent: &mut Agent,
    element_type: ElementType,
    args: &[Value],
) -> JsResult<TypedArray> {
    let arguments = ArgumentsList::from(args);
    // 4. Let numberOfArgs be the number of elements in args.
    // 5. If numberOfArgs = 0, then
    if arguments.is_empty() {
        // a. Return ? AllocateTypedArray(constructorName, NewTarget, proto, 0).
        return allocate_typed_array(agent, element_type, 0);
    }
    // 6. Else,
    //   a. Let firstArgument be args[0].
    let first_argument = arguments.get(0);
    match &first_argument {
        // b. If firstArgument is an Object, then
        //   ii. If firstArgument has a [[TypedArrayName]] internal slot, then
        //     1. Perform ? InitializeTypedArrayFromTypedArray(O, firstArgument).
        Value::TypedArray(src_array) => {
            initialize_typed_array_from_typed_array(agent, element_type, *src_array)
        }
        //   iii. Else if firstArgument has an [[ArrayBufferData]] internal slot, then
        //     1. If numberOfArgs > 1, let byteOffset be args[1]; else let byteOffset be undefined.
        //     2. If numberOfArgs > 2, let length be args[2]; else let length be undefined.
        //     3. Perform ? InitializeTypedArrayFromArrayBuffer(O, firstArgument, byteOffset, length).
        Value::ArrayBuffer(buffer) => initialize_typed_array_from_array_buffer(
            agent,
            element_type,
            *buffer,
            arguments.get(1),
            arguments.get(2),
        ),
        //   iv. Else,
        //     1. Assert: firstArgument is an Object and firstArgument does not
        //        have either a [[TypedArrayName]] or an [[ArrayBufferData]]
        //        internal slot.
        //     2. Let usingIterator be ? GetMethod(firstArgument, %Symbol.iterator%).
        //     3. If usingIterator is not undefined, then
        //       a. Let values be ? IteratorToList(? GetIteratorFromMethod(firstArgument, usingIterator)).
        //       b. Perform ? InitializeTypedArrayFromList(O, values).
        //     4. Else,
        //       a. NOTE: firstArgument is not an Iterable so assume it is
        //          already an array-like object.
        //       b. Perform ? InitializeTypedArrayFromArrayLike(O, firstArgument).
        object if object.is_object() => match iterable_to_list(agent, object)? {
            Some(values) => initialize_typed_array_from_list(agent, element_type, &values),
            None => initialize_typed_array_from_array_like(agent, element_type, object),
        },
        // c. Else,
        //   i. Assert: firstArgument is not an Object.
        //   ii. Let elementLength be ? ToIndex(firstArgument).
        //   iii. Return ? AllocateTypedArray(constructorName, NewTarget, proto, elementLength).
        _ => {
            let element_length = to_index(agent, first_argument.clone())?;
            allocate_typed_array(agent, element_type, element_length as usize)
        }
    }
}
