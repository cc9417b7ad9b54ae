// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{get_index, length_of_array_like},
            type_conversion::to_index,
        },
        builtins::{
            array_buffer::{
                ArrayBuffer, allocate_array_buffer, array_buffer_byte_length, clone_array_buffer,
                get_value_from_buffer, is_detached_buffer, set_value_in_buffer,
                throw_detached_error,
            },
            indexed_collections::typed_array_objects::typed_array_constructors::typed_array_constructor,
            typed_array::{TypedArray, bulk_operations, data::TypedArrayHeapData},
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{ElementType, Function, Numeric, Value, Viewable, with_element_type},
    },
    heap::CreateHeapData,
};

/// ### [10.4.5.8 TypedArray With Buffer Witness Records](https://tc39.es/ecma262/#sec-typedarray-with-buffer-witness-records)
///
/// A snapshot of a TypedArray together with the byte length of its buffer
/// at the time the record was made. `None` means the buffer was detached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TypedArrayWithBufferWitnessRecord {
    pub object: TypedArray,
    pub cached_buffer_byte_length: Option<usize>,
}

impl TypedArrayWithBufferWitnessRecord {
    pub(crate) fn is_typed_array_out_of_bounds(&self, agent: &Agent) -> bool {
        is_typed_array_out_of_bounds(agent, self)
    }

    pub(crate) fn typed_array_length(&self, agent: &Agent) -> usize {
        typed_array_length(agent, self)
    }
}

/// ### [10.4.5.9 MakeTypedArrayWithBufferWitnessRecord ( obj, order )](https://tc39.es/ecma262/#sec-maketypedarraywithbufferwitnessrecord)
///
/// The abstract operation MakeTypedArrayWithBufferWitnessRecord takes
/// argument obj (a TypedArray) and returns a TypedArray With Buffer Witness
/// Record.
pub(crate) fn make_typed_array_with_buffer_witness_record(
    agent: &Agent,
    obj: TypedArray,
) -> TypedArrayWithBufferWitnessRecord {
    // 1. Let buffer be obj.[[ViewedArrayBuffer]].
    let buffer = agent[obj].viewed_array_buffer;
    // 2. If IsDetachedBuffer(buffer) is true, then
    let byte_length = if is_detached_buffer(agent, buffer) {
        // a. Let byteLength be detached.
        None
    } else {
        // 3. Else,
        // a. Let byteLength be ArrayBufferByteLength(buffer, order).
        Some(array_buffer_byte_length(agent, buffer))
    };
    // 4. Return the TypedArray With Buffer Witness Record { [[Object]]: obj, [[CachedBufferByteLength]]: byteLength }.
    TypedArrayWithBufferWitnessRecord {
        object: obj,
        cached_buffer_byte_length: byte_length,
    }
}

/// ### [10.4.5.12 TypedArrayLength ( taRecord )](https://tc39.es/ecma262/#sec-typedarraylength)
///
/// The abstract operation TypedArrayLength takes argument taRecord (a
/// TypedArray With Buffer Witness Record) and returns a non-negative
/// integer.
pub(crate) fn typed_array_length(agent: &Agent, ta_record: &TypedArrayWithBufferWitnessRecord) -> usize {
    // 1. Assert: IsTypedArrayOutOfBounds(taRecord) is false.
    debug_assert!(!is_typed_array_out_of_bounds(agent, ta_record));
    // 2. Let O be taRecord.[[Object]].
    // 3. If O.[[ArrayLength]] is not auto, return O.[[ArrayLength]].
    agent[ta_record.object].array_length
}

/// ### [10.4.5.13 IsTypedArrayOutOfBounds ( taRecord )](https://tc39.es/ecma262/#sec-istypedarrayoutofbounds)
///
/// The abstract operation IsTypedArrayOutOfBounds takes argument taRecord
/// (a TypedArray With Buffer Witness Record) and returns a Boolean. It
/// checks if any of the object's numeric properties reference a value at an
/// index not contained within the underlying buffer's bounds.
pub(crate) fn is_typed_array_out_of_bounds(
    agent: &Agent,
    ta_record: &TypedArrayWithBufferWitnessRecord,
) -> bool {
    // 1. Let O be taRecord.[[Object]].
    // 2. Let bufferByteLength be taRecord.[[CachedBufferByteLength]].
    // 3. Assert: IsDetachedBuffer(O.[[ViewedArrayBuffer]]) is true if and
    //    only if bufferByteLength is detached.
    // 4. If bufferByteLength is detached, return true.
    let Some(buffer_byte_length) = ta_record.cached_buffer_byte_length else {
        return true;
    };
    let o = &agent[ta_record.object];
    // 5. Let byteOffsetStart be O.[[ByteOffset]].
    let byte_offset_start = o.byte_offset;
    // 6. If O.[[ArrayLength]] is auto, then
    // 7. Else,
    //   a. Let elementSize be TypedArrayElementSize(O).
    //   b. Let byteOffsetEnd be byteOffsetStart + O.[[ArrayLength]] × elementSize.
    let byte_offset_end = byte_offset_start + o.byte_length;
    // 8. If byteOffsetStart > bufferByteLength or byteOffsetEnd >
    //    bufferByteLength, return true.
    // 9. NOTE: 0-length TypedArrays are not considered out-of-bounds.
    // 10. Return false.
    byte_offset_start > buffer_byte_length || byte_offset_end > buffer_byte_length
}

/// Throws a TypeError unless `o` is a TypedArray.
pub(crate) fn require_internal_slot_typed_array(
    agent: &mut Agent,
    o: &Value,
) -> JsResult<TypedArray> {
    match o {
        Value::TypedArray(ta) => Ok(*ta),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Expected this to be TypedArray",
        )),
    }
}

/// ### [23.2.4.4 ValidateTypedArray ( O, order )](https://tc39.es/ecma262/#sec-validatetypedarray)
///
/// The abstract operation ValidateTypedArray takes argument O (an
/// ECMAScript language value) and returns either a normal completion
/// containing a TypedArray With Buffer Witness Record or a throw
/// completion.
pub(crate) fn validate_typed_array(
    agent: &mut Agent,
    o: &Value,
) -> JsResult<TypedArrayWithBufferWitnessRecord> {
    // 1. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
    let o = require_internal_slot_typed_array(agent, o)?;
    // 2. Assert: O has a [[ViewedArrayBuffer]] internal slot.
    // 3. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, order).
    let ta_record = make_typed_array_with_buffer_witness_record(agent, o);
    // 4. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
    if ta_record.is_typed_array_out_of_bounds(agent) {
        return Err(throw_detached_error(agent));
    }
    // 5. Return taRecord.
    Ok(ta_record)
}

/// Throws a TypeError if the buffer viewed by `o` has been detached since
/// validation. Used after every call into user code.
pub(crate) fn revalidate_typed_array(agent: &mut Agent, o: TypedArray) -> JsResult<usize> {
    let ta_record = make_typed_array_with_buffer_witness_record(agent, o);
    if ta_record.is_typed_array_out_of_bounds(agent) {
        return Err(throw_detached_error(agent));
    }
    Ok(ta_record.typed_array_length(agent))
}

/// ### [23.2.5.1.1 AllocateTypedArray ( constructorName, newTarget, defaultProto \[ , length \] )](https://tc39.es/ecma262/#sec-allocatetypedarray)
///
/// The abstract operation AllocateTypedArray takes arguments
/// constructorName and length (a non-negative integer) and returns either a
/// normal completion containing a TypedArray or a throw completion. An
/// ArrayBuffer of the needed byte length is allocated and associated with
/// the new TypedArray instance.
pub(crate) fn allocate_typed_array(
    agent: &mut Agent,
    element_type: ElementType,
    length: usize,
) -> JsResult<TypedArray> {
    // 6. If length is not present, then
    //   a. Set obj.[[ByteLength]] to 0.
    //   b. Set obj.[[ByteOffset]] to 0.
    //   c. Set obj.[[ArrayLength]] to 0.
    // 7. Else,
    //   a. Perform ? AllocateTypedArrayBuffer(obj, length).
    let buffer = allocate_typed_array_buffer(agent, element_type, length)?;
    // 8. Return obj.
    Ok(agent
        .heap
        .create(TypedArrayHeapData::new(buffer, element_type, 0, length)))
}

/// ### [23.2.5.1.6 AllocateTypedArrayBuffer ( O, length )](https://tc39.es/ecma262/#sec-allocatetypedarraybuffer)
///
/// The abstract operation AllocateTypedArrayBuffer takes arguments O (a
/// TypedArray) and length (a non-negative integer) and returns either a
/// normal completion containing an ArrayBuffer or a throw completion. It
/// allocates and associates an ArrayBuffer with O.
pub(crate) fn allocate_typed_array_buffer(
    agent: &mut Agent,
    element_type: ElementType,
    length: usize,
) -> JsResult<ArrayBuffer> {
    // 2. Let elementSize be TypedArrayElementSize(O).
    let element_size = element_type.element_size();
    // 3. Let byteLength be elementSize × length.
    let Some(byte_length) = length.checked_mul(element_size) else {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            format!("Invalid typed array length: {length}"),
        ));
    };
    // 4. Let data be ? AllocateArrayBuffer(%ArrayBuffer%, byteLength).
    allocate_array_buffer(agent, byte_length as u64)
}

/// ### [23.2.5.1.2 InitializeTypedArrayFromTypedArray ( O, srcArray )](https://tc39.es/ecma262/#sec-initializetypedarrayfromtypedarray)
///
/// The abstract operation InitializeTypedArrayFromTypedArray takes
/// arguments O (a TypedArray) and srcArray (a TypedArray) and returns
/// either a normal completion containing unused or a throw completion.
pub(crate) fn initialize_typed_array_from_typed_array(
    agent: &mut Agent,
    element_type: ElementType,
    src_array: TypedArray,
) -> JsResult<TypedArray> {
    // 1. Let srcData be srcArray.[[ViewedArrayBuffer]].
    let src_data = agent[src_array].viewed_array_buffer;
    // 2. Let elementType be TypedArrayElementType(O).
    // 3. Let elementSize be TypedArrayElementSize(O).
    let element_size = element_type.element_size();
    // 4. Let srcType be TypedArrayElementType(srcArray).
    let src_type = agent[src_array].element_type;
    // 6. Let srcByteOffset be srcArray.[[ByteOffset]].
    let src_byte_offset = agent[src_array].byte_offset;
    // 7. Let srcRecord be MakeTypedArrayWithBufferWitnessRecord(srcArray, seq-cst).
    let src_record = make_typed_array_with_buffer_witness_record(agent, src_array);
    // 8. If IsTypedArrayOutOfBounds(srcRecord) is true, throw a TypeError exception.
    if src_record.is_typed_array_out_of_bounds(agent) {
        return Err(throw_detached_error(agent));
    }
    // 9. Let elementLength be TypedArrayLength(srcRecord).
    let element_length = src_record.typed_array_length(agent);
    // 10. Let byteLength be elementSize × elementLength.
    let byte_length = element_size * element_length;
    // 11. If elementType is srcType, then
    let data = if element_type == src_type {
        // a. Let data be ? CloneArrayBuffer(srcData, srcByteOffset, byteLength).
        clone_array_buffer(agent, src_data, src_byte_offset, byte_length)?
    } else {
        // 12. Else,
        // b. If srcArray.[[ContentType]] is not O.[[ContentType]], throw a TypeError exception.
        if !src_type.is_compatible_with(element_type) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot mix BigInt and other types, use explicit conversions",
            ));
        }
        // a. Let data be ? AllocateArrayBuffer(%ArrayBuffer%, byteLength).
        allocate_array_buffer(agent, byte_length as u64)?
    };
    // 13. Set O.[[ViewedArrayBuffer]] to data.
    // 14. Set O.[[ByteLength]] to byteLength.
    // 15. Set O.[[ByteOffset]] to 0.
    // 16. Set O.[[ArrayLength]] to elementLength.
    let o = agent.heap.create(TypedArrayHeapData::new(
        data,
        element_type,
        0,
        element_length,
    ));
    if element_type != src_type {
        // 12.c-g. Repeat, while targetByteIndex < limit, convert each
        //         element of srcArray into elementType.
        bulk_operations::copy_elements(agent, src_array, 0, o, 0, element_length);
    }
    // 17. Return unused.
    Ok(o)
}

/// ### [23.2.5.1.3 InitializeTypedArrayFromArrayBuffer ( O, buffer, byteOffset, length )](https://tc39.es/ecma262/#sec-initializetypedarrayfromarraybuffer)
///
/// The abstract operation InitializeTypedArrayFromArrayBuffer takes
/// arguments O (a TypedArray), buffer (an ArrayBuffer), byteOffset (an
/// ECMAScript language value), and length (an ECMAScript language value)
/// and returns either a normal completion containing unused or a throw
/// completion.
pub(crate) fn initialize_typed_array_from_array_buffer(
    agent: &mut Agent,
    element_type: ElementType,
    buffer: ArrayBuffer,
    byte_offset: Value,
    length: Value,
) -> JsResult<TypedArray> {
    // 1. Let elementSize be TypedArrayElementSize(O).
    let element_size = element_type.element_size();
    // 2. Let offset be ? ToIndex(byteOffset).
    let offset = to_index(agent, byte_offset)? as usize;
    // 3. If offset modulo elementSize ≠ 0, throw a RangeError exception.
    if offset % element_size != 0 {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            format!(
                "Start offset of {} should be a multiple of {element_size}",
                element_type.constructor_name()
            ),
        ));
    }
    // 5. If length is not undefined, then
    //   a. Let newLength be ? ToIndex(length).
    let new_length = if length.is_undefined() {
        None
    } else {
        Some(to_index(agent, length)? as usize)
    };
    // 6. If IsDetachedBuffer(buffer) is true, throw a TypeError exception.
    if is_detached_buffer(agent, buffer) {
        return Err(throw_detached_error(agent));
    }
    // 7. Let bufferByteLength be ArrayBufferByteLength(buffer, seq-cst).
    let buffer_byte_length = array_buffer_byte_length(agent, buffer);
    // 9. Else,
    let new_byte_length = if let Some(new_length) = new_length {
        // b. Else,
        //   i. Let newByteLength be newLength × elementSize.
        //   ii. If offset + newByteLength > bufferByteLength, throw a RangeError exception.
        match new_length
            .checked_mul(element_size)
            .filter(|new_byte_length| offset.saturating_add(*new_byte_length) <= buffer_byte_length)
        {
            Some(new_byte_length) => new_byte_length,
            None => {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    format!("Invalid typed array length: {new_length}"),
                ));
            }
        }
    } else {
        // a. If length is undefined, then
        //   i. If bufferByteLength modulo elementSize ≠ 0, throw a RangeError exception.
        if buffer_byte_length % element_size != 0 {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!(
                    "Byte length of {} should be a multiple of {element_size}",
                    element_type.constructor_name()
                ),
            ));
        }
        //   ii. Let newByteLength be bufferByteLength - offset.
        //   iii. If newByteLength < 0, throw a RangeError exception.
        let Some(new_byte_length) = buffer_byte_length.checked_sub(offset) else {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!("Start offset {offset} is outside the bounds of the buffer"),
            ));
        };
        new_byte_length
    };
    // 9.c. Set O.[[ByteLength]] to newByteLength.
    // 9.d. Set O.[[ArrayLength]] to newByteLength / elementSize.
    // 10. Set O.[[ViewedArrayBuffer]] to buffer.
    // 11. Set O.[[ByteOffset]] to offset.
    // 12. Return unused.
    Ok(agent.heap.create(TypedArrayHeapData::new(
        buffer,
        element_type,
        offset,
        new_byte_length / element_size,
    )))
}

/// ### [23.2.5.1.4 InitializeTypedArrayFromList ( O, values )](https://tc39.es/ecma262/#sec-initializetypedarrayfromlist)
///
/// The abstract operation InitializeTypedArrayFromList takes arguments O (a
/// TypedArray) and values (a List of ECMAScript language values) and
/// returns either a normal completion containing unused or a throw
/// completion.
pub(crate) fn initialize_typed_array_from_list(
    agent: &mut Agent,
    element_type: ElementType,
    values: &[Value],
) -> JsResult<TypedArray> {
    // 1. Let len be the number of elements in values.
    let len = values.len();
    // 2. Perform ? AllocateTypedArrayBuffer(O, len).
    let o = allocate_typed_array(agent, element_type, len)?;
    // 3. Let k be 0.
    // 4. Repeat, while k < len,
    for (k, k_value) in values.iter().enumerate() {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let kValue be the first element of values.
        // c. Remove the first element from values.
        // d. Perform ? Set(O, Pk, kValue, true).
        typed_array_set_element(agent, o, k as f64, k_value.clone())?;
        // e. Set k to k + 1.
    }
    // 5. Assert: values is now an empty List.
    // 6. Return unused.
    Ok(o)
}

/// ### [23.2.5.1.5 InitializeTypedArrayFromArrayLike ( O, arrayLike )](https://tc39.es/ecma262/#sec-initializetypedarrayfromarraylike)
///
/// The abstract operation InitializeTypedArrayFromArrayLike takes arguments
/// O (a TypedArray) and arrayLike (an Object, but not a TypedArray or an
/// ArrayBuffer) and returns either a normal completion containing unused or
/// a throw completion.
pub(crate) fn initialize_typed_array_from_array_like(
    agent: &mut Agent,
    element_type: ElementType,
    array_like: &Value,
) -> JsResult<TypedArray> {
    // 1. Let len be ? LengthOfArrayLike(arrayLike).
    let len = length_of_array_like(agent, array_like)? as usize;
    // 2. Perform ? AllocateTypedArrayBuffer(O, len).
    let o = allocate_typed_array(agent, element_type, len)?;
    // 3. Let k be 0.
    // 4. Repeat, while k < len,
    for k in 0..len {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let kValue be ? Get(arrayLike, Pk).
        let k_value = get_index(agent, array_like, k as u64)?;
        // c. Perform ? Set(O, Pk, kValue, true).
        typed_array_set_element(agent, o, k as f64, k_value)?;
        // d. Set k to k + 1.
    }
    // 5. Return unused.
    Ok(o)
}

/// ### [23.2.4.2 TypedArrayCreateFromConstructor ( constructor, argumentList )](https://tc39.es/ecma262/#sec-typedarraycreatefromconstructor)
///
/// The abstract operation TypedArrayCreateFromConstructor takes arguments
/// constructor (a constructor) and argumentList (a List of ECMAScript
/// language values) and returns either a normal completion containing a
/// TypedArray or a throw completion. It is used to specify the creation of
/// a new TypedArray using a constructor function.
pub(crate) fn typed_array_create_from_constructor(
    agent: &mut Agent,
    constructor: Function,
    argument_list: &[Value],
) -> JsResult<TypedArray> {
    // 1. Let newTypedArray be ? Construct(constructor, argumentList).
    let new_typed_array = constructor.construct(agent, argument_list)?;
    // 2. Let taRecord be ? ValidateTypedArray(newTypedArray, seq-cst).
    let ta_record = validate_typed_array(agent, &new_typed_array)?;
    // 3. If the number of elements in argumentList is 1 and argumentList[0] is a Number, then
    if let [Value::Number(requested)] = argument_list {
        // a. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
        // b. Let length be TypedArrayLength(taRecord).
        let length = ta_record.typed_array_length(agent);
        // c. If length < ℝ(argumentList[0]), throw a TypeError exception.
        if (length as f64) < *requested {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "TypedArray species constructor returned a TypedArray that is too short",
            ));
        }
    }
    // 4. Return newTypedArray.
    Ok(ta_record.object)
}

/// ### [23.2.4.1 TypedArraySpeciesCreate ( exemplar, argumentList )](https://tc39.es/ecma262/#typedarray-species-create)
///
/// The abstract operation TypedArraySpeciesCreate takes arguments exemplar
/// (a TypedArray) and argumentList (a List of ECMAScript language values)
/// and returns either a normal completion containing a TypedArray or a
/// throw completion. It is used to specify the creation of a new TypedArray
/// using a constructor function that is derived from exemplar.
pub(crate) fn typed_array_species_create(
    agent: &mut Agent,
    exemplar: TypedArray,
    argument_list: &[Value],
) -> JsResult<TypedArray> {
    // 1. Let defaultConstructor be the intrinsic object associated with the
    //    constructor name exemplar.[[TypedArrayName]] in Table 71.
    let element_type = agent[exemplar].element_type;
    // 2. Let constructor be ? SpeciesConstructor(exemplar, defaultConstructor).
    let host_hooks = agent.host_hooks;
    let constructor = host_hooks.resolve_typed_array_species_constructor(agent, exemplar)?;
    let Some(constructor) = constructor else {
        return typed_array_constructor(agent, element_type, argument_list);
    };
    tracing::debug!(
        constructor = constructor.name(agent),
        ?element_type,
        "resolved TypedArray species constructor"
    );
    // 3. Let result be ? TypedArrayCreateFromConstructor(constructor, argumentList).
    let result = typed_array_create_from_constructor(agent, constructor, argument_list)?;
    // 4. Assert: result has [[TypedArrayName]] and [[ContentType]] internal slots.
    // 5. If result.[[ContentType]] is not exemplar.[[ContentType]], throw a TypeError exception.
    if agent[result].element_type.content_type() != element_type.content_type() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "TypedArray species constructor returned a TypedArray of a different content type",
        ));
    }
    // 6. Return result.
    Ok(result)
}

/// TypedArraySpeciesCreate with a single length argument.
pub(crate) fn typed_array_species_create_with_length(
    agent: &mut Agent,
    exemplar: TypedArray,
    length: usize,
) -> JsResult<TypedArray> {
    typed_array_species_create(agent, exemplar, &[Value::Number(length as f64)])
}

/// ### [23.2.4.3 TypedArrayCreateSameType ( exemplar, argumentList )](https://tc39.es/ecma262/#sec-typedarray-create-same-type)
///
/// The abstract operation TypedArrayCreateSameType takes arguments exemplar
/// (a TypedArray) and length and returns either a normal completion
/// containing a TypedArray or a throw completion. It is used to specify the
/// creation of a new TypedArray using a constructor function that is
/// derived from exemplar. Unlike TypedArraySpeciesCreate, which can
/// construct custom TypedArray subclasses through the use of
/// %Symbol.species%, this operation always uses one of the built-in
/// TypedArray constructors.
pub(crate) fn typed_array_create_same_type(
    agent: &mut Agent,
    exemplar: TypedArray,
    length: usize,
) -> JsResult<TypedArray> {
    // 1. Let constructor be the intrinsic object associated with the
    //    constructor name exemplar.[[TypedArrayName]] in Table 71.
    let element_type = agent[exemplar].element_type;
    // 2. Let result be ? TypedArrayCreateFromConstructor(constructor, argumentList).
    // 3. Return result.
    allocate_typed_array(agent, element_type, length)
}

/// Reads the element at `index` of an attached TypedArray.
pub(crate) fn read_typed_array_element(agent: &Agent, o: TypedArray, index: usize) -> Numeric {
    let TypedArrayHeapData {
        viewed_array_buffer,
        element_type,
        byte_offset,
        ..
    } = agent[o];
    debug_assert!(index < agent[o].array_length);
    // Let elementSize be TypedArrayElementSize(O).
    // Let byteIndexInBuffer be (index × elementSize) + offset.
    // Return GetValueFromBuffer(O.[[ViewedArrayBuffer]], byteIndexInBuffer, elementType, true, unordered).
    with_element_type!(element_type, T, {
        let byte_index = index * T::BYTES + byte_offset;
        get_value_from_buffer::<T>(agent, viewed_array_buffer, byte_index, None).into_numeric()
    })
}

/// Writes `value` at `index` of an attached TypedArray.
pub(crate) fn write_typed_array_element(
    agent: &mut Agent,
    o: TypedArray,
    index: usize,
    value: &Numeric,
) {
    let TypedArrayHeapData {
        viewed_array_buffer,
        element_type,
        byte_offset,
        ..
    } = agent[o];
    debug_assert!(index < agent[o].array_length);
    with_element_type!(element_type, T, {
        let byte_index = index * T::BYTES + byte_offset;
        set_value_in_buffer::<T>(
            agent,
            viewed_array_buffer,
            byte_index,
            T::from_numeric(value),
            None,
        )
    })
}

/// ### [10.4.5.14 IsValidIntegerIndex ( O, index )](https://tc39.es/ecma262/#sec-isvalidintegerindex)
///
/// The abstract operation IsValidIntegerIndex takes arguments O (a
/// TypedArray) and index (a Number) and returns a Boolean.
pub(crate) fn is_valid_integer_index(agent: &Agent, o: TypedArray, index: f64) -> Option<usize> {
    // 1. If IsDetachedBuffer(O.[[ViewedArrayBuffer]]) is true, return false.
    if is_detached_buffer(agent, agent[o].viewed_array_buffer) {
        return None;
    }
    // 2. If IsIntegralNumber(index) is false, return false.
    if !index.is_finite() || index.trunc() != index {
        return None;
    }
    // 3. If index is -0𝔽, return false.
    if index == 0.0 && index.is_sign_negative() {
        return None;
    }
    // 4. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, unordered).
    // 5. NOTE: Bounds checking is not a synchronizing operation when O's
    //    backing buffer is a growable SharedArrayBuffer.
    // 6. If IsTypedArrayOutOfBounds(taRecord) is true, return false.
    // 7. Let length be TypedArrayLength(taRecord).
    let length = agent[o].array_length;
    // 8. If ℝ(index) < 0 or ℝ(index) ≥ length, return false.
    if index < 0.0 || index >= length as f64 {
        return None;
    }
    // 9. Return true.
    Some(index as usize)
}

/// ### [10.4.5.15 TypedArrayGetElement ( O, index )](https://tc39.es/ecma262/#sec-typedarraygetelement)
///
/// The abstract operation TypedArrayGetElement takes arguments O (a
/// TypedArray) and index (a Number) and returns a Number, a BigInt, or
/// undefined.
pub(crate) fn typed_array_get_element(agent: &Agent, o: TypedArray, index: f64) -> Option<Numeric> {
    // 1. If IsValidIntegerIndex(O, index) is false, return undefined.
    let index = is_valid_integer_index(agent, o, index)?;
    // 2. Let offset be O.[[ByteOffset]].
    // 3. Let elementSize be TypedArrayElementSize(O).
    // 4. Let byteIndexInBuffer be (ℝ(index) × elementSize) + offset.
    // 5. Let elementType be TypedArrayElementType(O).
    // 6. Return GetValueFromBuffer(O.[[ViewedArrayBuffer]], byteIndexInBuffer, elementType, true, unordered).
    Some(read_typed_array_element(agent, o, index))
}

/// ### [10.4.5.16 TypedArraySetElement ( O, index, value )](https://tc39.es/ecma262/#sec-typedarraysetelement)
///
/// The abstract operation TypedArraySetElement takes arguments O (a
/// TypedArray), index (a Number), and value (an ECMAScript language value)
/// and returns either a normal completion containing unused or a throw
/// completion.
pub(crate) fn typed_array_set_element(
    agent: &mut Agent,
    o: TypedArray,
    index: f64,
    value: Value,
) -> JsResult<()> {
    // 1. If O.[[ContentType]] is bigint, let numValue be ? ToBigInt(value).
    // 2. Otherwise, let numValue be ? ToNumber(value).
    let num_value = agent[o].element_type.coerce(agent, value)?;
    // Coercion may run user code; a write into a detached buffer is an error.
    if is_detached_buffer(agent, agent[o].viewed_array_buffer) {
        return Err(throw_detached_error(agent));
    }
    // 3. If IsValidIntegerIndex(O, index) is true, then
    if let Some(index) = is_valid_integer_index(agent, o, index) {
        // a. Let offset be O.[[ByteOffset]].
        // b. Let elementSize be TypedArrayElementSize(O).
        // c. Let byteIndexInBuffer be (ℝ(index) × elementSize) + offset.
        // d. Let elementType be TypedArrayElementType(O).
        // e. Perform SetValueInBuffer(O.[[ViewedArrayBuffer]], byteIndexInBuffer, elementType, numValue, true, unordered).
        write_typed_array_element(agent, o, index, &num_value);
    }
    // 4. Return unused.
    Ok(())
}

/// ### [23.2.3.26.1 SetTypedArrayFromTypedArray ( target, targetOffset, source )](https://tc39.es/ecma262/#sec-settypedarrayfromtypedarray)
///
/// The abstract operation SetTypedArrayFromTypedArray takes arguments
/// target (a TypedArray), targetOffset (a non-negative integer or +∞), and
/// source (a TypedArray) and returns either a normal completion containing
/// unused or a throw completion. It sets multiple values in target,
/// starting at index targetOffset, reading the values from source.
pub(crate) fn set_typed_array_from_typed_array(
    agent: &mut Agent,
    target: TypedArray,
    target_offset: f64,
    source: TypedArray,
) -> JsResult<()> {
    // 1. Let targetBuffer be target.[[ViewedArrayBuffer]].
    // 2. Let targetRecord be MakeTypedArrayWithBufferWitnessRecord(target, seq-cst).
    let target_record = make_typed_array_with_buffer_witness_record(agent, target);
    // 3. If IsTypedArrayOutOfBounds(targetRecord) is true, throw a TypeError exception.
    if target_record.is_typed_array_out_of_bounds(agent) {
        return Err(throw_detached_error(agent));
    }
    // 4. Let targetLength be TypedArrayLength(targetRecord).
    let target_length = target_record.typed_array_length(agent);
    // 5. Let srcBuffer be source.[[ViewedArrayBuffer]].
    // 6. Let srcRecord be MakeTypedArrayWithBufferWitnessRecord(source, seq-cst).
    let src_record = make_typed_array_with_buffer_witness_record(agent, source);
    // 7. If IsTypedArrayOutOfBounds(srcRecord) is true, throw a TypeError exception.
    if src_record.is_typed_array_out_of_bounds(agent) {
        return Err(throw_detached_error(agent));
    }
    // 8. Let srcLength be TypedArrayLength(srcRecord).
    let src_length = src_record.typed_array_length(agent);
    // 9. Let targetType be TypedArrayElementType(target).
    let target_type = agent[target].element_type;
    // 12. Let srcType be TypedArrayElementType(source).
    let src_type = agent[source].element_type;
    // 16. If targetOffset = +∞, throw a RangeError exception.
    // 17. If srcLength + targetOffset > targetLength, throw a RangeError exception.
    if target_offset == f64::INFINITY || src_length as f64 + target_offset > target_length as f64 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Source is too large",
        ));
    }
    // 18. If target.[[ContentType]] is not source.[[ContentType]], throw a TypeError exception.
    if !target_type.is_compatible_with(src_type) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot mix BigInt and other types, use explicit conversions",
        ));
    }
    // 19. If IsSharedArrayBuffer(srcBuffer) is true, IsSharedArrayBuffer(targetBuffer) is
    //     true, and srcBuffer.[[ArrayBufferData]] is targetBuffer.[[ArrayBufferData]], let
    //     sameSharedArrayBuffer be true; otherwise, let sameSharedArrayBuffer be false.
    // 20. If SameValue(srcBuffer, targetBuffer) is true or sameSharedArrayBuffer is true, then
    //   a. Let srcByteLength be TypedArrayByteLength(srcRecord).
    //   b. Set srcBuffer to ? CloneArrayBuffer(srcBuffer, srcByteOffset, srcByteLength).
    //   c. Let srcByteIndex be 0.
    // 21. Else,
    //   a. Let srcByteIndex be srcByteOffset.
    // 22-25. Copy the elements, converting between types if they differ.
    bulk_operations::copy_elements(
        agent,
        source,
        0,
        target,
        target_offset as usize,
        src_length,
    );
    // 26. Return unused.
    Ok(())
}

/// ### [23.2.3.26.2 SetTypedArrayFromArrayLike ( target, targetOffset, source )](https://tc39.es/ecma262/#sec-settypedarrayfromarraylike)
///
/// The abstract operation SetTypedArrayFromArrayLike takes arguments target
/// (a TypedArray), targetOffset (a non-negative integer or +∞), and source
/// (an ECMAScript language value, but not a TypedArray) and returns either
/// a normal completion containing unused or a throw completion. It sets
/// multiple values in target, starting at index targetOffset, reading the
/// values from source.
///
/// Coercing an element may detach the target's buffer. The write that
/// observes the detached buffer throws a TypeError; elements written before
/// it stay written.
pub(crate) fn set_typed_array_from_array_like(
    agent: &mut Agent,
    target: TypedArray,
    target_offset: f64,
    source: &Value,
) -> JsResult<()> {
    // 1. Let targetRecord be MakeTypedArrayWithBufferWitnessRecord(target, seq-cst).
    // 2. If IsTypedArrayOutOfBounds(targetRecord) is true, throw a TypeError exception.
    // 3. Let targetLength be TypedArrayLength(targetRecord).
    let target_length = revalidate_typed_array(agent, target)?;
    // 4. Let src be ? ToObject(source).
    if source.is_undefined() || source.is_null() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to object",
        ));
    }
    // 5. Let srcLength be ? LengthOfArrayLike(src).
    let src_length = length_of_array_like(agent, source)? as usize;
    // 6. If targetOffset = +∞, throw a RangeError exception.
    // 7. If srcLength + targetOffset > targetLength, throw a RangeError exception.
    if target_offset == f64::INFINITY || src_length as f64 + target_offset > target_length as f64 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Source is too large",
        ));
    }
    let target_offset = target_offset as usize;
    let element_type = agent[target].element_type;
    // 8. Let k be 0.
    // 9. Repeat, while k < srcLength,
    for k in 0..src_length {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let value be ? Get(src, Pk).
        let value = get_index(agent, source, k as u64)?;
        // c. Let targetIndex be 𝔽(targetOffset + k).
        // d. Perform ? TypedArraySetElement(target, targetIndex, value).
        let value = element_type.coerce(agent, value)?;
        revalidate_typed_array(agent, target)?;
        write_typed_array_element(agent, target, target_offset + k, &value);
        // e. Set k to k + 1.
    }
    // 10. Return unused.
    Ok(())
}
