// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.2.3 Properties of the %TypedArray% Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-%typedarrayprototype%-object)

use core::cmp::Ordering;

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::require_callable,
        type_conversion::{relative_index, to_boolean, to_integer_or_infinity, to_number, to_string},
    },
    builtins::{
        ArgumentsList, Behaviour, Builtin, MethodTable,
        indexed_collections::{
            array_iterator_objects::array_iterator::{ArrayIterator, CollectionIteratorKind},
            typed_array_objects::abstract_operations::{
                is_valid_integer_index, make_typed_array_with_buffer_witness_record,
                require_internal_slot_typed_array, revalidate_typed_array,
                set_typed_array_from_array_like, set_typed_array_from_typed_array,
                typed_array_create_same_type, typed_array_set_element, typed_array_species_create,
                typed_array_species_create_with_length, validate_typed_array,
                write_typed_array_element,
            },
        },
        typed_array::{
            TypedArray,
            bulk_operations::{self, SearchDirection, SearchMode},
        },
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{Function, Numeric, Value},
};

pub(crate) struct TypedArrayPrototype;

macro_rules! prototype_builtin {
    ($name: ident, $key: literal, $length: literal, $function: ident) => {
        struct $name;
        impl Builtin for $name {
            const NAME: &'static str = $key;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::$function);
        }
    };
}

prototype_builtin!(TypedArrayPrototypeAt, "at", 1, at);
prototype_builtin!(TypedArrayPrototypeGetBuffer, "buffer", 0, get_buffer);
prototype_builtin!(TypedArrayPrototypeGetByteLength, "byteLength", 0, get_byte_length);
prototype_builtin!(TypedArrayPrototypeGetByteOffset, "byteOffset", 0, get_byte_offset);
prototype_builtin!(TypedArrayPrototypeBytesPerElement, "BYTES_PER_ELEMENT", 0, bytes_per_element);
prototype_builtin!(TypedArrayPrototypeCopyWithin, "copyWithin", 2, copy_within);
prototype_builtin!(TypedArrayPrototypeEntries, "entries", 0, entries);
prototype_builtin!(TypedArrayPrototypeEvery, "every", 1, every);
prototype_builtin!(TypedArrayPrototypeFill, "fill", 1, fill);
prototype_builtin!(TypedArrayPrototypeFilter, "filter", 1, filter);
prototype_builtin!(TypedArrayPrototypeFind, "find", 1, find);
prototype_builtin!(TypedArrayPrototypeFindIndex, "findIndex", 1, find_index);
prototype_builtin!(TypedArrayPrototypeFindLast, "findLast", 1, find_last);
prototype_builtin!(TypedArrayPrototypeFindLastIndex, "findLastIndex", 1, find_last_index);
prototype_builtin!(TypedArrayPrototypeForEach, "forEach", 1, for_each);
prototype_builtin!(TypedArrayPrototypeIncludes, "includes", 1, includes);
prototype_builtin!(TypedArrayPrototypeIndexOf, "indexOf", 1, index_of);
prototype_builtin!(TypedArrayPrototypeJoin, "join", 1, join);
prototype_builtin!(TypedArrayPrototypeKeys, "keys", 0, keys);
prototype_builtin!(TypedArrayPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of);
prototype_builtin!(TypedArrayPrototypeGetLength, "length", 0, get_length);
prototype_builtin!(TypedArrayPrototypeMap, "map", 1, map);
prototype_builtin!(TypedArrayPrototypeReduce, "reduce", 1, reduce);
prototype_builtin!(TypedArrayPrototypeReduceRight, "reduceRight", 1, reduce_right);
prototype_builtin!(TypedArrayPrototypeReverse, "reverse", 0, reverse);
prototype_builtin!(TypedArrayPrototypeSet, "set", 1, set);
prototype_builtin!(TypedArrayPrototypeSlice, "slice", 2, slice);
prototype_builtin!(TypedArrayPrototypeSome, "some", 1, some);
prototype_builtin!(TypedArrayPrototypeSort, "sort", 1, sort);
prototype_builtin!(TypedArrayPrototypeSubarray, "subarray", 2, subarray);
prototype_builtin!(TypedArrayPrototypeToLocaleString, "toLocaleString", 0, to_locale_string);
prototype_builtin!(TypedArrayPrototypeToReversed, "toReversed", 0, to_reversed);
prototype_builtin!(TypedArrayPrototypeToSorted, "toSorted", 1, to_sorted);
prototype_builtin!(TypedArrayPrototypeToString, "toString", 0, to_string);
prototype_builtin!(TypedArrayPrototypeValues, "values", 0, values);
prototype_builtin!(TypedArrayPrototypeWith, "with", 2, with);

/// Reads element `k` of `o` the way `Get(O, Pk)` does: out of range and
/// detached reads are undefined.
fn get_element_value(agent: &Agent, o: TypedArray, k: usize) -> Value {
    o.get_element(agent, k as f64)
        .map_or(Value::Undefined, Value::from)
}

/// Converts a search argument into the numeric key it can match. Values of
/// other types never match any element.
fn search_key(value: Value) -> Option<Numeric> {
    Numeric::try_from(value).ok()
}

/// Calls `callback` with « kValue, 𝔽(k), O ». A callback that detaches the
/// buffer of `o` ends the iteration with a TypeError.
fn call_callback(
    agent: &mut Agent,
    callback: Function,
    this_arg: &Value,
    o: TypedArray,
    k: usize,
) -> JsResult<(Value, Value)> {
    let k_value = get_element_value(agent, o, k);
    let result = callback.call(
        agent,
        this_arg.clone(),
        &[k_value.clone(), Value::Number(k as f64), o.into()],
    )?;
    revalidate_typed_array(agent, o)?;
    Ok((k_value, result))
}

/// Converts the result of a user comparator into an ordering. NaN results
/// compare equal.
fn compare_typed_array_elements(
    agent: &mut Agent,
    comparator: Function,
    x: &Numeric,
    y: &Numeric,
) -> JsResult<Ordering> {
    // a. Let v be ? ToNumber(? Call(comparator, undefined, « x, y »)).
    let v = comparator.call(
        agent,
        Value::Undefined,
        &[Value::from(x.clone()), Value::from(y.clone())],
    )?;
    let v = to_number(agent, v)?;
    // b. If v is NaN, return +0𝔽.
    // c. Return v.
    Ok(if v < 0.0 {
        Ordering::Less
    } else if v > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    })
}

/// Resolves the optional comparator argument of `sort` and `toSorted`.
fn comparator_argument(agent: &mut Agent, comparator: Value) -> JsResult<Option<Function>> {
    // 1. If comparator is not undefined and IsCallable(comparator) is false,
    //    throw a TypeError exception.
    match comparator {
        Value::Undefined => Ok(None),
        Value::Function(f) => Ok(Some(f)),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The comparison function must be either a function or undefined",
        )),
    }
}

/// Sorts `values` with a user comparator. `watched` is revalidated after
/// every comparator call so that a detached buffer stops the sort.
fn sort_with_comparator(
    agent: &mut Agent,
    values: Vec<Numeric>,
    comparator: Function,
    watched: Option<TypedArray>,
) -> JsResult<Vec<Numeric>> {
    bulk_operations::merge_sort_by(values, &mut |x, y| {
        let ordering = compare_typed_array_elements(agent, comparator, x, y)?;
        if let Some(watched) = watched {
            revalidate_typed_array(agent, watched)?;
        }
        Ok(ordering)
    })
}

impl TypedArrayPrototype {
    /// ### [23.2.3.1 %TypedArray%.prototype.at ( index )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.at)
    fn at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent) as f64;
        // 4. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If relativeIndex ≥ 0, then
        //   a. Let k be relativeIndex.
        // 6. Else,
        //   a. Let k be len + relativeIndex.
        let k = if relative_index >= 0.0 {
            relative_index
        } else {
            len + relative_index
        };
        // 7. If k < 0 or k ≥ len, return undefined.
        if k < 0.0 || k >= len {
            return Ok(Value::Undefined);
        }
        // 8. Return ! Get(O, ! ToString(𝔽(k))).
        Ok(o.get_element(agent, k).map_or(Value::Undefined, Value::from))
    }

    /// ### [23.2.3.2 get %TypedArray%.prototype.buffer](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.buffer)
    ///
    /// %TypedArray%.prototype.buffer is an accessor property whose set
    /// accessor function is undefined.
    fn get_buffer(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let buffer be O.[[ViewedArrayBuffer]].
        // 5. Return buffer.
        Ok(o.viewed_array_buffer(agent).into())
    }

    /// ### [23.2.3.3 get %TypedArray%.prototype.byteLength](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.bytelength)
    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
        // 5. Let size be TypedArrayByteLength(taRecord).
        // 6. Return 𝔽(size).
        Ok(Value::Number(o.byte_length(agent) as f64))
    }

    /// ### [23.2.3.4 get %TypedArray%.prototype.byteOffset](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.byteoffset)
    fn get_byte_offset(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
        // 5. If IsTypedArrayOutOfBounds(taRecord) is true, return +0𝔽.
        // 6. Let offset be O.[[ByteOffset]].
        // 7. Return 𝔽(offset).
        Ok(Value::Number(o.byte_offset(agent) as f64))
    }

    /// ### [23.2.7.1 TypedArray.prototype.BYTES_PER_ELEMENT](https://tc39.es/ecma262/#sec-typedarray.prototype.bytes_per_element)
    fn bytes_per_element(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        Ok(Value::Number(o.element_type(agent).element_size() as f64))
    }

    /// ### [23.2.3.6 %TypedArray%.prototype.copyWithin ( target, start \[ , end \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.copywithin)
    fn copy_within(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. Let relativeTarget be ? ToIntegerOrInfinity(target).
        // 5. If relativeTarget = -∞, let targetIndex be 0.
        // 6. Else if relativeTarget < 0, let targetIndex be max(len + relativeTarget, 0).
        // 7. Else, let targetIndex be min(relativeTarget, len).
        let relative_target = to_integer_or_infinity(agent, arguments.get(0))?;
        let target_index = relative_index(relative_target, len);
        // 8. Let relativeStart be ? ToIntegerOrInfinity(start).
        // 9-11. Let startIndex be the clamped relativeStart.
        let relative_start = to_integer_or_infinity(agent, arguments.get(1))?;
        let start_index = relative_index(relative_start, len);
        // 12. If end is undefined, let relativeEnd be len; else let relativeEnd be ? ToIntegerOrInfinity(end).
        let end = arguments.get(2);
        let end_index = if end.is_undefined() {
            len
        } else {
            // 13-15. Let endIndex be the clamped relativeEnd.
            let relative_end = to_integer_or_infinity(agent, end)?;
            relative_index(relative_end, len)
        };
        // 16. Let count be min(endIndex - startIndex, len - targetIndex).
        let count = end_index
            .saturating_sub(start_index)
            .min(len - target_index);
        // 17. If count > 0, then
        if count > 0 {
            // a. NOTE: The copying must be performed in a manner that
            //    preserves the bit-level encoding of the source data.
            // c. Set taRecord to MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
            // d. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
            // e. Set len to TypedArrayLength(taRecord).
            let len = revalidate_typed_array(agent, o)?;
            // i. Set count to min(count, len - startIndex, len - targetIndex).
            let count = count
                .min(len.saturating_sub(start_index))
                .min(len.saturating_sub(target_index));
            // j-m. Move the bytes, preserving overlapping ranges.
            bulk_operations::copy_within(agent, o, target_index, start_index, count);
        }
        // 18. Return O.
        Ok(o.into())
    }

    /// ### [23.2.3.7 %TypedArray%.prototype.entries ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.entries)
    fn entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? ValidateTypedArray(O, seq-cst).
        let o = validate_typed_array(agent, &this_value)?.object;
        // 3. Return CreateArrayIterator(O, key+value).
        Ok(ArrayIterator::from_typed_array(agent, o, CollectionIteratorKind::KeyAndValue).into())
    }

    /// ### [23.2.3.8 %TypedArray%.prototype.every ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.every)
    fn every(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            // c. Let testResult be ToBoolean(? Call(callback, thisArg, « kValue, 𝔽(k), O »)).
            let (_, test_result) = call_callback(agent, callback, &this_arg, o, k)?;
            // d. If testResult is false, return false.
            if !to_boolean(&test_result) {
                return Ok(false.into());
            }
            // e. Set k to k + 1.
        }
        // 7. Return true.
        Ok(true.into())
    }

    /// ### [23.2.3.9 %TypedArray%.prototype.fill ( value \[ , start \[ , end \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.fill)
    fn fill(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If O.[[ContentType]] is bigint, set value to ? ToBigInt(value).
        // 5. Otherwise, set value to ? ToNumber(value).
        let value = o.element_type(agent).coerce(agent, arguments.get(0))?;
        // 6. Let relativeStart be ? ToIntegerOrInfinity(start).
        // 7-9. Let startIndex be the clamped relativeStart.
        let relative_start = to_integer_or_infinity(agent, arguments.get(1))?;
        let start_index = relative_index(relative_start, len);
        // 10. If end is undefined, let relativeEnd be len; else let relativeEnd be ? ToIntegerOrInfinity(end).
        let end = arguments.get(2);
        let end_index = if end.is_undefined() {
            len
        } else {
            // 11-13. Let endIndex be the clamped relativeEnd.
            let relative_end = to_integer_or_infinity(agent, end)?;
            relative_index(relative_end, len)
        };
        // 14. Set taRecord to MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
        // 15. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
        // 16. Set len to TypedArrayLength(taRecord).
        let len = revalidate_typed_array(agent, o)?;
        // 17. Set endIndex to min(endIndex, len).
        let end_index = end_index.min(len);
        // 18. Let k be startIndex.
        // 19. Repeat, while k < endIndex,
        //   a. Let Pk be ! ToString(𝔽(k)).
        //   b. Perform ! Set(O, Pk, value, true).
        //   c. Set k to k + 1.
        bulk_operations::fill(agent, o, &value, start_index, end_index);
        // 20. Return O.
        Ok(o.into())
    }

    /// ### [23.2.3.10 %TypedArray%.prototype.filter ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.filter)
    fn filter(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let kept be a new empty List.
        let mut kept = Vec::new();
        // 6. Let captured be 0.
        // 7. Let k be 0.
        // 8. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            // c. Let selected be ToBoolean(? Call(callback, thisArg, « kValue, 𝔽(k), O »)).
            let (k_value, selected) = call_callback(agent, callback, &this_arg, o, k)?;
            // d. If selected is true, then
            if to_boolean(&selected) {
                // i. Append kValue to kept.
                // ii. Set captured to captured + 1.
                kept.push(k_value);
            }
            // e. Set k to k + 1.
        }
        // 9. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(captured) »).
        let a = typed_array_species_create_with_length(agent, o, kept.len())?;
        // 10. Let n be 0.
        // 11. For each element e of kept, do
        for (n, e) in kept.into_iter().enumerate() {
            // a. Perform ! Set(A, ! ToString(𝔽(n)), e, true).
            typed_array_set_element(agent, a, n as f64, e)?;
            // b. Set n to n + 1.
        }
        // 12. Return A.
        Ok(a.into())
    }

    /// ### [23.2.3.11 %TypedArray%.prototype.find ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.find)
    fn find(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let found = find_via_predicate(agent, this_value, arguments, false)?;
        Ok(found.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.2.3.12 %TypedArray%.prototype.findIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findindex)
    fn find_index(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let found = find_via_predicate(agent, this_value, arguments, false)?;
        Ok(Value::Number(found.map_or(-1.0, |(index, _)| index as f64)))
    }

    /// ### [23.2.3.13 %TypedArray%.prototype.findLast ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findlast)
    fn find_last(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let found = find_via_predicate(agent, this_value, arguments, true)?;
        Ok(found.map_or(Value::Undefined, |(_, value)| value))
    }

    /// ### [23.2.3.14 %TypedArray%.prototype.findLastIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.findlastindex)
    fn find_last_index(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let found = find_via_predicate(agent, this_value, arguments, true)?;
        Ok(Value::Number(found.map_or(-1.0, |(index, _)| index as f64)))
    }

    /// ### [23.2.3.15 %TypedArray%.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.foreach)
    fn for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            // c. Perform ? Call(callback, thisArg, « kValue, 𝔽(k), O »).
            call_callback(agent, callback, &this_arg, o, k)?;
            // d. Set k to k + 1.
        }
        // 7. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [23.2.3.16 %TypedArray%.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.includes)
    ///
    /// Elements are compared with SameValue: NaN is found and +0 and -0 are
    /// distinct for floating point element types.
    fn includes(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let found = search(
            agent,
            this_value,
            arguments,
            SearchMode::SameValue,
            false,
        )?;
        Ok(found.is_some().into())
    }

    /// ### [23.2.3.17 %TypedArray%.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.indexof)
    fn index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let found = search(
            agent,
            this_value,
            arguments,
            SearchMode::StrictEquality,
            false,
        )?;
        Ok(Value::Number(found.map_or(-1.0, |index| index as f64)))
    }

    /// ### [23.2.3.18 %TypedArray%.prototype.join ( separator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.join)
    fn join(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let o = validate_typed_array(agent, &this_value)?.object;
        // 3. Let len be TypedArrayLength(taRecord).
        // 4. If separator is undefined, let sep be ",".
        // 5. Else, let sep be ? ToString(separator).
        let separator = arguments.get(0);
        let sep = if separator.is_undefined() {
            String::from(",")
        } else {
            to_string(agent, separator)?
        };
        revalidate_typed_array(agent, o)?;
        // 6. Let R be the empty String.
        // 7. Let k be 0.
        // 8. Repeat, while k < len,
        //   a. If k > 0, set R to the string-concatenation of R and sep.
        //   b. Let element be ! Get(O, ! ToString(𝔽(k))).
        //   c. If element is not undefined, then
        //     i. Let S be ! ToString(element).
        //     ii. Set R to the string-concatenation of R and S.
        //   d. Set k to k + 1.
        // 9. Return R.
        Ok(bulk_operations::join(agent, o, &sep).into())
    }

    /// ### [23.2.3.19 %TypedArray%.prototype.keys ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.keys)
    fn keys(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? ValidateTypedArray(O, seq-cst).
        let o = validate_typed_array(agent, &this_value)?.object;
        // 3. Return CreateArrayIterator(O, key).
        Ok(ArrayIterator::from_typed_array(agent, o, CollectionIteratorKind::Key).into())
    }

    /// ### [23.2.3.20 %TypedArray%.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.lastindexof)
    fn last_index_of(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let found = search(
            agent,
            this_value,
            arguments,
            SearchMode::StrictEquality,
            true,
        )?;
        Ok(Value::Number(found.map_or(-1.0, |index| index as f64)))
    }

    /// ### [23.2.3.21 get %TypedArray%.prototype.length](https://tc39.es/ecma262/#sec-get-%typedarray%.prototype.length)
    fn get_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        // 3. Assert: O has [[ViewedArrayBuffer]] and [[ArrayLength]] internal slots.
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let taRecord be MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
        let ta_record = make_typed_array_with_buffer_witness_record(agent, o);
        // 5. If IsTypedArrayOutOfBounds(taRecord) is true, return +0𝔽.
        if ta_record.is_typed_array_out_of_bounds(agent) {
            return Ok(Value::Number(0.0));
        }
        // 6. Let length be TypedArrayLength(taRecord).
        // 7. Return 𝔽(length).
        Ok(Value::Number(ta_record.typed_array_length(agent) as f64))
    }

    /// ### [23.2.3.22 %TypedArray%.prototype.map ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.map)
    fn map(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(len) »).
        let a = typed_array_species_create_with_length(agent, o, len)?;
        // 6. Let k be 0.
        // 7. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            // c. Let mappedValue be ? Call(callback, thisArg, « kValue, 𝔽(k), O »).
            let (_, mapped_value) = call_callback(agent, callback, &this_arg, o, k)?;
            // d. Perform ? Set(A, Pk, mappedValue, true).
            typed_array_set_element(agent, a, k as f64, mapped_value)?;
            // e. Set k to k + 1.
        }
        // 8. Return A.
        Ok(a.into())
    }

    /// ### [23.2.3.23 %TypedArray%.prototype.reduce ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reduce)
    fn reduce(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        reduce_via_callback(agent, this_value, arguments, false)
    }

    /// ### [23.2.3.24 %TypedArray%.prototype.reduceRight ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reduceright)
    fn reduce_right(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        reduce_via_callback(agent, this_value, arguments, true)
    }

    /// ### [23.2.3.25 %TypedArray%.prototype.reverse ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reverse)
    fn reverse(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let o = validate_typed_array(agent, &this_value)?.object;
        // 3. Let len be TypedArrayLength(taRecord).
        // 4. Let middle be floor(len / 2).
        // 5. Let lower be 0.
        // 6. Repeat, while lower ≠ middle, swap the elements at lower and
        //    len - lower - 1.
        bulk_operations::reverse(agent, o);
        // 7. Return O.
        Ok(o.into())
    }

    /// ### [23.2.3.26 %TypedArray%.prototype.set ( source \[ , offset \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.set)
    fn set(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let source = arguments.get(0);
        // 1. Let target be the this value.
        // 2. Perform ? RequireInternalSlot(target, [[TypedArrayName]]).
        // 3. Assert: target has a [[ViewedArrayBuffer]] internal slot.
        let target = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let targetOffset be ? ToIntegerOrInfinity(offset).
        let target_offset = to_integer_or_infinity(agent, arguments.get(1))?;
        // 5. If targetOffset < 0, throw a RangeError exception.
        if target_offset < 0.0 {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "offset is out of bounds",
            ));
        }
        match source {
            // 6. If source is an Object that has a [[TypedArrayName]] internal slot, then
            //   a. Perform ? SetTypedArrayFromTypedArray(target, targetOffset, source).
            Value::TypedArray(source) => {
                set_typed_array_from_typed_array(agent, target, target_offset, source)?
            }
            // 7. Else,
            //   a. Perform ? SetTypedArrayFromArrayLike(target, targetOffset, source).
            source => set_typed_array_from_array_like(agent, target, target_offset, &source)?,
        }
        // 8. Return undefined.
        Ok(Value::Undefined)
    }

    /// ### [23.2.3.27 %TypedArray%.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.slice)
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let srcArrayLength be TypedArrayLength(taRecord).
        let src_array_length = ta_record.typed_array_length(agent);
        // 4. Let relativeStart be ? ToIntegerOrInfinity(start).
        // 5-7. Let startIndex be the clamped relativeStart.
        let relative_start = to_integer_or_infinity(agent, arguments.get(0))?;
        let start_index = relative_index(relative_start, src_array_length);
        // 8. If end is undefined, let relativeEnd be srcArrayLength; else let relativeEnd be ? ToIntegerOrInfinity(end).
        let end = arguments.get(1);
        let end_index = if end.is_undefined() {
            src_array_length
        } else {
            // 9-11. Let endIndex be the clamped relativeEnd.
            let relative_end = to_integer_or_infinity(agent, end)?;
            relative_index(relative_end, src_array_length)
        };
        // 12. Let countBytes be max(endIndex - startIndex, 0).
        let count = end_index.saturating_sub(start_index);
        // 13. Let A be ? TypedArraySpeciesCreate(O, « 𝔽(countBytes) »).
        let a = typed_array_species_create_with_length(agent, o, count)?;
        // 14. If countBytes > 0, then
        if count > 0 {
            // a. Set taRecord to MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
            // b. If IsTypedArrayOutOfBounds(taRecord) is true, throw a TypeError exception.
            let len = revalidate_typed_array(agent, o)?;
            // c. Set endIndex to min(endIndex, TypedArrayLength(taRecord)).
            // d. Set countBytes to max(endIndex - startIndex, 0).
            let count = end_index.min(len).saturating_sub(start_index);
            // e. Let srcType be TypedArrayElementType(O).
            // f. Let targetType be TypedArrayElementType(A).
            // g. If srcType is targetType, then
            //   i. NOTE: The transfer must be performed in a manner that
            //      preserves the bit-level encoding of the source data.
            //   ii-ix. Copy the bytes.
            // h. Else,
            //   i-iii. Copy each element with Get and Set.
            bulk_operations::copy_elements(agent, o, start_index, a, 0, count);
        }
        // 15. Return A.
        Ok(a.into())
    }

    /// ### [23.2.3.28 %TypedArray%.prototype.some ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.some)
    fn some(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 4. If IsCallable(callback) is false, throw a TypeError exception.
        let callback = require_callable(agent, arguments.get(0))?;
        let this_arg = arguments.get(1);
        // 5. Let k be 0.
        // 6. Repeat, while k < len,
        for k in 0..len {
            // a. Let Pk be ! ToString(𝔽(k)).
            // b. Let kValue be ! Get(O, Pk).
            // c. Let testResult be ToBoolean(? Call(callback, thisArg, « kValue, 𝔽(k), O »)).
            let (_, test_result) = call_callback(agent, callback, &this_arg, o, k)?;
            // d. If testResult is true, return true.
            if to_boolean(&test_result) {
                return Ok(true.into());
            }
            // e. Set k to k + 1.
        }
        // 7. Return false.
        Ok(false.into())
    }

    /// ### [23.2.3.29 %TypedArray%.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.sort)
    ///
    /// A comparator that detaches the buffer stops the sort with a
    /// TypeError; the array is left as it was before the sort.
    fn sort(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        //    false, throw a TypeError exception.
        let comparator = comparator_argument(agent, arguments.get(0))?;
        // 2. Let obj be the this value.
        // 3. Let taRecord be ? ValidateTypedArray(obj, seq-cst).
        let obj = validate_typed_array(agent, &this_value)?.object;
        // 4. Let len be TypedArrayLength(taRecord).
        let Some(comparator) = comparator else {
            // 5. NOTE: The following closure performs a numeric comparison
            //    rather than the string comparison used in 23.1.3.30.
            bulk_operations::sort_default(agent, obj);
            return Ok(obj.into());
        };
        // 6. Let SortCompare be a new Abstract Closure with parameters (x, y)
        //    that captures comparator and performs the following steps when
        //    called:
        //   a. Return ? CompareTypedArrayElements(x, y, comparator).
        // 7. Let sortedList be ? SortIndexedProperties(obj, len, SortCompare, read-through-holes).
        let values = bulk_operations::decode(agent, obj);
        let sorted_list = sort_with_comparator(agent, values, comparator, Some(obj))?;
        // 8. Let j be 0.
        // 9. Repeat, while j < len,
        //   a. Perform ! Set(obj, ! ToString(𝔽(j)), sortedList[j], true).
        //   b. Set j to j + 1.
        bulk_operations::encode(agent, obj, &sorted_list);
        // 10. Return obj.
        Ok(obj.into())
    }

    /// ### [23.2.3.30 %TypedArray%.prototype.subarray ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.subarray)
    ///
    /// This method returns a new TypedArray whose element type is the
    /// element type of this TypedArray and whose ArrayBuffer is the
    /// ArrayBuffer of this TypedArray, referencing the elements in the
    /// interval from start (inclusive) to end (exclusive).
    fn subarray(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[TypedArrayName]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let o = require_internal_slot_typed_array(agent, &this_value)?;
        // 4. Let buffer be O.[[ViewedArrayBuffer]].
        let data = o.heap_data(agent);
        let buffer = data.viewed_array_buffer;
        let element_size = data.element_type.element_size();
        // 15. Let srcByteOffset be O.[[ByteOffset]].
        let src_byte_offset = data.byte_offset;
        // 5. Let srcRecord be MakeTypedArrayWithBufferWitnessRecord(O, seq-cst).
        let src_record = make_typed_array_with_buffer_witness_record(agent, o);
        // 6. If IsTypedArrayOutOfBounds(srcRecord) is true, then
        //   a. Let srcLength be 0.
        // 7. Else,
        //   a. Let srcLength be TypedArrayLength(srcRecord).
        let src_length = if src_record.is_typed_array_out_of_bounds(agent) {
            0
        } else {
            src_record.typed_array_length(agent)
        };
        // 8. Let relativeStart be ? ToIntegerOrInfinity(start).
        // 9-11. Let startIndex be the clamped relativeStart.
        let relative_start = to_integer_or_infinity(agent, arguments.get(0))?;
        let start_index = relative_index(relative_start, src_length);
        // 13. If O.[[ArrayLength]] is auto and end is undefined, then
        // 14. Else,
        //   a. If end is undefined, let relativeEnd be srcLength; else let relativeEnd be ? ToIntegerOrInfinity(end).
        let end = arguments.get(1);
        let end_index = if end.is_undefined() {
            src_length
        } else {
            // b-d. Let endIndex be the clamped relativeEnd.
            let relative_end = to_integer_or_infinity(agent, end)?;
            relative_index(relative_end, src_length)
        };
        // 16. Let beginByteOffset be srcByteOffset + (startIndex × elementSize).
        let begin_byte_offset = src_byte_offset + start_index * element_size;
        //   e. Let newLength be max(endIndex - startIndex, 0).
        let new_length = end_index.saturating_sub(start_index);
        //   f. Let argumentsList be « buffer, 𝔽(beginByteOffset), 𝔽(newLength) ».
        // 17. Return ? TypedArraySpeciesCreate(O, argumentsList).
        typed_array_species_create(
            agent,
            o,
            &[
                buffer.into(),
                Value::Number(begin_byte_offset as f64),
                Value::Number(new_length as f64),
            ],
        )
        .map(Value::from)
    }

    /// ### [23.2.3.31 %TypedArray%.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.tolocalestring)
    ///
    /// Elements are formatted as by `join` with a "," separator.
    fn to_locale_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Self::join(agent, this_value, ArgumentsList::default())
    }

    /// ### [23.2.3.32 %TypedArray%.prototype.toReversed ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.toreversed)
    fn to_reversed(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let length be TypedArrayLength(taRecord).
        let length = ta_record.typed_array_length(agent);
        // 4. Let A be ? TypedArrayCreateSameType(O, length).
        let a = typed_array_create_same_type(agent, o, length)?;
        // 5. Let k be 0.
        // 6. Repeat, while k < length,
        //   a. Let from be ! ToString(𝔽(length - k - 1)).
        //   b. Let Pk be ! ToString(𝔽(k)).
        //   c. Let fromValue be ! Get(O, from).
        //   d. Perform ! Set(A, Pk, fromValue, true).
        //   e. Set k to k + 1.
        bulk_operations::copy_elements(agent, o, 0, a, 0, length);
        bulk_operations::reverse(agent, a);
        // 7. Return A.
        Ok(a.into())
    }

    /// ### [23.2.3.33 %TypedArray%.prototype.toSorted ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.tosorted)
    fn to_sorted(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If comparator is not undefined and IsCallable(comparator) is
        //    false, throw a TypeError exception.
        let comparator = comparator_argument(agent, arguments.get(0))?;
        // 2. Let O be the this value.
        // 3. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 4. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent);
        // 5. Let A be ? TypedArrayCreateSameType(O, len).
        let a = typed_array_create_same_type(agent, o, len)?;
        // 6. NOTE: The following closure performs a numeric comparison rather
        //    than the string comparison used in 23.1.3.34.
        // 7. Let SortCompare be a new Abstract Closure with parameters (x, y)
        //    that captures comparator and performs the following steps when
        //    called:
        //   a. Return ? CompareTypedArrayElements(x, y, comparator).
        // 8. Let sortedList be ? SortIndexedProperties(O, len, SortCompare, read-through-holes).
        // 9. Let j be 0.
        // 10. Repeat, while j < len,
        //   a. Perform ! Set(A, ! ToString(𝔽(j)), sortedList[j], true).
        //   b. Set j to j + 1.
        match comparator {
            None => {
                bulk_operations::copy_elements(agent, o, 0, a, 0, len);
                bulk_operations::sort_default(agent, a);
            }
            Some(comparator) => {
                let values = bulk_operations::decode(agent, o);
                let sorted_list = sort_with_comparator(agent, values, comparator, None)?;
                bulk_operations::encode(agent, a, &sorted_list);
            }
        }
        // 11. Return A.
        Ok(a.into())
    }

    /// ### [23.1.3.36 Array.prototype.toString ( )](https://tc39.es/ecma262/#sec-array.prototype.tostring)
    ///
    /// The initial value of the "toString" property of %TypedArray.prototype%
    /// is %Array.prototype.toString%, which joins the elements with ",".
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let array be ? ToObject(this value).
        // 2. Let func be ? Get(array, "join").
        // 4. Return ? Call(func, array).
        agent.invoke(this_value, "join", &[])
    }

    /// ### [23.2.3.35 %TypedArray%.prototype.values ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.values)
    fn values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? ValidateTypedArray(O, seq-cst).
        let o = validate_typed_array(agent, &this_value)?.object;
        // 3. Return CreateArrayIterator(O, value).
        Ok(ArrayIterator::from_typed_array(agent, o, CollectionIteratorKind::Value).into())
    }

    /// ### [23.2.3.36 %TypedArray%.prototype.with ( index, value )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.with)
    ///
    /// A detached buffer after coercing `value` is a TypeError, an index
    /// outside the array a RangeError.
    fn with(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
        let ta_record = validate_typed_array(agent, &this_value)?;
        let o = ta_record.object;
        // 3. Let len be TypedArrayLength(taRecord).
        let len = ta_record.typed_array_length(agent) as f64;
        // 4. Let relativeIndex be ? ToIntegerOrInfinity(index).
        let relative_index = to_integer_or_infinity(agent, arguments.get(0))?;
        // 5. If relativeIndex ≥ 0, let actualIndex be relativeIndex.
        // 6. Else, let actualIndex be len + relativeIndex.
        let actual_index = if relative_index >= 0.0 {
            relative_index
        } else {
            len + relative_index
        };
        // 7. If O.[[ContentType]] is bigint, let numericValue be ? ToBigInt(value).
        // 8. Else, let numericValue be ? ToNumber(value).
        let numeric_value = o.element_type(agent).coerce(agent, arguments.get(1))?;
        let len = revalidate_typed_array(agent, o)?;
        // 9. If IsValidIntegerIndex(O, 𝔽(actualIndex)) is false, throw a RangeError exception.
        let Some(actual_index) = is_valid_integer_index(agent, o, actual_index) else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Index out of bounds",
            ));
        };
        // 10. Let A be ? TypedArrayCreateSameType(O, len).
        let a = typed_array_create_same_type(agent, o, len)?;
        // 11. Let k be 0.
        // 12. Repeat, while k < len,
        //   a. Let Pk be ! ToString(𝔽(k)).
        //   b. If k is actualIndex, let fromValue be numericValue.
        //   c. Else, let fromValue be ! Get(O, Pk).
        //   d. Perform ! Set(A, Pk, fromValue, true).
        //   e. Set k to k + 1.
        bulk_operations::copy_elements(agent, o, 0, a, 0, len);
        write_typed_array_element(agent, a, actual_index, &numeric_value);
        // 13. Return A.
        Ok(a.into())
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table
            .register::<TypedArrayPrototypeAt>()
            .register::<TypedArrayPrototypeGetBuffer>()
            .register::<TypedArrayPrototypeGetByteLength>()
            .register::<TypedArrayPrototypeGetByteOffset>()
            .register::<TypedArrayPrototypeBytesPerElement>()
            .register::<TypedArrayPrototypeCopyWithin>()
            .register::<TypedArrayPrototypeEntries>()
            .register::<TypedArrayPrototypeEvery>()
            .register::<TypedArrayPrototypeFill>()
            .register::<TypedArrayPrototypeFilter>()
            .register::<TypedArrayPrototypeFind>()
            .register::<TypedArrayPrototypeFindIndex>()
            .register::<TypedArrayPrototypeFindLast>()
            .register::<TypedArrayPrototypeFindLastIndex>()
            .register::<TypedArrayPrototypeForEach>()
            .register::<TypedArrayPrototypeIncludes>()
            .register::<TypedArrayPrototypeIndexOf>()
            .register::<TypedArrayPrototypeJoin>()
            .register::<TypedArrayPrototypeKeys>()
            .register::<TypedArrayPrototypeLastIndexOf>()
            .register::<TypedArrayPrototypeGetLength>()
            .register::<TypedArrayPrototypeMap>()
            .register::<TypedArrayPrototypeReduce>()
            .register::<TypedArrayPrototypeReduceRight>()
            .register::<TypedArrayPrototypeReverse>()
            .register::<TypedArrayPrototypeSet>()
            .register::<TypedArrayPrototypeSlice>()
            .register::<TypedArrayPrototypeSome>()
            .register::<TypedArrayPrototypeSort>()
            .register::<TypedArrayPrototypeSubarray>()
            .register::<TypedArrayPrototypeToLocaleString>()
            .register::<TypedArrayPrototypeToReversed>()
            .register::<TypedArrayPrototypeToSorted>()
            .register::<TypedArrayPrototypeToString>()
            .register::<TypedArrayPrototypeValues>()
            .register::<TypedArrayPrototypeWith>();
    }
}

/// ### [23.1.3.12.1 FindViaPredicate ( O, len, direction, predicate, thisArg )](https://tc39.es/ecma262/#sec-findviapredicate)
///
/// Returns the index and value of the first element, in ascending or
/// descending order, for which `predicate` returns a truthy value.
fn find_via_predicate(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    descending: bool,
) -> JsResult<Option<(usize, Value)>> {
    // 1. Let O be the this value.
    // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
    let ta_record = validate_typed_array(agent, &this_value)?;
    let o = ta_record.object;
    // 3. Let len be TypedArrayLength(taRecord).
    let len = ta_record.typed_array_length(agent);
    // FindViaPredicate 1. If IsCallable(predicate) is false, throw a TypeError exception.
    let predicate = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    // 2. If direction is ascending, then
    //   a. Let indices be a List of the integers in the interval from 0 (inclusive) to len (exclusive), in ascending order.
    // 3. Else,
    //   a. Let indices be a List of the integers in the interval from 0 (inclusive) to len (exclusive), in descending order.
    let indices: Box<dyn Iterator<Item = usize>> = if descending {
        Box::new((0..len).rev())
    } else {
        Box::new(0..len)
    };
    // 4. For each integer k of indices, do
    for k in indices {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. NOTE: If O is a TypedArray, the following invocation of Get will return a normal completion.
        // c. Let kValue be ? Get(O, Pk).
        // d. Let testResult be ? Call(predicate, thisArg, « kValue, 𝔽(k), O »).
        let (k_value, test_result) = call_callback(agent, predicate, &this_arg, o, k)?;
        // e. If ToBoolean(testResult) is true, return the Record { [[Index]]: 𝔽(k), [[Value]]: kValue }.
        if to_boolean(&test_result) {
            return Ok(Some((k, k_value)));
        }
    }
    // 5. Return the Record { [[Index]]: -1𝔽, [[Value]]: undefined }.
    Ok(None)
}

/// Shared steps of `reduce` and `reduceRight`.
fn reduce_via_callback(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    descending: bool,
) -> JsResult<Value> {
    // 1. Let O be the this value.
    // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
    let ta_record = validate_typed_array(agent, &this_value)?;
    let o = ta_record.object;
    // 3. Let len be TypedArrayLength(taRecord).
    let len = ta_record.typed_array_length(agent);
    // 4. If IsCallable(callback) is false, throw a TypeError exception.
    let callback = require_callable(agent, arguments.get(0))?;
    // 5. If len = 0 and initialValue is not present, throw a TypeError exception.
    if len == 0 && arguments.len() < 2 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reduce of empty array with no initial value",
        ));
    }
    let mut indices: Box<dyn Iterator<Item = usize>> = if descending {
        Box::new((0..len).rev())
    } else {
        Box::new(0..len)
    };
    // 6. Let k be 0 (or len - 1).
    // 7. Let accumulator be undefined.
    // 8. If initialValue is present, then
    //   a. Set accumulator to initialValue.
    // 9. Else,
    //   a. Let Pk be ! ToString(𝔽(k)).
    //   b. Set accumulator to ! Get(O, Pk).
    //   c. Set k to k + 1 (or k - 1).
    let mut accumulator = if arguments.len() >= 2 {
        arguments.get(1)
    } else {
        let k = indices.next().unwrap_or_default();
        get_element_value(agent, o, k)
    };
    // 10. Repeat, while k < len (or k ≥ 0),
    for k in indices {
        // a. Let Pk be ! ToString(𝔽(k)).
        // b. Let kValue be ! Get(O, Pk).
        let k_value = get_element_value(agent, o, k);
        // c. Set accumulator to ? Call(callback, undefined, « accumulator, kValue, 𝔽(k), O »).
        accumulator = callback.call(
            agent,
            Value::Undefined,
            &[accumulator, k_value, Value::Number(k as f64), o.into()],
        )?;
        revalidate_typed_array(agent, o)?;
        // d. Set k to k + 1 (or k - 1).
    }
    // 11. Return accumulator.
    Ok(accumulator)
}

/// Shared steps of `includes`, `indexOf` and `lastIndexOf`.
///
/// Coercing `fromIndex` may detach the buffer, which is then a TypeError.
fn search(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    mode: SearchMode,
    backward: bool,
) -> JsResult<Option<usize>> {
    // 1. Let O be the this value.
    // 2. Let taRecord be ? ValidateTypedArray(O, seq-cst).
    let ta_record = validate_typed_array(agent, &this_value)?;
    let o = ta_record.object;
    // 3. Let len be TypedArrayLength(taRecord).
    let len = ta_record.typed_array_length(agent);
    // 4. If len = 0, return false (or -1𝔽).
    if len == 0 {
        return Ok(None);
    }
    let direction = if backward {
        // 5. If fromIndex is present, let n be ? ToIntegerOrInfinity(fromIndex);
        //    else let n be len - 1.
        let n = if arguments.len() >= 2 {
            to_integer_or_infinity(agent, arguments.get(1))?
        } else {
            len as f64 - 1.0
        };
        // 6. If n = -∞, return -1𝔽.
        if n == f64::NEG_INFINITY {
            return Ok(None);
        }
        // 7. If n ≥ 0, then
        //   a. Let k be min(n, len - 1).
        // 8. Else,
        //   a. Let k be len + n.
        let k = if n >= 0.0 {
            n.min(len as f64 - 1.0)
        } else {
            len as f64 + n
        };
        if k < 0.0 {
            return Ok(None);
        }
        SearchDirection::Backward { from: k as usize }
    } else {
        // 5. Let n be ? ToIntegerOrInfinity(fromIndex).
        // 6. Assert: If fromIndex is undefined, then n is 0.
        let n = to_integer_or_infinity(agent, arguments.get(1))?;
        // 7. If n = +∞, return false (or -1𝔽).
        if n == f64::INFINITY {
            return Ok(None);
        }
        // 8. Else if n = -∞, set n to 0.
        // 9. If n ≥ 0, then
        //   a. Let k be n.
        // 10. Else,
        //   a. Let k be len + n.
        //   b. If k < 0, set k to 0.
        SearchDirection::Forward {
            from: relative_index(n, len),
        }
    };
    revalidate_typed_array(agent, o)?;
    // 11. Repeat, while k < len, compare each element with searchElement.
    let Some(key) = search_key(arguments.get(0)) else {
        return Ok(None);
    };
    Ok(bulk_operations::search(agent, o, &key, direction, mode))
}

