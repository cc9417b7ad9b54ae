// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{DataView, data::DataViewHeapData};
use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_boolean, to_index},
        builtins::array_buffer::{
            ArrayBuffer, array_buffer_byte_length, get_value_from_buffer, is_detached_buffer,
            set_value_in_buffer, throw_detached_error,
        },
        execution::{Agent, ExceptionType, JsError, JsResult},
        types::{ElementType, Value, Viewable, with_element_type},
    },
    heap::CreateHeapData,
};

/// ### [25.3.1.1 DataView With Buffer Witness Records](https://tc39.es/ecma262/#sec-dataview-with-buffer-witness-records)
///
/// A DataView With Buffer Witness Record is a Record value used to
/// encapsulate a DataView along with a cached byte length of the viewed
/// buffer. `None` means the buffer was detached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DataViewWithBufferWitnessRecord {
    /// ### [\[\[Object\]\]](https://tc39.es/ecma262/#table-dataview-with-buffer-witness-record-fields)
    object: DataView,
    /// ### [\[\[CachedBufferByteLength\]\]](https://tc39.es/ecma262/#table-dataview-with-buffer-witness-record-fields)
    cached_buffer_byte_length: Option<usize>,
}

/// ### [25.3.1.2 MakeDataViewWithBufferWitnessRecord ( obj, order )](https://tc39.es/ecma262/#sec-makedataviewwithbufferwitnessrecord)
pub(crate) fn make_data_view_with_buffer_witness_record(
    agent: &Agent,
    obj: DataView,
) -> DataViewWithBufferWitnessRecord {
    // 1. Let buffer be obj.[[ViewedArrayBuffer]].
    let buffer = agent[obj].viewed_array_buffer;
    // 2. If IsDetachedBuffer(buffer) is true, then
    //   a. Let byteLength be detached.
    // 3. Else,
    //   a. Let byteLength be ArrayBufferByteLength(buffer, order).
    let byte_length = if is_detached_buffer(agent, buffer) {
        None
    } else {
        Some(array_buffer_byte_length(agent, buffer))
    };
    // 4. Return the DataView With Buffer Witness Record { [[Object]]: obj, [[CachedBufferByteLength]]: byteLength }.
    DataViewWithBufferWitnessRecord {
        object: obj,
        cached_buffer_byte_length: byte_length,
    }
}

/// ### [25.3.1.3 GetViewByteLength ( viewRecord )](https://tc39.es/ecma262/#sec-getviewbytelength)
pub(crate) fn get_view_byte_length(
    agent: &Agent,
    view_record: &DataViewWithBufferWitnessRecord,
) -> usize {
    // 1. Assert: IsViewOutOfBounds(viewRecord) is false.
    debug_assert!(!is_view_out_of_bounds(agent, view_record));
    // 2. Let view be viewRecord.[[Object]].
    // 3. If view.[[ByteLength]] is not auto, return view.[[ByteLength]].
    agent[view_record.object].byte_length
}

/// ### [25.3.1.4 IsViewOutOfBounds ( viewRecord )](https://tc39.es/ecma262/#sec-isviewoutofbounds)
pub(crate) fn is_view_out_of_bounds(
    agent: &Agent,
    view_record: &DataViewWithBufferWitnessRecord,
) -> bool {
    // 1. Let view be viewRecord.[[Object]].
    let view = &agent[view_record.object];
    // 2. Let bufferByteLength be viewRecord.[[CachedBufferByteLength]].
    // 4. If bufferByteLength is detached, return true.
    let Some(buffer_byte_length) = view_record.cached_buffer_byte_length else {
        return true;
    };
    // 5. Let byteOffsetStart be view.[[ByteOffset]].
    let byte_offset_start = view.byte_offset;
    // 7. Else,
    //   a. Let byteOffsetEnd be byteOffsetStart + view.[[ByteLength]].
    let byte_offset_end = byte_offset_start + view.byte_length;
    // 8. If byteOffsetStart > bufferByteLength or byteOffsetEnd > bufferByteLength, return true.
    // 9. NOTE: 0-length DataViews are not considered out-of-bounds.
    // 10. Return false.
    byte_offset_start > buffer_byte_length || byte_offset_end > buffer_byte_length
}

pub(crate) fn require_internal_slot_data_view(agent: &mut Agent, o: &Value) -> JsResult<DataView> {
    match o {
        // 1. Perform ? RequireInternalSlot(O, [[DataView]]).
        Value::DataView(data_view) => Ok(*data_view),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Expected this to be DataView",
        )),
    }
}

/// ### [25.3.2.1 DataView ( buffer \[ , byteOffset \[ , byteLength \] \] )](https://tc39.es/ecma262/#sec-dataview-buffer-byteoffset-bytelength)
///
/// Creates a DataView over `buffer`. Coercing `byte_length` may detach the
/// buffer, which is then a TypeError.
pub(crate) fn create_data_view(
    agent: &mut Agent,
    buffer: &Value,
    byte_offset: Value,
    byte_length: Value,
) -> JsResult<DataView> {
    // 2. Perform ? RequireInternalSlot(buffer, [[ArrayBufferData]]).
    let Value::ArrayBuffer(buffer) = *buffer else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Expected buffer to be ArrayBuffer",
        ));
    };
    // 3. Let offset be ? ToIndex(byteOffset).
    let offset = to_index(agent, byte_offset)?;
    // 4. If IsDetachedBuffer(buffer) is true, throw a TypeError exception.
    if is_detached_buffer(agent, buffer) {
        return Err(throw_detached_error(agent));
    }
    // 5. Let bufferByteLength be ArrayBufferByteLength(buffer, seq-cst).
    let buffer_byte_length = array_buffer_byte_length(agent, buffer) as u64;
    // 6. If offset > bufferByteLength, throw a RangeError exception.
    if offset > buffer_byte_length {
        return Err(out_of_bounds_offset(agent, offset, buffer_byte_length));
    }
    // 8. If byteLength is undefined, then
    let view_byte_length = if byte_length.is_undefined() {
        // b. Else,
        //   i. Let viewByteLength be bufferByteLength - offset.
        None
    } else {
        // 9. Else,
        //   a. Let viewByteLength be ? ToIndex(byteLength).
        let view_byte_length = to_index(agent, byte_length)?;
        //   b. If offset + viewByteLength > bufferByteLength, throw a RangeError exception.
        if offset.saturating_add(view_byte_length) > buffer_byte_length {
            return Err(invalid_length(agent, view_byte_length));
        }
        Some(view_byte_length)
    };
    // 11. If IsDetachedBuffer(buffer) is true, throw a TypeError exception.
    if is_detached_buffer(agent, buffer) {
        return Err(throw_detached_error(agent));
    }
    // 12. Set bufferByteLength to ArrayBufferByteLength(buffer, seq-cst).
    let buffer_byte_length = array_buffer_byte_length(agent, buffer) as u64;
    // 13. If offset > bufferByteLength, throw a RangeError exception.
    if offset > buffer_byte_length {
        return Err(out_of_bounds_offset(agent, offset, buffer_byte_length));
    }
    // 14. If byteLength is not undefined, then
    //   a. If offset + viewByteLength > bufferByteLength, throw a RangeError exception.
    let view_byte_length = match view_byte_length {
        Some(view_byte_length) if offset + view_byte_length > buffer_byte_length => {
            return Err(invalid_length(agent, view_byte_length));
        }
        Some(view_byte_length) => view_byte_length,
        None => buffer_byte_length - offset,
    };
    // 15. Set O.[[ViewedArrayBuffer]] to buffer.
    // 16. Set O.[[ByteLength]] to viewByteLength.
    // 17. Set O.[[ByteOffset]] to offset.
    // 18. Return O.
    Ok(agent.heap.create(DataViewHeapData {
        viewed_array_buffer: buffer,
        byte_length: view_byte_length as usize,
        byte_offset: offset as usize,
    }))
}

fn out_of_bounds_offset(
    agent: &mut Agent,
    offset: u64,
    buffer_byte_length: u64,
) -> JsError {
    agent.throw_exception(
        ExceptionType::RangeError,
        format!(
            "Start offset {offset} is outside the bounds of the buffer of length {buffer_byte_length}"
        ),
    )
}

fn invalid_length(agent: &mut Agent, length: u64) -> JsError {
    agent.throw_exception(
        ExceptionType::RangeError,
        format!("Invalid DataView length {length}"),
    )
}

/// Checks that `size` bytes at `get_index` are inside the view and returns
/// the index of the first byte in the viewed buffer.
fn view_byte_index(
    agent: &mut Agent,
    view: DataView,
    get_index: u64,
    size: usize,
) -> JsResult<(ArrayBuffer, usize)> {
    // 5. Let viewOffset be view.[[ByteOffset]].
    let view_offset = agent[view].byte_offset;
    // 6. Let viewRecord be MakeDataViewWithBufferWitnessRecord(view, unordered).
    // 7. NOTE: Bounds checking is not a synchronizing operation when view's
    //    backing buffer is a growable SharedArrayBuffer.
    let view_record = make_data_view_with_buffer_witness_record(agent, view);
    // 8. If IsViewOutOfBounds(viewRecord) is true, throw a TypeError exception.
    if is_view_out_of_bounds(agent, &view_record) {
        return Err(throw_detached_error(agent));
    }
    // 9. Let viewSize be GetViewByteLength(viewRecord).
    let view_size = get_view_byte_length(agent, &view_record) as u64;
    // 10. Let elementSize be the Element Size value specified in Table 71 for Element Type type.
    // 11. If getIndex + elementSize > viewSize, throw a RangeError exception.
    if get_index.saturating_add(size as u64) > view_size {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Offset is outside the bounds of the DataView",
        ));
    }
    // 12. Let bufferIndex be getIndex + viewOffset.
    Ok((
        agent[view].viewed_array_buffer,
        get_index as usize + view_offset,
    ))
}

/// Reads a `T` at `get_index` of an already validated view.
pub(crate) fn get_view_element<T: Viewable>(
    agent: &mut Agent,
    view: DataView,
    get_index: u64,
    is_little_endian: bool,
) -> JsResult<T> {
    let (buffer, buffer_index) = view_byte_index(agent, view, get_index, T::BYTES)?;
    // 13. Return GetValueFromBuffer(view.[[ViewedArrayBuffer]], bufferIndex, type, false, unordered, isLittleEndian).
    Ok(get_value_from_buffer::<T>(
        agent,
        buffer,
        buffer_index,
        Some(is_little_endian),
    ))
}

/// Writes a `T` at `get_index` of an already validated view.
pub(crate) fn set_view_element<T: Viewable>(
    agent: &mut Agent,
    view: DataView,
    get_index: u64,
    value: T,
    is_little_endian: bool,
) -> JsResult<()> {
    let (buffer, buffer_index) = view_byte_index(agent, view, get_index, T::BYTES)?;
    // 14. Perform SetValueInBuffer(view.[[ViewedArrayBuffer]], bufferIndex, type, numberValue, false, unordered, isLittleEndian).
    set_value_in_buffer::<T>(agent, buffer, buffer_index, value, Some(is_little_endian));
    Ok(())
}

/// ### [25.3.1.5 GetViewValue ( view, requestIndex, isLittleEndian, type )](https://tc39.es/ecma262/#sec-getviewvalue)
///
/// The abstract operation GetViewValue takes arguments view (an ECMAScript
/// language value), requestIndex (an ECMAScript language value),
/// isLittleEndian (an ECMAScript language value), and type (a TypedArray
/// element type) and returns either a normal completion containing either
/// a Number or a BigInt, or a throw completion. It is used by functions on
/// DataView instances to retrieve values from the view's buffer.
pub(crate) fn get_view_value(
    agent: &mut Agent,
    view: &Value,
    request_index: Value,
    is_little_endian: Value,
    element_type: ElementType,
) -> JsResult<Value> {
    // 1. Perform ? RequireInternalSlot(view, [[DataView]]).
    // 2. Assert: view has a [[ViewedArrayBuffer]] internal slot.
    let view = require_internal_slot_data_view(agent, view)?;
    // 3. Let getIndex be ? ToIndex(requestIndex).
    let get_index = to_index(agent, request_index)?;
    // 4. Set isLittleEndian to ToBoolean(isLittleEndian).
    let is_little_endian = to_boolean(&is_little_endian);
    with_element_type!(element_type, T, {
        let value = get_view_element::<T>(agent, view, get_index, is_little_endian)?;
        Ok(value.into_numeric().into())
    })
}

/// ### [25.3.1.6 SetViewValue ( view, requestIndex, isLittleEndian, type, value )](https://tc39.es/ecma262/#sec-setviewvalue)
///
/// The abstract operation SetViewValue takes arguments view (an ECMAScript
/// language value), requestIndex (an ECMAScript language value),
/// isLittleEndian (an ECMAScript language value), type (a TypedArray
/// element type), and value (an ECMAScript language value) and returns
/// either a normal completion containing undefined or a throw completion.
/// It is used by functions on DataView instances to store values into the
/// view's buffer.
pub(crate) fn set_view_value(
    agent: &mut Agent,
    view: &Value,
    request_index: Value,
    is_little_endian: Value,
    element_type: ElementType,
    value: Value,
) -> JsResult<Value> {
    // 1. Perform ? RequireInternalSlot(view, [[DataView]]).
    // 2. Assert: view has a [[ViewedArrayBuffer]] internal slot.
    let view = require_internal_slot_data_view(agent, view)?;
    // 3. Let getIndex be ? ToIndex(requestIndex).
    let get_index = to_index(agent, request_index)?;
    // 4. If IsBigIntElementType(type) is true, let numberValue be ? ToBigInt(value).
    // 5. Otherwise, let numberValue be ? ToNumber(value).
    let number_value = element_type.coerce(agent, value)?;
    // 6. Set isLittleEndian to ToBoolean(isLittleEndian).
    let is_little_endian = to_boolean(&is_little_endian);
    with_element_type!(element_type, T, {
        set_view_element::<T>(
            agent,
            view,
            get_index,
            T::from_numeric(&number_value),
            is_little_endian,
        )?;
    });
    // 15. Return undefined.
    Ok(Value::Undefined)
}
