// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::type_conversion::{relative_index, to_integer_or_infinity, to_index},
    builtins::{
        ArgumentsList, Behaviour, Builtin, MethodTable,
        array_buffer::{ArrayBuffer, allocate_array_buffer, is_detached_buffer},
    },
    execution::{Agent, ExceptionType, JsResult},
    types::Value,
};

pub(crate) struct ArrayBufferPrototype;

struct ArrayBufferPrototypeGetByteLength;
impl Builtin for ArrayBufferPrototypeGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_byte_length);
}
struct ArrayBufferPrototypeGetDetached;
impl Builtin for ArrayBufferPrototypeGetDetached {
    const NAME: &'static str = "detached";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_detached);
}
struct ArrayBufferPrototypeGetMaxByteLength;
impl Builtin for ArrayBufferPrototypeGetMaxByteLength {
    const NAME: &'static str = "maxByteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_max_byte_length);
}
struct ArrayBufferPrototypeGetResizable;
impl Builtin for ArrayBufferPrototypeGetResizable {
    const NAME: &'static str = "resizable";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_resizable);
}
struct ArrayBufferPrototypeSlice;
impl Builtin for ArrayBufferPrototypeSlice {
    const NAME: &'static str = "slice";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::slice);
}
#[cfg(feature = "array-buffer-transfer")]
struct ArrayBufferPrototypeTransfer;
#[cfg(feature = "array-buffer-transfer")]
impl Builtin for ArrayBufferPrototypeTransfer {
    const NAME: &'static str = "transfer";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::transfer);
}
#[cfg(feature = "array-buffer-transfer")]
struct ArrayBufferPrototypeTransferToFixedLength;
#[cfg(feature = "array-buffer-transfer")]
impl Builtin for ArrayBufferPrototypeTransferToFixedLength {
    const NAME: &'static str = "transferToFixedLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::transfer_to_fixed_length);
}

impl ArrayBufferPrototype {
    /// ### [25.1.6.1 get ArrayBuffer.prototype.byteLength](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.bytelength)
    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        let o = require_internal_slot_array_buffer(agent, &this_value)?;
        // 4. If IsDetachedBuffer(O) is true, return +0𝔽.
        // 5. Let length be O.[[ArrayBufferByteLength]].
        // 6. Return 𝔽(length).
        Ok(Value::Number(o.byte_length(agent) as f64))
    }

    /// ### [25.1.6.3 get ArrayBuffer.prototype.detached](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.detached)
    fn get_detached(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        let o = require_internal_slot_array_buffer(agent, &this_value)?;
        // 4. Return IsDetachedBuffer(O).
        Ok(is_detached_buffer(agent, o).into())
    }

    /// ### [25.1.6.4 get ArrayBuffer.prototype.maxByteLength](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.maxbytelength)
    fn get_max_byte_length(
        agent: &mut Agent,
        this_value: Value,
        _: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        let o = require_internal_slot_array_buffer(agent, &this_value)?;
        // 4. If IsDetachedBuffer(O) is true, return +0𝔽.
        // 5. If IsFixedLengthArrayBuffer(O) is true, then
        //   a. Let length be O.[[ArrayBufferByteLength]].
        // 7. Return 𝔽(length).
        Ok(Value::Number(o.byte_length(agent) as f64))
    }

    /// ### [25.1.6.5 get ArrayBuffer.prototype.resizable](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.resizable)
    fn get_resizable(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        require_internal_slot_array_buffer(agent, &this_value)?;
        // 4. If IsFixedLengthArrayBuffer(O) is false, return true; otherwise return false.
        Ok(false.into())
    }

    /// ### [25.1.6.7 ArrayBuffer.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.slice)
    ///
    /// The result is always a new %ArrayBuffer%.
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 3. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        let o = require_internal_slot_array_buffer(agent, &this_value)?;
        // 4. If IsDetachedBuffer(O) is true, throw a TypeError exception.
        if is_detached_buffer(agent, o) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot slice a detached ArrayBuffer",
            ));
        }
        // 5. Let len be O.[[ArrayBufferByteLength]].
        let len = o.byte_length(agent);
        // 6. Let relativeStart be ? ToIntegerOrInfinity(start).
        // 7-9. Let first be the clamped relativeStart.
        let relative_start = to_integer_or_infinity(agent, arguments.get(0))?;
        let first = relative_index(relative_start, len);
        // 10. If end is undefined, let relativeEnd be len; else let relativeEnd be ? ToIntegerOrInfinity(end).
        let end = arguments.get(1);
        let final_end = if end.is_undefined() {
            len
        } else {
            // 11-13. Let final be the clamped relativeEnd.
            let relative_end = to_integer_or_infinity(agent, end)?;
            relative_index(relative_end, len)
        };
        // 14. Let newLen be max(final - first, 0).
        let new_len = final_end.saturating_sub(first);
        // 15. Let ctor be ? SpeciesConstructor(O, %ArrayBuffer%).
        // 16. Let new be ? Construct(ctor, « 𝔽(newLen) »).
        let new = allocate_array_buffer(agent, new_len as u64)?;
        // 22. NOTE: Side-effects of the above steps may have detached or resized O.
        // 23. If IsDetachedBuffer(O) is true, throw a TypeError exception.
        if is_detached_buffer(agent, o) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Construction detached ArrayBuffer being sliced",
            ));
        }
        // 24. Let fromBuf be O.[[ArrayBufferData]].
        // 25. Let toBuf be new.[[ArrayBufferData]].
        // 26. Let currentLen be O.[[ArrayBufferByteLength]].
        let current_len = o.byte_length(agent);
        // 27. If first < currentLen, then
        if first < current_len {
            // a. Let count be min(newLen, currentLen - first).
            let count = new_len.min(current_len - first);
            // b. Perform CopyDataBlockBytes(toBuf, 0, fromBuf, first, count).
            ArrayBuffer::copy_bytes(agent, new, 0, o, first, count)?;
        }
        // 28. Return new.
        Ok(new.into())
    }

    /// ### [25.1.6.8 ArrayBuffer.prototype.transfer ( \[ newLength \] )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.transfer)
    #[cfg(feature = "array-buffer-transfer")]
    fn transfer(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Return ? ArrayBufferCopyAndDetach(O, newLength, preserve-resizability).
        array_buffer_copy_and_detach(agent, this_value, arguments.get(0))
    }

    /// ### [25.1.6.9 ArrayBuffer.prototype.transferToFixedLength ( \[ newLength \] )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.transfertofixedlength)
    #[cfg(feature = "array-buffer-transfer")]
    fn transfer_to_fixed_length(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Return ? ArrayBufferCopyAndDetach(O, newLength, fixed-length).
        array_buffer_copy_and_detach(agent, this_value, arguments.get(0))
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table
            .register::<ArrayBufferPrototypeGetByteLength>()
            .register::<ArrayBufferPrototypeGetDetached>()
            .register::<ArrayBufferPrototypeGetMaxByteLength>()
            .register::<ArrayBufferPrototypeGetResizable>()
            .register::<ArrayBufferPrototypeSlice>();
        #[cfg(feature = "array-buffer-transfer")]
        table
            .register::<ArrayBufferPrototypeTransfer>()
            .register::<ArrayBufferPrototypeTransferToFixedLength>();
    }
}

/// ### [25.1.3.7 ArrayBufferCopyAndDetach ( arrayBuffer, newLength, preserveResizability )](https://tc39.es/ecma262/#sec-arraybuffercopyanddetach)
#[cfg(feature = "array-buffer-transfer")]
fn array_buffer_copy_and_detach(
    agent: &mut Agent,
    array_buffer: Value,
    new_length: Value,
) -> JsResult<Value> {
    // 1. Perform ? RequireInternalSlot(arrayBuffer, [[ArrayBufferData]]).
    // 2. If IsSharedArrayBuffer(arrayBuffer) is true, throw a TypeError exception.
    let array_buffer = require_internal_slot_array_buffer(agent, &array_buffer)?;
    // 3. If newLength is undefined, then
    //   a. Let newByteLength be arrayBuffer.[[ArrayBufferByteLength]].
    // 4. Else,
    //   a. Let newByteLength be ? ToIndex(newLength).
    let new_byte_length = if new_length.is_undefined() {
        None
    } else {
        Some(to_index(agent, new_length)?)
    };
    array_buffer.transfer(agent, new_byte_length).map(Value::from)
}

#[inline]
pub(crate) fn require_internal_slot_array_buffer(
    agent: &mut Agent,
    o: &Value,
) -> JsResult<ArrayBuffer> {
    match o {
        // 1. Perform ? RequireInternalSlot(O, [[ArrayBufferData]]).
        // 2. If IsSharedArrayBuffer(O) is true, throw a TypeError exception.
        Value::ArrayBuffer(array_buffer) => Ok(*array_buffer),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Expected this to be ArrayBuffer",
        )),
    }
}
