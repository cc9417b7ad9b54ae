// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ArrayBuffer, ArrayBufferHeapData, data::InternalBuffer};
use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType, JsError, JsResult},
        types::{DataBlock, Viewable},
    },
    heap::CreateHeapData,
};

/// Creates the TypeError thrown when an operation reaches a detached
/// ArrayBuffer.
pub(crate) fn throw_detached_error(agent: &mut Agent) -> JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Attempted to access detached ArrayBuffer",
    )
}

/// #### [25.1.3.1 AllocateArrayBuffer ( constructor, byteLength \[ , maxByteLength \] )](https://tc39.es/ecma262/#sec-allocatearraybuffer)
///
/// The abstract operation AllocateArrayBuffer takes arguments *constructor*
/// (a constructor) and *byteLength* (a non-negative integer) and returns
/// either a normal completion containing an ArrayBuffer or a throw
/// completion. It is used to create an ArrayBuffer.
pub(crate) fn allocate_array_buffer(agent: &mut Agent, byte_length: u64) -> JsResult<ArrayBuffer> {
    // 1. Let slots be « [[ArrayBufferData]], [[ArrayBufferByteLength]], [[ArrayBufferDetachKey]] ».
    // 4. Let obj be ? OrdinaryCreateFromConstructor(constructor, "%ArrayBuffer.prototype%", slots).
    // 5. Let block be ? CreateByteDataBlock(byteLength).
    let block = DataBlock::create_byte_data_block(agent, byte_length)?;
    tracing::debug!(byte_length, "allocated ArrayBuffer");
    // 6. Set obj.[[ArrayBufferData]] to block.
    // 7. Set obj.[[ArrayBufferByteLength]] to byteLength.
    // 9. Return obj.
    Ok(agent
        .heap
        .create(ArrayBufferHeapData::new_fixed_length(block)))
}

/// #### [25.1.3.2 ArrayBufferByteLength ( arrayBuffer, order )](https://tc39.es/ecma262/#sec-arraybufferbytelength)
///
/// The abstract operation ArrayBufferByteLength takes argument arrayBuffer
/// (an ArrayBuffer) and returns a non-negative integer.
pub(crate) fn array_buffer_byte_length(agent: &Agent, array_buffer: ArrayBuffer) -> usize {
    // 2. Assert: IsDetachedBuffer(arrayBuffer) is false.
    // 3. Return arrayBuffer.[[ArrayBufferByteLength]].
    agent[array_buffer].byte_length()
}

/// #### [25.1.3.3 IsDetachedBuffer ( arrayBuffer )](https://tc39.es/ecma262/#sec-isdetachedbuffer)
///
/// The abstract operation IsDetachedBuffer takes argument *arrayBuffer* (an
/// ArrayBuffer) and returns a Boolean.
pub(crate) fn is_detached_buffer(agent: &Agent, array_buffer: ArrayBuffer) -> bool {
    // 1. If arrayBuffer.[[ArrayBufferData]] is null, return true.
    // 2. Return false.
    agent[array_buffer].is_detached_buffer()
}

/// #### [25.1.3.4 DetachArrayBuffer ( arrayBuffer \[ , key \] )](https://tc39.es/ecma262/#sec-detacharraybuffer)
///
/// The abstract operation DetachArrayBuffer takes argument *arrayBuffer* (an
/// ArrayBuffer) and returns UNUSED. Detaching an already detached buffer
/// does nothing.
pub(crate) fn detach_array_buffer(agent: &mut Agent, array_buffer: ArrayBuffer) {
    let data = &mut agent[array_buffer];
    let byte_length = data.byte_length();
    // 4. Set arrayBuffer.[[ArrayBufferData]] to null.
    // 5. Set arrayBuffer.[[ArrayBufferByteLength]] to 0.
    let previous = core::mem::replace(&mut data.buffer, InternalBuffer::Detached);
    if let InternalBuffer::FixedLength(_) = previous {
        tracing::debug!(?array_buffer, byte_length, "detached ArrayBuffer");
    }
    // 6. Return UNUSED.
}

/// #### [25.1.3.5 CloneArrayBuffer ( srcBuffer, srcByteOffset, srcLength )](https://tc39.es/ecma262/#sec-clonearraybuffer)
///
/// The abstract operation CloneArrayBuffer takes arguments srcBuffer (an
/// ArrayBuffer), srcByteOffset (a non-negative integer), and srcLength (a
/// non-negative integer) and returns either a normal completion containing
/// an ArrayBuffer or a throw completion. It creates a new ArrayBuffer whose
/// data is a copy of srcBuffer's data over the range starting at
/// srcByteOffset and continuing for srcLength bytes.
pub(crate) fn clone_array_buffer(
    agent: &mut Agent,
    src_buffer: ArrayBuffer,
    src_byte_offset: usize,
    src_length: usize,
) -> JsResult<ArrayBuffer> {
    // 1. Assert: IsDetachedBuffer(srcBuffer) is false.
    debug_assert!(!is_detached_buffer(agent, src_buffer));
    // 2. Let targetBuffer be ? AllocateArrayBuffer(%ArrayBuffer%, srcLength).
    let target_buffer = allocate_array_buffer(agent, src_length as u64)?;
    let (src, target) = agent
        .heap
        .array_buffer_pair_mut(src_buffer, target_buffer);
    // 3. Let srcBlock be srcBuffer.[[ArrayBufferData]].
    let src_block = src.get_data_block();
    // 4. Let targetBlock be targetBuffer.[[ArrayBufferData]].
    if let Some(target_block) = target.get_data_block_mut() {
        // 5. Perform CopyDataBlockBytes(targetBlock, 0, srcBlock, srcByteOffset, srcLength).
        target_block.copy_data_block_bytes(0, src_block, src_byte_offset, src_length);
    }
    // 6. Return targetBuffer.
    Ok(target_buffer)
}

/// #### [25.1.3.7 ArrayBufferCopyAndDetach ( arrayBuffer, newLength, preserveResizability )](https://tc39.es/ecma262/#sec-arraybuffercopyanddetach)
///
/// Moves the Data Block of `array_buffer` into a new ArrayBuffer of
/// `new_length` bytes, truncating or zero-extending it, and detaches
/// `array_buffer`.
#[cfg(feature = "array-buffer-transfer")]
pub(crate) fn array_buffer_copy_and_detach(
    agent: &mut Agent,
    array_buffer: ArrayBuffer,
    new_length: Option<u64>,
) -> JsResult<ArrayBuffer> {
    // 4. If newLength is undefined, then
    //   a. Let newByteLength be arrayBuffer.[[ArrayBufferByteLength]].
    // 5. Else,
    //   a. Let newByteLength be ? ToIndex(newLength).
    let new_byte_length =
        new_length.unwrap_or_else(|| array_buffer_byte_length(agent, array_buffer) as u64);
    // 6. If IsDetachedBuffer(arrayBuffer) is true, throw a TypeError exception.
    if is_detached_buffer(agent, array_buffer) {
        return Err(throw_detached_error(agent));
    }
    let limit = agent
        .options
        .max_array_buffer_byte_length
        .min(isize::MAX as u64);
    if new_byte_length > limit {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            format!("Invalid array buffer length {new_byte_length}"),
        ));
    }
    // 10. Let newBuffer be ? AllocateArrayBuffer(%ArrayBuffer%, newByteLength, newMaxByteLength).
    // 11. Let copyLength be min(newByteLength, arrayBuffer.[[ArrayBufferByteLength]]).
    // 12. Let fromBlock be arrayBuffer.[[ArrayBufferData]].
    // 13. Let toBlock be newBuffer.[[ArrayBufferData]].
    // 14. Perform CopyDataBlockBytes(toBlock, 0, fromBlock, 0, copyLength).
    // 15. NOTE: Neither creation of the new Data Block nor copying from the
    //     old Data Block are observable. Implementations may implement this
    //     method as a zero-copy move or a realloc.
    let InternalBuffer::FixedLength(mut block) =
        core::mem::replace(&mut agent[array_buffer].buffer, InternalBuffer::Detached)
    else {
        return Err(throw_detached_error(agent));
    };
    if let Err(err) = block.resize(agent, new_byte_length as usize) {
        agent[array_buffer].buffer = InternalBuffer::FixedLength(block);
        return Err(err);
    }
    // 16. Perform ! DetachArrayBuffer(arrayBuffer).
    tracing::debug!(
        ?array_buffer,
        new_byte_length,
        "transferred ArrayBuffer contents"
    );
    // 17. Return newBuffer.
    Ok(agent
        .heap
        .create(ArrayBufferHeapData::new_fixed_length(block)))
}

/// #### [25.1.3.15 GetValueFromBuffer ( arrayBuffer, byteIndex, type, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-getvaluefrombuffer)
///
/// The abstract operation GetValueFromBuffer takes arguments arrayBuffer (an
/// ArrayBuffer), byteIndex (a non-negative integer), and type (a TypedArray
/// element type) and optional argument isLittleEndian (a Boolean) and
/// returns a Number or a BigInt.
///
/// Reads past the end of the buffer, including reads from detached
/// buffers, return the default value; callers check bounds first.
pub(crate) fn get_value_from_buffer<T: Viewable>(
    agent: &Agent,
    array_buffer: ArrayBuffer,
    byte_index: usize,
    is_little_endian: Option<bool>,
) -> T {
    // 1. Assert: IsDetachedBuffer(arrayBuffer) is false.
    debug_assert!(!is_detached_buffer(agent, array_buffer));
    // 5. If isLittleEndian is not present, set isLittleEndian to the value of
    //    the [[LittleEndian]] field of the surrounding agent's Agent Record.
    let is_little_endian = is_little_endian.unwrap_or(agent.options.little_endian);
    // 3. Let block be arrayBuffer.[[ArrayBufferData]].
    // 6. Return RawBytesToNumeric(type, rawValue, isLittleEndian).
    agent[array_buffer]
        .get_data_block()
        .get::<T>(byte_index, is_little_endian)
        .unwrap_or_default()
}

/// #### [25.1.3.17 SetValueInBuffer ( arrayBuffer, byteIndex, type, value, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-setvalueinbuffer)
///
/// The abstract operation SetValueInBuffer takes arguments arrayBuffer (an
/// ArrayBuffer), byteIndex (a non-negative integer), type (a TypedArray
/// element type), and value (a Number or a BigInt) and optional argument
/// isLittleEndian (a Boolean) and returns UNUSED.
pub(crate) fn set_value_in_buffer<T: Viewable>(
    agent: &mut Agent,
    array_buffer: ArrayBuffer,
    byte_index: usize,
    value: T,
    is_little_endian: Option<bool>,
) {
    // 1. Assert: IsDetachedBuffer(arrayBuffer) is false.
    debug_assert!(!is_detached_buffer(agent, array_buffer));
    // 7. If isLittleEndian is not present, set isLittleEndian to the value of
    //    the [[LittleEndian]] field of the surrounding agent's Agent Record.
    let is_little_endian = is_little_endian.unwrap_or(agent.options.little_endian);
    // 6. Let block be arrayBuffer.[[ArrayBufferData]].
    // 8. Let rawBytes be NumericToRawBytes(type, value, isLittleEndian).
    // 9. Store the individual bytes of rawBytes into block, starting at
    //    block[byteIndex].
    if let Some(block) = agent[array_buffer].get_data_block_mut() {
        block.set(byte_index, value, is_little_endian);
    }
    // 10. Return UNUSED.
}
