// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.1 ArrayBuffer Objects](https://tc39.es/ecma262/#sec-arraybuffer-objects)

pub(crate) mod abstract_operations;
mod data;

pub(crate) use abstract_operations::{
    allocate_array_buffer, array_buffer_byte_length, clone_array_buffer, detach_array_buffer,
    get_value_from_buffer, is_detached_buffer, set_value_in_buffer, throw_detached_error,
};
pub use data::ArrayBufferHeapData;

use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType, JsResult},
        types::Value,
    },
    heap::indexes::ArrayBufferIndex,
};

/// An owned, fixed-size, zero-initialised byte region that can be detached
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayBuffer(pub(crate) ArrayBufferIndex);

impl ArrayBuffer {
    /// Allocates a new zero-filled ArrayBuffer.
    ///
    /// Negative lengths and lengths above the configured maximum are
    /// RangeErrors, as are lengths the allocator cannot satisfy.
    pub fn allocate(agent: &mut Agent, byte_length: i64) -> JsResult<Self> {
        if byte_length < 0 {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!("Invalid array buffer length {byte_length}"),
            ));
        }
        allocate_array_buffer(agent, byte_length as u64)
    }

    /// Byte length of the buffer; zero once detached.
    pub fn byte_length(self, agent: &Agent) -> usize {
        array_buffer_byte_length(agent, self)
    }

    pub fn is_detached(self, agent: &Agent) -> bool {
        is_detached_buffer(agent, self)
    }

    /// Frees the heap slot of the buffer. Refused, returning false, while a
    /// TypedArray or DataView still views it. The handle must not be used
    /// after a successful release.
    pub fn release(self, agent: &mut Agent) -> bool {
        agent.heap.release_array_buffer(self)
    }

    /// Detaches the buffer, releasing its storage. Every view over the
    /// buffer becomes unusable.
    pub fn detach(self, agent: &mut Agent) {
        detach_array_buffer(agent, self)
    }

    /// Returns true if both buffers refer to the same live byte storage.
    pub fn same_storage(self, agent: &Agent, other: ArrayBuffer) -> bool {
        self == other && !self.is_detached(agent)
    }

    /// The bytes of the buffer; empty once detached.
    pub fn as_slice(self, agent: &Agent) -> &[u8] {
        agent[self].get_data_block().as_slice()
    }

    /// The bytes of the buffer; empty once detached.
    pub fn as_mut_slice(self, agent: &mut Agent) -> &mut [u8] {
        match agent[self].get_data_block_mut() {
            Some(block) => block.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Copies `count` bytes from `source` starting at `source_offset` into
    /// `target` starting at `target_offset`.
    ///
    /// Copies within one buffer behave as if the source bytes were first
    /// copied to a temporary buffer. Detached buffers are TypeErrors and
    /// ranges exceeding either buffer are RangeErrors.
    pub fn copy_bytes(
        agent: &mut Agent,
        target: ArrayBuffer,
        target_offset: usize,
        source: ArrayBuffer,
        source_offset: usize,
        count: usize,
    ) -> JsResult<()> {
        if target.is_detached(agent) || source.is_detached(agent) {
            return Err(throw_detached_error(agent));
        }
        let source_fits = source_offset
            .checked_add(count)
            .is_some_and(|end| end <= source.byte_length(agent));
        let target_fits = target_offset
            .checked_add(count)
            .is_some_and(|end| end <= target.byte_length(agent));
        if !source_fits || !target_fits {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Byte range is outside of the ArrayBuffer",
            ));
        }
        if source == target {
            if let Some(block) = agent[target].get_data_block_mut() {
                block.copy_within(target_offset, source_offset, count);
            }
            return Ok(());
        }
        let (source, target) = agent.heap.array_buffer_pair_mut(source, target);
        if let Some(target_block) = target.get_data_block_mut() {
            target_block.copy_data_block_bytes(
                target_offset,
                source.get_data_block(),
                source_offset,
                count,
            );
        }
        Ok(())
    }

    /// ### [25.1.6.7 ArrayBuffer.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.slice)
    ///
    /// Copies the bytes between the relative indices `start` and `end` into
    /// a new ArrayBuffer.
    pub fn slice(self, agent: &mut Agent, start: f64, end: Option<f64>) -> JsResult<ArrayBuffer> {
        let end = end.map_or(Value::Undefined, Value::Number);
        let result = agent.invoke(self.into(), "slice", &[Value::Number(start), end])?;
        let Value::ArrayBuffer(result) = result else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "ArrayBuffer.prototype.slice did not return an ArrayBuffer",
            ));
        };
        Ok(result)
    }

    /// ### [ArrayBuffer.prototype.transfer ( \[ newLength \] )](https://tc39.es/proposal-arraybuffer-transfer/#sec-arraybuffer.prototype.transfer)
    ///
    /// Moves the contents of this buffer into a new buffer of `new_length`
    /// bytes, or of the same length if `None`, and detaches this buffer.
    #[cfg(feature = "array-buffer-transfer")]
    pub fn transfer(self, agent: &mut Agent, new_length: Option<u64>) -> JsResult<ArrayBuffer> {
        abstract_operations::array_buffer_copy_and_detach(agent, self, new_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_zero_filled() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 16).unwrap();
        assert_eq!(buffer.byte_length(&agent), 16);
        assert!(buffer.as_slice(&agent).iter().all(|b| *b == 0));
        assert!(!buffer.is_detached(&agent));
    }

    #[test]
    fn allocate_negative_length() {
        let mut agent = Agent::default();
        let error = ArrayBuffer::allocate(&mut agent, -1).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::RangeError)
        );
    }

    #[test]
    fn detach_is_terminal() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        buffer.detach(&mut agent);
        assert!(buffer.is_detached(&agent));
        assert_eq!(buffer.byte_length(&agent), 0);
        assert!(buffer.as_slice(&agent).is_empty());
        buffer.detach(&mut agent);
        assert!(buffer.is_detached(&agent));
        assert!(!buffer.same_storage(&agent, buffer));
    }

    #[test]
    fn copy_bytes_between_buffers() {
        let mut agent = Agent::default();
        let source = ArrayBuffer::allocate(&mut agent, 4).unwrap();
        source.as_mut_slice(&mut agent).copy_from_slice(&[1, 2, 3, 4]);
        let target = ArrayBuffer::allocate(&mut agent, 4).unwrap();
        ArrayBuffer::copy_bytes(&mut agent, target, 1, source, 0, 3).unwrap();
        assert_eq!(target.as_slice(&agent), &[0, 1, 2, 3]);

        ArrayBuffer::copy_bytes(&mut agent, source, 1, source, 0, 3).unwrap();
        assert_eq!(source.as_slice(&agent), &[1, 1, 2, 3]);

        let error = ArrayBuffer::copy_bytes(&mut agent, target, 2, source, 0, 3).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::RangeError)
        );

        source.detach(&mut agent);
        let error = ArrayBuffer::copy_bytes(&mut agent, target, 0, source, 0, 0).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::TypeError)
        );
    }

    #[cfg(feature = "array-buffer-transfer")]
    #[test]
    fn transfer_detaches_source() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
        buffer.as_mut_slice(&mut agent).copy_from_slice(&[1, 2, 3, 4]);
        let grown = buffer.transfer(&mut agent, Some(6)).unwrap();
        assert!(buffer.is_detached(&agent));
        assert_eq!(grown.as_slice(&agent), &[1, 2, 3, 4, 0, 0]);
        let shrunk = grown.transfer(&mut agent, Some(2)).unwrap();
        assert_eq!(shrunk.as_slice(&agent), &[1, 2]);
        let same = shrunk.transfer(&mut agent, None).unwrap();
        assert_eq!(same.as_slice(&agent), &[1, 2]);
        let error = buffer.transfer(&mut agent, None).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::TypeError)
        );
    }
}
