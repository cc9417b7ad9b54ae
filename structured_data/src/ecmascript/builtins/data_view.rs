// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.3 DataView Objects](https://tc39.es/ecma262/#sec-dataview-objects)
//!
//! A DataView reads and writes values of any element type at arbitrary,
//! unaligned byte offsets of an ArrayBuffer. The byte order is chosen per
//! access.

pub(crate) mod abstract_operations;
pub mod data;

use self::abstract_operations::{
    create_data_view, get_view_element, make_data_view_with_buffer_witness_record,
    is_view_out_of_bounds, set_view_element,
};
use crate::{
    ecmascript::{
        builtins::array_buffer::ArrayBuffer,
        execution::{Agent, JsResult},
        types::{ElementType, Numeric, Value, Viewable, with_element_type},
    },
    heap::indexes::DataViewIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataView(pub(crate) DataViewIndex);

impl DataView {
    /// Creates a view of `byte_length` bytes of `buffer` starting at
    /// `byte_offset`, or of the rest of the buffer if `byte_length` is
    /// `None`.
    pub fn new(
        agent: &mut Agent,
        buffer: ArrayBuffer,
        byte_offset: usize,
        byte_length: Option<usize>,
    ) -> JsResult<Self> {
        create_data_view(
            agent,
            &buffer.into(),
            Value::Number(byte_offset as f64),
            byte_length.map_or(Value::Undefined, |length| Value::Number(length as f64)),
        )
    }

    pub fn viewed_array_buffer(self, agent: &Agent) -> ArrayBuffer {
        agent[self].viewed_array_buffer
    }

    pub fn is_detached(self, agent: &Agent) -> bool {
        self.viewed_array_buffer(agent).is_detached(agent)
    }

    pub fn release(self, agent: &mut Agent) -> bool {
        agent.heap.release_data_view(self)
    }

    /// Byte length of the view; zero once the buffer is detached.
    pub fn byte_length(self, agent: &Agent) -> usize {
        let record = make_data_view_with_buffer_witness_record(agent, self);
        if is_view_out_of_bounds(agent, &record) {
            0
        } else {
            agent[self].byte_length
        }
    }

    /// Byte offset of the view; zero once the buffer is detached.
    pub fn byte_offset(self, agent: &Agent) -> usize {
        if self.is_detached(agent) {
            0
        } else {
            agent[self].byte_offset
        }
    }

    /// Reads a `T` at `byte_offset` with the given byte order.
    pub fn get<T: Viewable>(
        self,
        agent: &mut Agent,
        byte_offset: usize,
        little_endian: bool,
    ) -> JsResult<T> {
        get_view_element::<T>(agent, self, byte_offset as u64, little_endian)
    }

    /// Writes a `T` at `byte_offset` with the given byte order.
    pub fn set<T: Viewable>(
        self,
        agent: &mut Agent,
        byte_offset: usize,
        value: T,
        little_endian: bool,
    ) -> JsResult<()> {
        set_view_element::<T>(agent, self, byte_offset as u64, value, little_endian)
    }

    /// Reads an element of `element_type` at `byte_offset`.
    pub fn get_value(
        self,
        agent: &mut Agent,
        byte_offset: usize,
        element_type: ElementType,
        little_endian: bool,
    ) -> JsResult<Numeric> {
        with_element_type!(element_type, T, {
            Ok(self
                .get::<T>(agent, byte_offset, little_endian)?
                .into_numeric())
        })
    }

    /// Coerces `value` to `element_type` and writes it at `byte_offset`.
    ///
    /// Coercion may call into user code; a buffer detached by it is a
    /// TypeError and nothing is written.
    pub fn set_value(
        self,
        agent: &mut Agent,
        byte_offset: usize,
        element_type: ElementType,
        little_endian: bool,
        value: Value,
    ) -> JsResult<()> {
        let numeric = element_type.coerce(agent, value)?;
        with_element_type!(element_type, T, {
            self.set::<T>(agent, byte_offset, T::from_numeric(&numeric), little_endian)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::ExceptionType;

    #[test]
    fn endianness_is_chosen_per_call() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
        let view = DataView::new(&mut agent, buffer, 0, None).unwrap();
        view.set::<u16>(&mut agent, 1, 0x1234, false).unwrap();
        assert_eq!(buffer.as_slice(&agent), &[0, 0x12, 0x34, 0]);
        assert_eq!(view.get::<u16>(&mut agent, 1, true).unwrap(), 0x3412);
        assert_eq!(view.get::<u16>(&mut agent, 1, false).unwrap(), 0x1234);
    }

    #[test]
    fn unaligned_access_within_offset_view() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 16).unwrap();
        let view = DataView::new(&mut agent, buffer, 3, Some(9)).unwrap();
        assert_eq!(view.byte_length(&agent), 9);
        assert_eq!(view.byte_offset(&agent), 3);
        view.set::<f64>(&mut agent, 1, 1.5, true).unwrap();
        assert_eq!(view.get::<f64>(&mut agent, 1, true).unwrap(), 1.5);
        assert_eq!(&buffer.as_slice(&agent)[4..12], &1.5f64.to_le_bytes());
    }

    #[test]
    fn access_past_the_end_is_a_range_error() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        let view = DataView::new(&mut agent, buffer, 4, None).unwrap();
        assert!(view.get::<u32>(&mut agent, 0, true).is_ok());
        let error = view.get::<u32>(&mut agent, 1, true).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
        let error = view.set::<u8>(&mut agent, 4, 1, true).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
    }

    #[test]
    fn construction_outside_the_buffer() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        let error = DataView::new(&mut agent, buffer, 9, None).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
        let error = DataView::new(&mut agent, buffer, 4, Some(5)).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::RangeError));
        let empty = DataView::new(&mut agent, buffer, 8, None).unwrap();
        assert_eq!(empty.byte_length(&agent), 0);
    }

    #[test]
    fn detached_view() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        let view = DataView::new(&mut agent, buffer, 2, None).unwrap();
        buffer.detach(&mut agent);
        assert_eq!(view.byte_length(&agent), 0);
        assert_eq!(view.byte_offset(&agent), 0);
        let error = view.get::<i8>(&mut agent, 0, true).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
        let error = DataView::new(&mut agent, buffer, 0, None).unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    }

    #[test]
    fn big_int_values() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
        let view = DataView::new(&mut agent, buffer, 0, None).unwrap();
        view.set_value(
            &mut agent,
            0,
            ElementType::BigInt64,
            true,
            Value::BigInt((-2).into()),
        )
        .unwrap();
        assert_eq!(
            view.get_value(&mut agent, 0, ElementType::BigUint64, true)
                .unwrap(),
            Numeric::BigInt(u64::MAX.saturating_sub(1).into())
        );
        let error = view
            .set_value(&mut agent, 0, ElementType::BigInt64, true, Value::Number(1.0))
            .unwrap_err();
        assert_eq!(error.exception_type(&agent), Some(ExceptionType::TypeError));
    }
}
