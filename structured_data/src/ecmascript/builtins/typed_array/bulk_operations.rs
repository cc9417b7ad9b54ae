// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element kind specialised implementations of the TypedArray bulk
//! algorithms.
//!
//! Every entry point dispatches on the [`ElementType`] of its operands with
//! [`with_element_type!`] and runs a kernel monomorphised over the
//! [`Viewable`] element representation. Kernels work on the raw bytes of
//! the viewed buffer; callers are responsible for checking that the buffer
//! is attached and that index ranges are within the view.

use core::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::TypedArray;
use crate::ecmascript::{
    abstract_operations::testing_and_comparison::number_same_value,
    execution::Agent,
    types::{ElementType, Numeric, Viewable, with_element_type},
};

/// The equality used by a linear search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchMode {
    /// IEEE equality: NaN never matches and +0 equals -0.
    StrictEquality,
    /// NaN matches NaN and +0 does not equal -0.
    SameValue,
}

/// Direction and starting point of a linear search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchDirection {
    /// Search indices `from..len`.
    Forward { from: usize },
    /// Search indices `from..=0`.
    Backward { from: usize },
}

fn view_bytes(agent: &Agent, ta: TypedArray) -> &[u8] {
    let data = &agent[ta];
    let bytes = agent[data.viewed_array_buffer].get_data_block().as_slice();
    bytes
        .get(data.byte_offset..data.byte_offset + data.byte_length)
        .unwrap_or(&[])
}

fn view_bytes_mut(agent: &mut Agent, ta: TypedArray) -> &mut [u8] {
    let data = &agent[ta];
    let buffer = data.viewed_array_buffer;
    let range = data.byte_offset..data.byte_offset + data.byte_length;
    match agent[buffer].get_data_block_mut() {
        Some(block) => block.as_mut_slice().get_mut(range).unwrap_or(&mut []),
        None => &mut [],
    }
}

/// Decodes the element at `index` of a byte slice holding elements of `T`.
#[inline]
fn read_at<T: Viewable>(bytes: &[u8], index: usize, little_endian: bool) -> T {
    T::read_bytes(&bytes[index * T::BYTES..(index + 1) * T::BYTES], little_endian)
}

#[inline]
fn write_at<T: Viewable>(bytes: &mut [u8], index: usize, value: T, little_endian: bool) {
    value.write_bytes(
        &mut bytes[index * T::BYTES..(index + 1) * T::BYTES],
        little_endian,
    )
}

/// Decodes all elements of `ta` into numeric values.
pub(crate) fn decode(agent: &Agent, ta: TypedArray) -> Vec<Numeric> {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes(agent, ta);
    with_element_type!(element_type, T, {
        bytes
            .chunks_exact(T::BYTES)
            .map(|chunk| T::read_bytes(chunk, little_endian).into_numeric())
            .collect()
    })
}

/// Encodes `values` into the first `values.len()` elements of `ta`.
pub(crate) fn encode(agent: &mut Agent, ta: TypedArray, values: &[Numeric]) {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes_mut(agent, ta);
    with_element_type!(element_type, T, {
        for (chunk, value) in bytes.chunks_exact_mut(T::BYTES).zip(values) {
            T::from_numeric(value).write_bytes(chunk, little_endian);
        }
    })
}

fn fill_elements<T: Viewable>(
    bytes: &mut [u8],
    value: &Numeric,
    start: usize,
    end: usize,
    little_endian: bool,
) {
    let mut encoded = [0u8; 8];
    T::from_numeric(value).write_bytes(&mut encoded, little_endian);
    for chunk in bytes[start * T::BYTES..end * T::BYTES].chunks_exact_mut(T::BYTES) {
        chunk.copy_from_slice(&encoded[..T::BYTES]);
    }
}

/// Writes `value` into the elements `start..end` of `ta`.
pub(crate) fn fill(agent: &mut Agent, ta: TypedArray, value: &Numeric, start: usize, end: usize) {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes_mut(agent, ta);
    if start >= end {
        return;
    }
    with_element_type!(element_type, T, {
        fill_elements::<T>(bytes, value, start, end, little_endian)
    })
}

/// Reverses the elements of `ta` in place.
pub(crate) fn reverse(agent: &mut Agent, ta: TypedArray) {
    let element_size = agent[ta].element_type.element_size();
    let bytes = view_bytes_mut(agent, ta);
    let len = bytes.len() / element_size;
    let (mut lower, mut upper) = (0, len);
    while lower + 1 < upper {
        upper -= 1;
        let (head, tail) = bytes.split_at_mut(upper * element_size);
        head[lower * element_size..(lower + 1) * element_size]
            .swap_with_slice(&mut tail[..element_size]);
        lower += 1;
    }
}

/// Moves `count` elements of `ta` from index `from` to index `to`. The
/// ranges may overlap.
pub(crate) fn copy_within(agent: &mut Agent, ta: TypedArray, to: usize, from: usize, count: usize) {
    let element_size = agent[ta].element_type.element_size();
    let bytes = view_bytes_mut(agent, ta);
    bytes.copy_within(
        from * element_size..(from + count) * element_size,
        to * element_size,
    );
}

fn big_int_key<T: Viewable>(key: &BigInt) -> Option<u64> {
    if T::ELEMENT_TYPE == ElementType::BigInt64 {
        key.to_i64().map(|key| key as u64)
    } else {
        key.to_u64()
    }
}

fn search_elements<T: Viewable>(
    bytes: &[u8],
    key: &Numeric,
    direction: SearchDirection,
    mode: SearchMode,
    little_endian: bool,
) -> Option<usize> {
    let len = bytes.len() / T::BYTES;
    let mut matches: Box<dyn FnMut(usize) -> bool + '_> = match key {
        Numeric::Number(_) if T::IS_BIGINT => return None,
        Numeric::BigInt(_) if !T::IS_BIGINT => return None,
        Numeric::BigInt(key) => {
            let key = big_int_key::<T>(key)?;
            Box::new(move |index| read_at::<T>(bytes, index, little_endian).into_bits() == key)
        }
        Numeric::Number(key) => {
            let key = *key;
            if !T::IS_FLOAT && (key.fract() != 0.0 || !key.is_finite()) {
                return None;
            }
            Box::new(move |index| {
                let element = read_at::<T>(bytes, index, little_endian).into_f64();
                match mode {
                    SearchMode::SameValue if T::IS_FLOAT => number_same_value(element, key),
                    _ => element == key,
                }
            })
        }
    };
    match direction {
        SearchDirection::Forward { from } => (from..len).find(|&index| matches(index)),
        SearchDirection::Backward { from } => {
            if len == 0 {
                return None;
            }
            (0..=from.min(len - 1)).rev().find(|&index| matches(index))
        }
    }
}

/// Linear search for `key` in `ta`. Keys of the wrong content type are
/// never found.
pub(crate) fn search(
    agent: &Agent,
    ta: TypedArray,
    key: &Numeric,
    direction: SearchDirection,
    mode: SearchMode,
) -> Option<usize> {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes(agent, ta);
    with_element_type!(element_type, T, {
        search_elements::<T>(bytes, key, direction, mode, little_endian)
    })
}

fn sort_elements<T: Viewable>(bytes: &mut [u8], little_endian: bool) {
    let mut elements: Vec<T> = bytes
        .chunks_exact(T::BYTES)
        .map(|chunk| T::read_bytes(chunk, little_endian))
        .collect();
    elements.sort_by(T::ecmascript_cmp);
    for (chunk, element) in bytes.chunks_exact_mut(T::BYTES).zip(elements) {
        element.write_bytes(chunk, little_endian);
    }
}

/// Sorts `ta` in place in ascending numeric order. NaNs sort last and are
/// written back in canonical form.
pub(crate) fn sort_default(agent: &mut Agent, ta: TypedArray) {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes_mut(agent, ta);
    with_element_type!(element_type, T, sort_elements::<T>(bytes, little_endian))
}

fn join_elements<T: Viewable>(bytes: &[u8], separator: &str, little_endian: bool) -> String {
    let mut result = String::with_capacity(bytes.len() / T::BYTES * (separator.len() + 2));
    for (index, chunk) in bytes.chunks_exact(T::BYTES).enumerate() {
        if index > 0 {
            result.push_str(separator);
        }
        result.push_str(&T::read_bytes(chunk, little_endian).to_display_string());
    }
    result
}

/// Formats every element of `ta` and joins them with `separator`.
pub(crate) fn join(agent: &Agent, ta: TypedArray, separator: &str) -> String {
    let little_endian = agent.options.little_endian;
    let element_type = agent[ta].element_type;
    let bytes = view_bytes(agent, ta);
    with_element_type!(element_type, T, {
        join_elements::<T>(bytes, separator, little_endian)
    })
}

fn convert_elements<S: Viewable, T: Viewable>(
    source: &[u8],
    target: &mut [u8],
    count: usize,
    little_endian: bool,
) {
    for index in 0..count {
        let value = read_at::<S>(source, index, little_endian);
        write_at::<T>(target, index, T::convert_from(value), little_endian);
    }
}

fn convert(
    source_type: ElementType,
    source: &[u8],
    target_type: ElementType,
    target: &mut [u8],
    count: usize,
    little_endian: bool,
) {
    with_element_type!(source_type, S, {
        with_element_type!(target_type, T, {
            convert_elements::<S, T>(source, target, count, little_endian)
        })
    })
}

/// Copies `count` elements from `source` starting at `source_index` into
/// `target` starting at `target_index`, converting between element types
/// as needed.
///
/// The element types must have the same content type and both views must
/// be attached with the ranges in bounds. When both views share a buffer
/// the copy behaves as if the source elements were first copied to a
/// temporary buffer.
pub(crate) fn copy_elements(
    agent: &mut Agent,
    source: TypedArray,
    source_index: usize,
    target: TypedArray,
    target_index: usize,
    count: usize,
) {
    let little_endian = agent.options.little_endian;
    let source_data = &agent[source];
    let source_type = source_data.element_type;
    let source_buffer = source_data.viewed_array_buffer;
    let source_byte_index = source_data.byte_offset + source_index * source_type.element_size();
    let target_data = &agent[target];
    let target_type = target_data.element_type;
    let target_buffer = target_data.viewed_array_buffer;
    let target_byte_index = target_data.byte_offset + target_index * target_type.element_size();
    debug_assert!(source_type.is_compatible_with(target_type));
    let source_byte_count = count * source_type.element_size();
    let target_byte_count = count * target_type.element_size();

    if source_buffer == target_buffer {
        let Some(block) = agent[target_buffer].get_data_block_mut() else {
            return;
        };
        if source_type == target_type {
            tracing::trace!(?source_type, count, "copying elements within buffer");
            block.copy_within(target_byte_index, source_byte_index, source_byte_count);
        } else {
            tracing::trace!(
                ?source_type,
                ?target_type,
                count,
                "converting elements within buffer"
            );
            let snapshot =
                block.as_slice()[source_byte_index..source_byte_index + source_byte_count].to_vec();
            let target_bytes = &mut block.as_mut_slice()
                [target_byte_index..target_byte_index + target_byte_count];
            convert(
                source_type,
                &snapshot,
                target_type,
                target_bytes,
                count,
                little_endian,
            );
        }
        return;
    }

    let (source_data, target_data) = agent
        .heap
        .array_buffer_pair_mut(source_buffer, target_buffer);
    let Some(target_block) = target_data.get_data_block_mut() else {
        return;
    };
    if source_type == target_type {
        tracing::trace!(?source_type, count, "copying elements between buffers");
        target_block.copy_data_block_bytes(
            target_byte_index,
            source_data.get_data_block(),
            source_byte_index,
            source_byte_count,
        );
    } else {
        tracing::trace!(
            ?source_type,
            ?target_type,
            count,
            "converting elements between buffers"
        );
        let source_bytes = &source_data.get_data_block().as_slice()
            [source_byte_index..source_byte_index + source_byte_count];
        let target_bytes = &mut target_block.as_mut_slice()
            [target_byte_index..target_byte_index + target_byte_count];
        convert(
            source_type,
            source_bytes,
            target_type,
            target_bytes,
            count,
            little_endian,
        );
    }
}

/// Stable merge sort driven by a fallible comparator.
///
/// The first error returned by `compare` stops the sort and is returned.
/// Comparators that are not consistent produce some permutation of the
/// input.
pub(crate) fn merge_sort_by<T, E>(
    items: Vec<T>,
    compare: &mut impl FnMut(&T, &T) -> Result<Ordering, E>,
) -> Result<Vec<T>, E> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort_by(left, compare)?;
    let right = merge_sort_by(right, compare)?;
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r)? == Ordering::Greater,
            _ => break,
        };
        if take_right {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
