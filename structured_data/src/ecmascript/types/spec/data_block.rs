// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.9 Data Blocks](https://tc39.es/ecma262/#sec-data-blocks)

use super::Viewable;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};

/// # Data Block
///
/// A contiguous, zero-initialised, fixed-size run of bytes. Data Blocks
/// never alias each other: every ArrayBuffer owns exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DataBlock(Vec<u8>);

impl DataBlock {
    pub(crate) const fn new_empty() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Reads a `T` from `byte_offset`, or `None` if it would read past the
    /// end of the block.
    pub(crate) fn get<T: Viewable>(&self, byte_offset: usize, little_endian: bool) -> Option<T> {
        let end = byte_offset.checked_add(T::BYTES)?;
        let bytes = self.0.get(byte_offset..end)?;
        Some(T::read_bytes(bytes, little_endian))
    }

    /// Writes `value` at `byte_offset`. Writes past the end of the block are
    /// ignored.
    pub(crate) fn set<T: Viewable>(&mut self, byte_offset: usize, value: T, little_endian: bool) {
        let Some(end) = byte_offset.checked_add(T::BYTES) else {
            return;
        };
        if let Some(bytes) = self.0.get_mut(byte_offset..end) {
            value.write_bytes(bytes, little_endian);
        }
    }

    /// Copies `count` bytes from `src_offset` to `dst_offset` within this
    /// block. The ranges may overlap.
    pub(crate) fn copy_within(&mut self, dst_offset: usize, src_offset: usize, count: usize) {
        assert!(src_offset + count <= self.len());
        assert!(dst_offset + count <= self.len());
        self.0
            .copy_within(src_offset..src_offset + count, dst_offset);
    }

    /// Changes the length of the block, zero-filling any new bytes.
    ///
    /// Fails with a RangeError if the new bytes cannot be allocated.
    pub(crate) fn resize(&mut self, agent: &mut Agent, new_len: usize) -> JsResult<()> {
        if new_len > self.len() {
            let additional = new_len - self.len();
            if self.0.try_reserve_exact(additional).is_err() {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    format!("Cannot allocate ArrayBuffer of {new_len} bytes"),
                ));
            }
        }
        self.0.resize(new_len, 0);
        Ok(())
    }

    /// ### [6.2.9.1 CreateByteDataBlock ( size )](https://tc39.es/ecma262/#sec-createbytedatablock)
    ///
    /// The abstract operation CreateByteDataBlock takes argument size (a
    /// non-negative integer) and returns either a normal completion
    /// containing a Data Block or a throw completion.
    pub(crate) fn create_byte_data_block(agent: &mut Agent, size: u64) -> JsResult<Self> {
        let limit = agent
            .options
            .max_array_buffer_byte_length
            .min(isize::MAX as u64);
        // 1. If size > 2**53 - 1, throw a RangeError exception.
        if size > limit {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!("Invalid array buffer length {size}"),
            ));
        }
        let size = size as usize;
        // 2. Let db be a new Data Block value consisting of size bytes. If it
        //    is impossible to create such a Data Block, throw a RangeError
        //    exception.
        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(size).is_err() {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                format!("Cannot allocate ArrayBuffer of {size} bytes"),
            ));
        }
        // 3. Set all of the bytes of db to 0.
        bytes.resize(size, 0);
        // 4. Return db.
        Ok(Self(bytes))
    }

    /// ### [6.2.9.3 CopyDataBlockBytes ( toBlock, toIndex, fromBlock, fromIndex, count )](https://tc39.es/ecma262/#sec-copydatablockbytes)
    ///
    /// The abstract operation CopyDataBlockBytes takes arguments toBlock (a
    /// Data Block), toIndex (a non-negative integer), fromBlock (a Data
    /// Block), fromIndex (a non-negative integer), and count (a non-negative
    /// integer) and returns UNUSED.
    pub(crate) fn copy_data_block_bytes(
        &mut self,
        to_index: usize,
        from_block: &Self,
        from_index: usize,
        count: usize,
    ) {
        let to_block = self;
        // 1. Assert: fromBlock and toBlock are distinct values.
        // 2. Let fromSize be the number of bytes in fromBlock.
        // 3. Assert: fromIndex + count ≤ fromSize.
        assert!(from_index + count <= from_block.len());
        // 4. Let toSize be the number of bytes in toBlock.
        // 5. Assert: toIndex + count ≤ toSize.
        assert!(to_index + count <= to_block.len());
        // 6. Repeat, while count > 0,
        //   b. Else,
        //     ii. Set toBlock[toIndex] to fromBlock[fromIndex].
        to_block.0[to_index..to_index + count]
            .copy_from_slice(&from_block.0[from_index..from_index + count]);
        // 7. Return UNUSED.
    }
}

#[test]
fn new_data_block() {
    let mut agent = Agent::default();
    let db = DataBlock::create_byte_data_block(&mut agent, 0).unwrap();
    assert_eq!(db.len(), 0);
    assert_eq!(db.get::<u8>(0, true), None);

    let db = DataBlock::create_byte_data_block(&mut agent, 8).unwrap();
    assert_eq!(db.len(), 8);
    for i in 0..8 {
        assert_eq!(db.get::<u8>(i, true), Some(0));
    }
}

#[test]
fn data_block_too_large() {
    let mut agent = Agent::default();
    let error = DataBlock::create_byte_data_block(&mut agent, 1 << 53).unwrap_err();
    assert_eq!(
        error.exception_type(&agent),
        Some(ExceptionType::RangeError)
    );
}

#[test]
fn data_block_set() {
    let mut agent = Agent::default();
    let mut db = DataBlock::create_byte_data_block(&mut agent, 8).unwrap();
    for i in 0..8 {
        db.set::<u8>(i, i as u8 + 1, true);
    }
    for i in 0..8 {
        assert_eq!(db.get::<u8>(i, true), Some(i as u8 + 1));
    }
    // Out of range writes are ignored.
    db.set::<u32>(6, u32::MAX, true);
    assert_eq!(db.get::<u8>(7, true), Some(8));
}

#[test]
fn data_block_byte_order() {
    let mut agent = Agent::default();
    let mut db = DataBlock::create_byte_data_block(&mut agent, 4).unwrap();
    db.set::<u32>(0, 0x0102_0304, true);
    assert_eq!(db.as_slice(), &[4, 3, 2, 1]);
    assert_eq!(db.get::<u32>(0, false), Some(0x0403_0201));
    db.set::<u16>(0, 0x0102, false);
    assert_eq!(&db.as_slice()[..2], &[1, 2]);
}

#[test]
fn data_block_resize() {
    let mut agent = Agent::default();
    let mut db = DataBlock::create_byte_data_block(&mut agent, 4).unwrap();
    db.set::<u32>(0, u32::MAX, true);
    db.resize(&mut agent, 8).unwrap();
    assert_eq!(db.as_slice(), &[255, 255, 255, 255, 0, 0, 0, 0]);
    db.resize(&mut agent, 2).unwrap();
    assert_eq!(db.as_slice(), &[255, 255]);
}

#[test]
fn data_block_copy_within() {
    let mut agent = Agent::default();
    let mut db = DataBlock::create_byte_data_block(&mut agent, 8).unwrap();
    for i in 0..8 {
        db.set::<u8>(i, i as u8 + 1, true);
    }
    db.copy_within(2, 0, 4);
    assert_eq!(db.as_slice(), &[1, 2, 1, 2, 3, 4, 7, 8]);
    db.copy_within(0, 4, 4);
    assert_eq!(db.as_slice(), &[3, 4, 7, 8, 3, 4, 7, 8]);
}

#[test]
fn data_block_copy_data_block_bytes() {
    let mut agent = Agent::default();
    let mut source = DataBlock::create_byte_data_block(&mut agent, 4).unwrap();
    source.set::<u32>(0, 0x0403_0201, true);
    let mut target = DataBlock::create_byte_data_block(&mut agent, 6).unwrap();
    target.copy_data_block_bytes(1, &source, 1, 3);
    assert_eq!(target.as_slice(), &[0, 2, 3, 4, 0, 0]);
}
