// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::types::DataBlock;

static EMPTY_DATA_BLOCK: DataBlock = DataBlock::new_empty();

/// # [[ArrayBufferData]]
#[derive(Debug, Clone)]
pub(crate) enum InternalBuffer {
    Detached,
    FixedLength(DataBlock),
}

#[derive(Debug, Clone)]
pub struct ArrayBufferHeapData {
    pub(crate) buffer: InternalBuffer,
}

impl ArrayBufferHeapData {
    pub(crate) fn new_fixed_length(block: DataBlock) -> Self {
        Self {
            buffer: InternalBuffer::FixedLength(block),
        }
    }

    pub(crate) fn is_detached_buffer(&self) -> bool {
        matches!(self.buffer, InternalBuffer::Detached)
    }

    /// # [[ArrayBufferByteLength]]
    ///
    /// Zero for detached buffers.
    pub(crate) fn byte_length(&self) -> usize {
        match &self.buffer {
            InternalBuffer::Detached => 0,
            InternalBuffer::FixedLength(block) => block.len(),
        }
    }

    /// Returns the Data Block of the buffer. Detached buffers read as an
    /// empty block.
    pub(crate) fn get_data_block(&self) -> &DataBlock {
        match &self.buffer {
            InternalBuffer::Detached => &EMPTY_DATA_BLOCK,
            InternalBuffer::FixedLength(block) => block,
        }
    }

    pub(crate) fn get_data_block_mut(&mut self) -> Option<&mut DataBlock> {
        match &mut self.buffer {
            InternalBuffer::Detached => None,
            InternalBuffer::FixedLength(block) => Some(block),
        }
    }
}
