// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{builtins::array_buffer::ArrayBuffer, types::ElementType};

#[derive(Debug, Clone)]
pub struct TypedArrayHeapData {
    /// ### [\[\[ViewedArrayBuffer\]\]](https://tc39.es/ecma262/#sec-properties-of-typedarray-instances)
    pub(crate) viewed_array_buffer: ArrayBuffer,
    /// ### [\[\[TypedArrayName\]\]](https://tc39.es/ecma262/#sec-properties-of-typedarray-instances)
    pub(crate) element_type: ElementType,
    /// ### [\[\[ByteLength\]\]](https://tc39.es/ecma262/#sec-properties-of-typedarray-instances)
    pub(crate) byte_length: usize,
    /// ### [\[\[ByteOffset\]\]](https://tc39.es/ecma262/#sec-properties-of-typedarray-instances)
    pub(crate) byte_offset: usize,
    /// ### [\[\[ArrayLength\]\]](https://tc39.es/ecma262/#sec-properties-of-typedarray-instances)
    pub(crate) array_length: usize,
}

impl TypedArrayHeapData {
    pub(crate) fn new(
        viewed_array_buffer: ArrayBuffer,
        element_type: ElementType,
        byte_offset: usize,
        array_length: usize,
    ) -> Self {
        Self {
            viewed_array_buffer,
            element_type,
            byte_length: array_length * element_type.element_size(),
            byte_offset,
            array_length,
        }
    }
}
