// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::type_conversion::to_index,
    builtins::{ArgumentsList, Behaviour, Builtin, MethodTable, array_buffer::allocate_array_buffer},
    execution::{Agent, JsResult},
    types::Value,
};

pub(crate) struct ArrayBufferConstructor;

impl Builtin for ArrayBufferConstructor {
    const NAME: &'static str = "ArrayBuffer";

    const LENGTH: u8 = 1;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferConstructor::constructor);
}

struct ArrayBufferIsView;
impl Builtin for ArrayBufferIsView {
    const NAME: &'static str = "isView";

    const LENGTH: u8 = 1;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferConstructor::is_view);
}

impl ArrayBufferConstructor {
    /// ### [25.1.4.1 ArrayBuffer ( length \[ , options \] )](https://tc39.es/ecma262/#sec-arraybuffer-length)
    fn constructor(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 2. Let byteLength be ? ToIndex(length).
        let byte_length = to_index(agent, arguments.get(0))?;
        // 3. Let requestedMaxByteLength be ? GetArrayBufferMaxByteLengthOption(options).
        // 4. Return ? AllocateArrayBuffer(NewTarget, byteLength, requestedMaxByteLength).
        allocate_array_buffer(agent, byte_length).map(Value::from)
    }

    /// ### [25.1.5.1 ArrayBuffer.isView ( arg )](https://tc39.es/ecma262/#sec-arraybuffer.isview)
    fn is_view(_: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. If arg is not an Object, return false.
        // 2. If arg has a [[ViewedArrayBuffer]] internal slot, return true.
        // 3. Return false.
        Ok(matches!(arguments.get(0), Value::TypedArray(_) | Value::DataView(_)).into())
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table.register::<ArrayBufferIsView>();
    }
}
