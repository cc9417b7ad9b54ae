// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builtins::{
        ArgumentsList, Behaviour, Builtin, MethodTable,
        array_buffer::throw_detached_error,
        data_view::abstract_operations::{
            get_view_byte_length, get_view_value, is_view_out_of_bounds,
            make_data_view_with_buffer_witness_record, require_internal_slot_data_view,
            set_view_value,
        },
    },
    execution::{Agent, JsResult},
    types::{ElementType, Value},
};

pub(crate) struct DataViewPrototype;

struct DataViewPrototypeGetBuffer;
impl Builtin for DataViewPrototypeGetBuffer {
    const NAME: &'static str = "buffer";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_buffer);
}
struct DataViewPrototypeGetByteLength;
impl Builtin for DataViewPrototypeGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_byte_length);
}
struct DataViewPrototypeGetByteOffset;
impl Builtin for DataViewPrototypeGetByteOffset {
    const NAME: &'static str = "byteOffset";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_byte_offset);
}

/// Generates the get and set method pair of one element type.
macro_rules! data_view_accessors {
    (
        $get: ident,
        $get_key: literal,
        $set: ident,
        $set_key: literal,
        $get_fn: ident,
        $set_fn: ident,
        $element_type: ident $(,)?
    ) => {
        struct $get;
        impl Builtin for $get {
            const NAME: &'static str = $get_key;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::$get_fn);
        }
        struct $set;
        impl Builtin for $set {
            const NAME: &'static str = $set_key;
            const LENGTH: u8 = 2;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::$set_fn);
        }
        impl DataViewPrototype {
            fn $get_fn(
                agent: &mut Agent,
                this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                // 1. Let v be the this value.
                // 2. Return ? GetViewValue(v, byteOffset, littleEndian, type).
                get_view_value(
                    agent,
                    &this_value,
                    arguments.get(0),
                    arguments.get(1),
                    ElementType::$element_type,
                )
            }

            fn $set_fn(
                agent: &mut Agent,
                this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                // 1. Let v be the this value.
                // 2. Return ? SetViewValue(v, byteOffset, littleEndian, type, value).
                set_view_value(
                    agent,
                    &this_value,
                    arguments.get(0),
                    arguments.get(2),
                    ElementType::$element_type,
                    arguments.get(1),
                )
            }
        }
    };
}

data_view_accessors!(
    DataViewPrototypeGetInt8,
    "getInt8",
    DataViewPrototypeSetInt8,
    "setInt8",
    get_int8,
    set_int8,
    Int8,
);
data_view_accessors!(
    DataViewPrototypeGetUint8,
    "getUint8",
    DataViewPrototypeSetUint8,
    "setUint8",
    get_uint8,
    set_uint8,
    Uint8,
);
data_view_accessors!(
    DataViewPrototypeGetInt16,
    "getInt16",
    DataViewPrototypeSetInt16,
    "setInt16",
    get_int16,
    set_int16,
    Int16,
);
data_view_accessors!(
    DataViewPrototypeGetUint16,
    "getUint16",
    DataViewPrototypeSetUint16,
    "setUint16",
    get_uint16,
    set_uint16,
    Uint16,
);
data_view_accessors!(
    DataViewPrototypeGetInt32,
    "getInt32",
    DataViewPrototypeSetInt32,
    "setInt32",
    get_int32,
    set_int32,
    Int32,
);
data_view_accessors!(
    DataViewPrototypeGetUint32,
    "getUint32",
    DataViewPrototypeSetUint32,
    "setUint32",
    get_uint32,
    set_uint32,
    Uint32,
);
data_view_accessors!(
    DataViewPrototypeGetBigInt64,
    "getBigInt64",
    DataViewPrototypeSetBigInt64,
    "setBigInt64",
    get_big_int64,
    set_big_int64,
    BigInt64,
);
data_view_accessors!(
    DataViewPrototypeGetBigUint64,
    "getBigUint64",
    DataViewPrototypeSetBigUint64,
    "setBigUint64",
    get_big_uint64,
    set_big_uint64,
    BigUint64,
);
data_view_accessors!(
    DataViewPrototypeGetFloat32,
    "getFloat32",
    DataViewPrototypeSetFloat32,
    "setFloat32",
    get_float32,
    set_float32,
    Float32,
);
data_view_accessors!(
    DataViewPrototypeGetFloat64,
    "getFloat64",
    DataViewPrototypeSetFloat64,
    "setFloat64",
    get_float64,
    set_float64,
    Float64,
);

impl DataViewPrototype {
    /// ### [25.3.4.1 get DataView.prototype.buffer](https://tc39.es/ecma262/#sec-get-dataview.prototype.buffer)
    fn get_buffer(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[DataView]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let o = require_internal_slot_data_view(agent, &this_value)?;
        // 4. Let buffer be O.[[ViewedArrayBuffer]].
        // 5. Return buffer.
        Ok(o.viewed_array_buffer(agent).into())
    }

    /// ### [25.3.4.2 get DataView.prototype.byteLength](https://tc39.es/ecma262/#sec-get-dataview.prototype.bytelength)
    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[DataView]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let o = require_internal_slot_data_view(agent, &this_value)?;
        // 4. Let viewRecord be MakeDataViewWithBufferWitnessRecord(O, seq-cst).
        let view_record = make_data_view_with_buffer_witness_record(agent, o);
        // 5. If IsViewOutOfBounds(viewRecord) is true, throw a TypeError exception.
        if is_view_out_of_bounds(agent, &view_record) {
            return Err(throw_detached_error(agent));
        }
        // 6. Let size be GetViewByteLength(viewRecord).
        // 7. Return 𝔽(size).
        Ok(Value::Number(get_view_byte_length(agent, &view_record) as f64))
    }

    /// ### [25.3.4.3 get DataView.prototype.byteOffset](https://tc39.es/ecma262/#sec-get-dataview.prototype.byteoffset)
    fn get_byte_offset(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. Perform ? RequireInternalSlot(O, [[DataView]]).
        // 3. Assert: O has a [[ViewedArrayBuffer]] internal slot.
        let o = require_internal_slot_data_view(agent, &this_value)?;
        // 4. Let viewRecord be MakeDataViewWithBufferWitnessRecord(O, seq-cst).
        let view_record = make_data_view_with_buffer_witness_record(agent, o);
        // 5. If IsViewOutOfBounds(viewRecord) is true, throw a TypeError exception.
        if is_view_out_of_bounds(agent, &view_record) {
            return Err(throw_detached_error(agent));
        }
        // 6. Let offset be O.[[ByteOffset]].
        // 7. Return 𝔽(offset).
        Ok(Value::Number(o.byte_offset(agent) as f64))
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table
            .register::<DataViewPrototypeGetBuffer>()
            .register::<DataViewPrototypeGetByteLength>()
            .register::<DataViewPrototypeGetByteOffset>()
            .register::<DataViewPrototypeGetBigInt64>()
            .register::<DataViewPrototypeGetBigUint64>()
            .register::<DataViewPrototypeGetFloat32>()
            .register::<DataViewPrototypeGetFloat64>()
            .register::<DataViewPrototypeGetInt8>()
            .register::<DataViewPrototypeGetInt16>()
            .register::<DataViewPrototypeGetInt32>()
            .register::<DataViewPrototypeGetUint8>()
            .register::<DataViewPrototypeGetUint16>()
            .register::<DataViewPrototypeGetUint32>()
            .register::<DataViewPrototypeSetBigInt64>()
            .register::<DataViewPrototypeSetBigUint64>()
            .register::<DataViewPrototypeSetFloat32>()
            .register::<DataViewPrototypeSetFloat64>()
            .register::<DataViewPrototypeSetInt8>()
            .register::<DataViewPrototypeSetInt16>()
            .register::<DataViewPrototypeSetInt32>()
            .register::<DataViewPrototypeSetUint8>()
            .register::<DataViewPrototypeSetUint16>()
            .register::<DataViewPrototypeSetUint32>();
    }
}
