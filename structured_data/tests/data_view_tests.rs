// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;
use structured_data::{
    Agent, ArrayBuffer, DataView, DefaultHostHooks, ElementType, ExceptionType, Numeric, Options,
    Value,
};

fn new_agent() -> Agent {
    Agent::new(Options::default(), &DefaultHostHooks)
}

fn as_data_view(value: Value) -> DataView {
    match value {
        Value::DataView(dv) => dv,
        other => panic!("expected a DataView, got {other:?}"),
    }
}

#[test]
fn constructor_validates_offsets() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let constructor = agent.data_view_constructor();

    let dv = as_data_view(
        constructor
            .construct(&mut agent, &[buffer.into(), Value::from(2)])
            .unwrap(),
    );
    assert_eq!(dv.byte_offset(&agent), 2);
    assert_eq!(dv.byte_length(&agent), 6);
    assert_eq!(
        agent.invoke(dv.into(), "buffer", &[]).unwrap(),
        Value::from(buffer)
    );

    let err = constructor
        .construct(&mut agent, &[buffer.into(), Value::from(9)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = constructor
        .construct(&mut agent, &[buffer.into(), Value::from(4), Value::from(5)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = constructor
        .construct(&mut agent, &[Value::from(8)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn explicit_byte_order_per_call() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
    let dv = DataView::new(&mut agent, buffer, 0, None).unwrap();

    agent
        .invoke(
            dv.into(),
            "setUint16",
            &[Value::from(0), Value::from(0x0102)],
        )
        .unwrap();
    assert_eq!(&buffer.as_slice(&agent)[..2], &[1, 2]);

    agent
        .invoke(
            dv.into(),
            "setUint16",
            &[Value::from(2), Value::from(0x0102), Value::from(true)],
        )
        .unwrap();
    assert_eq!(&buffer.as_slice(&agent)[2..], &[2, 1]);

    assert_eq!(
        agent
            .invoke(dv.into(), "getUint16", &[Value::from(2), Value::from(true)])
            .unwrap(),
        Value::from(0x0102)
    );
    assert_eq!(
        agent
            .invoke(dv.into(), "getUint16", &[Value::from(2)])
            .unwrap(),
        Value::from(0x0201)
    );
    assert_eq!(
        agent.invoke(dv.into(), "getInt32", &[Value::from(0)]).unwrap(),
        Value::from(0x01020201)
    );
}

#[test]
fn every_element_type_round_trips() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 16).unwrap();
    let dv = DataView::new(&mut agent, buffer, 0, None).unwrap();
    for element_type in ElementType::ALL {
        if element_type == ElementType::Uint8Clamped {
            continue;
        }
        let value = if element_type.is_bigint() {
            Value::from(BigInt::from(-3))
        } else if element_type.is_float() {
            Value::from(-1.5)
        } else {
            Value::from(100)
        };
        for little_endian in [false, true] {
            dv.set_value(&mut agent, 3, element_type, little_endian, value.clone())
                .unwrap();
            let read = dv.get_value(&mut agent, 3, element_type, little_endian).unwrap();
            let expected = match element_type {
                ElementType::BigUint64 => Numeric::BigInt(BigInt::from(u64::MAX - 2)),
                _ => Numeric::try_from(value.clone()).unwrap(),
            };
            assert_eq!(read, expected, "{element_type:?} little_endian={little_endian}");
        }
    }
}

#[test]
fn float_nan_is_canonical() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let dv = DataView::new(&mut agent, buffer, 0, None).unwrap();
    buffer
        .as_mut_slice(&mut agent)
        .copy_from_slice(&0x7ff8_dead_beef_0001u64.to_be_bytes());
    let Value::Number(read) = agent
        .invoke(dv.into(), "getFloat64", &[Value::from(0)])
        .unwrap()
    else {
        panic!("expected a Number");
    };
    assert!(read.is_nan());
    assert_eq!(read.to_bits(), f64::NAN.to_bits());

    agent
        .invoke(
            dv.into(),
            "setFloat32",
            &[Value::from(0), Value::from(f64::NAN), Value::from(true)],
        )
        .unwrap();
    assert_eq!(&buffer.as_slice(&agent)[..4], &f32::NAN.to_bits().to_le_bytes());
}

#[test]
fn out_of_range_index_is_range_error() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let dv = DataView::new(&mut agent, buffer, 4, None).unwrap();
    let err = agent
        .invoke(dv.into(), "getInt32", &[Value::from(1)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = agent
        .invoke(dv.into(), "getInt8", &[Value::from(-1)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = dv.get::<u16>(&mut agent, 3, true).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
}

#[test]
fn getters_throw_once_detached() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let dv = DataView::new(&mut agent, buffer, 2, Some(4)).unwrap();
    assert_eq!(
        agent.invoke(dv.into(), "byteLength", &[]).unwrap(),
        Value::from(4)
    );
    buffer.detach(&mut agent);
    for name in ["byteLength", "byteOffset"] {
        let err = agent.invoke(dv.into(), name, &[]).unwrap_err();
        assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    }
    assert_eq!(
        agent.invoke(dv.into(), "buffer", &[]).unwrap(),
        Value::from(buffer)
    );
    let err = agent
        .invoke(dv.into(), "setInt8", &[Value::from(0), Value::from(1)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}
