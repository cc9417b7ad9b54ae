// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;
use structured_data::{
    Agent, ArrayBuffer, DataView, DefaultHostHooks, ElementType, ExceptionType, Options,
    TypedArray, Value,
};

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

#[test]
fn construct_through_intrinsic_constructor() {
    let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
    let constructor = agent.array_buffer_constructor();
    let Value::ArrayBuffer(buffer) = constructor.construct(&mut agent, &numbers(&[12.0])).unwrap()
    else {
        panic!("expected an ArrayBuffer");
    };
    assert_eq!(buffer.byte_length(&agent), 12);
    assert_eq!(
        agent.invoke(buffer.into(), "byteLength", &[]).unwrap(),
        Value::from(12)
    );
    assert_eq!(
        agent.invoke(buffer.into(), "maxByteLength", &[]).unwrap(),
        Value::from(12)
    );
    assert_eq!(
        agent.invoke(buffer.into(), "resizable", &[]).unwrap(),
        Value::from(false)
    );
}

#[test]
fn negative_length_is_range_error() {
    let mut agent = Agent::default();
    let err = ArrayBuffer::allocate(&mut agent, -1).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let constructor = agent.array_buffer_constructor();
    let err = constructor
        .construct(&mut agent, &numbers(&[-8.0]))
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
}

#[test]
fn configured_ceiling_limits_allocation() {
    let options = Options {
        max_array_buffer_byte_length: 64,
        ..Options::default()
    };
    let mut agent = Agent::new(options, &DefaultHostHooks);
    assert!(ArrayBuffer::allocate(&mut agent, 64).is_ok());
    let err = ArrayBuffer::allocate(&mut agent, 65).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = TypedArray::new(&mut agent, ElementType::Float64, 9).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
}

#[test]
fn is_view_recognises_views_only() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let ta = TypedArray::new(&mut agent, ElementType::Uint8, 4).unwrap();
    let dv = DataView::new(&mut agent, buffer, 0, None).unwrap();
    let constructor = Value::Function(agent.array_buffer_constructor());
    for (argument, expected) in [
        (Value::from(ta), true),
        (Value::from(dv), true),
        (Value::from(buffer), false),
        (Value::from(3), false),
        (Value::Undefined, false),
    ] {
        assert_eq!(
            agent
                .invoke(constructor.clone(), "isView", &[argument])
                .unwrap(),
            Value::from(expected)
        );
    }
}

#[test]
fn slice_copies_relative_range() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 6).unwrap();
    buffer
        .as_mut_slice(&mut agent)
        .copy_from_slice(&[1, 2, 3, 4, 5, 6]);
    let sliced = buffer.slice(&mut agent, 1.0, Some(-1.0)).unwrap();
    assert_eq!(sliced.as_slice(&agent), &[2, 3, 4, 5]);
    assert!(!sliced.same_storage(&agent, buffer));

    buffer.as_mut_slice(&mut agent)[1] = 99;
    assert_eq!(sliced.as_slice(&agent)[0], 2);

    let empty = buffer.slice(&mut agent, 4.0, Some(2.0)).unwrap();
    assert_eq!(empty.byte_length(&agent), 0);
}

#[test]
fn detach_zeroes_lengths_and_fails_access() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let ta = TypedArray::from_buffer(&mut agent, ElementType::Int16, buffer, 2, None).unwrap();
    let dv = DataView::new(&mut agent, buffer, 0, Some(4)).unwrap();
    assert_eq!(ta.array_length(&agent), 3);

    buffer.detach(&mut agent);

    assert!(buffer.is_detached(&agent));
    assert_eq!(buffer.byte_length(&agent), 0);
    assert_eq!(
        agent.invoke(buffer.into(), "detached", &[]).unwrap(),
        Value::from(true)
    );
    assert_eq!(ta.array_length(&agent), 0);
    assert_eq!(ta.byte_offset(&agent), 0);
    assert_eq!(dv.byte_length(&agent), 0);

    let err = ta.get(&mut agent, 0).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    let err = ta.set(&mut agent, 0, Value::from(1)).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    for (name, arguments) in [
        ("fill", numbers(&[1.0])),
        ("slice", vec![]),
        ("sort", vec![]),
        ("reverse", vec![]),
        ("copyWithin", numbers(&[0.0, 1.0])),
        ("indexOf", numbers(&[0.0])),
        ("includes", numbers(&[0.0])),
        ("lastIndexOf", numbers(&[0.0])),
        ("join", vec![]),
        ("subarray", numbers(&[0.0, 1.0])),
        ("with", numbers(&[0.0, 1.0])),
        ("values", vec![]),
    ] {
        let err = agent.invoke(ta.into(), name, &arguments).unwrap_err();
        assert_eq!(
            err.exception_type(&agent),
            Some(ExceptionType::TypeError),
            "{name} on a detached view"
        );
    }
    for (name, arguments) in [
        ("getInt8", numbers(&[0.0])),
        ("setInt8", numbers(&[0.0, 1.0])),
        ("setUint16", numbers(&[0.0, 1.0, 1.0])),
        ("setFloat64", numbers(&[0.0, 1.5])),
    ] {
        let err = agent.invoke(dv.into(), name, &arguments).unwrap_err();
        assert_eq!(
            err.exception_type(&agent),
            Some(ExceptionType::TypeError),
            "{name} on a detached view"
        );
    }
    let err = agent
        .invoke(dv.into(), "setBigInt64", &[Value::from(0), Value::from(BigInt::from(1))])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    let err = buffer.slice(&mut agent, 0.0, None).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn set_from_typed_array_with_either_side_detached() {
    let mut agent = Agent::default();
    let source = TypedArray::new(&mut agent, ElementType::Uint8, 2).unwrap();
    let target = TypedArray::new(&mut agent, ElementType::Int16, 4).unwrap();

    source.viewed_array_buffer(&agent).detach(&mut agent);
    let err = agent
        .invoke(target.into(), "set", &[source.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    let source = TypedArray::new(&mut agent, ElementType::Uint8, 2).unwrap();
    target.viewed_array_buffer(&agent).detach(&mut agent);
    let err = agent
        .invoke(target.into(), "set", &[source.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(!source.is_detached(&agent));
}

#[test]
fn iterators_created_before_detach_fail_on_next() {
    let mut agent = Agent::default();
    let ta = TypedArray::new(&mut agent, ElementType::Float32, 3).unwrap();
    let mut iterators = Vec::new();
    for name in ["entries", "keys", "values"] {
        let Value::ArrayIterator(iterator) = agent.invoke(ta.into(), name, &[]).unwrap() else {
            panic!("expected an ArrayIterator");
        };
        iterators.push((name, iterator));
    }
    ta.viewed_array_buffer(&agent).detach(&mut agent);
    for (name, iterator) in iterators {
        let err = iterator.next(&mut agent).unwrap_err();
        assert_eq!(
            err.exception_type(&agent),
            Some(ExceptionType::TypeError),
            "{name} iterator"
        );
        let err = agent.invoke(iterator.into(), "next", &[]).unwrap_err();
        assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    }
}

#[test]
fn release_waits_for_views() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
    let ta = TypedArray::from_buffer(&mut agent, ElementType::Uint16, buffer, 0, None).unwrap();
    let dv = DataView::new(&mut agent, buffer, 1, None).unwrap();

    assert!(!buffer.release(&mut agent));
    assert_eq!(buffer.byte_length(&agent), 4);
    assert!(ta.release(&mut agent));
    assert!(!buffer.release(&mut agent));
    assert!(dv.release(&mut agent));
    assert!(buffer.release(&mut agent));
    assert!(!buffer.release(&mut agent));

    let other = ArrayBuffer::allocate(&mut agent, 2).unwrap();
    assert_eq!(other.byte_length(&agent), 2);
}

#[cfg(feature = "array-buffer-transfer")]
#[test]
fn transfer_moves_contents_and_detaches_source() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
    buffer.as_mut_slice(&mut agent).copy_from_slice(&[9, 8, 7, 6]);

    let grown = buffer.transfer(&mut agent, Some(6)).unwrap();
    assert!(buffer.is_detached(&agent));
    assert_eq!(grown.as_slice(&agent), &[9, 8, 7, 6, 0, 0]);

    let Value::ArrayBuffer(shrunk) = agent
        .invoke(grown.into(), "transferToFixedLength", &numbers(&[2.0]))
        .unwrap()
    else {
        panic!("expected an ArrayBuffer");
    };
    assert!(grown.is_detached(&agent));
    assert_eq!(shrunk.as_slice(&agent), &[9, 8]);

    let err = buffer.transfer(&mut agent, None).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn unknown_method_is_type_error() {
    let mut agent = Agent::default();
    let buffer = ArrayBuffer::allocate(&mut agent, 1).unwrap();
    let err = agent.invoke(buffer.into(), "resize", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(err.message(&agent), Some("resize is not a function"));
}
