// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;
use structured_data::{
    Agent, Array, ArrayBuffer, CollectionIteratorKind, DefaultHostHooks, ElementType,
    ExceptionType, Function, Numeric, Options, TypedArray, Value,
};

fn new_agent() -> Agent {
    Agent::new(Options::default(), &DefaultHostHooks)
}

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn create(agent: &mut Agent, element_type: ElementType, values: &[f64]) -> TypedArray {
    TypedArray::from_values(agent, element_type, &numbers(values)).unwrap()
}

fn contents(agent: &mut Agent, ta: TypedArray) -> Vec<f64> {
    ta.to_vec(agent)
        .unwrap()
        .into_iter()
        .map(|n| n.as_number().unwrap())
        .collect()
}

fn as_typed_array(value: Value) -> TypedArray {
    match value {
        Value::TypedArray(ta) => ta,
        other => panic!("expected a TypedArray, got {other:?}"),
    }
}

#[test]
fn views_alias_the_same_bytes() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
    let int32 = TypedArray::from_buffer(&mut agent, ElementType::Int32, buffer, 0, None).unwrap();
    let uint8 = TypedArray::from_buffer(&mut agent, ElementType::Uint8, buffer, 0, None).unwrap();
    int32.set(&mut agent, 0, Value::from(-1)).unwrap();
    assert_eq!(
        contents(&mut agent, uint8)[..4],
        [255.0, 255.0, 255.0, 255.0]
    );
    assert_eq!(contents(&mut agent, uint8)[4..], [0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn default_byte_order_is_configurable() {
    let options = Options {
        little_endian: false,
        ..Options::default()
    };
    let mut agent = Agent::new(options, &DefaultHostHooks);
    let buffer = ArrayBuffer::allocate(&mut agent, 2).unwrap();
    let uint16 =
        TypedArray::from_buffer(&mut agent, ElementType::Uint16, buffer, 0, None).unwrap();
    uint16.set(&mut agent, 0, Value::from(0x0102)).unwrap();
    assert_eq!(buffer.as_slice(&agent), &[1, 2]);
}

#[test]
fn slice_is_backed_by_independent_buffer() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Float64, &[1.0, 2.0, 3.0]);
    let sliced = as_typed_array(agent.invoke(ta.into(), "slice", &numbers(&[1.0])).unwrap());
    assert_eq!(contents(&mut agent, sliced), [2.0, 3.0]);
    assert_ne!(
        sliced.viewed_array_buffer(&agent),
        ta.viewed_array_buffer(&agent)
    );
    ta.set(&mut agent, 1, Value::from(20)).unwrap();
    assert_eq!(contents(&mut agent, sliced), [2.0, 3.0]);
}

#[test]
fn clamped_writes_saturate() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Uint8Clamped, 2).unwrap();
    ta.set(&mut agent, 0, Value::from(300)).unwrap();
    assert_eq!(ta.get(&mut agent, 0).unwrap(), Some(Numeric::Number(255.0)));
    ta.set(&mut agent, 0, Value::from(-10)).unwrap();
    assert_eq!(ta.get(&mut agent, 0).unwrap(), Some(Numeric::Number(0.0)));
    ta.set(&mut agent, 1, Value::from(2.5)).unwrap();
    assert_eq!(ta.get(&mut agent, 1).unwrap(), Some(Numeric::Number(2.0)));
}

#[test]
fn integer_writes_wrap() {
    let mut agent = new_agent();
    let int8 = create(&mut agent, ElementType::Int8, &[128.0, -129.0, 255.0]);
    assert_eq!(contents(&mut agent, int8), [-128.0, 127.0, -1.0]);
    let uint32 = create(&mut agent, ElementType::Uint32, &[-1.0, 4294967296.0]);
    assert_eq!(contents(&mut agent, uint32), [4294967295.0, 0.0]);
}

#[test]
fn copy_within_handles_both_directions() {
    let mut agent = new_agent();
    let forward = create(&mut agent, ElementType::Int8, &[1.0, 2.0, 3.0, 4.0]);
    agent
        .invoke(forward.into(), "copyWithin", &numbers(&[0.0, 1.0]))
        .unwrap();
    assert_eq!(contents(&mut agent, forward), [2.0, 3.0, 4.0, 4.0]);

    let backward = create(&mut agent, ElementType::Int8, &[1.0, 2.0, 3.0, 4.0]);
    agent
        .invoke(backward.into(), "copyWithin", &numbers(&[1.0, 0.0]))
        .unwrap();
    assert_eq!(contents(&mut agent, backward), [1.0, 1.0, 2.0, 3.0]);
}

#[test]
fn overlapping_set_behaves_like_snapshot() {
    let mut agent = new_agent();
    for (target_offset, source_offset) in [(0usize, 2usize), (2, 0)] {
        for source_type in [ElementType::Uint8, ElementType::Int16] {
            let buffer = ArrayBuffer::allocate(&mut agent, 8).unwrap();
            buffer
                .as_mut_slice(&mut agent)
                .copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
            let target = TypedArray::from_buffer(
                &mut agent,
                ElementType::Uint8,
                buffer,
                target_offset,
                Some(4),
            )
            .unwrap();
            let source_len = 4 / source_type.element_size();
            let source = TypedArray::from_buffer(
                &mut agent,
                source_type,
                buffer,
                source_offset,
                Some(source_len),
            )
            .unwrap();
            let snapshot = contents(&mut agent, source);

            agent
                .invoke(target.into(), "set", &[source.into()])
                .unwrap();

            let written = contents(&mut agent, target);
            let expected = snapshot
                .iter()
                .map(|value| value.rem_euclid(256.0))
                .collect::<Vec<_>>();
            assert_eq!(&written[..source_len], expected.as_slice());
        }
    }
}

#[test]
fn set_from_array_and_offset_bounds() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Float32, 4).unwrap();
    let array = Array::from_slice(&mut agent, &numbers(&[1.5, 2.5]));
    agent
        .invoke(ta.into(), "set", &[array.into(), Value::from(2)])
        .unwrap();
    assert_eq!(contents(&mut agent, ta), [0.0, 0.0, 1.5, 2.5]);

    let err = agent
        .invoke(ta.into(), "set", &[array.into(), Value::from(3)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
}

#[test]
fn bigint_and_number_families_do_not_mix() {
    let mut agent = new_agent();
    let big = TypedArray::new(&mut agent, ElementType::BigInt64, 2).unwrap();
    let small = create(&mut agent, ElementType::Float64, &[1.0, 2.0]);
    let err = agent
        .invoke(big.into(), "set", &[small.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    let err = big.set(&mut agent, 0, Value::from(1)).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    big.set(&mut agent, 0, Value::from(BigInt::from(-1)))
        .unwrap();
    let unsigned = TypedArray::from_typed_array(&mut agent, ElementType::BigUint64, big).unwrap();
    assert_eq!(
        unsigned.get(&mut agent, 0).unwrap(),
        Some(Numeric::BigInt(BigInt::from(u64::MAX)))
    );
}

#[test]
fn default_sort_orders_and_groups_nan() {
    let mut agent = new_agent();
    let ta = create(
        &mut agent,
        ElementType::Float64,
        &[3.0, f64::NAN, -0.0, 1.0, f64::NAN, 0.0, -2.0],
    );
    agent.invoke(ta.into(), "sort", &[]).unwrap();
    let first = contents(&mut agent, ta);
    assert_eq!(first[..5], [-2.0, -0.0, 0.0, 1.0, 3.0]);
    assert!(first[1].is_sign_negative());
    assert!(first[2].is_sign_positive());
    for nan in &first[5..] {
        assert_eq!(nan.to_bits(), f64::NAN.to_bits());
    }
    let bytes = ta.viewed_array_buffer(&agent).as_slice(&agent)[40..48].to_vec();
    assert_eq!(bytes, f64::NAN.to_bits().to_ne_bytes().to_vec());

    agent.invoke(ta.into(), "sort", &[]).unwrap();
    let second = contents(&mut agent, ta);
    assert_eq!(
        first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn sort_with_comparator_and_to_sorted() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int16, &[5.0, 1.0, 4.0, 2.0, 3.0]);
    let descending = Function::new(&mut agent, "descending", |_, _, arguments| {
        let a = arguments.get(0).as_number().unwrap_or_default();
        let b = arguments.get(1).as_number().unwrap_or_default();
        Ok(Value::from(b - a))
    });
    let sorted = as_typed_array(
        agent
            .invoke(ta.into(), "toSorted", &[descending.into()])
            .unwrap(),
    );
    assert_eq!(contents(&mut agent, sorted), [5.0, 4.0, 3.0, 2.0, 1.0]);
    assert_eq!(contents(&mut agent, ta), [5.0, 1.0, 4.0, 2.0, 3.0]);

    agent
        .invoke(ta.into(), "sort", &[descending.into()])
        .unwrap();
    assert_eq!(contents(&mut agent, ta), [5.0, 4.0, 3.0, 2.0, 1.0]);

    let err = agent
        .invoke(ta.into(), "sort", &[Value::from(1)])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn inconsistent_comparator_still_terminates() {
    let mut agent = new_agent();
    let values = (0..64).map(|i| ((i * 37) % 64) as f64).collect::<Vec<_>>();
    let ta = create(&mut agent, ElementType::Uint8, &values);
    let liar = Function::new(&mut agent, "liar", |_, _, _| Ok(Value::from(1)));
    agent.invoke(ta.into(), "sort", &[liar.into()]).unwrap();
    let mut result = contents(&mut agent, ta);
    result.sort_by(f64::total_cmp);
    let mut expected = values;
    expected.sort_by(f64::total_cmp);
    assert_eq!(result, expected);
}

#[test]
fn fill_reverse_and_join() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Uint8, 4).unwrap();
    agent
        .invoke(ta.into(), "fill", &numbers(&[7.0, 1.0]))
        .unwrap();
    assert_eq!(
        agent.invoke(ta.into(), "join", &[]).unwrap(),
        Value::from("0,7,7,7")
    );
    agent
        .invoke(ta.into(), "fill", &numbers(&[9.0, -1.0]))
        .unwrap();
    agent.invoke(ta.into(), "reverse", &[]).unwrap();
    assert_eq!(
        agent.invoke(ta.into(), "join", &[Value::from("-")]).unwrap(),
        Value::from("9-7-7-0")
    );
    assert_eq!(
        agent.invoke(ta.into(), "toString", &[]).unwrap(),
        Value::from("9,7,7,0")
    );
    let reversed = as_typed_array(agent.invoke(ta.into(), "toReversed", &[]).unwrap());
    assert_eq!(contents(&mut agent, reversed), [0.0, 7.0, 7.0, 9.0]);
}

#[test]
fn search_methods() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Float32, &[1.0, f64::NAN, 3.0, 1.0]);
    assert_eq!(
        agent.invoke(ta.into(), "indexOf", &numbers(&[1.0])).unwrap(),
        Value::from(0)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "lastIndexOf", &numbers(&[1.0]))
            .unwrap(),
        Value::from(3)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "indexOf", &numbers(&[1.0, 1.0]))
            .unwrap(),
        Value::from(3)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "indexOf", &numbers(&[f64::NAN]))
            .unwrap(),
        Value::from(-1)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "includes", &numbers(&[f64::NAN]))
            .unwrap(),
        Value::from(true)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "includes", &[Value::from("3")])
            .unwrap(),
        Value::from(false)
    );
    assert_eq!(
        agent.invoke(ta.into(), "at", &numbers(&[-2.0])).unwrap(),
        Value::from(3)
    );
    assert_eq!(
        agent.invoke(ta.into(), "at", &numbers(&[4.0])).unwrap(),
        Value::Undefined
    );
}

#[test]
fn callback_iteration() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int32, &[1.0, 2.0, 3.0, 4.0]);
    let double = Function::new(&mut agent, "double", |_, _, arguments| {
        Ok(Value::from(arguments.get(0).as_number().unwrap_or_default() * 2.0))
    });
    let is_even = Function::new(&mut agent, "isEven", |_, _, arguments| {
        Ok(Value::from(
            arguments.get(0).as_number().unwrap_or_default() % 2.0 == 0.0,
        ))
    });
    let sum = Function::new(&mut agent, "sum", |_, _, arguments| {
        let accumulator = arguments.get(0).as_number().unwrap_or_default();
        let value = arguments.get(1).as_number().unwrap_or_default();
        Ok(Value::from(accumulator + value))
    });

    let mapped = as_typed_array(agent.invoke(ta.into(), "map", &[double.into()]).unwrap());
    assert_eq!(mapped.element_type(&agent), ElementType::Int32);
    assert_eq!(contents(&mut agent, mapped), [2.0, 4.0, 6.0, 8.0]);

    let filtered = as_typed_array(agent.invoke(ta.into(), "filter", &[is_even.into()]).unwrap());
    assert_eq!(contents(&mut agent, filtered), [2.0, 4.0]);

    assert_eq!(
        agent.invoke(ta.into(), "reduce", &[sum.into()]).unwrap(),
        Value::from(10)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "reduceRight", &[sum.into(), Value::from(5)])
            .unwrap(),
        Value::from(15)
    );
    assert_eq!(
        agent.invoke(ta.into(), "every", &[is_even.into()]).unwrap(),
        Value::from(false)
    );
    assert_eq!(
        agent.invoke(ta.into(), "some", &[is_even.into()]).unwrap(),
        Value::from(true)
    );
    assert_eq!(
        agent.invoke(ta.into(), "find", &[is_even.into()]).unwrap(),
        Value::from(2)
    );
    assert_eq!(
        agent
            .invoke(ta.into(), "findLastIndex", &[is_even.into()])
            .unwrap(),
        Value::from(3)
    );

    let empty = TypedArray::new(&mut agent, ElementType::Int32, 0).unwrap();
    let err = agent
        .invoke(empty.into(), "reduce", &[sum.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn subarray_shares_buffer() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Uint16, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    let sub = as_typed_array(
        agent
            .invoke(ta.into(), "subarray", &numbers(&[1.0, -1.0]))
            .unwrap(),
    );
    assert_eq!(sub.viewed_array_buffer(&agent), ta.viewed_array_buffer(&agent));
    assert_eq!(sub.byte_offset(&agent), 2);
    assert_eq!(contents(&mut agent, sub), [2.0, 3.0, 4.0]);
    sub.set(&mut agent, 0, Value::from(20)).unwrap();
    assert_eq!(ta.get(&mut agent, 1).unwrap(), Some(Numeric::Number(20.0)));
}

#[test]
fn with_replaces_one_element() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int8, &[1.0, 2.0, 3.0]);
    let replaced = as_typed_array(
        agent
            .invoke(ta.into(), "with", &numbers(&[-1.0, 9.0]))
            .unwrap(),
    );
    assert_eq!(contents(&mut agent, replaced), [1.0, 2.0, 9.0]);
    assert_eq!(contents(&mut agent, ta), [1.0, 2.0, 3.0]);
    let err = agent
        .invoke(ta.into(), "with", &numbers(&[3.0, 0.0]))
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
}

#[test]
fn constructors_from_of_and_bytes_per_element() {
    let mut agent = new_agent();
    for element_type in ElementType::ALL {
        let constructor = agent.typed_array_constructor(element_type);
        assert_eq!(
            agent
                .invoke(constructor.into(), "BYTES_PER_ELEMENT", &[])
                .unwrap(),
            Value::from(element_type.element_size() as f64)
        );
    }

    let uint8 = agent.typed_array_constructor(ElementType::Uint8);
    let of = as_typed_array(
        agent
            .invoke(uint8.into(), "of", &numbers(&[1.0, 2.0, 258.0]))
            .unwrap(),
    );
    assert_eq!(contents(&mut agent, of), [1.0, 2.0, 2.0]);

    let source = Array::from_slice(&mut agent, &numbers(&[1.0, 2.0, 3.0]));
    let plus_one = Function::new(&mut agent, "plusOne", |_, _, arguments| {
        Ok(Value::from(arguments.get(0).as_number().unwrap_or_default() + 1.0))
    });
    let from = as_typed_array(
        agent
            .invoke(uint8.into(), "from", &[source.into(), plus_one.into()])
            .unwrap(),
    );
    assert_eq!(contents(&mut agent, from), [2.0, 3.0, 4.0]);

    let constructed = as_typed_array(uint8.construct(&mut agent, &numbers(&[3.0])).unwrap());
    assert_eq!(constructed.array_length(&agent), 3);
}

#[test]
fn buffer_offset_validation() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 10).unwrap();
    let err =
        TypedArray::from_buffer(&mut agent, ElementType::Int32, buffer, 1, None).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err =
        TypedArray::from_buffer(&mut agent, ElementType::Int32, buffer, 0, None).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let err = TypedArray::from_buffer(&mut agent, ElementType::Int16, buffer, 4, Some(4))
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::RangeError));
    let ok = TypedArray::from_buffer(&mut agent, ElementType::Int16, buffer, 4, None).unwrap();
    assert_eq!(ok.array_length(&agent), 3);
}

#[test]
fn iterators_read_lazily() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Uint8, &[10.0, 20.0]);
    let Value::ArrayIterator(keys) = agent.invoke(ta.into(), "keys", &[]).unwrap() else {
        panic!("expected an ArrayIterator");
    };
    assert_eq!(keys.kind(&agent), CollectionIteratorKind::Key);
    assert_eq!(keys.next(&mut agent).unwrap(), Some(Value::from(0)));

    let Value::ArrayIterator(values) = agent.invoke(ta.into(), "values", &[]).unwrap() else {
        panic!("expected an ArrayIterator");
    };
    ta.set(&mut agent, 1, Value::from(21)).unwrap();
    assert_eq!(values.next(&mut agent).unwrap(), Some(Value::from(10)));
    assert_eq!(values.next(&mut agent).unwrap(), Some(Value::from(21)));
    assert_eq!(values.next(&mut agent).unwrap(), None);

    ta.viewed_array_buffer(&agent).detach(&mut agent);
    let err = keys.next(&mut agent).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn includes_keeps_signed_zeros_apart_on_float_kinds() {
    let mut agent = new_agent();
    let floats = create(&mut agent, ElementType::Float64, &[0.0]);
    let integers = create(&mut agent, ElementType::Int8, &[0.0]);
    assert_eq!(
        agent
            .invoke(floats.into(), "includes", &numbers(&[-0.0]))
            .unwrap(),
        Value::from(false)
    );
    assert_eq!(
        agent
            .invoke(floats.into(), "indexOf", &numbers(&[-0.0]))
            .unwrap(),
        Value::from(0)
    );
    assert_eq!(
        agent
            .invoke(integers.into(), "includes", &numbers(&[-0.0]))
            .unwrap(),
        Value::from(true)
    );
}
