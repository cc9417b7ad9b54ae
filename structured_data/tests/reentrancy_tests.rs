// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User code running in the middle of an operation may detach the buffer
//! the operation works on. These tests detach from comparators, callbacks,
//! `valueOf` and species constructors.

use std::{cell::Cell, rc::Rc};

use structured_data::{
    Agent, Array, ArrayBuffer, DefaultHostHooks, ElementType, ExceptionType, Function, Numeric,
    Options, OrdinaryObject, TypedArray, Value,
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

/// An object whose `valueOf` detaches `buffer` and then returns `result`.
fn detaching_value(agent: &mut Agent, buffer: ArrayBuffer, result: f64) -> Value {
    let value_of = Function::new(agent, "valueOf", move |agent, _, _| {
        buffer.detach(agent);
        Ok(Value::from(result))
    });
    OrdinaryObject::from_properties(agent, [("valueOf", value_of.into())]).into()
}

#[test]
fn comparator_detaching_on_second_comparison_fails_sort() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int32, &[4.0, 3.0, 2.0, 1.0]);
    let buffer = ta.viewed_array_buffer(&agent);
    let calls = Rc::new(Cell::new(0));
    let comparator = {
        let calls = calls.clone();
        Function::new(&mut agent, "comparator", move |agent, _, arguments| {
            calls.set(calls.get() + 1);
            if calls.get() == 2 {
                buffer.detach(agent);
            }
            let a = arguments.get(0).as_number().unwrap_or_default();
            let b = arguments.get(1).as_number().unwrap_or_default();
            Ok(Value::from(a - b))
        })
    };
    let err = agent
        .invoke(ta.into(), "sort", &[comparator.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert_eq!(calls.get(), 2);
    assert!(ta.is_detached(&agent));
}

#[test]
fn fill_value_coercion_detaching() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Float32, 4).unwrap();
    let buffer = ta.viewed_array_buffer(&agent);
    let value = detaching_value(&mut agent, buffer, 1.0);
    let err = agent.invoke(ta.into(), "fill", &[value]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn set_element_coercion_detaching_fails_set_element() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Uint8, 2).unwrap();
    let buffer = ta.viewed_array_buffer(&agent);
    let value = detaching_value(&mut agent, buffer, 5.0);
    let err = ta.set_element(&mut agent, 0.0, value).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(ta.is_detached(&agent));
    assert_eq!(ta.get_element(&agent, 0.0), None);
}

#[test]
fn set_element_out_of_range_is_ignored() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Uint8, 2).unwrap();
    ta.set_element(&mut agent, 7.0, Value::from(5)).unwrap();
    ta.set_element(&mut agent, -1.0, Value::from(5)).unwrap();
    assert_eq!(ta.get_element(&agent, 0.0), Some(Numeric::Number(0.0)));
    assert_eq!(ta.get_element(&agent, 1.0), Some(Numeric::Number(0.0)));
}

#[test]
fn set_from_array_detaching_midway() {
    let mut agent = new_agent();
    let ta = TypedArray::new(&mut agent, ElementType::Int8, 3).unwrap();
    let buffer = ta.viewed_array_buffer(&agent);
    let value = detaching_value(&mut agent, buffer, 2.0);
    let source = Array::from_slice(&mut agent, &[Value::from(1), value, Value::from(3)]);
    let err = agent
        .invoke(ta.into(), "set", &[source.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(ta.is_detached(&agent));
    assert_eq!(ta.array_length(&agent), 0);
}

/// A callback that detaches `buffer` on its first call and counts calls.
fn detaching_callback(agent: &mut Agent, buffer: ArrayBuffer, calls: Rc<Cell<u32>>) -> Function {
    Function::new(agent, "callback", move |agent, _, _| {
        calls.set(calls.get() + 1);
        buffer.detach(agent);
        Ok(Value::from(false))
    })
}

#[test]
fn callback_detaching_fails_iteration() {
    for method in [
        "every",
        "filter",
        "find",
        "findIndex",
        "findLast",
        "findLastIndex",
        "forEach",
        "map",
        "some",
    ] {
        let mut agent = new_agent();
        let ta = create(&mut agent, ElementType::Uint16, &[1.0, 2.0, 3.0]);
        let calls = Rc::new(Cell::new(0));
        let buffer = ta.viewed_array_buffer(&agent);
        let callback = detaching_callback(&mut agent, buffer, calls.clone());
        let err = agent
            .invoke(ta.into(), method, &[callback.into()])
            .unwrap_err();
        assert_eq!(
            err.exception_type(&agent),
            Some(ExceptionType::TypeError),
            "{method}"
        );
        assert_eq!(calls.get(), 1, "{method}");
    }
}

#[test]
fn reducer_detaching_fails_reduce() {
    for method in ["reduce", "reduceRight"] {
        let mut agent = new_agent();
        let ta = create(&mut agent, ElementType::Float64, &[1.0, 2.0, 3.0]);
        let calls = Rc::new(Cell::new(0));
        let buffer = ta.viewed_array_buffer(&agent);
        let callback = detaching_callback(&mut agent, buffer, calls.clone());
        let err = agent
            .invoke(ta.into(), method, &[callback.into(), Value::from(0)])
            .unwrap_err();
        assert_eq!(
            err.exception_type(&agent),
            Some(ExceptionType::TypeError),
            "{method}"
        );
        assert_eq!(calls.get(), 1, "{method}");
    }
}

#[test]
fn map_result_coercion_detaching_target_fails_map() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int8, &[1.0, 2.0]);
    let target = TypedArray::new(&mut agent, ElementType::Int8, 2).unwrap();
    let species = Function::new(&mut agent, "Species", move |_, _, _| Ok(target.into()));
    ta.set_constructor(&mut agent, species.into());
    let buffer = target.viewed_array_buffer(&agent);
    let mapped = detaching_value(&mut agent, buffer, 9.0);
    let callback = Function::new(&mut agent, "callback", move |_, _, _| Ok(mapped.clone()));
    let err = agent
        .invoke(ta.into(), "map", &[callback.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
    assert!(target.is_detached(&agent));
    assert!(!ta.is_detached(&agent));
}

#[test]
fn index_coercion_detaching_copy_within() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int8, &[1.0, 2.0, 3.0, 4.0]);
    let buffer = ta.viewed_array_buffer(&agent);
    let start = detaching_value(&mut agent, buffer, 1.0);
    let err = agent
        .invoke(ta.into(), "copyWithin", &[Value::from(0), start])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn array_buffer_slice_argument_detaching() {
    let mut agent = new_agent();
    let buffer = ArrayBuffer::allocate(&mut agent, 4).unwrap();
    let end = detaching_value(&mut agent, buffer, 2.0);
    let err = agent
        .invoke(buffer.into(), "slice", &[Value::from(0), end])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn species_constructor_is_consulted() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Int16, &[1.0, 2.0, 300.0]);
    let calls = Rc::new(Cell::new(0));
    let species = {
        let calls = calls.clone();
        Function::new(&mut agent, "Species", move |agent, _, arguments| {
            calls.set(calls.get() + 1);
            let uint8 = agent.typed_array_constructor(ElementType::Uint8);
            uint8.construct(agent, *arguments)
        })
    };
    ta.set_constructor(&mut agent, species.into());

    let Value::TypedArray(sliced) = agent.invoke(ta.into(), "slice", &[]).unwrap() else {
        panic!("expected a TypedArray");
    };
    assert_eq!(sliced.element_type(&agent), ElementType::Uint8);
    assert_eq!(
        agent.invoke(sliced.into(), "join", &[]).unwrap(),
        Value::from("1,2,44")
    );

    let Value::TypedArray(sub) = agent
        .invoke(ta.into(), "subarray", &numbers(&[1.0]))
        .unwrap()
    else {
        panic!("expected a TypedArray");
    };
    assert_eq!(sub.element_type(&agent), ElementType::Uint8);
    assert_eq!(sub.byte_offset(&agent), 2);
    assert_eq!(calls.get(), 2);
}

#[test]
fn species_constructor_results_are_validated() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Float64, &[1.0, 2.0, 3.0]);

    let too_short = Function::new(&mut agent, "TooShort", |agent, _, _| {
        TypedArray::new(agent, ElementType::Float64, 1).map(Value::from)
    });
    ta.set_constructor(&mut agent, too_short.into());
    let err = agent.invoke(ta.into(), "slice", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    let wrong_family = Function::new(&mut agent, "WrongFamily", |agent, _, _| {
        TypedArray::new(agent, ElementType::BigInt64, 3).map(Value::from)
    });
    ta.set_constructor(&mut agent, wrong_family.into());
    let err = agent.invoke(ta.into(), "slice", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    let not_a_view = Function::new(&mut agent, "NotAView", |_, _, _| Ok(Value::from(1)));
    ta.set_constructor(&mut agent, not_a_view.into());
    let err = agent.invoke(ta.into(), "slice", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    ta.set_constructor(&mut agent, Value::from(7));
    let err = agent.invoke(ta.into(), "slice", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));

    ta.set_constructor(&mut agent, Value::Undefined);
    assert!(agent.invoke(ta.into(), "slice", &[]).is_ok());
}

#[test]
fn species_constructor_detaching_source_fails_slice() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Uint8, &[1.0, 2.0]);
    let buffer = ta.viewed_array_buffer(&agent);
    let species = Function::new(&mut agent, "Detacher", move |agent, _, arguments| {
        buffer.detach(agent);
        let uint8 = agent.typed_array_constructor(ElementType::Uint8);
        uint8.construct(agent, *arguments)
    });
    ta.set_constructor(&mut agent, species.into());
    let err = agent.invoke(ta.into(), "slice", &[]).unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn user_errors_propagate_unchanged() {
    let mut agent = new_agent();
    let ta = create(&mut agent, ElementType::Uint8, &[1.0]);
    let thrower = Function::new(&mut agent, "thrower", |agent, _, _| {
        Err(agent.throw_exception_with_static_message(ExceptionType::Error, "boom"))
    });
    let err = agent
        .invoke(ta.into(), "map", &[thrower.into()])
        .unwrap_err();
    assert_eq!(err.exception_type(&agent), Some(ExceptionType::Error));
    assert_eq!(err.message(&agent), Some("boom"));
}
