// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use super::{
    testing_and_comparison::is_callable,
    type_conversion::{to_length, to_string},
};
use crate::ecmascript::{
    builtins::array::{Array, ArrayHeapData},
    execution::{Agent, ExceptionType, JsResult},
    types::{Function, Value},
};
use crate::heap::CreateHeapData;

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
///
/// Reads the integer-keyed property `index` of an array-like value.
/// Missing properties read as undefined.
pub(crate) fn get_index(agent: &mut Agent, o: &Value, index: u64) -> JsResult<Value> {
    Ok(match o {
        Value::Array(array) => array.get(agent, index as usize),
        Value::TypedArray(ta) => ta
            .get_element(agent, index as f64)
            .map_or(Value::Undefined, Value::from),
        Value::Object(object) => object.get(agent, &index.to_string()),
        _ => Value::Undefined,
    })
}

/// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
pub(crate) fn call_function(
    agent: &mut Agent,
    f: Value,
    v: Value,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    let Value::Function(f) = f else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a callable object",
        ));
    };
    debug_assert!(is_callable(&Value::Function(f)));
    // 3. Return ? F.[[Call]](V, argumentsList).
    f.call(agent, v, arguments_list)
}

/// Returns the argument as a Function or throws a TypeError naming it.
pub(crate) fn require_callable(agent: &mut Agent, value: Value) -> JsResult<Function> {
    match value {
        Value::Function(f) => Ok(f),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Callback is not a function",
        )),
    }
}

/// ### [7.3.17 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub(crate) fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Array {
    // 1. Let array be ! ArrayCreate(0).
    // 2. Let n be 0.
    // 3. For each element e of elements, do
    // a. Perform ! CreateDataPropertyOrThrow(array, ! ToString(𝔽(n)), e).
    // b. Set n to n + 1.
    // 4. Return array.
    agent.heap.create(ArrayHeapData {
        elements: elements.to_vec(),
    })
}

/// ### [7.3.18 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub(crate) fn length_of_array_like(agent: &mut Agent, obj: &Value) -> JsResult<u64> {
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    match obj {
        Value::Array(array) => Ok(array.len(agent) as u64),
        Value::TypedArray(ta) => Ok(ta.array_length(agent) as u64),
        Value::Object(object) => {
            let length = object.get(agent, "length");
            to_length(agent, length)
        }
        _ => Ok(0),
    }
}

/// The result of calling the `toString` method inherited from the
/// intrinsic prototype of an object.
pub(crate) fn object_to_string(agent: &mut Agent, o: &Value) -> JsResult<String> {
    match o {
        Value::Array(array) => {
            let elements = array.as_slice(agent).to_vec();
            let mut result = String::new();
            for (k, element) in elements.into_iter().enumerate() {
                if k > 0 {
                    result.push(',');
                }
                if !element.is_undefined() && !element.is_null() {
                    result.push_str(&to_string(agent, element)?);
                }
            }
            Ok(result)
        }
        Value::TypedArray(_) => {
            let joined = agent.invoke(o.clone(), "join", &[])?;
            to_string(agent, joined)
        }
        Value::Error(error) => {
            let data = &agent[*error];
            if data.message.is_empty() {
                Ok(data.kind.name().to_owned())
            } else {
                Ok(format!("{}: {}", data.kind, data.message))
            }
        }
        Value::Function(f) => Ok(format!("function {}() {{ [native code] }}", f.name(agent))),
        Value::ArrayBuffer(_) => Ok("[object ArrayBuffer]".to_owned()),
        Value::ArrayIterator(_) => Ok("[object Array Iterator]".to_owned()),
        Value::DataView(_) => Ok("[object DataView]".to_owned()),
        Value::Object(_) => Ok("[object Object]".to_owned()),
        _ => to_string(agent, o.clone()),
    }
}
