// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::ecmascript::types::Value;

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
pub(crate) fn is_callable(argument: &Value) -> bool {
    matches!(argument, Value::Function(_))
}

/// ### [6.1.6.1.14 Number::sameValue ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-number-sameValue)
pub(crate) fn number_same_value(x: f64, y: f64) -> bool {
    // 1. If x is NaN and y is NaN, return true.
    if x.is_nan() && y.is_nan() {
        return true;
    }
    // 2. If x is +0𝔽 and y is -0𝔽, return false.
    // 3. If x is -0𝔽 and y is +0𝔽, return false.
    // 4. If x is y, return true.
    // 5. Return false.
    x == y && x.is_sign_negative() == y.is_sign_negative()
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
pub fn same_value(x: &Value, y: &Value) -> bool {
    match (x, y) {
        // 2. If x is a Number, then
        // a. Return Number::sameValue(x, y).
        (Value::Number(x), Value::Number(y)) => number_same_value(*x, *y),
        // 3. Return SameValueNonNumber(x, y).
        _ => x == y,
    }
}

/// ### [7.2.15 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
pub fn is_strictly_equal(x: &Value, y: &Value) -> bool {
    // Number::equal is IEEE equality, which is what the derived comparison
    // of Number payloads performs.
    x == y
}

#[test]
fn same_value_distinguishes_zeroes() {
    assert!(same_value(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    assert!(!same_value(&Value::Number(0.0), &Value::Number(-0.0)));
    assert!(is_strictly_equal(&Value::Number(0.0), &Value::Number(-0.0)));
    assert!(!is_strictly_equal(
        &Value::Number(f64::NAN),
        &Value::Number(f64::NAN)
    ));
    assert!(same_value(&Value::from("a"), &Value::from("a")));
}
