// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The BigInt type has no implicit conversions in the ECMAScript language;
//! programmers must call BigInt explicitly to convert values from other types.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use super::operations_on_objects::{call_function, object_to_string};
use crate::ecmascript::{
    execution::{Agent, ExceptionType, JsResult, MAX_SAFE_BYTE_LENGTH},
    types::{Numeric, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// The abstract operation ToPrimitive takes argument input (an ECMAScript
/// language value) and optional argument preferredType (STRING or NUMBER) and
/// returns either a normal completion containing an ECMAScript language value
/// or a throw completion. It converts its input argument to a non-Object type.
pub fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    if input.is_object() {
        // c. If preferredType is not present, let preferredType be NUMBER.
        // d. Return ? OrdinaryToPrimitive(input, preferredType).
        ordinary_to_primitive(
            agent,
            input,
            preferred_type.unwrap_or(PreferredType::Number),
        )
    } else {
        // 2. Return input.
        Ok(input)
    }
}

/// #### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
///
/// The abstract operation OrdinaryToPrimitive takes arguments O (an Object)
/// and hint (STRING or NUMBER) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion.
///
/// Only plain objects can override `valueOf` and `toString`; every other
/// object uses the built-in methods of its prototype.
pub(crate) fn ordinary_to_primitive(
    agent: &mut Agent,
    o: Value,
    hint: PreferredType,
) -> JsResult<Value> {
    let method_names = match hint {
        // 1. If hint is STRING, then
        // a. Let methodNames be « "toString", "valueOf" ».
        PreferredType::String => ["toString", "valueOf"],
        // 2. Else,
        // a. Let methodNames be « "valueOf", "toString" ».
        PreferredType::Number => ["valueOf", "toString"],
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let own_method = match &o {
            Value::Object(object) if object.has(agent, name) => Some(object.get(agent, name)),
            _ => None,
        };
        let result = match own_method {
            // b. If IsCallable(method) is true, then
            // i. Let result be ? Call(method, O).
            Some(method @ Value::Function(_)) => call_function(agent, method, o.clone(), &[])?,
            Some(_) => continue,
            // %Object.prototype.valueOf% returns the object itself.
            None if name == "valueOf" => continue,
            None => Value::String(object_to_string(agent, &o)?),
        };
        // ii. If result is not an Object, return result.
        if result.is_primitive() {
            return Ok(result);
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(argument: &Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(b) => *b,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the
        //    empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::BigInt(b) => !b.is_zero(),
        Value::String(s) => !s.is_empty(),
        // 4. Return true.
        _ => true,
    }
}

/// ### [7.1.3 ToNumeric ( value )](https://tc39.es/ecma262/#sec-tonumeric)
pub fn to_numeric(agent: &mut Agent, value: Value) -> JsResult<Numeric> {
    // 1. Let primValue be ? ToPrimitive(value, NUMBER).
    let prim_value = to_primitive(agent, value, Some(PreferredType::Number))?;
    // 2. If primValue is a BigInt, return primValue.
    if let Value::BigInt(b) = prim_value {
        return Ok(Numeric::BigInt(b));
    }
    // 3. Return ? ToNumber(primValue).
    Ok(Numeric::Number(to_number(agent, prim_value)?))
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        // 2. If argument is either a Symbol or a BigInt, throw a TypeError exception.
        Value::BigInt(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a BigInt value to a number",
        )),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(s) => Ok(string_to_number(&s)),
        // 7. Assert: argument is an Object.
        // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
        // 9. Assert: primValue is not an Object.
        // 10. Return ? ToNumber(primValue).
        _ => {
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            to_number(agent, prim_value)
        }
    }
}

fn is_trimmable_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{FEFF}'
            | '\u{000A}'
            | '\u{000D}'
            | '\u{2028}'
            | '\u{2029}'
    ) || c.is_whitespace()
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub fn string_to_number(str: &str) -> f64 {
    let trimmed = str.trim_matches(is_trimmable_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return f64::NAN;
        }
        return BigInt::parse_bytes(digits.as_bytes(), radix)
            .map_or(f64::NAN, |n| num_traits::ToPrimitive::to_f64(&n).unwrap_or(f64::NAN));
    }
    // fast_float accepts "inf" and "nan" spellings that are not StrDecimalLiterals.
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    fast_float::parse::<f64, _>(trimmed).unwrap_or(f64::NAN)
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    Ok(integer_or_infinity(number))
}

pub(crate) fn integer_or_infinity(number: f64) -> f64 {
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return 0.0;
    }
    // 3. If number is +∞𝔽, return +∞.
    // 4. If number is -∞𝔽, return -∞.
    // 5. Return truncate(ℝ(number)).
    number.trunc()
}

/// Reduces a finite integral Number modulo 2^bits.
fn modulo_pow2(number: f64, bits: u32) -> u64 {
    // 1. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    // 2. Let int be truncate(ℝ(number)).
    let int = number.trunc();
    // 3. Let intNbit be int modulo 2^N.
    let modulus = (bits as f64).exp2();
    int.rem_euclid(modulus) as u64
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub fn to_int32(number: f64) -> i32 {
    modulo_pow2(number, 32) as u32 as i32
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub fn to_uint32(number: f64) -> u32 {
    modulo_pow2(number, 32) as u32
}

/// ### [7.1.8 ToInt16 ( argument )](https://tc39.es/ecma262/#sec-toint16)
pub fn to_int16(number: f64) -> i16 {
    modulo_pow2(number, 16) as u16 as i16
}

/// ### [7.1.9 ToUint16 ( argument )](https://tc39.es/ecma262/#sec-touint16)
pub fn to_uint16(number: f64) -> u16 {
    modulo_pow2(number, 16) as u16
}

/// ### [7.1.10 ToInt8 ( argument )](https://tc39.es/ecma262/#sec-toint8)
pub fn to_int8(number: f64) -> i8 {
    modulo_pow2(number, 8) as u8 as i8
}

/// ### [7.1.11 ToUint8 ( argument )](https://tc39.es/ecma262/#sec-touint8)
pub fn to_uint8(number: f64) -> u8 {
    modulo_pow2(number, 8) as u8
}

/// ### [7.1.12 ToUint8Clamp ( argument )](https://tc39.es/ecma262/#sec-touint8clamp)
pub fn to_uint8_clamp(number: f64) -> u8 {
    // 2. If number is NaN, return +0𝔽.
    if number.is_nan() {
        return 0;
    }
    // 3. Let mv be the extended mathematical value of number.
    // 4. Let clamped be the result of clamping mv between 0 and 255.
    let clamped = number.clamp(0.0, 255.0);
    // 5. Let f be floor(clamped).
    // 6. If clamped < f + 0.5, return 𝔽(f).
    // 7. If clamped > f + 0.5, return 𝔽(f + 1).
    // 8. If f is even, return 𝔽(f). Otherwise, return 𝔽(f + 1).
    clamped.round_ties_even() as u8
}

/// ### [7.1.13 ToBigInt ( argument )](https://tc39.es/ecma262/#sec-tobigint)
pub fn to_big_int(agent: &mut Agent, argument: Value) -> JsResult<BigInt> {
    // 1. Let prim be ? ToPrimitive(argument, NUMBER).
    let prim = to_primitive(agent, argument, Some(PreferredType::Number))?;
    // 2. Return the value that prim corresponds to in Table 12.
    match prim {
        Value::Undefined | Value::Null => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to a BigInt",
        )),
        Value::Boolean(b) => Ok(BigInt::from(b as u8)),
        Value::BigInt(b) => Ok(b),
        Value::Number(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert a Number to a BigInt",
        )),
        Value::String(s) => match string_to_big_int(&s) {
            Some(b) => Ok(b),
            None => Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                format!("Cannot convert {s} to a BigInt"),
            )),
        },
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert an object to a BigInt",
        )),
    }
}

/// ### [7.1.14 StringToBigInt ( str )](https://tc39.es/ecma262/#sec-stringtobigint)
pub fn string_to_big_int(str: &str) -> Option<BigInt> {
    let trimmed = str.trim_matches(is_trimmable_whitespace);
    if trimmed.is_empty() {
        return Some(BigInt::zero());
    }
    let (radix, digits) = match trimmed.get(..2) {
        Some("0x" | "0X") => (16, &trimmed[2..]),
        Some("0o" | "0O") => (8, &trimmed[2..]),
        Some("0b" | "0B") => (2, &trimmed[2..]),
        _ => (10, trimmed),
    };
    let (negative, digits) = match (radix, digits.as_bytes().first()) {
        (10, Some(b'-')) => (true, &digits[1..]),
        (10, Some(b'+')) => (false, &digits[1..]),
        _ => (false, digits),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let value = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    Some(if negative { -value } else { value })
}

/// The two's complement bit pattern of `bigint` modulo 2^64.
///
/// ### [7.1.15 ToBigInt64 ( argument )](https://tc39.es/ecma262/#sec-tobigint64)
/// ### [7.1.16 ToBigUint64 ( argument )](https://tc39.es/ecma262/#sec-tobiguint64)
pub fn to_big_int64_bits(bigint: &BigInt) -> u64 {
    let bytes = bigint.to_signed_bytes_le();
    let fill = if bigint.sign() == Sign::Minus { 0xFF } else { 0 };
    let mut buf = [fill; 8];
    let count = bytes.len().min(8);
    buf[..count].copy_from_slice(&bytes[..count]);
    u64::from_le_bytes(buf)
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value) -> JsResult<String> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => Ok(s),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => Ok("undefined".to_owned()),
        // 4. If argument is null, return "null".
        Value::Null => Ok("null".to_owned()),
        // 5. If argument is true, return "true".
        // 6. If argument is false, return "false".
        Value::Boolean(b) => Ok(if b { "true" } else { "false" }.to_owned()),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => Ok(number_to_string(n)),
        // 8. If argument is a BigInt, return BigInt::toString(argument, 10).
        Value::BigInt(b) => Ok(b.to_string()),
        // 9. Assert: argument is an Object.
        // 10. Let primValue be ? ToPrimitive(argument, STRING).
        // 11. Assert: primValue is not an Object.
        // 12. Return ? ToString(primValue).
        _ => {
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            to_string(agent, prim_value)
        }
    }
}

/// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_owned()
    } else if x == 0.0 {
        "0".to_owned()
    } else if x.is_infinite() {
        if x.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else {
        let mut buffer = ryu_js::Buffer::new();
        buffer.format(x).to_owned()
    }
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub fn to_length(agent: &mut Agent, argument: Value) -> JsResult<u64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2^53 - 1)).
    Ok(len.min(MAX_SAFE_BYTE_LENGTH as f64) as u64)
}

/// ### [7.1.22 ToIndex ( value )](https://tc39.es/ecma262/#sec-toindex)
pub fn to_index(agent: &mut Agent, value: Value) -> JsResult<u64> {
    // 1. Let integer be ? ToIntegerOrInfinity(value).
    let integer = to_integer_or_infinity(agent, value)?;
    // 2. If integer is not in the inclusive interval from 0 to 2^53 - 1,
    //    throw a RangeError exception.
    if !(0.0..=MAX_SAFE_BYTE_LENGTH as f64).contains(&integer) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Index is out of range",
        ));
    }
    // 3. Return integer.
    Ok(integer as u64)
}

/// Resolves a relative index argument against `len`: negative values count
/// from the end, and the result is clamped to `0..=len`.
pub(crate) fn relative_index(relative: f64, len: usize) -> usize {
    if relative == f64::NEG_INFINITY {
        0
    } else if relative < 0.0 {
        (len as f64 + relative).max(0.0) as usize
    } else {
        relative.min(len as f64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_number_parses_literals() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  42  "), 42.0);
        assert_eq!(string_to_number("-1.5e3"), -1500.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("nan").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("0x").is_nan());
    }

    #[test]
    fn integer_wrapping() {
        assert_eq!(to_int32(4294967295.0), -1);
        assert_eq!(to_uint32(-1.0), 4294967295);
        assert_eq!(to_int8(128.0), -128);
        assert_eq!(to_uint16(-0.9), 0);
        assert_eq!(to_int16(1e20), to_int16(1e20 % 65536.0));
    }

    #[test]
    fn big_int64_bits_wrap() {
        assert_eq!(to_big_int64_bits(&BigInt::from(-1)), u64::MAX);
        assert_eq!(to_big_int64_bits(&(BigInt::from(1) << 64u32)), 0);
        assert_eq!(
            to_big_int64_bits(&((BigInt::from(1) << 64u32) + 5)),
            5
        );
        assert_eq!(to_big_int64_bits(&BigInt::from(i64::MIN)) as i64, i64::MIN);
    }

    #[test]
    fn string_to_big_int_parses_literals() {
        assert_eq!(string_to_big_int(" -12 "), Some(BigInt::from(-12)));
        assert_eq!(string_to_big_int("0xff"), Some(BigInt::from(255)));
        assert_eq!(string_to_big_int(""), Some(BigInt::zero()));
        assert_eq!(string_to_big_int("1.5"), None);
        assert_eq!(string_to_big_int("0x-1"), None);
    }

    #[test]
    fn to_big_int_throws_for_values_without_a_big_int() {
        use crate::ecmascript::types::{Function, OrdinaryObject};

        let mut agent = Agent::default();
        assert_eq!(
            to_big_int(&mut agent, Value::Boolean(true)).unwrap(),
            BigInt::from(1)
        );
        let value_of = Function::new(&mut agent, "valueOf", |_, _, _| {
            Ok(Value::from(BigInt::from(7)))
        });
        let object = OrdinaryObject::from_properties(&mut agent, [("valueOf", value_of.into())]);
        assert_eq!(
            to_big_int(&mut agent, object.into()).unwrap(),
            BigInt::from(7)
        );
        for (value, kind) in [
            (Value::Undefined, ExceptionType::TypeError),
            (Value::Number(1.0), ExceptionType::TypeError),
            (Value::from("1n"), ExceptionType::SyntaxError),
        ] {
            let error = to_big_int(&mut agent, value).unwrap_err();
            assert_eq!(error.exception_type(&agent), Some(kind));
        }
        let value_of = Function::new(&mut agent, "valueOf", |_, _, _| Ok(Value::Number(1.0)));
        let object = OrdinaryObject::from_properties(&mut agent, [("valueOf", value_of.into())]);
        let error = to_big_int(&mut agent, object.into()).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::TypeError)
        );
    }

    #[test]
    fn numbers_format_like_ecmascript() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
    }

    #[test]
    fn to_index_rejects_negative_values() {
        let mut agent = Agent::default();
        assert_eq!(to_index(&mut agent, Value::Number(-0.5)).unwrap(), 0);
        assert_eq!(to_index(&mut agent, Value::Undefined).unwrap(), 0);
        let error = to_index(&mut agent, Value::Number(-1.0)).unwrap_err();
        assert_eq!(
            error.exception_type(&agent),
            Some(ExceptionType::RangeError)
        );
        assert!(to_index(&mut agent, Value::Number(f64::INFINITY)).is_err());
    }

    #[test]
    fn relative_indices() {
        assert_eq!(relative_index(-1.0, 4), 3);
        assert_eq!(relative_index(-10.0, 4), 0);
        assert_eq!(relative_index(10.0, 4), 4);
        assert_eq!(relative_index(f64::NEG_INFINITY, 4), 0);
        assert_eq!(relative_index(f64::INFINITY, 4), 4);
    }
}
