// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;

use super::{Function, Numeric, OrdinaryObject};
use crate::ecmascript::builtins::{
    array::Array, array_buffer::ArrayBuffer, data_view::DataView, error::Error,
    indexed_collections::array_iterator_objects::array_iterator::ArrayIterator,
    typed_array::TypedArray,
};

/// ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// ### [6.1.1 The Undefined Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-undefined-type)
    #[default]
    Undefined,
    /// ### [6.1.2 The Null Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-null-type)
    Null,
    /// ### [6.1.3 The Boolean Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-boolean-type)
    Boolean(bool),
    /// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
    String(String),
    /// ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
    Number(f64),
    /// ### [6.1.6.2 The BigInt Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-bigint-type)
    BigInt(BigInt),

    // Objects
    Array(Array),
    ArrayBuffer(ArrayBuffer),
    ArrayIterator(ArrayIterator),
    DataView(DataView),
    Error(Error),
    Function(Function),
    Object(OrdinaryObject),
    TypedArray(TypedArray),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Value::Array(_)
                | Value::ArrayBuffer(_)
                | Value::ArrayIterator(_)
                | Value::DataView(_)
                | Value::Error(_)
                | Value::Function(_)
                | Value::Object(_)
                | Value::TypedArray(_)
        )
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_object()
    }

    /// Returns the Number value, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Numeric> for Value {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Number(n) => Value::Number(n),
            Numeric::BigInt(b) => Value::BigInt(b),
        }
    }
}

macro_rules! impl_from_object {
    ($name: ident) => {
        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::$name(value)
            }
        }
    };
}

impl_from_object!(Array);
impl_from_object!(ArrayBuffer);
impl_from_object!(ArrayIterator);
impl_from_object!(DataView);
impl_from_object!(Error);
impl_from_object!(Function);
impl_from_object!(TypedArray);

impl From<OrdinaryObject> for Value {
    fn from(value: OrdinaryObject) -> Self {
        Value::Object(value)
    }
}
