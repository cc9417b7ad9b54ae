// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_bigint::BigInt;

use super::Value;

/// A Number or a BigInt: the result of ToNumeric and the value of a
/// TypedArray element.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Number(f64),
    BigInt(BigInt),
}

impl Numeric {
    pub fn is_bigint(&self) -> bool {
        matches!(self, Numeric::BigInt(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => Some(*n),
            Numeric::BigInt(_) => None,
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

impl From<BigInt> for Numeric {
    fn from(value: BigInt) -> Self {
        Numeric::BigInt(value)
    }
}

impl TryFrom<Value> for Numeric {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(Numeric::Number(n)),
            Value::BigInt(b) => Ok(Numeric::BigInt(b)),
            _ => Err(value),
        }
    }
}
