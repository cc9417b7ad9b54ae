// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [Table 71: The TypedArray Constructors](https://tc39.es/ecma262/#table-the-typedarray-constructors)

use core::{cmp::Ordering, fmt::Debug};

use num_bigint::BigInt;

use crate::ecmascript::{
    abstract_operations::type_conversion::{
        number_to_string, to_big_int, to_big_int64_bits, to_int8, to_int16, to_int32, to_number,
        to_uint8, to_uint8_clamp, to_uint16, to_uint32,
    },
    execution::{Agent, JsResult},
    types::{Numeric, Value},
};

/// Binds the Rust element type of an [`ElementType`] to `$T` and evaluates
/// `$body` with it.
macro_rules! with_element_type {
    ($element_type: expr, $T: ident, $body: expr) => {
        match $element_type {
            $crate::ecmascript::types::ElementType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::ecmascript::types::ElementType::Uint8 => {
                type $T = u8;
                $body
            }
            $crate::ecmascript::types::ElementType::Uint8Clamped => {
                type $T = $crate::ecmascript::types::U8Clamped;
                $body
            }
            $crate::ecmascript::types::ElementType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::ecmascript::types::ElementType::Uint16 => {
                type $T = u16;
                $body
            }
            $crate::ecmascript::types::ElementType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::ecmascript::types::ElementType::Uint32 => {
                type $T = u32;
                $body
            }
            $crate::ecmascript::types::ElementType::BigInt64 => {
                type $T = i64;
                $body
            }
            $crate::ecmascript::types::ElementType::BigUint64 => {
                type $T = u64;
                $body
            }
            $crate::ecmascript::types::ElementType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::ecmascript::types::ElementType::Float64 => {
                type $T = f64;
                $body
            }
        }
    };
}
pub(crate) use with_element_type;

/// The kind of numeric content a TypedArray holds. Copies between arrays of
/// different content types are TypeErrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Number,
    BigInt,
}

/// The eleven element kinds of TypedArrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    BigInt64,
    BigUint64,
    Float32,
    Float64,
}

impl ElementType {
    pub const ALL: [ElementType; 11] = [
        ElementType::Int8,
        ElementType::Uint8,
        ElementType::Uint8Clamped,
        ElementType::Int16,
        ElementType::Uint16,
        ElementType::Int32,
        ElementType::Uint32,
        ElementType::BigInt64,
        ElementType::BigUint64,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Size of a single element in bytes.
    pub const fn element_size(self) -> usize {
        match self {
            ElementType::Int8 | ElementType::Uint8 | ElementType::Uint8Clamped => 1,
            ElementType::Int16 | ElementType::Uint16 => 2,
            ElementType::Int32 | ElementType::Uint32 | ElementType::Float32 => 4,
            ElementType::BigInt64 | ElementType::BigUint64 | ElementType::Float64 => 8,
        }
    }

    pub const fn content_type(self) -> ContentType {
        if self.is_bigint() {
            ContentType::BigInt
        } else {
            ContentType::Number
        }
    }

    pub const fn is_bigint(self) -> bool {
        matches!(self, ElementType::BigInt64 | ElementType::BigUint64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ElementType::Float32 | ElementType::Float64)
    }

    /// Returns true if elements of `self` can be converted into elements of
    /// `other`.
    pub const fn is_compatible_with(self, other: ElementType) -> bool {
        self.is_bigint() == other.is_bigint()
    }

    /// Name of the intrinsic constructor for this element type.
    pub const fn constructor_name(self) -> &'static str {
        match self {
            ElementType::Int8 => "Int8Array",
            ElementType::Uint8 => "Uint8Array",
            ElementType::Uint8Clamped => "Uint8ClampedArray",
            ElementType::Int16 => "Int16Array",
            ElementType::Uint16 => "Uint16Array",
            ElementType::Int32 => "Int32Array",
            ElementType::Uint32 => "Uint32Array",
            ElementType::BigInt64 => "BigInt64Array",
            ElementType::BigUint64 => "BigUint64Array",
            ElementType::Float32 => "Float32Array",
            ElementType::Float64 => "Float64Array",
        }
    }

    /// Converts an arbitrary value into a numeric value of this type's
    /// content type: ToBigInt for BigInt element types and ToNumber
    /// otherwise. May call into user code.
    pub fn coerce(self, agent: &mut Agent, value: Value) -> JsResult<Numeric> {
        if self.is_bigint() {
            Ok(Numeric::BigInt(to_big_int(agent, value)?))
        } else {
            Ok(Numeric::Number(to_number(agent, value)?))
        }
    }

    /// Converts an arbitrary value into the value that would be observed
    /// after storing it into an element of this type: integer types wrap,
    /// Uint8Clamped clamps, Float32 rounds. May call into user code.
    pub fn to_element_value(self, agent: &mut Agent, value: Value) -> JsResult<Numeric> {
        let numeric = self.coerce(agent, value)?;
        Ok(with_element_type!(self, T, {
            T::from_numeric(&numeric).into_numeric()
        }))
    }
}

/// Uint8 element type with clamping conversion semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct U8Clamped(pub u8);

mod private {
    use super::U8Clamped;

    pub trait Sealed {}
    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for U8Clamped {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Rust representation of a TypedArray element.
///
/// Elements are stored in Data Blocks in the byte order requested by the
/// caller. NaN values are canonicalised when written through
/// [`Viewable::write_bytes`] and when decoded into numeric values.
pub trait Viewable: 'static + private::Sealed + Copy + Default + PartialEq + Debug {
    const ELEMENT_TYPE: ElementType;
    const IS_BIGINT: bool = false;
    const IS_FLOAT: bool = false;
    const BYTES: usize = core::mem::size_of::<Self>();

    /// Decodes an element from exactly [`Viewable::BYTES`] bytes.
    fn read_bytes(bytes: &[u8], little_endian: bool) -> Self;
    /// Encodes an element into exactly [`Viewable::BYTES`] bytes.
    fn write_bytes(self, bytes: &mut [u8], little_endian: bool);

    /// Converts a Number into this element type. Integer types wrap modulo
    /// their width, Uint8Clamped clamps, floats round to nearest.
    fn from_f64(value: f64) -> Self;
    fn into_f64(self) -> f64;
    /// Converts a 64-bit pattern into this element type by truncation.
    fn from_bits(bits: u64) -> Self;
    fn into_bits(self) -> u64;

    fn into_numeric(self) -> Numeric;

    fn from_numeric(value: &Numeric) -> Self {
        match value {
            Numeric::Number(n) => Self::from_f64(*n),
            Numeric::BigInt(b) => Self::from_bits(to_big_int64_bits(b)),
        }
    }

    /// Converts an element of another type with the same content type.
    fn convert_from<S: Viewable>(source: S) -> Self {
        debug_assert_eq!(S::IS_BIGINT, Self::IS_BIGINT);
        if Self::IS_BIGINT {
            Self::from_bits(source.into_bits())
        } else {
            Self::from_f64(source.into_f64())
        }
    }

    /// Total ordering used by the default TypedArray sort: numeric order,
    /// -0 before +0, NaN last.
    fn ecmascript_cmp(&self, other: &Self) -> Ordering;

    /// Number::toString or BigInt::toString of the element.
    fn to_display_string(self) -> String;
}

macro_rules! impl_viewable_integer {
    ($type: ty, $element_type: ident, $to_int: ident) => {
        impl Viewable for $type {
            const ELEMENT_TYPE: ElementType = ElementType::$element_type;

            fn read_bytes(bytes: &[u8], little_endian: bool) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$type>()];
                buf.copy_from_slice(&bytes[..core::mem::size_of::<$type>()]);
                if little_endian {
                    <$type>::from_le_bytes(buf)
                } else {
                    <$type>::from_be_bytes(buf)
                }
            }

            fn write_bytes(self, bytes: &mut [u8], little_endian: bool) {
                let buf = if little_endian {
                    self.to_le_bytes()
                } else {
                    self.to_be_bytes()
                };
                bytes[..core::mem::size_of::<$type>()].copy_from_slice(&buf);
            }

            fn from_f64(value: f64) -> Self {
                $to_int(value)
            }

            fn into_f64(self) -> f64 {
                self as f64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $type
            }

            fn into_bits(self) -> u64 {
                self as u64
            }

            fn into_numeric(self) -> Numeric {
                Numeric::Number(self as f64)
            }

            fn ecmascript_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn to_display_string(self) -> String {
                lexical::to_string(self)
            }
        }
    };
}

impl_viewable_integer!(i8, Int8, to_int8);
impl_viewable_integer!(u8, Uint8, to_uint8);
impl_viewable_integer!(i16, Int16, to_int16);
impl_viewable_integer!(u16, Uint16, to_uint16);
impl_viewable_integer!(i32, Int32, to_int32);
impl_viewable_integer!(u32, Uint32, to_uint32);

impl Viewable for U8Clamped {
    const ELEMENT_TYPE: ElementType = ElementType::Uint8Clamped;

    fn read_bytes(bytes: &[u8], _: bool) -> Self {
        U8Clamped(bytes[0])
    }

    fn write_bytes(self, bytes: &mut [u8], _: bool) {
        bytes[0] = self.0;
    }

    fn from_f64(value: f64) -> Self {
        U8Clamped(to_uint8_clamp(value))
    }

    fn into_f64(self) -> f64 {
        self.0 as f64
    }

    fn from_bits(bits: u64) -> Self {
        U8Clamped(bits as u8)
    }

    fn into_bits(self) -> u64 {
        self.0 as u64
    }

    fn into_numeric(self) -> Numeric {
        Numeric::Number(self.0 as f64)
    }

    fn ecmascript_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn to_display_string(self) -> String {
        lexical::to_string(self.0)
    }
}

macro_rules! impl_viewable_bigint {
    ($type: ty, $element_type: ident) => {
        impl Viewable for $type {
            const ELEMENT_TYPE: ElementType = ElementType::$element_type;
            const IS_BIGINT: bool = true;

            fn read_bytes(bytes: &[u8], little_endian: bool) -> Self {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                if little_endian {
                    <$type>::from_le_bytes(buf)
                } else {
                    <$type>::from_be_bytes(buf)
                }
            }

            fn write_bytes(self, bytes: &mut [u8], little_endian: bool) {
                let buf = if little_endian {
                    self.to_le_bytes()
                } else {
                    self.to_be_bytes()
                };
                bytes[..8].copy_from_slice(&buf);
            }

            fn from_f64(value: f64) -> Self {
                value as $type
            }

            fn into_f64(self) -> f64 {
                self as f64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $type
            }

            fn into_bits(self) -> u64 {
                self as u64
            }

            fn into_numeric(self) -> Numeric {
                Numeric::BigInt(BigInt::from(self))
            }

            fn ecmascript_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn to_display_string(self) -> String {
                lexical::to_string(self)
            }
        }
    };
}

impl_viewable_bigint!(i64, BigInt64);
impl_viewable_bigint!(u64, BigUint64);

macro_rules! impl_viewable_float {
    ($type: ty, $element_type: ident) => {
        impl Viewable for $type {
            const ELEMENT_TYPE: ElementType = ElementType::$element_type;
            const IS_FLOAT: bool = true;

            fn read_bytes(bytes: &[u8], little_endian: bool) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$type>()];
                buf.copy_from_slice(&bytes[..core::mem::size_of::<$type>()]);
                if little_endian {
                    <$type>::from_le_bytes(buf)
                } else {
                    <$type>::from_be_bytes(buf)
                }
            }

            fn write_bytes(self, bytes: &mut [u8], little_endian: bool) {
                let value = if self.is_nan() { <$type>::NAN } else { self };
                let buf = if little_endian {
                    value.to_le_bytes()
                } else {
                    value.to_be_bytes()
                };
                bytes[..core::mem::size_of::<$type>()].copy_from_slice(&buf);
            }

            fn from_f64(value: f64) -> Self {
                if value.is_nan() {
                    <$type>::NAN
                } else {
                    value as $type
                }
            }

            fn into_f64(self) -> f64 {
                if self.is_nan() { f64::NAN } else { self as f64 }
            }

            fn from_bits(bits: u64) -> Self {
                bits as $type
            }

            fn into_bits(self) -> u64 {
                self as u64
            }

            fn into_numeric(self) -> Numeric {
                Numeric::Number(self.into_f64())
            }

            fn ecmascript_cmp(&self, other: &Self) -> Ordering {
                if self.is_nan() {
                    if other.is_nan() {
                        return Ordering::Equal;
                    }
                    return Ordering::Greater;
                }
                if other.is_nan() {
                    return Ordering::Less;
                }
                if *self == 0.0 && *other == 0.0 {
                    if self.is_sign_negative() && other.is_sign_positive() {
                        return Ordering::Less;
                    }
                    if self.is_sign_positive() && other.is_sign_negative() {
                        return Ordering::Greater;
                    }
                    return Ordering::Equal;
                }
                self.partial_cmp(other).unwrap_or(Ordering::Equal)
            }

            fn to_display_string(self) -> String {
                number_to_string(self.into_f64())
            }
        }
    };
}

impl_viewable_float!(f32, Float32);
impl_viewable_float!(f64, Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes() {
        for element_type in ElementType::ALL {
            let size = with_element_type!(element_type, T, T::BYTES);
            assert_eq!(size, element_type.element_size());
        }
    }

    #[test]
    fn integer_conversions_wrap() {
        assert_eq!(i8::from_f64(200.0), -56);
        assert_eq!(u8::from_f64(-1.0), 255);
        assert_eq!(u8::from_f64(300.0), 44);
        assert_eq!(i16::from_f64(32768.0), -32768);
        assert_eq!(u32::from_f64(-1.5), u32::MAX);
        assert_eq!(i32::from_f64(f64::NAN), 0);
        assert_eq!(i32::from_f64(f64::INFINITY), 0);
        assert_eq!(u16::from_f64(65537.9), 1);
    }

    #[test]
    fn clamped_conversions_round_half_to_even() {
        assert_eq!(U8Clamped::from_f64(300.0), U8Clamped(255));
        assert_eq!(U8Clamped::from_f64(-5.0), U8Clamped(0));
        assert_eq!(U8Clamped::from_f64(1.5), U8Clamped(2));
        assert_eq!(U8Clamped::from_f64(2.5), U8Clamped(2));
        assert_eq!(U8Clamped::from_f64(2.6), U8Clamped(3));
        assert_eq!(U8Clamped::from_f64(f64::NAN), U8Clamped(0));
        assert_eq!(U8Clamped::from_f64(f64::INFINITY), U8Clamped(255));
    }

    #[test]
    fn conversions_between_kinds() {
        assert_eq!(U8Clamped::convert_from(-1i8), U8Clamped(0));
        assert_eq!(U8Clamped::convert_from(300i16), U8Clamped(255));
        assert_eq!(i16::convert_from(-1i8), -1);
        assert_eq!(u8::convert_from(-1i32), 255);
        assert_eq!(f32::convert_from(16_777_217i32), 16_777_216.0);
        assert_eq!(u64::convert_from(-1i64), u64::MAX);
        assert_eq!(i64::convert_from(u64::MAX), -1);
    }

    #[test]
    fn float_nan_is_canonicalised() {
        let mut bytes = [0u8; 4];
        f32::from_bits(0x7fc0_dead).write_bytes(&mut bytes, true);
        assert_eq!(u32::from_le_bytes(bytes), f32::NAN.to_bits());
        let Numeric::Number(n) = f32::from_bits(0xffc0_0001).into_numeric() else {
            panic!("expected a Number");
        };
        assert_eq!(n.to_bits(), f64::NAN.to_bits());
    }

    #[test]
    fn float_ordering() {
        let mut values = [f64::NAN, 1.0, 0.0, -0.0, f64::NEG_INFINITY, -1.0];
        values.sort_by(|a, b| a.ecmascript_cmp(b));
        assert_eq!(values[0], f64::NEG_INFINITY);
        assert_eq!(values[1], -1.0);
        assert!(values[2] == 0.0 && values[2].is_sign_negative());
        assert!(values[3] == 0.0 && values[3].is_sign_positive());
        assert_eq!(values[4], 1.0);
        assert!(values[5].is_nan());
    }

    #[test]
    fn element_values() {
        let mut agent = Agent::default();
        assert_eq!(
            ElementType::Int8
                .to_element_value(&mut agent, Value::Number(300.0))
                .unwrap(),
            Numeric::Number(44.0)
        );
        assert_eq!(
            ElementType::BigUint64
                .to_element_value(&mut agent, Value::BigInt(BigInt::from(-1)))
                .unwrap(),
            Numeric::BigInt(BigInt::from(u64::MAX))
        );
        assert!(
            ElementType::BigInt64
                .to_element_value(&mut agent, Value::Number(1.0))
                .is_err()
        );
        assert!(
            ElementType::Float64
                .to_element_value(&mut agent, Value::BigInt(BigInt::from(1)))
                .is_err()
        );
    }
}
