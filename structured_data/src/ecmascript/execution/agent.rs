// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [9.7 Agents](https://tc39.es/ecma262/#sec-agents)

use std::borrow::Cow;

use super::{DefaultHostHooks, Intrinsics};
use crate::{
    ecmascript::{
        builtins::{
            ArgumentsList,
            error::{Error, ErrorHeapData},
            typed_array::TypedArray,
        },
        types::{ElementType, Function, Value},
    },
    heap::{CreateHeapData, Heap},
};

/// The largest byte length the engine will ever allocate for an ArrayBuffer:
/// 2<sup>53</sup> - 1.
pub const MAX_SAFE_BYTE_LENGTH: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Byte order used by TypedArray element access. DataView accesses
    /// always take their byte order from the caller.
    pub little_endian: bool,
    /// Upper bound on ArrayBuffer byte lengths; requests above it fail with
    /// a RangeError.
    pub max_array_buffer_byte_length: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            little_endian: cfg!(target_endian = "little"),
            max_array_buffer_byte_length: MAX_SAFE_BYTE_LENGTH,
        }
    }
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A thrown ECMAScript value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsError(pub(crate) Value);

impl JsError {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the kind of the thrown Error object, if the thrown value is
    /// one.
    pub fn exception_type(&self, agent: &Agent) -> Option<ExceptionType> {
        match self.0 {
            Value::Error(error) => Some(agent[error].kind),
            _ => None,
        }
    }

    /// Returns the message of the thrown Error object, if the thrown value
    /// is one.
    pub fn message<'a>(&self, agent: &'a Agent) -> Option<&'a str> {
        match self.0 {
            Value::Error(error) => Some(&agent[error].message),
            _ => None,
        }
    }
}

pub trait HostHooks: std::fmt::Debug {
    /// ### [23.2.4.4 TypedArraySpeciesCreate ( exemplar, argumentList )](https://tc39.es/ecma262/#typedarray-species-create)
    ///
    /// Resolves the constructor used to create derived TypedArrays from
    /// `exemplar` in `slice`, `map`, `filter` and `subarray`. Returning
    /// `None` selects the intrinsic constructor of the exemplar's element
    /// type.
    ///
    /// The hook may run arbitrary user code.
    fn resolve_typed_array_species_constructor(
        &self,
        agent: &mut Agent,
        exemplar: TypedArray,
    ) -> JsResult<Option<Function>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionType {
    Error,
    RangeError,
    SyntaxError,
    TypeError,
}

impl ExceptionType {
    pub const fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
        }
    }
}

impl core::fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
#[derive(Debug)]
pub struct Agent {
    pub(crate) heap: Heap,
    pub(crate) options: Options,
    pub(crate) host_hooks: &'static dyn HostHooks,
    pub(crate) intrinsics: Intrinsics,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Options::default(), &DefaultHostHooks)
    }
}

impl Agent {
    pub fn new(options: Options, host_hooks: &'static dyn HostHooks) -> Self {
        let mut heap = Heap::new();
        let intrinsics = Intrinsics::new(&mut heap);
        tracing::debug!(?options, "created agent");
        Self {
            heap,
            options,
            host_hooks,
            intrinsics,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// %ArrayBuffer%
    pub fn array_buffer_constructor(&self) -> Function {
        self.intrinsics.array_buffer_constructor()
    }

    /// %DataView%
    pub fn data_view_constructor(&self) -> Function {
        self.intrinsics.data_view_constructor()
    }

    /// The intrinsic constructor of TypedArrays with the given element type,
    /// for example %Uint8Array%.
    pub fn typed_array_constructor(&self, element_type: ElementType) -> Function {
        self.intrinsics.typed_array_constructor(element_type)
    }

    /// Names of the built-in methods that [`Agent::invoke`] can call on
    /// `value`, sorted.
    pub fn method_names(&self, value: &Value) -> Vec<&'static str> {
        self.intrinsics.method_names(value)
    }

    /// The `length` property of the built-in method `name` of `value`.
    pub fn method_length(&self, value: &Value, name: &str) -> Option<u8> {
        self.intrinsics.method_length(value, name)
    }

    /// Creates an Error object of the given kind and returns it as a thrown
    /// value.
    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        self.create_exception(kind, Cow::Borrowed(message))
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, message: String) -> JsError {
        self.create_exception(kind, Cow::Owned(message))
    }

    fn create_exception(&mut self, kind: ExceptionType, message: Cow<'static, str>) -> JsError {
        let error: Error = self.heap.create(ErrorHeapData { kind, message });
        JsError(Value::Error(error))
    }

    /// Calls the built-in method `name` of the object `this_value`.
    ///
    /// Methods are looked up from the intrinsic prototype of the object's
    /// kind; calling a method that does not exist throws a TypeError.
    pub fn invoke(
        &mut self,
        this_value: Value,
        name: &str,
        arguments: &[Value],
    ) -> JsResult<Value> {
        let Some(behaviour) = self.intrinsics.lookup_method(&this_value, name) else {
            return Err(self.throw_exception(
                ExceptionType::TypeError,
                format!("{name} is not a function"),
            ));
        };
        behaviour.call(self, this_value, ArgumentsList::from(arguments))
    }
}
