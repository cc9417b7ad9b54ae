// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [10.3 Built-in Function Objects](https://tc39.es/ecma262/#sec-built-in-function-objects)

pub mod array;
pub mod array_buffer;
pub mod data_view;
pub mod error;
pub mod indexed_collections;
pub mod structured_data;
pub mod typed_array;

use core::ops::Deref;
use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashMap;

use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{Function, FunctionHeapData, Value},
    },
    heap::{CreateHeapData, Heap},
};

/// The arguments a built-in function was called with. Reading past the end
/// yields undefined.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> From<&'a [Value]> for ArgumentsList<'a> {
    fn from(value: &'a [Value]) -> Self {
        Self(value)
    }
}

impl ArgumentsList<'_> {
    #[inline]
    pub fn get(&self, index: usize) -> Value {
        self.0.get(index).cloned().unwrap_or(Value::Undefined)
    }
}

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Regular(RegularFn),
}

impl Behaviour {
    pub(crate) fn call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        match self {
            Behaviour::Regular(f) => f(agent, this_value, arguments),
        }
    }
}

pub trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;
}

fn builtin_behaviour<B: Builtin>(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    B::BEHAVIOUR.call(agent, this_value, arguments)
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
pub(crate) fn create_builtin_function<B: Builtin + 'static>(heap: &mut Heap) -> Function {
    heap.create(FunctionHeapData {
        name: B::NAME.to_owned(),
        behaviour: Rc::new(builtin_behaviour::<B>),
    })
}

/// The methods of an intrinsic prototype object, keyed by property name.
#[derive(Debug, Default)]
pub(crate) struct MethodTable(HashMap<&'static str, (u8, Behaviour), RandomState>);

impl MethodTable {
    pub(crate) fn register<B: Builtin>(&mut self) -> &mut Self {
        self.0.insert(B::NAME, (B::LENGTH, B::BEHAVIOUR));
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<Behaviour> {
        self.0.get(name).map(|(_, behaviour)| *behaviour)
    }

    pub(crate) fn length_of(&self, name: &str) -> Option<u8> {
        self.0.get(name).map(|(length, _)| *length)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}
