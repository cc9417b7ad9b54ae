// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use super::Value;
use crate::{
    ecmascript::{
        builtins::ArgumentsList,
        execution::{Agent, JsResult},
    },
    heap::{CreateHeapData, indexes::FunctionIndex},
};

/// Behaviour of a host-defined function object.
pub type NativeFunction = dyn Fn(&mut Agent, Value, ArgumentsList) -> JsResult<Value>;

pub struct FunctionHeapData {
    pub(crate) name: String,
    pub(crate) behaviour: Rc<NativeFunction>,
}

impl core::fmt::Debug for FunctionHeapData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionHeapData")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A callable function object implemented by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Function(pub(crate) FunctionIndex);

impl Function {
    pub fn new<F>(agent: &mut Agent, name: &str, behaviour: F) -> Self
    where
        F: Fn(&mut Agent, Value, ArgumentsList) -> JsResult<Value> + 'static,
    {
        agent.heap.create(FunctionHeapData {
            name: name.to_owned(),
            behaviour: Rc::new(behaviour),
        })
    }

    pub fn name(self, agent: &Agent) -> &str {
        &agent[self].name
    }

    /// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
    pub fn call(self, agent: &mut Agent, this_value: Value, arguments: &[Value]) -> JsResult<Value> {
        let behaviour = agent[self].behaviour.clone();
        behaviour(agent, this_value, ArgumentsList::from(arguments))
    }

    /// ### [7.3.14 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
    ///
    /// Host functions do not distinguish calls from construction: the
    /// behaviour is invoked with an undefined this value.
    pub fn construct(self, agent: &mut Agent, arguments: &[Value]) -> JsResult<Value> {
        self.call(agent, Value::Undefined, arguments)
    }
}
