// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Agent, ExceptionType, HostHooks, JsResult};
use crate::ecmascript::{
    builtins::typed_array::TypedArray,
    types::{Function, Value},
};

#[derive(Debug)]
pub struct DefaultHostHooks;

impl HostHooks for DefaultHostHooks {
    /// Resolves the species constructor from the `constructor` property of
    /// the exemplar.
    ///
    /// A function value is used as the species constructor directly. An
    /// undefined `constructor`, or an object without a species, selects the
    /// intrinsic constructor. Any other primitive is a TypeError.
    fn resolve_typed_array_species_constructor(
        &self,
        agent: &mut Agent,
        exemplar: TypedArray,
    ) -> JsResult<Option<Function>> {
        // 1. Let C be ? Get(O, "constructor").
        let c = exemplar.get_constructor(agent);
        match c {
            // 2. If C is undefined, return defaultConstructor.
            Value::Undefined => Ok(None),
            // 4. Let S be ? Get(C, %Symbol.species%).
            // 6. If IsConstructor(S) is true, return S.
            Value::Function(f) => Ok(Some(f)),
            // 5. If S is either undefined or null, return defaultConstructor.
            c if c.is_object() => Ok(None),
            // 3. If C is not an Object, throw a TypeError exception.
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "object.constructor is not an object",
            )),
        }
    }
}
