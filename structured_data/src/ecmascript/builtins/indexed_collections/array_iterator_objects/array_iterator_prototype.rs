// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.1.5.2 The %ArrayIteratorPrototype% Object](https://tc39.es/ecma262/#sec-%arrayiteratorprototype%-object)

use crate::ecmascript::{
    builtins::{ArgumentsList, Behaviour, Builtin, MethodTable},
    execution::{Agent, ExceptionType, JsResult},
    types::{OrdinaryObject, Value},
};

pub(crate) struct ArrayIteratorPrototype;

struct ArrayIteratorPrototypeNext;
impl Builtin for ArrayIteratorPrototypeNext {
    const NAME: &'static str = "next";

    const LENGTH: u8 = 0;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayIteratorPrototype::next);
}

impl ArrayIteratorPrototype {
    /// ### [23.1.5.2.1 %ArrayIteratorPrototype%.next ( )](https://tc39.es/ecma262/#sec-%arrayiteratorprototype%.next)
    fn next(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 27.5.3.2 GeneratorValidate ( generator, generatorBrand )
        // 3. If generator.[[GeneratorBrand]] is not generatorBrand, throw a TypeError exception.
        let Value::ArrayIterator(iterator) = this_value else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "ArrayIterator expected",
            ));
        };
        let (value, done) = match iterator.next(agent)? {
            Some(value) => (value, false),
            None => (Value::Undefined, true),
        };
        // 7.4.14 CreateIteratorResultObject ( value, done )
        Ok(OrdinaryObject::from_properties(agent, [("value", value), ("done", done.into())]).into())
    }

    pub(crate) fn create_intrinsic(table: &mut MethodTable) {
        table.register::<ArrayIteratorPrototypeNext>();
    }
}
