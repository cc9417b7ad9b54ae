// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builtins::{ArgumentsList, Behaviour, Builtin, data_view::abstract_operations::create_data_view},
    execution::{Agent, JsResult},
    types::Value,
};

pub(crate) struct DataViewConstructor;

impl Builtin for DataViewConstructor {
    const NAME: &'static str = "DataView";

    const LENGTH: u8 = 1;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewConstructor::constructor);
}

impl DataViewConstructor {
    /// ### [25.3.2.1 DataView ( buffer \[ , byteOffset \[ , byteLength \] \] )](https://tc39.es/ecma262/#sec-dataview-buffer-byteoffset-bytelength)
    fn constructor(agent: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        create_data_view(
            agent,
            &arguments.get(0),
            arguments.get(1),
            arguments.get(2),
        )
        .map(Value::from)
    }
}
