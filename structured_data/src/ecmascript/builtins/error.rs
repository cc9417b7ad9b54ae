// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)

use std::borrow::Cow;

use crate::{
    ecmascript::execution::{Agent, ExceptionType},
    heap::indexes::ErrorIndex,
};

#[derive(Debug, Clone)]
pub struct ErrorHeapData {
    pub(crate) kind: ExceptionType,
    pub(crate) message: Cow<'static, str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Error(pub(crate) ErrorIndex);

impl Error {
    pub fn kind(self, agent: &Agent) -> ExceptionType {
        agent[self].kind
    }

    pub fn message(self, agent: &Agent) -> &str {
        &agent[self].message
    }
}
