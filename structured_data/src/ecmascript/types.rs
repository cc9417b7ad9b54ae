// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod language;
mod spec;

pub use language::{
    Function, FunctionHeapData, NativeFunction, Numeric, ObjectHeapData, OrdinaryObject, Value,
};
pub(crate) use spec::DataBlock;
pub use spec::{ContentType, ElementType, U8Clamped, Viewable};
pub(crate) use spec::with_element_type;
