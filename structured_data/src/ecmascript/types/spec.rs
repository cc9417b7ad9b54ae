// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [6.2 ECMAScript Specification Types](https://tc39.es/ecma262/#sec-ecmascript-specification-types)

mod data_block;
mod element_type;

pub(crate) use data_block::DataBlock;
pub(crate) use element_type::with_element_type;
pub use element_type::{ContentType, ElementType, U8Clamped, Viewable};
