// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25 Structured Data](https://tc39.es/ecma262/#sec-structured-data)

pub(crate) mod array_buffer_objects;
pub(crate) mod data_view_objects;
