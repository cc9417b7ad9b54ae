// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ArrayBuffer, TypedArray and DataView objects of an ECMAScript engine.
//!
//! All objects live in the [`Heap`](heap::Heap) of an [`Agent`] and are
//! referred to by Copy handles such as [`TypedArray`] and [`ArrayBuffer`].
//! Built-in methods are reached through [`Agent::invoke`], which calls them
//! the way script code would, while the handles expose typed Rust
//! accessors.
//!
//! ```
//! use structured_data::{Agent, ElementType, TypedArray, Value};
//!
//! let mut agent = Agent::default();
//! let ta = TypedArray::new(&mut agent, ElementType::Uint8, 4).unwrap();
//! agent
//!     .invoke(ta.into(), "fill", &[Value::from(7), Value::from(1)])
//!     .unwrap();
//! let joined = agent.invoke(ta.into(), "join", &[]).unwrap();
//! assert_eq!(joined, Value::from("0,7,7,7"));
//! ```

pub mod ecmascript;
pub mod heap;

pub use ecmascript::{
    builtins::{
        ArgumentsList,
        array::Array,
        array_buffer::ArrayBuffer,
        data_view::DataView,
        indexed_collections::array_iterator_objects::array_iterator::{
            ArrayIterator, CollectionIteratorKind,
        },
        typed_array::TypedArray,
    },
    execution::{
        Agent, DefaultHostHooks, ExceptionType, HostHooks, JsError, JsResult, Options,
    },
    types::{ElementType, Function, Numeric, OrdinaryObject, Value},
};
