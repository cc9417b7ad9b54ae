// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::RandomState;
use hashbrown::HashMap;

use super::Value;
use crate::{
    ecmascript::execution::Agent,
    heap::{CreateHeapData, indexes::ObjectIndex},
};

#[derive(Debug, Default)]
pub struct ObjectHeapData {
    pub(crate) properties: HashMap<String, Value, RandomState>,
}

/// A plain object with string-keyed data properties.
///
/// Properties named `valueOf` and `toString` holding functions take part in
/// ToPrimitive, and `length` plus integer-keyed properties make the object
/// array-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrdinaryObject(pub(crate) ObjectIndex);

impl OrdinaryObject {
    pub fn new(agent: &mut Agent) -> Self {
        agent.heap.create(ObjectHeapData::default())
    }

    pub fn from_properties<'a>(
        agent: &mut Agent,
        properties: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        let properties = properties
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect();
        agent.heap.create(ObjectHeapData { properties })
    }

    /// Returns the value of the property, or undefined if it does not exist.
    pub fn get(self, agent: &Agent, key: &str) -> Value {
        agent[self]
            .properties
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has(self, agent: &Agent, key: &str) -> bool {
        agent[self].properties.contains_key(key)
    }

    pub fn set(self, agent: &mut Agent, key: &str, value: Value) {
        agent[self].properties.insert(key.to_owned(), value);
    }
}
