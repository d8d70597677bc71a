//! Order-preserving `logic` table.
//!
//! JSON objects are unordered by definition, but the composition order of the
//! `logic` object is significant. The table is therefore deserialized through
//! a map visitor that records entries in document order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The `logic` object of a search config: `name -> [category, ...]` in
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogicTable(Vec<(String, Vec<String>)>);

impl LogicTable {
    /// Builds a table from entries, keeping their order.
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self(entries)
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct LogicTableVisitor;

impl<'de> Visitor<'de> for LogicTableVisitor {
    type Value = LogicTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping logic names to category lists")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, categories)) = access.next_entry::<String, Vec<String>>()? {
            entries.push((name, categories));
        }
        Ok(LogicTable(entries))
    }
}

impl<'de> Deserialize<'de> for LogicTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LogicTableVisitor)
    }
}

impl Serialize for LogicTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
