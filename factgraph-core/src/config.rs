//! Content document parsing and merging.
//!
//! A content document is a JSON object with optional `tags`,
//! `connectionTypes` and `nodes` sections, each keyed by identifier. Key order
//! in the file is the declaration order the graph preserves.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{ConnectionTypeDefinition, NodeDefinition, TagDefinition};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Identifier-keyed entries in declaration order.
///
/// Inserting an existing key replaces the value but keeps its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    entries: Vec<(String, T)>,
    /// key -> position in `entries`
    index: HashMap<String, usize>,
}

impl<T> Keyed<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or replace. Returns true when an existing entry was replaced.
    pub fn upsert(&mut self, key: String, value: T) -> bool {
        match self.index.get(&key) {
            Some(&pos) => {
                self.entries[pos].1 = value;
                true
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Keyed<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> FromIterator<(String, T)> for Keyed<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut keyed = Self::new();
        for (k, v) in iter {
            keyed.upsert(k, v);
        }
        keyed
    }
}

impl<T: Serialize> Serialize for Keyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct KeyedVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
    type Value = Keyed<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object keyed by identifier")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut keyed = Keyed::new();
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            keyed.upsert(key, value);
        }
        Ok(keyed)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Keyed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}

/// A parsed content document, or the merge of several.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    #[serde(default)]
    pub tags: Keyed<TagDefinition>,
    #[serde(default)]
    pub connection_types: Keyed<ConnectionTypeDefinition>,
    #[serde(default)]
    pub nodes: Keyed<NodeDefinition>,
}

impl ContentConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Fold `other` into `self`. Entries already present are replaced in
    /// place by the later source.
    pub fn merge(&mut self, other: ContentConfig) {
        for (id, tag) in other.tags {
            if self.tags.upsert(id.clone(), tag) {
                tracing::debug!("Tag {} redefined by later source", id);
            }
        }
        for (id, ty) in other.connection_types {
            if self.connection_types.upsert(id.clone(), ty) {
                tracing::debug!("Connection type {} redefined by later source", id);
            }
        }
        for (id, node) in other.nodes {
            if self.nodes.upsert(id.clone(), node) {
                tracing::debug!("Node {} redefined by later source", id);
            }
        }
    }

    pub fn merged<I: IntoIterator<Item = ContentConfig>>(configs: I) -> Self {
        let mut merged = Self::default();
        for config in configs {
            merged.merge(config);
        }
        merged
    }
}
