//! Append-only identifier index
//!
//! Assigns `0, 1, 2, ...` to keys in the order they are first inserted. An id,
//! once handed out, belongs to its key for the lifetime of the index: there is
//! no removal and no overwrite.

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors raised by indexed lookups and explicit id assignment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Key not found in index: {0}")]
    NotFound(String),

    #[error("Unsupported operation on index: {operation} of {key} (ids are append-only)")]
    UnsupportedOperation { operation: &'static str, key: String },

    #[error("Non-contiguous id for {key}: expected {expected}, got {got}")]
    NonContiguousId {
        key: String,
        expected: usize,
        got: usize,
    },
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Mapping from key to a stable, first-seen integer id
#[derive(Debug, Clone)]
pub struct IdentifierIndex<K> {
    ids: HashMap<K, usize>,
    /// Keys by id; the next id is `keys.len()`
    keys: Vec<K>,
}

impl<K> Default for IdentifierIndex<K> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            keys: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug> IdentifierIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, returning its id
    ///
    /// A key that is already present keeps its id; nothing changes.
    pub fn insert(&mut self, key: K) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    /// Pin `key` to `id`
    ///
    /// Succeeds when `key` already holds `id`, or when `key` is new and `id`
    /// is the next id to be handed out. Moving an existing key to another id
    /// is refused.
    pub fn assign(&mut self, key: K, id: usize) -> Result<()> {
        match self.ids.get(&key) {
            Some(&current) if current == id => Ok(()),
            Some(_) => Err(IndexError::UnsupportedOperation {
                operation: "reassign",
                key: format!("{:?}", key),
            }),
            None if id == self.keys.len() => {
                self.insert(key);
                Ok(())
            }
            None => Err(IndexError::NonContiguousId {
                key: format!("{:?}", key),
                expected: self.keys.len(),
                got: id,
            }),
        }
    }

    /// Id of `key`, or `NotFound` if it was never inserted
    pub fn lookup(&self, key: &K) -> Result<usize> {
        self.get(key)
            .ok_or_else(|| IndexError::NotFound(format!("{:?}", key)))
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.ids.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.ids.contains_key(key)
    }

    /// Key holding `id`
    pub fn key(&self, id: usize) -> Option<&K> {
        self.keys.get(id)
    }

    /// Keys in id order
    pub fn keys(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// `(key, id)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.keys.iter().enumerate().map(|(id, key)| (key, id))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'a, K: Eq + Hash + Clone + fmt::Debug> IntoIterator for &'a IdentifierIndex<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

// Serialized as the key list; position is the id.
impl<K: Serialize> Serialize for IdentifierIndex<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.keys.len()))?;
        for key in &self.keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

impl<'de, K> Deserialize<'de> for IdentifierIndex<K>
where
    K: Deserialize<'de> + Eq + Hash + Clone + fmt::Debug,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeysVisitor<K>(PhantomData<K>);

        impl<'de, K> Visitor<'de> for KeysVisitor<K>
        where
            K: Deserialize<'de> + Eq + Hash + Clone + fmt::Debug,
        {
            type Value = IdentifierIndex<K>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of distinct keys in id order")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut index = IdentifierIndex::new();
                while let Some(key) = seq.next_element::<K>()? {
                    let id = index.len();
                    index.assign(key, id).map_err(de::Error::custom)?;
                }
                Ok(index)
            }
        }

        deserializer.deserialize_seq(KeysVisitor(PhantomData))
    }
}
