//! An order-preserving map with duplicate-definition detection for the
//! compiler's various binding tables (local decls, imports, fields).
//!
//! Mirrors the teacher's `TimuHashMap`: wraps `IndexMap` so iteration order
//! matches declaration order, and offers a `validate_insert` that turns a
//! collision into a structured [`AdlError::DuplicateDecl`] carrying both
//! source locations instead of silently overwriting.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};

use crate::error::AdlError;
use crate::nom_tools::Loc;

pub trait Located {
    fn loc(&self) -> &Loc;
}

#[derive(Debug, Clone, Default)]
pub struct OrderedMap<K: Hash + Eq, V> {
    map: IndexMap<K, V>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Hash + Eq + std::fmt::Display + Clone,
    V: Located,
{
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Inserts, failing with `DuplicateDecl` (carrying both locations) if
    /// `key` is already present (§4.4 step 1, §3 invariant 6).
    pub fn validate_insert(&mut self, key: K, value: V) -> Result<(), AdlError> {
        let new_loc = value.loc().clone();
        let key_text = key.to_string();
        match self.map.insert(key.clone(), value) {
            Some(old) => Err(AdlError::already_defined(key_text, old.loc().clone(), new_loc)),
            None => Ok(()),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
