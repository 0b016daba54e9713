//! Association-list container backing `Value::Assoc` (spec §3.2). Uses
//! `indexmap::IndexMap` so a map's iteration order is stable within a
//! single encode call without requiring a sort on every encode (spec §5's
//! ordering guarantee) — see `SPEC_FULL.md` §A7 for why `indexmap` was
//! pulled in over `std::collections::HashMap`.

use alloc::rc::Rc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::types::Type;
use crate::value::convert;
use crate::value::Value;

/// A `key -> value` map whose keys and values have each been validated
/// against their declared types. Holds each declared type as an `Rc<Type>`
/// to match `Type::Assoc`'s own `Rc<Type>` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMap {
    key_ty: Rc<Type>,
    val_ty: Rc<Type>,
    entries: IndexMap<Value, Value>,
}

impl TypedMap {
    #[must_use]
    pub fn empty(key_ty: &Rc<Type>, val_ty: &Rc<Type>) -> Self {
        Self { key_ty: key_ty.clone(), val_ty: val_ty.clone(), entries: IndexMap::new() }
    }

    pub fn from_pairs(key_ty: Rc<Type>, val_ty: Rc<Type>, pairs: impl Iterator<Item = (Value, Value)>) -> Result<Self> {
        let mut entries = IndexMap::new();
        for (k, v) in pairs {
            let key = convert(&k, &key_ty)?;
            let value = convert(&v, &val_ty)?;
            entries.insert(key, value);
        }
        Ok(Self { key_ty, val_ty, entries })
    }

    #[must_use]
    pub fn key_type(&self) -> &Type {
        &self.key_ty
    }

    #[must_use]
    pub fn value_type(&self) -> &Type {
        &self.val_ty
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Inserts a key/value pair, validating both against the declared
    /// types. Keeps the map's prior insertion order for the key if it
    /// already existed (matches `IndexMap::insert` semantics).
    pub fn insert(&mut self, key: Value, value: Value) -> Result<Option<Value>> {
        let key = convert(&key, &self.key_ty)?;
        let value = convert(&value, &self.val_ty)?;
        Ok(self.entries.insert(key, value))
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.shift_remove(key)
    }
}
