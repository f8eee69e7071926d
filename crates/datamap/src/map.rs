//! The typed, dirty-tracked data map.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use jobkit_core::{DataMapError, DataMapResult};

use crate::canonical::Coercible;
use crate::value::DataValue;

/// Ordered string-keyed map of [`DataValue`]s with a dirty flag.
///
/// ## Dirty tracking
///
/// - [`TypedDataMap::new`] and every bulk constructor (`from_entries`,
///   `from_json_object`, `FromIterator`, deserialization) produce a clean map.
/// - Any write that changes the entries (`put*`, `remove` of a present key,
///   `clear` of a non-empty map, `put_all` with a non-empty source) marks the
///   map dirty.
/// - Only [`TypedDataMap::clear_dirty_flag`] resets it. Reads never touch it.
///
/// Equality compares entries only; neither insertion order nor the dirty flag
/// participates.
#[derive(Debug, Clone, Default)]
pub struct TypedDataMap {
    entries: IndexMap<String, DataValue>,
    dirty: bool,
}

impl TypedDataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-copy `entries` into a new, clean map.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DataValue>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            dirty: false,
        }
    }

    /// Build a clean map from a loosely-typed JSON object.
    ///
    /// See [`DataValue::from_json`] for how values are typed.
    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            entries: object
                .into_iter()
                .map(|(k, v)| (k, DataValue::from_json(v)))
                .collect(),
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget that the map was modified. Entries are left untouched.
    pub fn clear_dirty_flag(&mut self) {
        if self.dirty {
            tracing::trace!(entries = self.entries.len(), "data map marked clean");
        }
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw stored value, without any coercion.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &DataValue> {
        self.entries.values()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Store `value` natively, returning the value it replaced.
    ///
    /// Overwriting keeps the key's original position.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Option<DataValue> {
        self.dirty = true;
        self.entries.insert(key.into(), value.into())
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<DataValue> {
        self.put(key, DataValue::String(value.into()))
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i32) -> Option<DataValue> {
        self.put(key, DataValue::Int(value))
    }

    pub fn put_long(&mut self, key: impl Into<String>, value: i64) -> Option<DataValue> {
        self.put(key, DataValue::Long(value))
    }

    pub fn put_float(&mut self, key: impl Into<String>, value: f32) -> Option<DataValue> {
        self.put(key, DataValue::Float(value))
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) -> Option<DataValue> {
        self.put(key, DataValue::Double(value))
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) -> Option<DataValue> {
        self.put(key, DataValue::Bool(value))
    }

    pub fn put_char(&mut self, key: impl Into<String>, value: char) -> Option<DataValue> {
        self.put(key, DataValue::Char(value))
    }

    pub fn put_uuid(&mut self, key: impl Into<String>, value: Uuid) -> Option<DataValue> {
        self.put(key, DataValue::Uuid(value))
    }

    /// Store the canonical string encoding of `value` instead of the value.
    pub fn put_as_string<T: Coercible>(&mut self, key: impl Into<String>, value: T) -> Option<DataValue> {
        self.put(key, DataValue::String(value.to_canonical()))
    }

    /// Copy every entry of `other` into this map, overwriting on collision.
    pub fn put_all(&mut self, other: &TypedDataMap) {
        if other.is_empty() {
            return;
        }
        self.dirty = true;
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.dirty = true;
        }
        self.entries.clear();
    }

    // ------------------------------------------------------------------
    // Generic reads
    // ------------------------------------------------------------------

    fn lookup(&self, key: &str) -> DataMapResult<&DataValue> {
        self.entries
            .get(key)
            .ok_or_else(|| DataMapError::missing_key(key))
    }

    /// Coercing read: parse string values, otherwise require an exact native
    /// type match.
    pub fn get_value<T: Coercible>(&self, key: &str) -> DataMapResult<T> {
        match self.lookup(key)? {
            DataValue::String(text) => parse_stored(key, text),
            native => T::from_native(native)
                .ok_or_else(|| DataMapError::type_mismatch(key, T::KIND, native.kind().name())),
        }
    }

    /// Read a value that must have been stored as a string.
    pub fn get_value_from_string<T: Coercible>(&self, key: &str) -> DataMapResult<T> {
        let text = self.get_string(key)?;
        parse_stored(key, text)
    }

    /// Like [`TypedDataMap::get_value`], but every failure becomes `None`.
    pub fn try_get_value<T: Coercible>(&self, key: &str) -> Option<T> {
        self.get_value(key).ok()
    }

    /// Like [`TypedDataMap::try_get_value`], falling back to `T::default()`.
    pub fn try_get_value_or_default<T: Coercible + Default>(&self, key: &str) -> T {
        self.try_get_value(key).unwrap_or_default()
    }

    /// The stored string. Natively stored values are a type mismatch.
    pub fn get_string(&self, key: &str) -> DataMapResult<&str> {
        match self.lookup(key)? {
            DataValue::String(text) => Ok(text),
            other => Err(DataMapError::type_mismatch(key, "string", other.kind().name())),
        }
    }

    pub fn try_get_string(&self, key: &str) -> Option<&str> {
        self.get_string(key).ok()
    }

    /// Nullable UUID read: an empty string means "no UUID".
    pub fn get_nullable_uuid(&self, key: &str) -> DataMapResult<Option<Uuid>> {
        match self.lookup(key)? {
            DataValue::String(text) if text.is_empty() => Ok(None),
            _ => self.get_value(key).map(Some),
        }
    }
}

fn parse_stored<T: Coercible>(key: &str, text: &str) -> DataMapResult<T> {
    T::parse_canonical(text).ok_or_else(|| DataMapError::format(key, T::KIND, text))
}

/// Typed wrappers over the generic readers, one family per coercible type.
macro_rules! typed_getters {
    ($t:ty, $get:ident, $from_string:ident, $try_get:ident) => {
        impl TypedDataMap {
            pub fn $get(&self, key: &str) -> DataMapResult<$t> {
                self.get_value(key)
            }

            pub fn $from_string(&self, key: &str) -> DataMapResult<$t> {
                self.get_value_from_string(key)
            }

            pub fn $try_get(&self, key: &str) -> Option<$t> {
                self.try_get_value(key)
            }
        }
    };
}

typed_getters!(i32, get_int, get_int_from_string, try_get_int);
typed_getters!(i64, get_long, get_long_from_string, try_get_long);
typed_getters!(f32, get_float, get_float_from_string, try_get_float);
typed_getters!(f64, get_double, get_double_from_string, try_get_double);
typed_getters!(bool, get_bool, get_bool_from_string, try_get_bool);
typed_getters!(char, get_char, get_char_from_string, try_get_char);
typed_getters!(Uuid, get_uuid, get_uuid_from_string, try_get_uuid);
typed_getters!(DateTime<Utc>, get_date_time, get_date_time_from_string, try_get_date_time);
typed_getters!(
    DateTime<FixedOffset>,
    get_date_time_offset,
    get_date_time_offset_from_string,
    try_get_date_time_offset
);
typed_getters!(TimeDelta, get_duration, get_duration_from_string, try_get_duration);

impl PartialEq for TypedDataMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for TypedDataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<K: Into<String>, V: Into<DataValue>> Extend<(K, V)> for TypedDataMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<'a> IntoIterator for &'a TypedDataMap {
    type Item = (&'a String, &'a DataValue);
    type IntoIter = indexmap::map::Iter<'a, String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Only the entries are persisted; a loaded map starts clean.
impl Serialize for TypedDataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedDataMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, DataValue>::deserialize(deserializer)?;
        Ok(Self {
            entries,
            dirty: false,
        })
    }
}
