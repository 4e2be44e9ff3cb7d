use crate::value::Value;
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// EntityRow
///
/// Field-name to value mapping: the type-erased form an entity takes on
/// its way into and out of a store, and the input form for
/// `create_from`-style construction. Keys are plain field names; entries
/// are kept in name order.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, IntoIterator, PartialEq, Serialize, Deserialize,
)]
#[into_iterator(owned, ref)]
pub struct EntityRow(BTreeMap<String, Value>);

impl EntityRow {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert one field value, replacing any previous entry.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Builder-style `set` for literal row construction.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Field value lookup; missing fields read as `Null` here, the
    /// distinction between "absent" and "null" is `get`'s.
    #[must_use]
    pub fn value_or_null(&self, field: &str) -> Value {
        self.0.get(field).cloned().unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, Value)> for EntityRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Dictionary-shaped result row. Structurally identical to an entity row;
/// the alias keeps projection output distinct at API boundaries.
pub type DictRow = EntityRow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_entries() {
        let mut row = EntityRow::new();
        row.set("id", 1u64);
        row.set("id", 2u64);

        assert_eq!(row.get("id"), Some(&Value::Uint(2)));
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn value_or_null_reads_missing_fields_as_null() {
        let row = EntityRow::new().with("id", 1u64);

        assert_eq!(row.value_or_null("id"), Value::Uint(1));
        assert_eq!(row.value_or_null("missing"), Value::Null);
    }
}
