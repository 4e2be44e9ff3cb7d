use crate::value::{Value, canonical_cmp};
use std::cmp::Ordering;

///
/// StorageKey
///
/// Total-ordered wrapper that lets arbitrary key values index ordered row
/// storage. Ordering is the canonical value order; equality follows it.
///

#[derive(Clone, Debug)]
pub struct StorageKey(Value);

impl StorageKey {
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for StorageKey {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq for StorageKey {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for StorageKey {}

impl PartialOrd for StorageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StorageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_canonical_value_order() {
        let mut keys = vec![
            StorageKey::from(Value::Uint(3)),
            StorageKey::from(Value::Uint(1)),
            StorageKey::from(Value::Uint(2)),
        ];
        keys.sort();

        let ordered: Vec<&Value> = keys.iter().map(StorageKey::value).collect();
        assert_eq!(
            ordered,
            vec![&Value::Uint(1), &Value::Uint(2), &Value::Uint(3)]
        );
    }
}
