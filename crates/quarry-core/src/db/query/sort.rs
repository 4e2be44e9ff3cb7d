use crate::{row::EntityRow, value::canonical_cmp};
use derive_more::Deref;
use std::cmp::Ordering;

///
/// SortKey
///
/// One `(field, direction)` pair. The string form uses a leading `-` for
/// descending (`"-id"`); blank keys parse to `None` and are skipped when
/// building a `SortSpec`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    /// Parse the string form. Empty input (including a bare `-`) yields
    /// `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let (field, ascending) = raw
            .strip_prefix('-')
            .map_or((raw, true), |rest| (rest, false));
        if field.is_empty() {
            return None;
        }

        Some(Self {
            field: field.to_string(),
            ascending,
        })
    }

    fn compare(&self, left: &EntityRow, right: &EntityRow) -> Ordering {
        let ord = canonical_cmp(
            &left.value_or_null(&self.field),
            &right.value_or_null(&self.field),
        );

        if self.ascending { ord } else { ord.reverse() }
    }
}

///
/// SortSpec
///
/// Ordered sort-key sequence. The first key is primary; later keys break
/// ties in declaration order.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: SortKey) {
        self.0.push(key);
    }

    /// Append parsed keys, silently skipping blanks.
    pub fn extend_parsed<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            if let Some(parsed) = SortKey::parse(key.as_ref()) {
                self.0.push(parsed);
            }
        }
    }

    /// Row comparator over all keys in declaration order. Missing fields
    /// rank as `Null`.
    #[must_use]
    pub fn compare(&self, left: &EntityRow, right: &EntityRow) -> Ordering {
        for key in &self.0 {
            let ord = key.compare(left, right);
            if ord != Ordering::Equal {
                return ord;
            }
        }

        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_direction_from_leading_dash() {
        assert_eq!(SortKey::parse("id"), Some(SortKey::asc("id")));
        assert_eq!(SortKey::parse("-id"), Some(SortKey::desc("id")));
    }

    #[test]
    fn parse_skips_blank_keys() {
        assert_eq!(SortKey::parse(""), None);
        assert_eq!(SortKey::parse("-"), None);
    }

    #[test]
    fn extend_parsed_preserves_declaration_order() {
        let mut spec = SortSpec::new();
        spec.extend_parsed(["id", "", "-last_name"]);

        assert_eq!(spec.len(), 2);
        assert_eq!(spec[0], SortKey::asc("id"));
        assert_eq!(spec[1], SortKey::desc("last_name"));
    }

    #[test]
    fn compare_breaks_ties_with_later_keys() {
        let mut spec = SortSpec::new();
        spec.extend_parsed(["group", "-rank"]);

        let low = row! { "group" => 1u64, "rank" => 5u64 };
        let high = row! { "group" => 1u64, "rank" => 9u64 };
        let other = row! { "group" => 2u64, "rank" => 0u64 };

        // Same group: descending rank decides.
        assert_eq!(spec.compare(&high, &low), Ordering::Less);
        // Different group: primary key decides.
        assert_eq!(spec.compare(&low, &other), Ordering::Less);
    }

    #[test]
    fn compare_ranks_missing_fields_as_null() {
        let mut spec = SortSpec::new();
        spec.extend_parsed(["rank"]);

        let with = row! { "rank" => 1u64 };
        let without = row! { "group" => 1u64 };

        assert_eq!(spec.compare(&without, &with), Ordering::Less);
    }
}
