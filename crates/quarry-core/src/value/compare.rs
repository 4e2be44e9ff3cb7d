use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator used for sort keys and storage keys.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (a, b) in left.iter().zip(right.iter()) {
        let ord = canonical_cmp(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len())
}

/// Semantic comparator used by predicate evaluation.
///
/// Numeric variants compare across families (`Int`/`Uint`/`Float`); all
/// other pairings must match variants exactly. Incomparable pairings
/// (including any comparison against NaN) return `None` and the enclosing
/// predicate clause evaluates false.
#[must_use]
pub fn semantic_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Uint(b)) => Some(cmp_int_uint(*a, *b)),
        (Value::Uint(a), Value::Int(b)) => Some(cmp_int_uint(*b, *a).reverse()),
        (Value::Float(_) | Value::Int(_) | Value::Uint(_), Value::Float(_) | Value::Int(_) | Value::Uint(_)) => {
            // Remaining numeric pairings involve exactly one float side.
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

const fn cmp_int_uint(left: i64, right: u64) -> Ordering {
    if left < 0 {
        return Ordering::Less;
    }

    let left = left.unsigned_abs();
    if left < right {
        Ordering::Less
    } else if left > right {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
