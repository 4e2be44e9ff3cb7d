use crate::value::Value;

///
/// FieldKind
///
/// Runtime type shape of one declared field. A lossy projection of the
/// entity's Rust field types: just enough surface for predicate and
/// projection planning.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Float,
    Int,
    List(&'static Self),
    /// Reference to another entity by name. Relations resolve through
    /// `EntityModel::relation`, never through `field`.
    Relation(&'static str),
    Text,
    Timestamp,
    Uint,
}

impl FieldKind {
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    /// True when `value` is an acceptable runtime payload for this kind.
    /// `Null` is accepted everywhere; optionality is the field type's
    /// concern, not the model's.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Bool, Value::Bool(_))
            | (Self::Float, Value::Float(_))
            | (Self::Int, Value::Int(_))
            | (Self::Text, Value::Text(_))
            | (Self::Timestamp, Value::Timestamp(_))
            | (Self::Uint, Value::Uint(_)) => true,
            // Relations travel as the target's key value.
            (Self::Relation(_), Value::Uint(_) | Value::Int(_) | Value::Text(_)) => true,
            (Self::List(inner), Value::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            _ => false,
        }
    }
}

///
/// FieldModel
/// Declared metadata for one field, looked up by name.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldModel {
    /// Field name as used in predicates, sorting, and projection.
    pub name: &'static str,
    /// Runtime type shape.
    pub kind: FieldKind,
}
