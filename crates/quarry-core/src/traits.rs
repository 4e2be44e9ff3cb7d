//! Entity contracts.
//!
//! `EntityKind` is the declared identity (name + model); `EntityValue` is
//! the runtime instance contract (typed field access in both directions).
//! Storage and execution code should require the narrowest trait it
//! actually touches.

use crate::{model::EntityModel, row::EntityRow, value::Value};
use std::fmt::Debug;

///
/// Path
/// Fully-qualified Rust type path, for dispatch and diagnostics.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// EntityKind
///
/// Declared schema facts for an entity type: its stable external name and
/// its static field model. Declared once, immutable thereafter.
///

pub trait EntityKind: Path + 'static {
    const ENTITY_NAME: &'static str;
    const MODEL: &'static EntityModel;
}

///
/// EntityValue
///
/// Runtime instance contract. `get`/`put` work by declared field name;
/// `put` silently ignores unknown names and type-mismatched payloads so
/// that row-driven construction can take the subset of a row that exists
/// on the schema and drop the rest.
///

pub trait EntityValue: EntityKind + Clone + Debug + Default {
    /// Primary key value; `Null` when unset.
    fn key(&self) -> Value;

    /// Read one declared field; `None` for undeclared names.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write one declared field. Unknown names and mismatched payloads
    /// are dropped without error.
    fn put(&mut self, field: &str, value: Value);

    /// Type-erase the entity into its row form, in model field order.
    fn to_row(&self) -> EntityRow {
        let mut row = EntityRow::new();
        for name in Self::MODEL.field_names() {
            if let Some(value) = self.get(name) {
                row.set(name, value);
            }
        }

        row
    }

    /// Materialize an entity from a row. Keys absent from the model are
    /// silently dropped.
    #[must_use]
    fn from_row(row: EntityRow) -> Self {
        let mut entity = Self::default();
        for (field, value) in row {
            entity.put(&field, value);
        }

        entity
    }
}
