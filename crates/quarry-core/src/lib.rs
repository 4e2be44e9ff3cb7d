//! Core runtime for Quarry: values, entity contracts, the predicate tree,
//! fluent query requests, executors, and the store boundary. The
//! ergonomics live in the `quarry` facade crate.
#![warn(unreachable_pub)]

#[macro_use]
mod macros;

// public exports are one module level down
pub mod db;
pub mod error;
pub mod model;
pub mod row;
pub mod traits;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only. Stores, executors, and error plumbing are
/// deliberately not re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::predicate::{CompareOp, Predicate},
        model::{EntityModel, FieldKind, FieldModel},
        row::{DictRow, EntityRow},
        traits::{EntityKind, EntityValue, Path},
        value::Value,
    };
}
