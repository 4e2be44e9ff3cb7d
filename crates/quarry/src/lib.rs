//! Quarry — typed fluent queries and an active-record layer for embedded
//! object stores.
//!
//! Declare entities with [`entity!`], open a [`Db`] over a store, and go
//! through [`Repository`] for everything else:
//!
//! ```ignore
//! let db = Db::in_memory();
//! let users = db.repo::<User>();
//!
//! let johns = users
//!     .find_all()
//!     .where_by("first_name")
//!     .eq("John")
//!     .sort_by(["-id"])
//!     .exec();
//! ```

pub use quarry_core::{entity, row};

pub use quarry_core::{
    db::{
        Db, DbConfig, global,
        predicate::{CompareOp, ComparePredicate, Predicate},
        query::{
            AggregateFn, ComputedField, Condition, Dictionaries, First, Projection, QueryRequest,
            ResultShape, RowCount, Rows, SortKey, SortSpec,
        },
        repo::Repository,
        store::{
            MemoryStore, RawRow, Store, StoreError, StoreRequest, SubmissionHandle, WriteOp,
        },
    },
    error::{Error, ErrorClass, ErrorOrigin},
    model::{EntityModel, FieldKind, FieldModel},
    row::{DictRow, EntityRow},
    traits::{EntityKind, EntityValue, Path},
    value::{FieldValue, Value, ValueError},
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Db, DbConfig, EntityKind, EntityModel, EntityRow, EntityValue, FieldKind, FieldModel,
        MemoryStore, Predicate, Repository, SortKey, Value, entity, row,
    };
}
