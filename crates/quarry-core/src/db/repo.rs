use crate::{
    db::{
        Db,
        executor::{DeleteExecutor, SaveExecutor},
        predicate::Predicate,
        query::{Dictionaries, First, QueryRequest, RowCount, Rows},
    },
    row::EntityRow,
    traits::EntityValue,
};
use std::marker::PhantomData;

///
/// Repository
///
/// Per-entity surface over a context: fresh query requests, construction,
/// and instance-level persistence. Composition replaces inheritance —
/// entity types carry no persistence base; all capability lives here,
/// parameterized by the entity type.
///
/// `save`/`destroy` follow the degrade policy: store failures are logged
/// and swallowed. The `try_` variants propagate instead.
///

pub struct Repository<'a, E: EntityValue> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityValue> Repository<'a, E> {
    #[must_use]
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Query entry points
    // ------------------------------------------------------------------

    /// Fresh entity-collection request.
    #[must_use]
    pub const fn request(&self) -> QueryRequest<'a, E, Rows> {
        QueryRequest::new(self.db)
    }

    #[must_use]
    pub const fn find_all(&self) -> QueryRequest<'a, E, Rows> {
        self.request()
    }

    /// Single-entity request; the fetch limit is preset to one row.
    #[must_use]
    pub const fn find_one(&self) -> QueryRequest<'a, E, First> {
        QueryRequest::new(self.db).preset_limit(1)
    }

    #[must_use]
    pub const fn find_as_dictionary(&self) -> QueryRequest<'a, E, Dictionaries> {
        QueryRequest::new(self.db)
    }

    #[must_use]
    pub const fn count(&self) -> QueryRequest<'a, E, RowCount> {
        QueryRequest::new(self.db)
    }

    /// Collection request seeded with a prebuilt predicate tree.
    #[must_use]
    pub fn find_where(&self, predicate: Predicate) -> QueryRequest<'a, E, Rows> {
        self.request().filter(predicate)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Fresh empty entity. Nothing is staged until `save`/`stage`.
    #[must_use]
    pub fn create(&self) -> E {
        E::default()
    }

    /// Entity populated from a row; keys absent from the schema are
    /// silently dropped.
    #[must_use]
    pub fn create_from(&self, row: EntityRow) -> E {
        E::from_row(row)
    }

    // ------------------------------------------------------------------
    // Instance persistence
    // ------------------------------------------------------------------

    /// Stage an upsert without flushing; validation failures are logged
    /// and dropped.
    pub fn stage(&self, entity: &E) {
        if let Err(err) = SaveExecutor::new(self.db).stage(entity) {
            log::warn!("cannot stage entity: {err}");
        }
    }

    /// Save the entity and flush every staged mutation in the context.
    /// Failures are logged, never raised.
    pub fn save(&self, entity: &E) {
        if let Err(err) = self.try_save(entity) {
            log::warn!("cannot save entity: {err}");
        }
    }

    pub fn try_save(&self, entity: &E) -> Result<(), crate::error::Error> {
        SaveExecutor::new(self.db).save(entity)
    }

    /// Delete the entity and flush. Failures are logged, never raised.
    pub fn destroy(&self, entity: &E) {
        if let Err(err) = self.try_destroy(entity) {
            log::warn!("cannot destroy entity: {err}");
        }
    }

    pub fn try_destroy(&self, entity: &E) -> Result<(), crate::error::Error> {
        DeleteExecutor::new(self.db).delete(entity)
    }
}
