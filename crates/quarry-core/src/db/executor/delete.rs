use crate::{
    db::{Db, executor::ExecutorError, store::WriteOp},
    error::Error,
    traits::EntityValue,
};
use std::marker::PhantomData;

///
/// DeleteExecutor
///
/// Typed delete boundary. Deleting a row that is not present is a no-op
/// at the store, not an error.
///

pub struct DeleteExecutor<'a, E: EntityValue> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityValue> DeleteExecutor<'a, E> {
    #[must_use]
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    /// Stage a delete without flushing.
    pub fn stage(&self, entity: &E) -> Result<(), ExecutorError> {
        let key = entity.key();
        if key.is_null() {
            return Err(ExecutorError::MissingPrimaryKey {
                entity: E::ENTITY_NAME,
            });
        }

        if self.db.config().debug {
            log::debug!("stage delete {} key={key:?}", E::ENTITY_NAME);
        }

        self.db.stage_op(WriteOp::Delete {
            entity: E::ENTITY_NAME,
            key,
        });

        Ok(())
    }

    /// Stage and flush the whole pending buffer.
    pub fn delete(&self, entity: &E) -> Result<(), Error> {
        self.stage(entity)?;
        self.db.commit()
    }
}
