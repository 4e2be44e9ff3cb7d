use crate::{
    db::{Db, executor::ExecutorError, store::WriteOp},
    error::Error,
    traits::EntityValue,
};
use std::marker::PhantomData;

///
/// SaveExecutor
///
/// Typed write boundary: validates one entity and stages its row in the
/// context's pending buffer. Committing flushes the whole buffer, not
/// just rows staged through this executor.
///

pub struct SaveExecutor<'a, E: EntityValue> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityValue> SaveExecutor<'a, E> {
    #[must_use]
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    /// Stage an upsert without flushing. The row is validated against the
    /// entity model first; an invalid row never reaches the buffer.
    pub fn stage(&self, entity: &E) -> Result<(), ExecutorError> {
        let key = entity.key();
        if key.is_null() {
            return Err(ExecutorError::MissingPrimaryKey {
                entity: E::ENTITY_NAME,
            });
        }

        let row = entity.to_row();
        for (field, value) in &row {
            let Some(member) = E::MODEL.member(field) else {
                return Err(ExecutorError::UndeclaredField {
                    entity: E::ENTITY_NAME,
                    field: field.clone(),
                });
            };
            if !member.kind.accepts(value) {
                return Err(ExecutorError::FieldTypeMismatch {
                    entity: E::ENTITY_NAME,
                    field: field.clone(),
                });
            }
        }

        if self.db.config().debug {
            log::debug!("stage upsert {} key={key:?}", E::ENTITY_NAME);
        }

        self.db.stage_op(WriteOp::Upsert {
            entity: E::ENTITY_NAME,
            key,
            row,
        });

        Ok(())
    }

    /// Stage and flush the whole pending buffer.
    pub fn save(&self, entity: &E) -> Result<(), Error> {
        self.stage(entity)?;
        self.db.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{EntityModel, FieldKind, FieldModel},
        row::EntityRow,
        traits::{EntityKind, Path},
        value::Value,
    };

    entity! {
        struct Clean {
            primary_key: id,
            fields: {
                id: u64 => Uint,
                label: String => Text,
            },
        }
    }

    ///
    /// Sloppy
    /// Hand-written entity whose row betrays its declared field kinds.
    ///

    #[derive(Clone, Debug, Default)]
    struct Sloppy {
        id: u64,
    }

    impl Path for Sloppy {
        const PATH: &'static str = "db::executor::save::tests::Sloppy";
    }

    impl EntityKind for Sloppy {
        const ENTITY_NAME: &'static str = "Sloppy";
        const MODEL: &'static EntityModel = &EntityModel {
            path: "db::executor::save::tests::Sloppy",
            entity_name: "Sloppy",
            primary_key: "id",
            fields: &[FieldModel {
                name: "id",
                kind: FieldKind::Uint,
            }],
        };
    }

    impl EntityValue for Sloppy {
        fn key(&self) -> Value {
            Value::Uint(self.id)
        }

        fn get(&self, field: &str) -> Option<Value> {
            (field == "id").then(|| Value::Uint(self.id))
        }

        fn put(&mut self, _: &str, _: Value) {}

        fn to_row(&self) -> EntityRow {
            EntityRow::new().with("id", "not-a-uint")
        }
    }

    #[test]
    fn stage_accepts_well_typed_rows() {
        let db = Db::in_memory();
        let entity = Clean {
            id: 1,
            label: "ok".to_string(),
        };

        SaveExecutor::new(&db)
            .stage(&entity)
            .expect("well-typed row should stage");
        assert_eq!(db.pending_ops(), 1);
    }

    #[test]
    fn stage_rejects_rows_that_defy_their_declared_kinds() {
        let db = Db::in_memory();

        let err = SaveExecutor::new(&db)
            .stage(&Sloppy { id: 1 })
            .expect_err("mistyped row must be rejected");

        assert!(matches!(err, ExecutorError::FieldTypeMismatch { .. }));
        assert_eq!(db.pending_ops(), 0);
    }
}
