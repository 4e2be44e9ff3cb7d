mod delete;
mod load;
mod save;

pub use delete::DeleteExecutor;
pub use load::LoadExecutor;
pub use save::SaveExecutor;

use crate::{db::store::StoreError, error::ErrorClass};
use thiserror::Error as ThisError;

///
/// ExecutorError
///

#[derive(Debug, ThisError)]
pub enum ExecutorError {
    #[error("entity '{entity}' has no primary key value; refusing to stage it")]
    MissingPrimaryKey { entity: &'static str },

    #[error("entity '{entity}' produced a row with undeclared field '{field}'")]
    UndeclaredField {
        entity: &'static str,
        field: String,
    },

    #[error("entity '{entity}' field '{field}' carries a value its declared kind rejects")]
    FieldTypeMismatch {
        entity: &'static str,
        field: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ExecutorError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingPrimaryKey { .. }
            | Self::UndeclaredField { .. }
            | Self::FieldTypeMismatch { .. } => ErrorClass::Validation,
            Self::Store(_) => ErrorClass::Unavailable,
        }
    }
}
