use crate::db::{
    executor::ExecutorError,
    query::{QueryError, ShapeError},
    store::StoreError,
};
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification that drives the failure policy at the public
/// execution boundary:
///
/// - `Unavailable` and `Validation` degrade to the shape-appropriate
///   empty value with a logged diagnostic.
/// - `InvariantViolation` is a programmer/configuration error and halts
///   loudly.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unavailable,
    Validation,
    InvariantViolation,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Query,
    Executor,
    Store,
    Schema,
}

///
/// Error
///
/// Top-level error for all database operations. Module errors convert in
/// transparently; classification is derived, not stored.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Query(err) => err.class(),
            Self::Executor(err) => err.class(),
            Self::Store(_) => ErrorClass::Unavailable,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Query(QueryError::Store(_)) | Self::Store(_) => ErrorOrigin::Store,
            Self::Query(QueryError::Shape(_)) => ErrorOrigin::Query,
            Self::Executor(ExecutorError::Store(_)) => ErrorOrigin::Store,
            Self::Executor(_) => ErrorOrigin::Executor,
        }
    }

    /// True when this error must halt execution instead of degrading to an
    /// empty result.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.class(), ErrorClass::InvariantViolation)
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Self::Query(QueryError::Shape(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::StoreError;

    #[test]
    fn store_errors_classify_as_unavailable_and_degradable() {
        let err = Error::from(StoreError::Unavailable("backend offline".to_string()));

        assert_eq!(err.class(), ErrorClass::Unavailable);
        assert_eq!(err.origin(), ErrorOrigin::Store);
        assert!(!err.is_fatal());
    }

    #[test]
    fn shape_mismatch_classifies_as_fatal_invariant_violation() {
        let err = Error::from(ShapeError::Mismatch {
            expected: "entity",
            got: "count",
        });

        assert_eq!(err.class(), ErrorClass::InvariantViolation);
        assert!(err.is_fatal());
    }
}
