use crate::{db::store::RawRow, row::DictRow, traits::EntityValue};
use thiserror::Error as ThisError;

///
/// ShapeTag
///
/// Type-erased result-shape marker carried on lowered store requests.
/// The typed shape is chosen at the call site by the request's type
/// parameter; the tag only tells the store which row form to produce.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeTag {
    Entities,
    Dictionaries,
    Count,
}

///
/// ShapeError
///
/// Raised when the store's rows do not match the declared result shape.
/// This is a misconfigured request (programmer error), not a data
/// condition: the public execution boundary treats it as fatal.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ShapeError {
    #[error("result shape mismatch: requested {expected} rows, store returned {got}")]
    Mismatch {
        expected: &'static str,
        got: &'static str,
    },
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Rows {}
    impl Sealed for super::First {}
    impl Sealed for super::RowCount {}
    impl Sealed for super::Dictionaries {}
}

///
/// ResultShape
///
/// Compile-time selection of the result form a request produces. Each
/// shape adapts raw store rows into its typed output and names its
/// degrade value for the lossy execution path.
///

pub trait ResultShape<E: EntityValue>: sealed::Sealed + 'static {
    type Output;

    const TAG: ShapeTag;
    const NAME: &'static str;

    fn adapt(rows: Vec<RawRow>) -> Result<Self::Output, ShapeError>;

    /// Shape-appropriate empty value substituted on degraded execution.
    fn empty() -> Self::Output;
}

/// Entity-collection shape: every matching row, materialized.
pub struct Rows;

/// Single-entity shape: first matching row or `None`.
pub struct First;

/// Scalar count shape.
pub struct RowCount;

/// Dictionary-projection shape.
pub struct Dictionaries;

impl<E: EntityValue> ResultShape<E> for Rows {
    type Output = Vec<E>;

    const TAG: ShapeTag = ShapeTag::Entities;
    const NAME: &'static str = "entity";

    fn adapt(rows: Vec<RawRow>) -> Result<Self::Output, ShapeError> {
        rows.into_iter()
            .map(|row| match row {
                RawRow::Record(record) => Ok(E::from_row(record)),
                other => Err(ShapeError::Mismatch {
                    expected: <Self as ResultShape<E>>::NAME,
                    got: other.variant_name(),
                }),
            })
            .collect()
    }

    fn empty() -> Self::Output {
        Vec::new()
    }
}

impl<E: EntityValue> ResultShape<E> for First {
    type Output = Option<E>;

    const TAG: ShapeTag = ShapeTag::Entities;
    const NAME: &'static str = "entity";

    fn adapt(rows: Vec<RawRow>) -> Result<Self::Output, ShapeError> {
        // An empty result is absence, not an error.
        match rows.into_iter().next() {
            None => Ok(None),
            Some(RawRow::Record(record)) => Ok(Some(E::from_row(record))),
            Some(other) => Err(ShapeError::Mismatch {
                expected: <Self as ResultShape<E>>::NAME,
                got: other.variant_name(),
            }),
        }
    }

    fn empty() -> Self::Output {
        None
    }
}

impl<E: EntityValue> ResultShape<E> for RowCount {
    type Output = u64;

    const TAG: ShapeTag = ShapeTag::Count;
    const NAME: &'static str = "count";

    fn adapt(rows: Vec<RawRow>) -> Result<Self::Output, ShapeError> {
        // Empty or non-integer rows read as zero rather than failing.
        match rows.first() {
            Some(RawRow::Count(count)) => Ok(*count),
            _ => Ok(0),
        }
    }

    fn empty() -> Self::Output {
        0
    }
}

impl<E: EntityValue> ResultShape<E> for Dictionaries {
    type Output = Vec<DictRow>;

    const TAG: ShapeTag = ShapeTag::Dictionaries;
    const NAME: &'static str = "dictionary";

    fn adapt(rows: Vec<RawRow>) -> Result<Self::Output, ShapeError> {
        rows.into_iter()
            .map(|row| match row {
                RawRow::Dictionary(dict) => Ok(dict),
                other => Err(ShapeError::Mismatch {
                    expected: <Self as ResultShape<E>>::NAME,
                    got: other.variant_name(),
                }),
            })
            .collect()
    }

    fn empty() -> Self::Output {
        Vec::new()
    }
}
