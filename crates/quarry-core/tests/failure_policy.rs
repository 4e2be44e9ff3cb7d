//! Failure-policy coverage: store failures degrade to empty results with
//! a diagnostic; submission failures surface as errors and never invoke
//! the completion; failed commits keep mutations staged.

mod common;

use common::User;
use quarry_core::{
    db::{
        Db,
        store::{
            RawRow, RowCallback, Store, StoreError, StoreRequest, SubmissionHandle, WriteOp,
        },
    },
    error::{Error, ErrorClass},
    row,
    value::Value,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

///
/// BrokenStore
/// Rejects everything; stands in for a store whose backend is gone.
///

struct BrokenStore;

impl Store for BrokenStore {
    fn execute(&self, _: &StoreRequest) -> Result<Vec<RawRow>, StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn submit(&self, _: StoreRequest, _: RowCallback) -> Result<SubmissionHandle, StoreError> {
        Err(StoreError::Rejected("submission refused".to_string()))
    }

    fn apply(&self, _: &[WriteOp]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend offline".to_string()))
    }

    fn contains(&self, _: &str, _: &Value) -> Result<bool, StoreError> {
        Ok(false)
    }
}

fn broken_db() -> Db {
    Db::open(Arc::new(BrokenStore))
}

#[test]
fn exec_degrades_to_shape_appropriate_empty_values() {
    let db = broken_db();
    let users = db.repo::<User>();

    assert!(users.find_all().exec().is_empty());
    assert_eq!(users.find_one().exec(), None);
    assert_eq!(users.count().exec(), 0);
    assert!(users.find_as_dictionary().exec().is_empty());
}

#[test]
fn execute_propagates_the_store_error() {
    let db = broken_db();

    let err = db
        .repo::<User>()
        .find_all()
        .execute()
        .expect_err("broken store should error");

    assert_eq!(err.class(), ErrorClass::Unavailable);
    assert!(!err.is_fatal());
}

#[test]
fn submission_failure_returns_err_and_never_invokes_completion() {
    let db = broken_db();
    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let result = db
        .repo::<User>()
        .find_all()
        .exec_async(move |_rows: Vec<User>| {
            flag.store(true, Ordering::SeqCst);
        });

    assert!(matches!(result, Err(Error::Query(_))));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[test]
fn save_swallows_store_failures_and_keeps_the_row_staged() {
    let db = broken_db();
    let users = db.repo::<User>();

    let user = users.create_from(row! {
        "id" => 1u64,
        "first_name" => "Louis",
        "last_name" => "Bodart",
    });
    users.save(&user);

    // The commit failed; the mutation stays staged for a later retry.
    assert_eq!(db.pending_ops(), 1);
}

#[test]
fn try_save_propagates_store_failures() {
    let db = broken_db();
    let users = db.repo::<User>();

    let user = users.create_from(row! { "id" => 1u64 });
    let err = users.try_save(&user).expect_err("apply should fail");

    assert_eq!(err.class(), ErrorClass::Unavailable);
}

///
/// WrongShapeStore
/// Always returns count rows; simulates a store that ignores the shape
/// tag. Misconfiguration, not a data condition.
///

struct WrongShapeStore;

impl Store for WrongShapeStore {
    fn execute(&self, _: &StoreRequest) -> Result<Vec<RawRow>, StoreError> {
        Ok(vec![RawRow::Count(1)])
    }

    fn submit(&self, _: StoreRequest, _: RowCallback) -> Result<SubmissionHandle, StoreError> {
        Err(StoreError::Rejected("unused".to_string()))
    }

    fn apply(&self, _: &[WriteOp]) -> Result<(), StoreError> {
        Ok(())
    }

    fn contains(&self, _: &str, _: &Value) -> Result<bool, StoreError> {
        Ok(false)
    }
}

#[test]
#[should_panic(expected = "misconfigured request")]
fn shape_variant_mismatch_halts_loudly() {
    let db = Db::open(Arc::new(WrongShapeStore));

    // Entity shape requested, count rows returned: programmer error.
    let _ = db.repo::<User>().find_all().exec();
}

#[test]
fn failed_commit_preserves_staged_order_for_retry() {
    let db = broken_db();
    let users = db.repo::<User>();

    users.stage(&users.create_from(row! { "id" => 1u64 }));
    users.stage(&users.create_from(row! { "id" => 2u64 }));
    assert!(db.commit().is_err());
    assert_eq!(db.pending_ops(), 2);
}
