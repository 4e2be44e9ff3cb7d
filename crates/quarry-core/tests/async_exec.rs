mod common;

use common::{User, fresh_db, seed_third_user, seed_two_users};
use std::{
    sync::mpsc,
    time::Duration,
};

const DELIVERY: Duration = Duration::from_secs(5);

#[test]
fn async_find_all_delivers_rows_to_the_completion() {
    let db = fresh_db();
    seed_two_users(&db);

    let (tx, rx) = mpsc::channel();
    let handle = db
        .repo::<User>()
        .find_all()
        .sort_by(["id"])
        .exec_async(move |rows: Vec<User>| {
            let _ = tx.send(rows);
        })
        .expect("submission should be accepted");

    assert!(handle.wait(DELIVERY), "completion should be delivered");

    let rows = rx.recv_timeout(DELIVERY).expect("rows should arrive");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
}

#[test]
fn async_find_one_delivers_an_option() {
    let db = fresh_db();
    seed_two_users(&db);

    let (tx, rx) = mpsc::channel();
    let handle = db
        .repo::<User>()
        .find_one()
        .where_by("first_name")
        .eq("John")
        .exec_async(move |user: Option<User>| {
            let _ = tx.send(user);
        })
        .expect("submission should be accepted");

    assert!(handle.wait(DELIVERY));
    let user = rx.recv_timeout(DELIVERY).expect("result should arrive");
    assert_eq!(user.map(|u| u.last_name), Some("Doe".to_string()));
}

#[test]
fn async_count_delivers_a_scalar() {
    let db = fresh_db();
    seed_two_users(&db);
    seed_third_user(&db);

    let (tx, rx) = mpsc::channel();
    let handle = db
        .repo::<User>()
        .count()
        .exec_async(move |count: u64| {
            let _ = tx.send(count);
        })
        .expect("submission should be accepted");

    assert!(handle.wait(DELIVERY));
    assert_eq!(rx.recv_timeout(DELIVERY), Ok(3));
}

#[test]
fn submissions_queue_up_behind_one_worker() {
    let db = fresh_db();
    seed_two_users(&db);

    let (tx, rx) = mpsc::channel();
    let users = db.repo::<User>();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let tx = tx.clone();
        let handle = users
            .count()
            .exec_async(move |count: u64| {
                let _ = tx.send(count);
            })
            .expect("submission should be accepted");
        handles.push(handle);
    }

    for handle in handles {
        assert!(handle.wait(DELIVERY));
    }
    let delivered: Vec<u64> = (0..8)
        .map(|_| rx.recv_timeout(DELIVERY).expect("count should arrive"))
        .collect();
    assert_eq!(delivered, vec![2; 8]);
}

#[test]
fn completion_sees_rows_saved_before_submission() {
    // No ordering guarantee exists between unrelated submissions, but a
    // row committed before submit is visible to that submission.
    let db = fresh_db();
    seed_two_users(&db);

    let (tx, rx) = mpsc::channel();
    let handle = db
        .repo::<User>()
        .find_all()
        .where_by("id")
        .eq(2u64)
        .exec_async(move |rows: Vec<User>| {
            let _ = tx.send(rows.len());
        })
        .expect("submission should be accepted");

    assert!(handle.wait(DELIVERY));
    assert_eq!(rx.recv_timeout(DELIVERY), Ok(1));
}
