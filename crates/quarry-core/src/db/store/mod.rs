mod key;
mod memory;

pub use key::StorageKey;
pub use memory::MemoryStore;

use crate::{
    db::{
        predicate::Predicate,
        query::{Projection, ShapeTag, SortSpec},
    },
    row::{DictRow, EntityRow},
    value::Value,
};
use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("submission queue is full ({bound} pending requests)")]
    QueueFull { bound: usize },

    #[error("submission queue is closed")]
    QueueClosed,
}

///
/// RawRow
///
/// Opaque result unit returned by a store: a materialized entity row, a
/// dictionary projection row, or a bare count.
///

#[derive(Clone, Debug, PartialEq)]
pub enum RawRow {
    Record(EntityRow),
    Dictionary(DictRow),
    Count(u64),
}

impl RawRow {
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Dictionary(_) => "dictionary",
            Self::Count(_) => "count",
        }
    }
}

///
/// StoreRequest
///
/// Fully lowered, type-erased request: everything a store needs to
/// produce rows, with the typed shape reduced to a tag.
///

#[derive(Clone, Debug)]
pub struct StoreRequest {
    pub entity: &'static str,
    pub shape: ShapeTag,
    pub predicate: Option<Predicate>,
    pub sort: SortSpec,
    pub limit: Option<u32>,
    pub group_by: Vec<String>,
    pub projections: Vec<Projection>,
}

impl StoreRequest {
    #[must_use]
    pub fn new(entity: &'static str, shape: ShapeTag) -> Self {
        Self {
            entity,
            shape,
            predicate: None,
            sort: SortSpec::new(),
            limit: None,
            group_by: Vec::new(),
            projections: Vec::new(),
        }
    }
}

///
/// WriteOp
///
/// One pending mutation, staged in the managed context and flushed in a
/// batch via `Store::apply`.
///

#[derive(Clone, Debug)]
pub enum WriteOp {
    Upsert {
        entity: &'static str,
        key: Value,
        row: EntityRow,
    },
    Delete {
        entity: &'static str,
        key: Value,
    },
}

/// Completion callback for asynchronous execution. Runtime execution
/// failures are delivered to the callback; submission failures are
/// reported from `submit` and the callback is never invoked.
pub type RowCallback = Box<dyn FnOnce(Result<Vec<RawRow>, StoreError>) + Send + 'static>;

///
/// SubmissionHandle
///
/// Receipt for one accepted asynchronous submission. There is no
/// cancellation; the handle only lets a caller join delivery.
///

#[derive(Debug)]
pub struct SubmissionHandle {
    done: Receiver<()>,
}

impl SubmissionHandle {
    #[must_use]
    pub fn new(done: Receiver<()>) -> Self {
        Self { done }
    }

    /// Block until the completion callback has run, up to `timeout`.
    /// Returns false on timeout or if the store's worker went away.
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.done.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }
}

///
/// Store
///
/// The persistence boundary this layer executes against. Callers build
/// stores explicitly and pass them to `Db::open`; nothing in the core
/// reaches for a hidden default.
///
/// Completion callbacks run on whatever thread the store chooses.
/// Callers must not assume any particular delivery context.
///

pub trait Store: Send + Sync + 'static {
    /// Execute synchronously on the calling thread.
    fn execute(&self, request: &StoreRequest) -> Result<Vec<RawRow>, StoreError>;

    /// Submit for asynchronous execution on the store's own work queue.
    fn submit(
        &self,
        request: StoreRequest,
        on_complete: RowCallback,
    ) -> Result<SubmissionHandle, StoreError>;

    /// Apply a batch of staged mutations.
    fn apply(&self, ops: &[WriteOp]) -> Result<(), StoreError>;

    /// Key-presence probe.
    fn contains(&self, entity: &str, key: &Value) -> Result<bool, StoreError>;
}
