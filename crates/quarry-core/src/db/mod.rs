pub mod executor;
pub mod global;
pub mod predicate;
pub mod query;
pub mod repo;
pub mod store;

use crate::{
    db::{
        repo::Repository,
        store::{MemoryStore, Store, WriteOp},
    },
    error::Error,
    traits::EntityValue,
};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;

///
/// DbConfig
///
/// Explicit, constructor-passed configuration. There is no implicit
/// config discovery; embedders deserialize this from wherever they keep
/// settings and hand it to `Db::open_with`.
///

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Capacity of the default store's asynchronous submission queue.
    pub queue_bound: usize,
    /// Log lowered requests before execution.
    pub debug: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            queue_bound: 256,
            debug: false,
        }
    }
}

///
/// Db
///
/// Managed-context handle: an explicitly constructed store plus the
/// shared pending-write buffer. Handles are cheap to clone and share the
/// same context.
///
/// Commit semantics are context-wide: `commit` flushes **all** staged
/// mutations, not just those of the entity that triggered it. Saving one
/// entity can therefore persist unrelated staged changes too.
///

#[derive(Clone)]
pub struct Db {
    store: Arc<dyn Store>,
    pending: Arc<Mutex<Vec<WriteOp>>>,
    config: DbConfig,
}

impl Db {
    #[must_use]
    pub fn open(store: Arc<dyn Store>) -> Self {
        Self::open_with(store, DbConfig::default())
    }

    #[must_use]
    pub fn open_with(store: Arc<dyn Store>, config: DbConfig) -> Self {
        Self {
            store,
            pending: Arc::new(Mutex::new(Vec::new())),
            config,
        }
    }

    /// Fresh context over an isolated in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn in_memory_with(config: DbConfig) -> Self {
        Self::open_with(
            Arc::new(MemoryStore::with_queue_bound(config.queue_bound)),
            config,
        )
    }

    /// Entity-scoped surface over this context.
    #[must_use]
    pub const fn repo<E: EntityValue>(&self) -> Repository<'_, E> {
        Repository::new(self)
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub(crate) const fn config(&self) -> &DbConfig {
        &self.config
    }

    pub(crate) fn stage_op(&self, op: WriteOp) {
        self.pending.lock().push(op);
    }

    /// Number of staged, uncommitted mutations.
    #[must_use]
    pub fn pending_ops(&self) -> usize {
        self.pending.lock().len()
    }

    /// Flush every staged mutation to the store in one batch. A failed
    /// flush leaves the batch staged for a later retry.
    pub fn commit(&self) -> Result<(), Error> {
        let ops: Vec<WriteOp> = std::mem::take(&mut *self.pending.lock());
        if ops.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.store.apply(&ops) {
            let mut pending = self.pending.lock();
            // Staged order is preserved ahead of anything staged since.
            let newer = std::mem::replace(&mut *pending, ops);
            pending.extend(newer);

            return Err(err.into());
        }

        Ok(())
    }
}
