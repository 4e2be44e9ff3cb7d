//! In-memory store.
//!
//! Default backend for tests and embedded use. Rows live in ordered
//! tables keyed by canonical storage key; asynchronous execution runs on
//! a single lazily-spawned worker thread feeding off a bounded queue.

use crate::{
    db::{
        query::{AggregateFn, ComputedField, Projection, ShapeTag},
        store::{
            RawRow, RowCallback, StorageKey, Store, StoreError, StoreRequest, SubmissionHandle,
            WriteOp,
        },
    },
    row::{DictRow, EntityRow},
    value::{Value, canonical_cmp},
};
use parking_lot::{Mutex, RwLock};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        mpsc::{self, SyncSender, TrySendError},
    },
    thread,
};

const DEFAULT_QUEUE_BOUND: usize = 256;

type Table = BTreeMap<StorageKey, EntityRow>;

///
/// MemoryState
///
/// Shared row storage; the worker thread holds its own `Arc` so queued
/// work survives the front handle being dropped.
///

struct MemoryState {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryState {
    fn execute(&self, request: &StoreRequest) -> Result<Vec<RawRow>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<EntityRow> = tables.get(request.entity).map_or_else(Vec::new, |table| {
            table
                .values()
                .filter(|row| {
                    request
                        .predicate
                        .as_ref()
                        .is_none_or(|predicate| predicate.eval(row))
                })
                .cloned()
                .collect()
        });
        drop(tables);

        if !request.sort.is_empty() {
            // Stable: rows with equal sort keys keep storage-key order.
            rows.sort_by(|a, b| request.sort.compare(a, b));
        }

        if let Some(limit) = request.limit {
            if limit > 0 {
                rows.truncate(limit as usize);
            }
        }

        log::debug!(
            "memory store executed entity={} shape={:?} rows={}",
            request.entity,
            request.shape,
            rows.len()
        );

        let rows = match request.shape {
            ShapeTag::Entities => rows.into_iter().map(RawRow::Record).collect(),
            ShapeTag::Count => vec![RawRow::Count(rows.len() as u64)],
            ShapeTag::Dictionaries => materialize_dictionaries(request, &rows),
        };

        Ok(rows)
    }

    fn contains(&self, entity: &str, key: &Value) -> bool {
        self.tables
            .read()
            .get(entity)
            .is_some_and(|table| table.contains_key(&StorageKey::from(key.clone())))
    }

    fn apply(&self, ops: &[WriteOp]) {
        let mut tables = self.tables.write();
        for op in ops {
            match op {
                WriteOp::Upsert { entity, key, row } => {
                    tables
                        .entry((*entity).to_string())
                        .or_default()
                        .insert(StorageKey::from(key.clone()), row.clone());
                }
                WriteOp::Delete { entity, key } => {
                    if let Some(table) = tables.get_mut(*entity) {
                        table.remove(&StorageKey::from(key.clone()));
                    }
                }
            }
        }
    }
}

///
/// MemoryStore
///

pub struct MemoryStore {
    state: Arc<MemoryState>,
    worker: Mutex<Option<SyncSender<Job>>>,
    queue_bound: usize,
}

struct Job {
    request: StoreRequest,
    on_complete: RowCallback,
    done: mpsc::Sender<()>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_queue_bound(DEFAULT_QUEUE_BOUND)
    }

    /// Create a store whose submission queue holds at most `queue_bound`
    /// pending requests; submissions beyond the bound are rejected, not
    /// blocked.
    #[must_use]
    pub fn with_queue_bound(queue_bound: usize) -> Self {
        Self {
            state: Arc::new(MemoryState {
                tables: RwLock::new(HashMap::new()),
            }),
            worker: Mutex::new(None),
            queue_bound,
        }
    }

    fn spawn_worker(&self) -> Result<SyncSender<Job>, StoreError> {
        let (tx, rx) = mpsc::sync_channel::<Job>(self.queue_bound);
        let state = Arc::clone(&self.state);

        thread::Builder::new()
            .name("quarry-memstore".to_string())
            .spawn(move || {
                for job in rx {
                    let result = state.execute(&job.request);
                    (job.on_complete)(result);
                    let _ = job.done.send(());
                }
            })
            .map_err(|err| StoreError::Unavailable(format!("worker spawn failed: {err}")))?;

        Ok(tx)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn execute(&self, request: &StoreRequest) -> Result<Vec<RawRow>, StoreError> {
        self.state.execute(request)
    }

    fn submit(
        &self,
        request: StoreRequest,
        on_complete: RowCallback,
    ) -> Result<SubmissionHandle, StoreError> {
        let (done_tx, done_rx) = mpsc::channel();
        let job = Job {
            request,
            on_complete,
            done: done_tx,
        };

        let mut slot = self.worker.lock();
        let sender = match slot.as_ref() {
            Some(sender) => sender.clone(),
            None => {
                let sender = self.spawn_worker()?;
                *slot = Some(sender.clone());
                sender
            }
        };

        match sender.try_send(job) {
            Ok(()) => Ok(SubmissionHandle::new(done_rx)),
            Err(TrySendError::Full(_)) => Err(StoreError::QueueFull {
                bound: self.queue_bound,
            }),
            Err(TrySendError::Disconnected(job)) => {
                // Worker died (callback panic); respawn once.
                let sender = self.spawn_worker()?;
                *slot = Some(sender.clone());
                sender
                    .try_send(job)
                    .map(|()| SubmissionHandle::new(done_rx))
                    .map_err(|_| StoreError::QueueClosed)
            }
        }
    }

    fn apply(&self, ops: &[WriteOp]) -> Result<(), StoreError> {
        self.state.apply(ops);
        Ok(())
    }

    fn contains(&self, entity: &str, key: &Value) -> Result<bool, StoreError> {
        Ok(self.state.contains(entity, key))
    }
}

// ---------------------------------------------------------------------------
// Dictionary materialization
// ---------------------------------------------------------------------------

fn materialize_dictionaries(request: &StoreRequest, rows: &[EntityRow]) -> Vec<RawRow> {
    let has_computed = request
        .projections
        .iter()
        .any(|projection| matches!(projection, Projection::Computed(_)));

    if request.group_by.is_empty() && !has_computed {
        return rows
            .iter()
            .map(|row| RawRow::Dictionary(project_plain(request, row)))
            .collect();
    }

    // Grouped (or whole-set aggregate) form: one dictionary per group, in
    // canonical group-key order. An empty group-by list aggregates the
    // whole filtered set into a single row.
    let mut groups: BTreeMap<Vec<StorageKey>, Vec<&EntityRow>> = BTreeMap::new();
    for row in rows {
        let key: Vec<StorageKey> = request
            .group_by
            .iter()
            .map(|field| StorageKey::from(row.value_or_null(field)))
            .collect();
        groups.entry(key).or_default().push(row);
    }

    if groups.is_empty() && request.group_by.is_empty() {
        groups.insert(Vec::new(), Vec::new());
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let mut dict = DictRow::new();
            for (field, part) in request.group_by.iter().zip(key) {
                dict.set(field.clone(), part.into_value());
            }

            for projection in &request.projections {
                match projection {
                    Projection::Field(field) => {
                        if !request.group_by.contains(field) {
                            // Non-grouped plain projection: representative
                            // value from the group's first row.
                            let value = members
                                .first()
                                .map_or(Value::Null, |row| row.value_or_null(field));
                            dict.set(field.clone(), value);
                        }
                    }
                    Projection::Computed(computed) => {
                        dict.set(computed.alias.clone(), aggregate(computed, &members));
                    }
                }
            }

            RawRow::Dictionary(dict)
        })
        .collect()
}

fn project_plain(request: &StoreRequest, row: &EntityRow) -> DictRow {
    if request.projections.is_empty() {
        return row.clone();
    }

    let mut dict = DictRow::new();
    for projection in &request.projections {
        if let Projection::Field(field) = projection {
            dict.set(field.clone(), row.value_or_null(field));
        }
    }

    dict
}

/// Evaluate one computed column over a group. Sums and averages render as
/// float; extrema coerce numeric values to float and pass other variants
/// through natively.
#[allow(clippy::cast_precision_loss)]
fn aggregate(computed: &ComputedField, members: &[&EntityRow]) -> Value {
    let arg = computed.args.first();
    let values = || {
        members.iter().filter_map(|row| {
            let field = arg?;
            let value = row.value_or_null(field);
            (!value.is_null()).then_some(value)
        })
    };

    match computed.function {
        AggregateFn::Count => {
            if arg.is_some() {
                Value::Uint(values().count() as u64)
            } else {
                Value::Uint(members.len() as u64)
            }
        }
        AggregateFn::Sum => Value::Float(values().filter_map(|v| v.as_f64()).sum()),
        AggregateFn::Avg => {
            let numeric: Vec<f64> = values().filter_map(|v| v.as_f64()).collect();
            if numeric.is_empty() {
                Value::Null
            } else {
                Value::Float(numeric.iter().sum::<f64>() / numeric.len() as f64)
            }
        }
        AggregateFn::Min => extremum(values(), Ordering::Less),
        AggregateFn::Max => extremum(values(), Ordering::Greater),
    }
}

fn extremum(values: impl Iterator<Item = Value>, keep: Ordering) -> Value {
    let mut best: Option<Value> = None;
    for value in values {
        let replace = best
            .as_ref()
            .is_none_or(|current| canonical_cmp(&value, current) == keep);
        if replace {
            best = Some(value);
        }
    }

    match best {
        Some(value) if value.is_numeric() => Value::Float(value.as_f64().unwrap_or_default()),
        Some(value) => value,
        None => Value::Null,
    }
}
