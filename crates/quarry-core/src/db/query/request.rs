//! Module: query::request
//! Responsibility: fluent request builder and execution routing.
//! Does not own: predicate semantics or row materialization.

use crate::{
    db::{
        Db,
        executor::LoadExecutor,
        predicate::Predicate,
        query::{
            AggregateFn, ComputedField, Condition, Connective, Dictionaries, Projection,
            ResultShape, Rows, SortKey, SortSpec,
        },
        store::{StoreRequest, SubmissionHandle},
    },
    error::Error,
    traits::EntityValue,
};
use std::marker::PhantomData;

///
/// QueryRequest
///
/// Single-owner, build-then-execute request. Chainable configuration
/// mutates and returns the builder; terminals lower it into a
/// `StoreRequest` and route through the load executor. The result shape
/// is the `S` type parameter, fixed at the call site; shape-specific
/// configuration (`limit`, grouping, projection) only exists on the
/// matching shapes.
///
/// A request is not meant to be reused after execution, and nothing here
/// is safe for concurrent mutation; build it, run it, drop it.
///

pub struct QueryRequest<'a, E: EntityValue, S: ResultShape<E>> {
    db: &'a Db,
    filter: Option<Predicate>,
    sort: SortSpec,
    limit: Option<u32>,
    group_by: Vec<String>,
    projections: Vec<Projection>,
    _shape: PhantomData<(E, S)>,
}

impl<'a, E: EntityValue, S: ResultShape<E>> QueryRequest<'a, E, S> {
    #[must_use]
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            filter: None,
            sort: SortSpec::new(),
            limit: None,
            group_by: Vec::new(),
            projections: Vec::new(),
            _shape: PhantomData,
        }
    }

    /// Shape-independent limit preset (used by `find_one`).
    #[must_use]
    pub(crate) const fn preset_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// AND a prebuilt predicate tree onto the current filter.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            None => predicate,
            Some(existing) => existing & predicate,
        });
        self
    }

    /// Open a clause on `field`. On an unfiltered request this is the
    /// first clause; on an already-filtered request it appends with AND
    /// and logs a diagnostic (`reset_filter` is the explicit replacement
    /// path).
    #[must_use]
    pub fn where_by(self, field: impl Into<String>) -> Condition<'a, E, S> {
        Condition::new(self, field.into(), Connective::Where)
    }

    /// Open an AND clause on `field`.
    #[must_use]
    pub fn and_by(self, field: impl Into<String>) -> Condition<'a, E, S> {
        Condition::new(self, field.into(), Connective::And)
    }

    /// Open an OR clause on `field`.
    #[must_use]
    pub fn or_by(self, field: impl Into<String>) -> Condition<'a, E, S> {
        Condition::new(self, field.into(), Connective::Or)
    }

    /// Drop the accumulated filter.
    #[must_use]
    pub fn reset_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    pub(crate) fn apply_clause(&mut self, connective: Connective, clause: Predicate) {
        self.filter = Some(match (self.filter.take(), connective) {
            (None, _) => clause,
            (Some(existing), Connective::And) => existing & clause,
            (Some(existing), Connective::Or) => existing | clause,
            (Some(existing), Connective::Where) => {
                log::warn!(
                    "where_by on an already-filtered {} request; appending with AND \
                     (use reset_filter to start over)",
                    E::ENTITY_NAME
                );
                existing & clause
            }
        });
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Append one sort descriptor.
    #[must_use]
    pub fn sort_key(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Append parsed sort keys in declaration order: `"id"` ascending,
    /// `"-id"` descending, blank keys silently skipped.
    #[must_use]
    pub fn sort_by<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.sort.extend_parsed(keys);
        self
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    fn lower(&self) -> StoreRequest {
        StoreRequest {
            entity: E::ENTITY_NAME,
            shape: S::TAG,
            predicate: self.filter.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            group_by: self.group_by.clone(),
            projections: self.projections.clone(),
        }
    }

    /// Render the current filter to its textual store form, if any.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        self.filter.as_ref().map(Predicate::render)
    }

    /// Execute and propagate failures.
    pub fn execute(&self) -> Result<S::Output, Error> {
        LoadExecutor::new(self.db).execute::<S>(&self.lower())
    }

    /// Execute with the degrade policy: store and communication failures
    /// are logged and substituted with the shape-appropriate empty value;
    /// a misconfigured request halts loudly.
    #[must_use]
    pub fn exec(&self) -> S::Output {
        match self.execute() {
            Ok(output) => output,
            Err(err) if err.is_fatal() => {
                log::error!("{} query misconfigured: {err}", E::ENTITY_NAME);
                panic!("misconfigured request: {err}");
            }
            Err(err) => {
                log::warn!(
                    "cannot fetch {} results; returning empty {} result: {err}",
                    E::ENTITY_NAME,
                    S::NAME
                );
                S::empty()
            }
        }
    }

    /// Submit for asynchronous execution. The completion receives the
    /// shaped output on the store's delivery thread; no delivery-context
    /// guarantee is made. Submission failure is returned here and the
    /// completion is never invoked.
    pub fn exec_async<F>(&self, completion: F) -> Result<SubmissionHandle, Error>
    where
        F: FnOnce(S::Output) + Send + 'static,
    {
        LoadExecutor::new(self.db).submit::<S, F>(self.lower(), completion)
    }
}

// ---------------------------------------------------------------------------
// Shape-gated configuration
// ---------------------------------------------------------------------------

impl<E: EntityValue> QueryRequest<'_, E, Rows> {
    /// Cap the number of fetched rows. `0` disables the cap (same as
    /// never setting one). Only the entity-collection shape has a limit.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<E: EntityValue> QueryRequest<'_, E, Dictionaries> {
    /// Group output rows by a declared member (attribute first, then
    /// relationship). Unknown names degrade to a no-op with a diagnostic.
    #[must_use]
    pub fn group_by(mut self, field: &str) -> Self {
        match E::MODEL.member(field) {
            Some(member) => self.group_by.push(member.name.to_string()),
            None => log::warn!(
                "group_by: '{field}' is not a member of {}; ignoring",
                E::ENTITY_NAME
            ),
        }
        self
    }

    /// Add one plain projection column. Unknown names degrade to a no-op
    /// with a diagnostic.
    #[must_use]
    pub fn project(mut self, field: &str) -> Self {
        match E::MODEL.member(field) {
            Some(member) => self
                .projections
                .push(Projection::Field(member.name.to_string())),
            None => log::warn!(
                "project: '{field}' is not a member of {}; ignoring",
                E::ENTITY_NAME
            ),
        }
        self
    }

    /// Add a computed column `alias = function(args...)`. The argument
    /// key paths are not validated here; that remains the store's job.
    /// Unknown function names degrade to a no-op with a diagnostic.
    #[must_use]
    pub fn project_computed<I, K>(mut self, alias: &str, function: &str, args: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        match AggregateFn::parse(function) {
            Some(parsed) => self.projections.push(Projection::Computed(ComputedField {
                alias: alias.to_string(),
                function: parsed,
                args: args.into_iter().map(Into::into).collect(),
            })),
            None => log::warn!(
                "project_computed: unknown aggregate function '{function}'; ignoring"
            ),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::query::{First, RowCount};

    entity! {
        struct Person {
            primary_key: id,
            fields: {
                id: u64 => Uint,
                name: String => Text,
            },
        }
    }

    fn db() -> Db {
        Db::in_memory()
    }

    #[test]
    fn condition_chain_builds_a_filter_tree() {
        let db = db();
        let request: QueryRequest<'_, Person, Rows> = QueryRequest::new(&db)
            .where_by("name")
            .eq("Louis")
            .or_by("id")
            .gt(5u64);

        assert_eq!(
            request.filter_expression().as_deref(),
            Some("name = \"Louis\" OR id > 5")
        );
    }

    #[test]
    fn second_where_appends_with_and() {
        let db = db();
        let request: QueryRequest<'_, Person, Rows> = QueryRequest::new(&db)
            .where_by("name")
            .eq("Louis")
            .where_by("id")
            .eq(1u64);

        assert_eq!(
            request.filter_expression().as_deref(),
            Some("name = \"Louis\" AND id = 1")
        );
    }

    #[test]
    fn reset_filter_clears_accumulated_clauses() {
        let db = db();
        let request: QueryRequest<'_, Person, Rows> = QueryRequest::new(&db)
            .where_by("name")
            .eq("Louis")
            .reset_filter();

        assert_eq!(request.filter_expression(), None);
    }

    #[test]
    fn group_by_ignores_unknown_members() {
        let db = db();
        let request: QueryRequest<'_, Person, Dictionaries> =
            QueryRequest::new(&db).group_by("name").group_by("shoe_size");

        assert_eq!(request.group_by, vec!["name".to_string()]);
    }

    #[test]
    fn project_computed_ignores_unknown_functions() {
        let db = db();
        let request: QueryRequest<'_, Person, Dictionaries> = QueryRequest::new(&db)
            .project_computed("m", "median", ["id"])
            .project_computed("n", "count", Vec::<String>::new());

        assert_eq!(request.projections.len(), 1);
    }

    #[test]
    fn shapes_lower_to_their_tags() {
        let db = db();
        let rows: QueryRequest<'_, Person, Rows> = QueryRequest::new(&db);
        let one: QueryRequest<'_, Person, First> = QueryRequest::new(&db);
        let count: QueryRequest<'_, Person, RowCount> = QueryRequest::new(&db);

        assert_eq!(rows.lower().shape, crate::db::query::ShapeTag::Entities);
        assert_eq!(one.lower().shape, crate::db::query::ShapeTag::Entities);
        assert_eq!(count.lower().shape, crate::db::query::ShapeTag::Count);
    }
}
