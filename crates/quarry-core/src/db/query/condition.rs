use crate::{
    db::{
        predicate::{CompareOp, Predicate},
        query::{QueryRequest, ResultShape},
    },
    traits::EntityValue,
    value::Value,
};

///
/// Connective
///
/// How a pending clause joins the request's existing filter. `Where`
/// opens a filter; on an already-filtered request it behaves as AND with
/// a diagnostic (see `QueryRequest::apply_clause`).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connective {
    Where,
    And,
    Or,
}

///
/// Condition
///
/// A clause opened on one field, waiting for its comparison. Each
/// comparison method builds the clause fragment, folds it into the
/// owning request's filter tree, and hands the request back for further
/// chaining.
///

#[must_use = "a condition does nothing until a comparison closes it"]
pub struct Condition<'a, E: EntityValue, S: ResultShape<E>> {
    request: QueryRequest<'a, E, S>,
    field: String,
    connective: Connective,
}

impl<'a, E: EntityValue, S: ResultShape<E>> Condition<'a, E, S> {
    pub(crate) const fn new(
        request: QueryRequest<'a, E, S>,
        field: String,
        connective: Connective,
    ) -> Self {
        Self {
            request,
            field,
            connective,
        }
    }

    fn close(self, op: CompareOp, value: Value) -> QueryRequest<'a, E, S> {
        let clause = Predicate::compare(self.field, op, value);
        let mut request = self.request;
        request.apply_clause(self.connective, clause);

        request
    }

    pub fn eq(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Eq, value.into())
    }

    pub fn ne(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Ne, value.into())
    }

    pub fn gt(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Gt, value.into())
    }

    pub fn gte(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Gte, value.into())
    }

    pub fn lt(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Lt, value.into())
    }

    pub fn lte(self, value: impl Into<Value>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Lte, value.into())
    }

    /// Text prefix match.
    pub fn begins_with(self, value: impl Into<String>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::StartsWith, Value::Text(value.into()))
    }

    /// Text suffix match.
    pub fn ends_with(self, value: impl Into<String>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::EndsWith, Value::Text(value.into()))
    }

    /// Text containment match.
    pub fn contains(self, value: impl Into<String>) -> QueryRequest<'a, E, S> {
        self.close(CompareOp::Contains, Value::Text(value.into()))
    }
}
