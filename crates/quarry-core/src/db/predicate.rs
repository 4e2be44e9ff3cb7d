use crate::{
    row::EntityRow,
    value::{Value, semantic_cmp},
};
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Pure, schema-agnostic representation of query filters. Clauses are
/// built as an explicit tree and rendered to the store's textual form
/// only at the execution boundary; connective structure is never encoded
/// by string order.
///
/// Field names are not validated against the entity model at build time;
/// that remains the store's job at execution time.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
    EndsWith,
}

impl CompareOp {
    /// Textual operator token used in rendered clause fragments.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Contains => "CONTAINS",
            Self::StartsWith => "BEGINSWITH",
            Self::EndsWith => "ENDSWITH",
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Render the clause fragment: attribute, operator token, literal.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} {} {}", self.field, self.op.token(), self.value.render())
    }

    fn eval(&self, row: &EntityRow) -> bool {
        let Some(actual) = row.get(&self.field) else {
            return false;
        };

        match self.op {
            CompareOp::Eq => semantic_cmp(actual, &self.value) == Some(Ordering::Equal),
            CompareOp::Ne => matches!(
                semantic_cmp(actual, &self.value),
                Some(Ordering::Less | Ordering::Greater)
            ),
            CompareOp::Lt => semantic_cmp(actual, &self.value) == Some(Ordering::Less),
            CompareOp::Lte => matches!(
                semantic_cmp(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            CompareOp::Gt => semantic_cmp(actual, &self.value) == Some(Ordering::Greater),
            CompareOp::Gte => matches!(
                semantic_cmp(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            CompareOp::Contains => actual.text_contains(&self.value),
            CompareOp::StartsWith => actual.text_starts_with(&self.value),
            CompareOp::EndsWith => actual.text_ends_with(&self.value),
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
}

impl Predicate {
    #[must_use]
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare(ComparePredicate::new(field, op, value))
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Contains, value)
    }

    #[must_use]
    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::StartsWith, value)
    }

    #[must_use]
    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::EndsWith, value)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    /// Render the whole filter to its textual store form. Compound
    /// children are parenthesized; precedence lives in the tree, not in
    /// token order.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::True => "TRUEPREDICATE".to_string(),
            Self::And(preds) => Self::render_joined(preds, " AND "),
            Self::Or(preds) => Self::render_joined(preds, " OR "),
            Self::Not(inner) => format!("NOT {}", inner.render_grouped()),
            Self::Compare(cmp) => cmp.render(),
        }
    }

    fn render_joined(preds: &[Self], joiner: &str) -> String {
        let parts: Vec<String> = preds.iter().map(Self::render_grouped).collect();
        parts.join(joiner)
    }

    fn render_grouped(&self) -> String {
        match self {
            Self::And(preds) | Self::Or(preds) if preds.len() > 1 => {
                format!("({})", self.render())
            }
            _ => self.render(),
        }
    }

    /// Evaluate against one row. Missing fields and cross-family
    /// mismatches are false for every operator; evaluation never errors.
    #[must_use]
    pub fn eval(&self, row: &EntityRow) -> bool {
        match self {
            Self::True => true,
            Self::And(preds) => preds.iter().all(|pred| pred.eval(row)),
            Self::Or(preds) => preds.iter().any(|pred| pred.eval(row)),
            Self::Not(inner) => !inner.eval(row),
            Self::Compare(cmp) => cmp.eval(row),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}
