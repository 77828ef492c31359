//! Document filters and queries
//!
//! Filters are evaluated against the JSON form of a document. A missing
//! field compares as `null`.

use serde_json::Value;
use std::cmp::Ordering;

use super::Document;

/// Predicate over a single document
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals value
    Eq(String, Value),
    /// Field is `null` or absent
    IsNull(String),
    /// Field equals one of the values
    In(String, Vec<Value>),
    /// String field starts with prefix
    Prefix(String, String),
    /// Integer field within `[gte, lt)`; open bounds are `None`
    Range {
        field: String,
        gte: Option<i64>,
        lt: Option<i64>,
    },
    /// All sub-filters match
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull(field.into())
    }

    pub fn one_of<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Prefix(field.into(), prefix.into())
    }

    pub fn range(field: impl Into<String>, gte: Option<i64>, lt: Option<i64>) -> Self {
        Self::Range {
            field: field.into(),
            gte,
            lt,
        }
    }

    /// Conjunction, flattening nested `And` and dropping `All`
    pub fn and(self, other: Filter) -> Self {
        let mut parts = Vec::new();
        for f in [self, other] {
            match f {
                Filter::All => {}
                Filter::And(inner) => parts.extend(inner),
                f => parts.push(f),
            }
        }
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => field_value(doc, field) == value,
            Filter::IsNull(field) => field_value(doc, field).is_null(),
            Filter::In(field, values) => {
                let v = field_value(doc, field);
                values.iter().any(|candidate| candidate == v)
            }
            Filter::Prefix(field, prefix) => field_value(doc, field)
                .as_str()
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Filter::Range { field, gte, lt } => match field_value(doc, field).as_i64() {
                Some(n) => gte.is_none_or(|lo| n >= lo) && lt.is_none_or(|hi| n < hi),
                None => false,
            },
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filtered, optionally sorted and limited scan
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn all() -> Self {
        Self::new(Filter::All)
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort and truncate an already filtered result set
    pub(crate) fn finish(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if let Some((field, order)) = &self.sort {
            docs.sort_by(|a, b| {
                let ord = compare_values(field_value(a, field), field_value(b, field));
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

static NULL: Value = Value::Null;

fn field_value<'a>(doc: &'a Document, field: &str) -> &'a Value {
    doc.get(field).unwrap_or(&NULL)
}

/// Total order used for sorting: null < bool < number < string, other
/// shapes compare equal
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
