//! Query - filter, ordering and limit over the JSON form of models.
//!
//! A [`Filter`] is a conjunction of [`Condition`]s. Each condition names a
//! field path; a dotted path (`publisher_id.country_id`) follows the
//! model's declared relations into the related record.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// The field equals one of the values of an array operand.
    In,
    /// Case-insensitive substring match.
    ILike,
    /// The field holds a non-empty value.
    IsSet,
    /// The field is null, missing, `false` or an empty string.
    NotSet,
}

/// A single `field op value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// The first segment of the field path.
    pub fn root(&self) -> &str {
        self.field.split('.').next().unwrap_or_default()
    }

    /// Evaluate against an already resolved field value.
    ///
    /// When the field holds an array (a many-to-many id list), the condition
    /// matches if any element matches.
    pub fn matches(&self, field_value: &Value) -> bool {
        match (self.op, field_value) {
            (Op::IsSet, value) => is_set(value),
            (Op::NotSet, value) => !is_set(value),
            (Op::Ne, Value::Array(items)) => !items.iter().any(|item| self.test(Op::Eq, item)),
            (op, Value::Array(items)) => items.iter().any(|item| self.test(op, item)),
            (op, value) => self.test(op, value),
        }
    }

    fn test(&self, op: Op, field_value: &Value) -> bool {
        match op {
            Op::Eq => values_equal(field_value, &self.value),
            Op::Ne => !values_equal(field_value, &self.value),
            Op::Lt => compare(field_value, &self.value) == Some(Ordering::Less),
            Op::Le => matches!(
                compare(field_value, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Op::Gt => compare(field_value, &self.value) == Some(Ordering::Greater),
            Op::Ge => matches!(
                compare(field_value, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Op::In => match &self.value {
                Value::Array(options) => options.iter().any(|o| values_equal(field_value, o)),
                other => values_equal(field_value, other),
            },
            Op::ILike => match (field_value, &self.value) {
                (Value::String(haystack), Value::String(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
            Op::IsSet => is_set(field_value),
            Op::NotSet => !is_set(field_value),
        }
    }
}

/// A conjunction of conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition. Uses builder pattern.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Shorthand for `and(Condition::new(field, Op::Eq, value))`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Condition::new(field, Op::Eq, value))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether any condition's path starts at `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.conditions.iter().any(|c| c.root() == field)
    }

    /// Rewrite every condition through `f`.
    pub fn map(self, f: impl Fn(Condition) -> Condition) -> Self {
        Self {
            conditions: self.conditions.into_iter().map(f).collect(),
        }
    }
}

impl From<Vec<Condition>> for Filter {
    fn from(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }
}

/// Sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Compare two records' values for this key. Nulls sort last.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.is_null(), b.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Filter, ordering and limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub order: Vec<Order>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Order two scalar values. Strings that both parse as numbers (decimal
/// amounts are serialized as strings) compare numerically; ISO dates compare
/// lexically, which matches their chronological order.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
