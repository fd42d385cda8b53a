//! Query-string builder for appliance collection endpoints.
//!
//! The core API accepts four query parameters on list endpoints:
//!
//! - `fields`: comma-separated property names to return
//! - `filter`: `Field op value` predicates joined by `and` / `or`
//! - `orderby`: comma-separated properties, `-Field` for descending
//! - `count`: `true` to return only the number of matches
//!
//! ```
//! use pamly_api::filter::{Filter, Operator};
//!
//! let filter = Filter::new()
//!     .fields(["Id", "Name"])
//!     .and("Disabled", Operator::Equal, false)
//!     .and("Name", Operator::IContains, "admin")
//!     .order_by("Name");
//! assert_eq!(
//!     filter.filter_expression().as_deref(),
//!     Some("Disabled eq false and Name icontains 'admin'")
//! );
//! ```

use std::fmt;

/// Comparison operator for a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    StartsWith,
    EndsWith,
    /// Case-insensitive equality.
    IEqual,
    /// Case-insensitive inequality.
    INotEqual,
    IContains,
    IStartsWith,
    IEndsWith,
}

impl Operator {
    /// Wire token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::GreaterThan => "gt",
            Self::GreaterOrEqual => "ge",
            Self::LessThan => "lt",
            Self::LessOrEqual => "le",
            Self::Contains => "contains",
            Self::StartsWith => "sw",
            Self::EndsWith => "ew",
            Self::IEqual => "ieq",
            Self::INotEqual => "ine",
            Self::IContains => "icontains",
            Self::IStartsWith => "isw",
            Self::IEndsWith => "iew",
        }
    }
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Null,
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Single quotes inside a literal are escaped by doubling.
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    join: Join,
    field: String,
    op: Operator,
    value: FilterValue,
}

/// Builder for the `fields` / `filter` / `orderby` / `count` query string.
///
/// An empty `Filter` renders no parameters at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<String>,
    order_by: Vec<String>,
    predicates: Vec<Predicate>,
    count: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the returned properties.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sort ascending by `field` (appended after earlier sort keys).
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by.push(field.into());
        self
    }

    /// Sort descending by `field`.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by.push(format!("-{}", field.into()));
        self
    }

    /// Add a predicate joined with `and` (the join is dropped for the first).
    pub fn and(self, field: impl Into<String>, op: Operator, value: impl Into<FilterValue>) -> Self {
        self.push(Join::And, field.into(), op, value.into())
    }

    /// Add a predicate joined with `or`.
    pub fn or(self, field: impl Into<String>, op: Operator, value: impl Into<FilterValue>) -> Self {
        self.push(Join::Or, field.into(), op, value.into())
    }

    /// Ask for the number of matches instead of the records.
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    fn push(mut self, join: Join, field: String, op: Operator, value: FilterValue) -> Self {
        self.predicates.push(Predicate {
            join,
            field,
            op,
            value,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.order_by.is_empty() && self.predicates.is_empty() && !self.count
    }

    /// The rendered `filter` expression, if any predicates were added.
    pub fn filter_expression(&self) -> Option<String> {
        if self.predicates.is_empty() {
            return None;
        }
        let mut expr = String::new();
        for (i, p) in self.predicates.iter().enumerate() {
            if i > 0 {
                expr.push_str(match p.join {
                    Join::And => " and ",
                    Join::Or => " or ",
                });
            }
            expr.push_str(&format!("{} {} {}", p.field, p.op.as_str(), p.value));
        }
        Some(expr)
    }

    /// Query parameters as key/value pairs (unencoded), in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        if let Some(expr) = self.filter_expression() {
            pairs.push(("filter", expr));
        }
        if !self.order_by.is_empty() {
            pairs.push(("orderby", self.order_by.join(",")));
        }
        if self.count {
            pairs.push(("count", "true".into()));
        }
        pairs
    }

    /// URL-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}
