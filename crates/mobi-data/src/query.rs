//! Table query builder.
//!
//! Queries render to PostgREST query-string pairs:
//!
//! ```rust
//! use mobi_data::{Table, TableQuery};
//!
//! let query = TableQuery::new(Table::Products)
//!     .eq("category", "smartphones")
//!     .gte("price->amount_minor", 100_000)
//!     .order_desc("created_at")
//!     .limit(12);
//!
//! assert_eq!(
//!     query.to_query_string(),
//!     "select=*&category=eq.smartphones&price->amount_minor=gte.100000&order=created_at.desc&limit=12"
//! );
//! ```

use crate::table::Table;
use serde_json::Value;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Value is one of a list.
    In,
    /// Case-insensitive pattern; `*` or `%` match any run of characters.
    ILike,
    IsNull,
    NotNull,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::In => "in",
            FilterOp::ILike => "ilike",
            FilterOp::IsNull => "is",
            FilterOp::NotNull => "not.is",
        }
    }
}

/// One column condition. `column` may be a JSON path such as
/// `price->amount_minor`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    /// The right-hand side of `column=<op>.<value>`.
    pub fn render(&self) -> String {
        let value = match self.op {
            FilterOp::IsNull | FilterOp::NotNull => "null".to_string(),
            FilterOp::In => match &self.value {
                Value::Array(items) => format!(
                    "({})",
                    items.iter().map(render_list_item).collect::<Vec<_>>().join(",")
                ),
                other => format!("({})", render_list_item(other)),
            },
            FilterOp::ILike => render_scalar(&self.value).replace('%', "*"),
            _ => render_scalar(&self.value),
        };
        format!("{}.{}", self.op.as_str(), value)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_list_item(value: &Value) -> String {
    let raw = render_scalar(value);
    if raw.contains([',', '(', ')', '"']) {
        format!("\"{}\"", raw.replace('"', "\\\""))
    } else {
        raw
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A select / update / delete target: table, filters, ordering and window.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: Table,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TableQuery {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Columns to return, PostgREST syntax (embedded resources allowed).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Neq, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gt, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    pub fn in_list<V: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.filter(column, FilterOp::In, Value::Array(values))
    }

    pub fn ilike(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filter(column, FilterOp::ILike, Value::String(pattern.into()))
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.filter(column, FilterOp::IsNull, Value::Null)
    }

    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.filter(column, FilterOp::NotNull, Value::Null)
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending: true,
        });
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending: false,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// `limit`/`offset` covering `start..=end`, PostgREST range style.
    pub fn range(self, start: i64, end: i64) -> Self {
        self.offset(start).limit((end - start + 1).max(0))
    }

    /// Same filters, no ordering or window. Used for counts.
    pub fn without_window(&self) -> Self {
        Self {
            order: Vec::new(),
            limit: None,
            offset: None,
            ..self.clone()
        }
    }

    /// Render as unencoded `(key, value)` pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        for filter in &self.filters {
            pairs.push((filter.column.clone(), filter.render()));
        }
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }

    /// Render as a URL query string. Values are percent-encoded; keys are
    /// left alone so JSON paths stay readable.
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// PostgREST operators use `.`, `*`, `(`, `)` and `,` literally.
fn encode_value(value: &str) -> String {
    value
        .split_inclusive(['.', '*', '(', ')', ','])
        .map(|part| {
            let (body, sep) = match part.char_indices().last() {
                Some((i, c)) if matches!(c, '.' | '*' | '(' | ')' | ',') => part.split_at(i),
                _ => (part, ""),
            };
            format!("{}{}", urlencoding::encode(body), sep)
        })
        .collect()
}
