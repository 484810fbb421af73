//! In-process backend for tests and offline tools.

use crate::backend::Backend;
use crate::error::FetchError;
use crate::query::{Filter, FilterOp, TableQuery};
use crate::table::Table;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

type Function = Arc<dyn Fn(Value) -> Result<Value, FetchError> + Send + Sync>;

/// A [`Backend`] over in-memory tables.
///
/// Filters, ordering and windows follow the same rules the hosted service
/// applies to the rendered query. Tables listed with
/// [`MemoryBackend::fail_table`] answer every call with an HTTP 503.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    functions: HashMap<String, Function>,
    failing: HashSet<Table>,
    next_id: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows into a table.
    pub fn with_rows(self, table: Table, rows: impl IntoIterator<Item = Value>) -> Self {
        lock(&self.tables).entry(table).or_default().extend(rows);
        self
    }

    /// Serialize and seed rows.
    pub fn with_records<T: serde::Serialize>(
        self,
        table: Table,
        records: impl IntoIterator<Item = T>,
    ) -> Result<Self, FetchError> {
        let rows = records
            .into_iter()
            .map(|r| serde_json::to_value(r).map_err(FetchError::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_rows(table, rows))
    }

    /// Register a function callable through [`Backend::rpc`].
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value) -> Result<Value, FetchError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Make every call touching `table` fail.
    pub fn fail_table(mut self, table: Table) -> Self {
        self.failing.insert(table);
        self
    }

    /// Snapshot of a table.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        lock(&self.tables).get(&table).cloned().unwrap_or_default()
    }

    fn check(&self, table: Table) -> Result<(), FetchError> {
        if self.failing.contains(&table) {
            return Err(FetchError::Http {
                status: 503,
                message: format!("{} unavailable", table),
            });
        }
        Ok(())
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        format!("mem-{:08}", n)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Look up a column, following `->` / `->>` JSON paths.
pub(crate) fn column_value<'a>(row: &'a Value, column: &str) -> Option<&'a Value> {
    column
        .split("->")
        .map(|segment| segment.trim_start_matches('>'))
        .try_fold(row, |value, key| value.get(key))
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        // Filter values arrive as strings when built from text input.
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::Bool(x), Value::String(y)) => Some(x.to_string().as_str().cmp(y.as_str())),
        _ => None,
    }
}

fn ilike(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase().replace('%', "*");
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return text == pattern;
    }

    let mut rest = text.as_str();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    let value = column_value(row, &filter.column).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::IsNull => value.is_null(),
        FilterOp::NotNull => !value.is_null(),
        FilterOp::Eq => compare_values(value, &filter.value) == Some(Ordering::Equal),
        FilterOp::Neq => {
            !value.is_null() && compare_values(value, &filter.value) != Some(Ordering::Equal)
        }
        FilterOp::Gt => compare_values(value, &filter.value) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(
            compare_values(value, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => compare_values(value, &filter.value) == Some(Ordering::Less),
        FilterOp::Lte => matches!(
            compare_values(value, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::In => match &filter.value {
            Value::Array(items) => items
                .iter()
                .any(|item| compare_values(value, item) == Some(Ordering::Equal)),
            other => compare_values(value, other) == Some(Ordering::Equal),
        },
        FilterOp::ILike => match (value, &filter.value) {
            (Value::String(text), Value::String(pattern)) => ilike(text, pattern),
            _ => false,
        },
    }
}

fn matches_all(row: &Value, query: &TableQuery) -> bool {
    query.filters.iter().all(|f| matches_filter(row, f))
}

fn apply_order(rows: &mut [Value], query: &TableQuery) {
    rows.sort_by(|a, b| {
        for order in &query.order {
            let left = column_value(a, &order.column).unwrap_or(&Value::Null);
            let right = column_value(b, &order.column).unwrap_or(&Value::Null);
            // Nulls sort last in both directions.
            let ordering = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = compare_values(left, right).unwrap_or(Ordering::Equal);
                    if order.ascending {
                        ord
                    } else {
                        ord.reverse()
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn apply_window(rows: Vec<Value>, query: &TableQuery) -> Vec<Value> {
    let offset = query.offset.unwrap_or(0).max(0) as usize;
    let iter = rows.into_iter().skip(offset);
    match query.limit {
        Some(limit) => iter.take(limit.max(0) as usize).collect(),
        None => iter.collect(),
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError> {
        self.check(query.table)?;
        let mut rows: Vec<Value> = lock(&self.tables)
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| matches_all(r, query)).cloned().collect())
            .unwrap_or_default();
        apply_order(&mut rows, query);
        Ok(apply_window(rows, query))
    }

    async fn count(&self, query: &TableQuery) -> Result<i64, FetchError> {
        self.check(query.table)?;
        Ok(lock(&self.tables)
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| matches_all(r, query)).count() as i64)
            .unwrap_or(0))
    }

    async fn insert(&self, table: Table, mut row: Value) -> Result<Value, FetchError> {
        self.check(table)?;
        let Some(object) = row.as_object_mut() else {
            return Err(FetchError::Http {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };
        if object.get("id").map(Value::is_null).unwrap_or(true) {
            object.insert("id".to_string(), Value::String(self.generate_id()));
        }
        lock(&self.tables).entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, query: &TableQuery, patch: Value) -> Result<Vec<Value>, FetchError> {
        self.check(query.table)?;
        let patch: Map<String, Value> = match patch {
            Value::Object(map) => map,
            _ => {
                return Err(FetchError::Http {
                    status: 400,
                    message: "patch must be a JSON object".to_string(),
                })
            }
        };

        let mut tables = lock(&self.tables);
        let mut updated = Vec::new();
        for row in tables.entry(query.table).or_default().iter_mut() {
            if !matches_all(row, query) {
                continue;
            }
            if let Some(object) = row.as_object_mut() {
                for (key, value) in &patch {
                    object.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError> {
        self.check(query.table)?;
        let mut tables = lock(&self.tables);
        let rows = tables.entry(query.table).or_default();
        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|r| matches_all(r, query));
        *rows = kept;
        Ok(removed)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, FetchError> {
        let handler = self
            .functions
            .get(function)
            .cloned()
            .ok_or_else(|| FetchError::UnknownFunction(function.to_string()))?;
        handler(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendExt;
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_rows(
            Table::Products,
            vec![
                json!({"id": "1", "name": "iPhone 15", "brand": "Apple", "price": {"amount_minor": 299000}, "rating": 4.8, "is_active": true}),
                json!({"id": "2", "name": "Galaxy S24", "brand": "Samsung", "price": {"amount_minor": 259000}, "rating": 4.6, "is_active": true}),
                json!({"id": "3", "name": "Redmi Note", "brand": "Xiaomi", "price": {"amount_minor": 79000}, "rating": null, "is_active": false}),
            ],
        )
    }

    fn ids(rows: &[Value]) -> Vec<&str> {
        rows.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_json_path_filter_and_order() {
        let backend = backend();
        let query = TableQuery::new(Table::Products)
            .gte("price->amount_minor", 100_000)
            .order_asc("price->amount_minor");

        let rows = backend.select(&query).await.unwrap();
        assert_eq!(ids(&rows), vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_in_ilike_and_bool() {
        let backend = backend();
        let query = TableQuery::new(Table::Products)
            .in_list("brand", ["Apple", "Xiaomi"])
            .eq("is_active", true);
        assert_eq!(ids(&backend.select(&query).await.unwrap()), vec!["1"]);

        let query = TableQuery::new(Table::Products).ilike("name", "%GALAXY%");
        assert_eq!(ids(&backend.select(&query).await.unwrap()), vec!["2"]);
    }

    #[tokio::test]
    async fn test_nulls_sort_last() {
        let backend = backend();
        let query = TableQuery::new(Table::Products).order_desc("rating");
        assert_eq!(ids(&backend.select(&query).await.unwrap()), vec!["1", "2", "3"]);

        let query = TableQuery::new(Table::Products).order_asc("rating");
        assert_eq!(ids(&backend.select(&query).await.unwrap()), vec!["2", "1", "3"]);
    }

    #[tokio::test]
    async fn test_window_and_count() {
        let backend = backend();
        let query = TableQuery::new(Table::Products).order_asc("id").range(1, 1);
        assert_eq!(ids(&backend.select(&query).await.unwrap()), vec!["2"]);
        assert_eq!(backend.count(&query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let backend = MemoryBackend::new();
        let row = backend
            .insert(Table::Categories, json!({"name": "Tablets"}))
            .await
            .unwrap();
        assert!(row["id"].as_str().unwrap().starts_with("mem-"));
        assert_eq!(backend.rows(Table::Categories).len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let backend = backend();
        let target = TableQuery::new(Table::Products).eq("id", "3");

        let updated = backend
            .update(&target, json!({"is_active": true}))
            .await
            .unwrap();
        assert_eq!(updated[0]["is_active"], json!(true));

        let removed = backend.delete(&target).await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(backend.rows(Table::Products).len(), 2);
    }

    #[tokio::test]
    async fn test_failing_table() {
        let backend = backend().fail_table(Table::Orders);
        let err = backend
            .select(&TableQuery::new(Table::Orders))
            .await
            .unwrap_err();
        assert!(err.is_status(503));
        assert!(backend.select(&TableQuery::new(Table::Products)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rpc() {
        let backend = MemoryBackend::new()
            .with_function("echo", |args| Ok(json!({"got": args})));
        let reply = backend.rpc("echo", json!(1)).await.unwrap();
        assert_eq!(reply, json!({"got": 1}));
        assert_eq!(
            backend.rpc("missing", Value::Null).await,
            Err(FetchError::UnknownFunction("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_select_one_typed() {
        #[derive(serde::Deserialize)]
        struct Row {
            name: String,
        }
        let backend = backend();
        let row: Option<Row> = backend
            .select_one(&TableQuery::new(Table::Products).eq("brand", "Samsung"))
            .await
            .unwrap();
        assert_eq!(row.unwrap().name, "Galaxy S24");
    }

    #[test]
    fn test_ilike_patterns() {
        assert!(ilike("Galaxy S24 Ultra", "*s24*"));
        assert!(ilike("Galaxy S24", "galaxy*"));
        assert!(ilike("Galaxy S24", "*S24"));
        assert!(!ilike("Galaxy S24", "*s23*"));
        assert!(ilike("abc", "ABC"));
    }
}
