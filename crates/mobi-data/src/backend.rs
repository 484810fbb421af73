//! The backend seam.

use crate::error::FetchError;
use crate::query::TableQuery;
use crate::table::Table;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Row-level access to the hosted database.
///
/// Rows travel as JSON objects. `update` and `delete` act on every row the
/// query's filters match and return the affected rows.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows matching the query, in the query's order and window.
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError>;

    /// Number of rows matching the query's filters. Window is ignored.
    async fn count(&self, query: &TableQuery) -> Result<i64, FetchError>;

    /// Insert one row and return it as stored.
    async fn insert(&self, table: Table, row: Value) -> Result<Value, FetchError>;

    /// Merge `patch` into every matching row.
    async fn update(&self, query: &TableQuery, patch: Value) -> Result<Vec<Value>, FetchError>;

    /// Remove every matching row.
    async fn delete(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError>;

    /// Call a backend function.
    async fn rpc(&self, function: &str, args: Value) -> Result<Value, FetchError>;
}

/// Typed helpers over [`Backend`].
#[async_trait]
pub trait BackendExt: Backend {
    /// Select and deserialize every row.
    async fn select_as<T>(&self, query: &TableQuery) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + Send,
    {
        self.select(query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(FetchError::from))
            .collect()
    }

    /// First matching row, if any.
    async fn select_one<T>(&self, query: &TableQuery) -> Result<Option<T>, FetchError>
    where
        T: DeserializeOwned + Send,
    {
        let query = query.clone().limit(1);
        match self.select(&query).await?.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Serialize, insert and read back.
    async fn insert_as<T, R>(&self, table: Table, row: &T) -> Result<R, FetchError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let row = serde_json::to_value(row)?;
        let stored = self.insert(table, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Update and deserialize the affected rows.
    async fn update_as<T>(&self, query: &TableQuery, patch: Value) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + Send,
    {
        self.update(query, patch)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(FetchError::from))
            .collect()
    }
}

impl<B: Backend + ?Sized> BackendExt for B {}
