//! HTTP client for the hosted backend's REST interface.

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::error::FetchError;
use crate::query::TableQuery;
use crate::table::Table;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// [`Backend`] over HTTP.
///
/// Every request carries the anon key; the `Authorization` bearer is the
/// signed-in session token when one is set, otherwise the anon key.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: BackendConfig,
    access_token: Option<String>,
}

impl RestClient {
    pub fn new(config: BackendConfig) -> Result<Self, FetchError> {
        if config.url.trim().is_empty() {
            return Err(FetchError::Config("backend url is empty".to_string()));
        }
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(FetchError::InvalidUrl(config.url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;
        Ok(Self {
            http,
            config,
            access_token: None,
        })
    }

    /// Act as a signed-in user.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(self.config.anon_key.as_str());
        self.http
            .request(method, self.config.rest_url(path))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    fn table_request(&self, method: Method, query: &TableQuery) -> RequestBuilder {
        self.request(method, query.table.as_str())
            .query(&query.to_query_pairs())
    }

    /// Filters only: PostgREST rejects `select`/`order` on some verbs.
    fn filter_pairs(query: &TableQuery) -> Vec<(String, String)> {
        query
            .filters
            .iter()
            .map(|f| (f.column.clone(), f.render()))
            .collect()
    }

    async fn send(builder: RequestBuilder) -> Result<Response, FetchError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %message, "backend request failed");
        Err(FetchError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> Result<Vec<Value>, FetchError> {
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&body)? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }
}

/// Total from a `Content-Range` header such as `0-11/37` or `*/0`.
fn parse_content_range(header: &str) -> Option<i64> {
    header.rsplit('/').next()?.trim().parse().ok()
}

#[async_trait]
impl Backend for RestClient {
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError> {
        tracing::debug!(table = %query.table, "select");
        let response = Self::send(self.table_request(Method::GET, query)).await?;
        Self::rows(response).await
    }

    async fn count(&self, query: &TableQuery) -> Result<i64, FetchError> {
        let query = query.without_window();
        let builder = self
            .table_request(Method::HEAD, &query)
            .header("Prefer", "count=exact");
        let response = Self::send(builder).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| FetchError::ParseError("missing Content-Range total".to_string()))
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, FetchError> {
        let builder = self
            .request(Method::POST, table.as_str())
            .header("Prefer", "return=representation")
            .json(&row);
        let response = Self::send(builder).await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::ParseError("insert returned no row".to_string()))
    }

    async fn update(&self, query: &TableQuery, patch: Value) -> Result<Vec<Value>, FetchError> {
        let builder = self
            .request(Method::PATCH, query.table.as_str())
            .query(&Self::filter_pairs(query))
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = Self::send(builder).await?;
        Self::rows(response).await
    }

    async fn delete(&self, query: &TableQuery) -> Result<Vec<Value>, FetchError> {
        let builder = self
            .request(Method::DELETE, query.table.as_str())
            .query(&Self::filter_pairs(query))
            .header("Prefer", "return=representation");
        let response = Self::send(builder).await?;
        Self::rows(response).await
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value, FetchError> {
        tracing::debug!(function, "rpc");
        let builder = self
            .request(Method::POST, &format!("rpc/{}", function))
            .json(&args);
        let response = Self::send(builder).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
