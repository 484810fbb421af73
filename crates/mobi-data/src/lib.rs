//! Hosted backend client for MobiStore.
//!
//! Everything the storefront and the back-office read or write goes through
//! the [`Backend`] trait. [`RestClient`] talks to the hosted REST interface;
//! [`MemoryBackend`] keeps tables in memory for tests and offline tools.
//!
//! # Example
//!
//! ```rust
//! use mobi_data::{Backend, MemoryBackend, Table, TableQuery};
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let backend = MemoryBackend::new().with_rows(
//!     Table::Categories,
//!     vec![json!({"id": "1", "name": "Phones", "is_active": true})],
//! );
//!
//! let rows = backend
//!     .select(&TableQuery::new(Table::Categories).eq("is_active", true))
//!     .await
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

mod backend;
pub mod catalog;
mod config;
mod error;
mod memory;
mod query;
mod rest;
mod table;

pub use backend::{Backend, BackendExt};
pub use config::{BackendConfig, ENV_ANON_KEY, ENV_BACKEND_URL};
pub use error::FetchError;
pub use memory::MemoryBackend;
pub use query::{Filter, FilterOp, Order, TableQuery};
pub use rest::RestClient;
pub use table::Table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Backend, BackendExt, BackendConfig, FetchError, Table, TableQuery};
}
