//! Key-value persistence for MobiStore.
//!
//! The storefront keeps the cart and the wishlist between visits. This crate
//! provides the [`KvStore`] seam those writes go through, with automatic JSON
//! serialization, plus two stores:
//!
//! - [`MemoryStore`]: in-process, records every write
//! - [`FileStore`]: one file per key under a directory
//!
//! # Example
//!
//! ```rust
//! use mobi_cache::{KvStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("wishlist", &vec!["p1", "p2"]).unwrap();
//!
//! let ids: Option<Vec<String>> = store.get("wishlist").unwrap();
//! assert_eq!(ids.unwrap().len(), 2);
//! ```

mod config;
mod error;
mod file;
mod kv;
mod memory;

pub use config::StorageConfig;
pub use error::CacheError;
pub use file::FileStore;
pub use kv::KvStore;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, FileStore, KvStore, MemoryStore, StorageConfig};
}
