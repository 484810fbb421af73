//! Back-office for MobiStore.
//!
//! - **Services**: permission-guarded product, order, user and category
//!   management over any [`mobi_data::Backend`]
//! - **Dashboard**: sales, best sellers, user and inventory widgets for a
//!   date range, assembled from concurrent fetches
//! - **Changelog**: the release history bundled with the crate
//!
//! # Example
//!
//! ```rust
//! use mobi_admin::prelude::*;
//! use mobi_auth::{AuthUser, Role};
//! use mobi_commerce::ids::UserId;
//! use mobi_data::MemoryBackend;
//!
//! # tokio_test_block(async {
//! let backend = MemoryBackend::new();
//! let viewer = AuthUser::new(UserId::new("u1"), "ops@mobistore.kw", Role::Viewer);
//!
//! let snapshot = Dashboard::new(&backend, AdminConfig::default())
//!     .snapshot(&viewer, DateRange::Week)
//!     .await
//!     .unwrap();
//! assert!(snapshot.is_complete());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod changelog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod services;

pub use changelog::{Changelog, Release};
pub use config::AdminConfig;
pub use dashboard::{Dashboard, DashboardSnapshot, DateRange};
pub use error::AdminError;
pub use services::{CategoryService, OrderService, ProductService, UserService};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::changelog::{Changelog, Release};
    pub use crate::config::AdminConfig;
    pub use crate::dashboard::{Dashboard, DashboardSnapshot, DateRange, Widget, WidgetError};
    pub use crate::error::AdminError;
    pub use crate::services::{CategoryService, OrderService, ProductService, UserService};
}
