//! Admin dashboard.
//!
//! [`Dashboard`] fetches the current and previous windows' orders, the
//! catalog and the user profiles concurrently, then derives each widget
//! from what arrived.

mod aggregator;
mod metrics;
mod range;

pub use aggregator::{Dashboard, DashboardSnapshot, Widget, WidgetError};
pub use metrics::{
    percent_change, InventoryAlert, SalesSummary, TopProduct, UserMetrics,
};
pub use range::{DateRange, Window};
