//! Concurrent dashboard assembly.

use super::metrics::{
    inventory_alerts, sales_summary, top_products, user_metrics, InventoryAlert, SalesSummary,
    TopProduct, UserMetrics,
};
use super::range::{DateRange, Window};
use crate::config::AdminConfig;
use crate::error::AdminError;
use chrono::{DateTime, Utc};
use mobi_auth::{require, AuthUser, PermAction, Permission, Resource};
use mobi_commerce::catalog::Product;
use mobi_commerce::checkout::{Order, OrderItem};
use mobi_commerce::ids::OrderId;
use mobi_commerce::money::Currency;
use mobi_data::{Backend, BackendExt, FetchError, Table, TableQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Sales,
    TopProducts,
    Users,
    Inventory,
}

impl Widget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Widget::Sales => "sales",
            Widget::TopProducts => "top_products",
            Widget::Users => "users",
            Widget::Inventory => "inventory",
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A widget left empty because its data could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetError {
    pub widget: Widget,
    /// What failed to load.
    pub source: String,
    pub message: String,
}

/// Everything the dashboard shows for one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub window: Window,
    pub generated_at: i64,
    pub sales: Option<SalesSummary>,
    pub top_products: Option<Vec<TopProduct>>,
    pub users: Option<UserMetrics>,
    pub inventory: Option<Vec<InventoryAlert>>,
    pub errors: Vec<WidgetError>,
}

impl DashboardSnapshot {
    /// Whether every widget loaded.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failed(&self, widget: Widget) -> bool {
        self.errors.iter().any(|e| e.widget == widget)
    }
}

#[derive(Deserialize)]
struct ItemRow {
    order_id: OrderId,
    #[serde(flatten)]
    item: OrderItem,
}

/// Builds [`DashboardSnapshot`]s from the backend.
pub struct Dashboard<'a, B: Backend + ?Sized> {
    backend: &'a B,
    config: AdminConfig,
    currency: Currency,
}

impl<'a, B: Backend + ?Sized> Dashboard<'a, B> {
    pub fn new(backend: &'a B, config: AdminConfig) -> Self {
        Self {
            backend,
            config,
            currency: Currency::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub async fn snapshot(
        &self,
        actor: &AuthUser,
        range: DateRange,
    ) -> Result<DashboardSnapshot, AdminError> {
        self.snapshot_at(actor, range, Utc::now()).await
    }

    /// Assemble the dashboard as of `now`.
    ///
    /// Failed fetches do not fail the call. Each one is logged and empties
    /// only the widgets that depend on it.
    pub async fn snapshot_at(
        &self,
        actor: &AuthUser,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<DashboardSnapshot, AdminError> {
        require(Some(actor), Permission::new(Resource::Analytics, PermAction::Read))?;

        let window = range.window(now);
        let previous_window = range.previous_window(now);
        let current_query = orders_in(window);
        let previous_query = orders_in(previous_window);
        let products_query = TableQuery::new(Table::Products);
        let profiles_query = TableQuery::new(Table::Profiles);

        let (current, previous, products, profiles) = futures::join!(
            self.backend.select_as::<Order>(&current_query),
            self.backend.select_as::<Order>(&previous_query),
            self.backend.select_as::<Product>(&products_query),
            self.backend.select_as::<AuthUser>(&profiles_query),
        );

        let mut errors = Vec::new();
        let current = settle(
            current,
            "current orders",
            &[Widget::Sales, Widget::TopProducts],
            &mut errors,
        );
        let previous = settle(previous, "previous orders", &[Widget::Sales], &mut errors);
        let products = settle(products, "products", &[Widget::Inventory], &mut errors);
        let profiles = settle(profiles, "profiles", &[Widget::Users], &mut errors);

        let sales = match (&current, &previous) {
            (Some(current), Some(previous)) => {
                let summary = sales_summary(current, previous, self.currency);
                if summary.is_none() {
                    tracing::warn!(currency = %self.currency, "order totals could not be summed");
                    errors.push(WidgetError {
                        widget: Widget::Sales,
                        source: "current orders".to_string(),
                        message: format!("order totals are not all in {}", self.currency),
                    });
                }
                summary
            }
            _ => None,
        };

        let top = match current {
            Some(ref orders) => {
                let items = self.order_items(orders).await;
                settle(items, "order items", &[Widget::TopProducts], &mut errors)
                    .map(|items| top_products(orders, &items, self.config.top_products_limit))
            }
            None => None,
        };

        let users = profiles.map(|profiles| user_metrics(&profiles, current.as_deref(), window));
        let inventory = products
            .map(|products| inventory_alerts(&products, self.config.low_stock_threshold));

        tracing::debug!(range = %range, widget_errors = errors.len(), "dashboard assembled");
        Ok(DashboardSnapshot {
            range,
            window,
            generated_at: now.timestamp(),
            sales,
            top_products: top,
            users,
            inventory,
            errors,
        })
    }

    async fn order_items(&self, orders: &[Order]) -> Result<Vec<(OrderId, OrderItem)>, FetchError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let query = TableQuery::new(Table::OrderItems)
            .in_list("order_id", orders.iter().map(|o| o.id.as_str()));
        let rows: Vec<ItemRow> = self.backend.select_as(&query).await?;
        Ok(rows.into_iter().map(|r| (r.order_id, r.item)).collect())
    }
}

fn orders_in(window: Window) -> TableQuery {
    TableQuery::new(Table::Orders)
        .gte("created_at", window.start)
        .lt("created_at", window.end)
}

fn settle<T>(
    result: Result<T, FetchError>,
    source: &str,
    widgets: &[Widget],
    errors: &mut Vec<WidgetError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(source, error = %e, "dashboard fetch failed");
            errors.extend(widgets.iter().map(|&widget| WidgetError {
                widget,
                source: source.to_string(),
                message: e.to_string(),
            }));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mobi_auth::Role;
    use mobi_commerce::checkout::{Address, OrderStatus, PaymentMethod, PaymentStatus};
    use mobi_commerce::ids::{ProductId, UserId};
    use mobi_commerce::money::Money;
    use mobi_data::MemoryBackend;
    use serde_json::{json, Value};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> i64 {
        now().timestamp() - days * 86_400
    }

    fn order(id: &str, fils: i64, status: OrderStatus, created_at: i64) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: format!("ORD-{}", id),
            customer_id: Some(UserId::new("c1")),
            email: "c1@example.com".to_string(),
            status,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Knet,
            items: Vec::new(),
            subtotal: Money::kwd(fils),
            shipping_cost: Money::kwd(0),
            discount: Money::kwd(0),
            total: Money::kwd(fils),
            shipping_address: Address::default(),
            billing_address: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn item_row(order_id: &str, product: &str, quantity: i64, fils: i64) -> Value {
        let item = OrderItem::new(ProductId::new(product), product, quantity, Money::kwd(fils));
        let mut row = serde_json::to_value(item).unwrap();
        row["order_id"] = json!(order_id);
        row
    }

    fn backend() -> MemoryBackend {
        let mut customer = AuthUser::new(UserId::new("c1"), "c1@example.com", Role::Customer);
        customer.created_at = days_ago(2);
        let mut veteran = AuthUser::new(UserId::new("c2"), "c2@example.com", Role::Customer);
        veteran.created_at = days_ago(400);

        MemoryBackend::new()
            .with_records(
                Table::Orders,
                vec![
                    order("o1", 200_000, OrderStatus::Delivered, days_ago(1)),
                    order("o2", 100_000, OrderStatus::Processing, days_ago(3)),
                    order("o3", 900_000, OrderStatus::Cancelled, days_ago(4)),
                    order("o0", 150_000, OrderStatus::Delivered, days_ago(10)),
                ],
            )
            .unwrap()
            .with_rows(
                Table::OrderItems,
                vec![
                    item_row("o1", "iphone", 1, 200_000),
                    item_row("o2", "case", 4, 25_000),
                    item_row("o3", "fold", 3, 300_000),
                ],
            )
            .with_records(
                Table::Products,
                vec![
                    Product::new("iPhone", "Apple", "smartphones", Money::kwd(200_000))
                        .with_id("iphone")
                        .with_stock(2),
                    Product::new("Case", "Acme", "accessories", Money::kwd(25_000))
                        .with_id("case")
                        .with_stock(80),
                ],
            )
            .unwrap()
            .with_records(Table::Profiles, vec![customer, veteran])
            .unwrap()
    }

    fn analyst() -> AuthUser {
        AuthUser::new(UserId::new("a"), "analyst@mobistore.kw", Role::Viewer)
    }

    #[tokio::test]
    async fn test_week_snapshot() {
        let backend = backend();
        let snapshot = Dashboard::new(&backend, AdminConfig::default())
            .snapshot_at(&analyst(), DateRange::Week, now())
            .await
            .unwrap();

        assert!(snapshot.is_complete());

        let sales = snapshot.sales.unwrap();
        assert_eq!(sales.revenue, Money::kwd(300_000));
        assert_eq!(sales.order_count, 3);
        assert_eq!(sales.average_order_value, Money::kwd(150_000));
        assert_eq!(sales.revenue_change_pct, 100.0);

        let top = snapshot.top_products.unwrap();
        let ids: Vec<_> = top.iter().map(|t| t.product_id.as_str()).collect();
        assert_eq!(ids, vec!["iphone", "case"]);

        let users = snapshot.users.unwrap();
        assert_eq!(users.total_users, 2);
        assert_eq!(users.new_users, 1);
        assert_eq!(users.customers_with_orders, Some(1));

        let inventory = snapshot.inventory.unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].product_id.as_str(), "iphone");
    }

    #[tokio::test]
    async fn test_failed_fetch_empties_dependent_widgets_only() {
        let backend = backend().fail_table(Table::Products);
        let snapshot = Dashboard::new(&backend, AdminConfig::default())
            .snapshot_at(&analyst(), DateRange::Week, now())
            .await
            .unwrap();

        assert!(snapshot.inventory.is_none());
        assert!(snapshot.failed(Widget::Inventory));
        assert_eq!(snapshot.errors.len(), 1);
        assert!(snapshot.sales.is_some());
        assert!(snapshot.users.is_some());
    }

    #[tokio::test]
    async fn test_orders_outage() {
        let backend = backend().fail_table(Table::Orders);
        let snapshot = Dashboard::new(&backend, AdminConfig::default())
            .snapshot_at(&analyst(), DateRange::Month, now())
            .await
            .unwrap();

        assert!(snapshot.sales.is_none());
        assert!(snapshot.top_products.is_none());
        assert!(snapshot.failed(Widget::Sales));
        assert!(snapshot.failed(Widget::TopProducts));
        assert_eq!(snapshot.users.unwrap().customers_with_orders, None);
        assert!(snapshot.inventory.is_some());
    }

    #[tokio::test]
    async fn test_requires_analytics_read() {
        let backend = backend();
        let editor = AuthUser::new(UserId::new("e"), "e@mobistore.kw", Role::Editor);
        let err = Dashboard::new(&backend, AdminConfig::default())
            .snapshot_at(&editor, DateRange::Today, now())
            .await
            .unwrap_err();
        assert!(err.is_permission_error());
    }
}
