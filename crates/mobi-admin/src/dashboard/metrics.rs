//! Widget computations over fetched rows.

use super::range::Window;
use mobi_auth::AuthUser;
use mobi_commerce::catalog::Product;
use mobi_commerce::checkout::{Order, OrderItem};
use mobi_commerce::ids::{OrderId, ProductId};
use mobi_commerce::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Revenue and order totals for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Sum of totals for orders that count as revenue.
    pub revenue: Money,
    /// Orders placed in the window, whatever their status.
    pub order_count: i64,
    /// Revenue divided by the revenue-counting orders.
    pub average_order_value: Money,
    /// Revenue change against the previous window, in percent.
    pub revenue_change_pct: f64,
    /// Order count change against the previous window, in percent.
    pub orders_change_pct: f64,
}

/// A best seller in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units_sold: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub total_users: i64,
    /// Profiles created in the window.
    pub new_users: i64,
    /// Distinct signed-in customers who ordered in the window. `None` when
    /// orders could not be fetched.
    pub customers_with_orders: Option<i64>,
}

/// An active product running low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAlert {
    pub product_id: ProductId,
    pub name: String,
    pub stock_count: i64,
    pub out_of_stock: bool,
}

/// `(current - previous) / previous * 100`. With no previous value the
/// change is 100 when anything happened and 0 otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Revenue from the orders that count toward it. `None` on currency
/// mismatch or overflow.
pub fn revenue(orders: &[Order], currency: Currency) -> Option<Money> {
    Money::try_sum(
        orders
            .iter()
            .filter(|o| o.status.counts_as_revenue())
            .map(|o| &o.total),
        currency,
    )
}

pub fn sales_summary(
    current: &[Order],
    previous: &[Order],
    currency: Currency,
) -> Option<SalesSummary> {
    let revenue_now = revenue(current, currency)?;
    let revenue_before = revenue(previous, currency)?;
    let counted = current.iter().filter(|o| o.status.counts_as_revenue()).count() as i64;

    let average_order_value = if counted > 0 {
        Money::new(revenue_now.amount_minor / counted, currency)
    } else {
        Money::zero(currency)
    };

    Some(SalesSummary {
        revenue: revenue_now,
        order_count: current.len() as i64,
        average_order_value,
        revenue_change_pct: percent_change(
            revenue_now.amount_minor as f64,
            revenue_before.amount_minor as f64,
        ),
        orders_change_pct: percent_change(current.len() as f64, previous.len() as f64),
    })
}

/// Rank products sold in revenue-counting orders by revenue, then units.
pub fn top_products(
    orders: &[Order],
    items: &[(OrderId, OrderItem)],
    limit: usize,
) -> Vec<TopProduct> {
    let counted: HashSet<&OrderId> = orders
        .iter()
        .filter(|o| o.status.counts_as_revenue())
        .map(|o| &o.id)
        .collect();

    let mut by_product: HashMap<&ProductId, TopProduct> = HashMap::new();
    for (order_id, item) in items {
        if !counted.contains(order_id) {
            continue;
        }
        let entry = by_product
            .entry(&item.product_id)
            .or_insert_with(|| TopProduct {
                product_id: item.product_id.clone(),
                name: item.product_name.clone(),
                units_sold: 0,
                revenue: Money::zero(item.unit_price.currency),
            });
        entry.units_sold += item.quantity;
        entry.revenue.amount_minor = entry
            .revenue
            .amount_minor
            .saturating_add(item.line_total().amount_minor);
    }

    let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .amount_minor
            .cmp(&a.revenue.amount_minor)
            .then_with(|| b.units_sold.cmp(&a.units_sold))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

pub fn user_metrics(
    profiles: &[AuthUser],
    orders: Option<&[Order]>,
    window: Window,
) -> UserMetrics {
    let customers_with_orders = orders.map(|orders| {
        orders
            .iter()
            .filter_map(|o| o.customer_id.as_ref())
            .collect::<HashSet<_>>()
            .len() as i64
    });

    UserMetrics {
        total_users: profiles.len() as i64,
        new_users: profiles.iter().filter(|p| window.contains(p.created_at)).count() as i64,
        customers_with_orders,
    }
}

/// Active products at or below `threshold`, emptiest first.
pub fn inventory_alerts(products: &[Product], threshold: i64) -> Vec<InventoryAlert> {
    let mut alerts: Vec<InventoryAlert> = products
        .iter()
        .filter(|p| p.is_active && p.stock_count <= threshold)
        .map(|p| InventoryAlert {
            product_id: p.id.clone(),
            name: p.name.clone(),
            stock_count: p.stock_count,
            out_of_stock: p.stock_count <= 0,
        })
        .collect();
    alerts.sort_by(|a, b| a.stock_count.cmp(&b.stock_count).then_with(|| a.name.cmp(&b.name)));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_commerce::checkout::{Address, OrderStatus, PaymentMethod, PaymentStatus};
    use mobi_commerce::ids::UserId;

    fn order(id: &str, fils: i64, status: OrderStatus, customer: Option<&str>) -> Order {
        Order {
            id: OrderId::new(id),
            order_number: format!("ORD-{}", id),
            customer_id: customer.map(UserId::new),
            email: "x@example.com".to_string(),
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
            created_at: 0,
            updated_at: 0,
        }
    }

    fn item(order: &str, product: &str, quantity: i64, fils: i64) -> (OrderId, OrderItem) {
        (
            OrderId::new(order),
            OrderItem::new(
                ProductId::new(product),
                product.to_uppercase(),
                quantity,
                Money::kwd(fils),
            ),
        )
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        assert_eq!(percent_change(10.0, 0.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_cancelled_and_refunded_excluded_from_revenue() {
        let current = vec![
            order("1", 100_000, OrderStatus::Delivered, None),
            order("2", 50_000, OrderStatus::Cancelled, None),
            order("3", 30_000, OrderStatus::Refunded, None),
            order("4", 20_000, OrderStatus::Pending, None),
        ];
        let previous = vec![order("0", 60_000, OrderStatus::Delivered, None)];

        let summary = sales_summary(&current, &previous, Currency::KWD).unwrap();
        assert_eq!(summary.revenue, Money::kwd(120_000));
        assert_eq!(summary.order_count, 4);
        assert_eq!(summary.average_order_value, Money::kwd(60_000));
        assert_eq!(summary.revenue_change_pct, 100.0);
        assert_eq!(summary.orders_change_pct, 300.0);
    }

    #[test]
    fn test_empty_windows() {
        let summary = sales_summary(&[], &[], Currency::KWD).unwrap();
        assert!(summary.revenue.is_zero());
        assert!(summary.average_order_value.is_zero());
        assert_eq!(summary.revenue_change_pct, 0.0);
    }

    #[test]
    fn test_top_products_rank_by_revenue_then_units() {
        let orders = vec![
            order("1", 0, OrderStatus::Delivered, None),
            order("2", 0, OrderStatus::Processing, None),
            order("3", 0, OrderStatus::Cancelled, None),
        ];
        let items = vec![
            item("1", "a", 1, 300_000),
            item("1", "b", 3, 100_000),
            item("2", "c", 1, 300_000),
            item("2", "a", 1, 300_000),
            item("3", "d", 10, 500_000),
        ];

        let top = top_products(&orders, &items, 5);
        let ids: Vec<_> = top.iter().map(|t| t.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(top[0].units_sold, 2);
        assert_eq!(top[0].revenue, Money::kwd(600_000));

        assert_eq!(top_products(&orders, &items, 1).len(), 1);
    }

    #[test]
    fn test_user_metrics() {
        let mut old = AuthUser::new(UserId::new("u1"), "a@x.kw", mobi_auth::Role::Customer);
        old.created_at = 10;
        let mut fresh = AuthUser::new(UserId::new("u2"), "b@x.kw", mobi_auth::Role::Customer);
        fresh.created_at = 150;
        let orders = vec![
            order("1", 1, OrderStatus::Pending, Some("u1")),
            order("2", 1, OrderStatus::Pending, Some("u1")),
            order("3", 1, OrderStatus::Pending, None),
        ];

        let window = Window { start: 100, end: 200 };
        let metrics = user_metrics(&[old.clone(), fresh.clone()], Some(&orders), window);
        assert_eq!(metrics.total_users, 2);
        assert_eq!(metrics.new_users, 1);
        assert_eq!(metrics.customers_with_orders, Some(1));

        let metrics = user_metrics(&[old, fresh], None, window);
        assert_eq!(metrics.customers_with_orders, None);
    }

    #[test]
    fn test_inventory_alerts() {
        let mut inactive = Product::new("Retired", "Acme", "misc", Money::kwd(1)).with_id("x");
        inactive.is_active = false;
        let products = vec![
            Product::new("Low", "Acme", "misc", Money::kwd(1)).with_id("low").with_stock(3),
            Product::new("Plenty", "Acme", "misc", Money::kwd(1)).with_id("ok").with_stock(40),
            Product::new("Gone", "Acme", "misc", Money::kwd(1)).with_id("gone").with_stock(0),
            Product::new("Edge", "Acme", "misc", Money::kwd(1)).with_id("edge").with_stock(5),
            inactive,
        ];

        let alerts = inventory_alerts(&products, 5);
        let ids: Vec<_> = alerts.iter().map(|a| a.product_id.as_str()).collect();
        assert_eq!(ids, vec!["gone", "low", "edge"]);
        assert!(alerts[0].out_of_stock);
        assert!(!alerts[1].out_of_stock);
    }
}
