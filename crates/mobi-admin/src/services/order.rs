//! Order management.

use crate::error::AdminError;
use mobi_auth::{require, AuthUser, PermAction, Permission, Resource};
use mobi_commerce::checkout::{Order, OrderItem, OrderStatus, PaymentStatus};
use mobi_commerce::current_timestamp;
use mobi_commerce::ids::OrderId;
use mobi_data::{Backend, BackendExt, Table, TableQuery};
use serde_json::{json, Value};

const fn perm(action: PermAction) -> Permission {
    Permission::new(Resource::Orders, action)
}

/// Order handling for staff, plus order placement for customers.
pub struct OrderService<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> OrderService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Orders, newest first, optionally narrowed to one status.
    ///
    /// Line items are not loaded; use [`OrderService::get`] for those.
    pub async fn list(
        &self,
        actor: &AuthUser,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, AdminError> {
        require(Some(actor), perm(PermAction::Read))?;

        let mut query = TableQuery::new(Table::Orders).order_desc("created_at");
        if let Some(status) = status {
            query = query.eq("status", status.as_str());
        }
        if limit > 0 {
            query = query.limit(limit);
        }
        Ok(self.backend.select_as(&query.offset(offset.max(0))).await?)
    }

    /// One order with its line items.
    pub async fn get(&self, actor: &AuthUser, id: &OrderId) -> Result<Order, AdminError> {
        require(Some(actor), perm(PermAction::Read))?;

        let mut order: Order = self
            .backend
            .select_one(&by_id(id))
            .await?
            .ok_or_else(|| AdminError::not_found("order", id.as_str()))?;

        let items_query = TableQuery::new(Table::OrderItems).eq("order_id", id.as_str());
        order.items = self.backend.select_as::<OrderItem>(&items_query).await?;
        Ok(order)
    }

    /// Store a checked-out order and its line items.
    ///
    /// If any line item cannot be stored, the order header and the items
    /// already written are removed before the error is returned.
    pub async fn place(&self, actor: &AuthUser, order: &Order) -> Result<Order, AdminError> {
        require(Some(actor), perm(PermAction::Create))?;

        let mut row = serde_json::to_value(order)?;
        if let Some(object) = row.as_object_mut() {
            object.remove("items");
        }
        let stored = self.backend.insert(Table::Orders, row).await?;
        let mut placed: Order = serde_json::from_value(stored)?;

        match self.insert_items(&placed.id, &order.items).await {
            Ok(items) => placed.items = items,
            Err(e) => {
                tracing::warn!(
                    order = %placed.id,
                    error = %e,
                    "line items not stored, rolling back"
                );
                self.discard(&placed.id).await;
                return Err(e);
            }
        }

        tracing::info!(
            order = %placed.id,
            order_number = %placed.order_number,
            total = %placed.total,
            "order placed"
        );
        Ok(placed)
    }

    async fn insert_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<Vec<OrderItem>, AdminError> {
        let mut stored_items = Vec::with_capacity(items.len());
        for item in items {
            let mut row = serde_json::to_value(item)?;
            if let Some(object) = row.as_object_mut() {
                object.insert("order_id".to_string(), json!(order_id.as_str()));
            }
            let stored = self.backend.insert(Table::OrderItems, row).await?;
            stored_items.push(serde_json::from_value(stored)?);
        }
        Ok(stored_items)
    }

    /// Best-effort removal of a partially placed order.
    async fn discard(&self, id: &OrderId) {
        let items = TableQuery::new(Table::OrderItems).eq("order_id", id.as_str());
        if let Err(e) = self.backend.delete(&items).await {
            tracing::warn!(order = %id, error = %e, "failed to remove partial line items");
        }
        if let Err(e) = self.backend.delete(&by_id(id)).await {
            tracing::warn!(order = %id, error = %e, "failed to remove partial order");
        }
    }

    /// Set the order status. Any status may follow any other; unusual
    /// moves are logged.
    pub async fn set_status(
        &self,
        actor: &AuthUser,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        require(Some(actor), perm(PermAction::Update))?;

        let current: Order = self
            .backend
            .select_one(&by_id(id))
            .await?
            .ok_or_else(|| AdminError::not_found("order", id.as_str()))?;

        if !current.status.is_conventional_transition(status) {
            tracing::warn!(
                order = %id,
                from = current.status.as_str(),
                to = status.as_str(),
                "unconventional order status change"
            );
        }

        let updated = self
            .write(id, json!({ "status": status, "updated_at": current_timestamp() }))
            .await?;
        tracing::info!(
            order = %id,
            from = current.status.as_str(),
            to = status.as_str(),
            actor = %actor.id,
            "order status changed"
        );
        Ok(updated)
    }

    pub async fn set_payment_status(
        &self,
        actor: &AuthUser,
        id: &OrderId,
        status: PaymentStatus,
    ) -> Result<Order, AdminError> {
        require(Some(actor), perm(PermAction::Update))?;
        let updated = self
            .write(
                id,
                json!({ "payment_status": status, "updated_at": current_timestamp() }),
            )
            .await?;
        tracing::info!(
            order = %id,
            payment_status = status.as_str(),
            actor = %actor.id,
            "payment status changed"
        );
        Ok(updated)
    }

    async fn write(&self, id: &OrderId, patch: Value) -> Result<Order, AdminError> {
        self.backend
            .update_as::<Order>(&by_id(id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::not_found("order", id.as_str()))
    }
}

fn by_id(id: &OrderId) -> TableQuery {
    TableQuery::new(Table::Orders).eq("id", id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_auth::Role;
    use mobi_commerce::checkout::{build_order, Address, CheckoutConfig, CheckoutRequest};
    use mobi_commerce::prelude::*;
    use mobi_data::MemoryBackend;

    fn user(id: &str, role: Role) -> AuthUser {
        AuthUser::new(UserId::new(id), format!("{}@mobistore.kw", id), role)
    }

    fn order(created_at: i64) -> Order {
        let phone = Product::new("Galaxy S24", "Samsung", "smartphones", Money::kwd(250_000))
            .with_id("p1")
            .with_stock(10);
        let mut cart = Cart::new();
        cart.add_item(phone, 2);
        let request = CheckoutRequest::new(
            "buyer@example.com",
            Address::new("Buyer", "99999999", "Salmiya", "10", "5", "12"),
        );
        let mut order = build_order(&cart, &request, &CheckoutConfig::default()).unwrap();
        order.created_at = created_at;
        order
    }

    async fn seeded() -> (MemoryBackend, Vec<Order>) {
        let backend = MemoryBackend::new();
        let customer = user("c1", Role::Customer);
        let mut placed = Vec::new();
        for ts in [100, 300, 200] {
            let order = OrderService::new(&backend)
                .place(&customer, &order(ts))
                .await
                .unwrap();
            placed.push(order);
        }
        (backend, placed)
    }

    #[tokio::test]
    async fn test_place_stores_items_separately() {
        let (backend, placed) = seeded().await;
        assert_eq!(backend.rows(Table::Orders).len(), 3);
        assert_eq!(backend.rows(Table::OrderItems).len(), 3);
        assert!(backend.rows(Table::Orders)[0].get("items").is_none());

        let fetched = OrderService::new(&backend)
            .get(&user("s", Role::Viewer), &placed[0].id)
            .await
            .unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_failed_items_roll_back_order() {
        let backend = MemoryBackend::new().fail_table(Table::OrderItems);
        let err = OrderService::new(&backend)
            .place(&user("c1", Role::Customer), &order(100))
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Fetch(_)));
        assert!(backend.rows(Table::Orders).is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_status_filter() {
        let (backend, placed) = seeded().await;
        let service = OrderService::new(&backend);
        let admin = user("a", Role::Admin);

        let all = service.list(&admin, None, 0, 0).await.unwrap();
        let stamps: Vec<i64> = all.iter().map(|o| o.created_at).collect();
        assert_eq!(stamps, vec![300, 200, 100]);

        service
            .set_status(&admin, &placed[0].id, OrderStatus::Shipped)
            .await
            .unwrap();
        let shipped = service
            .list(&admin, Some(OrderStatus::Shipped), 10, 0)
            .await
            .unwrap();
        assert_eq!(shipped.len(), 1);
        assert_eq!(shipped[0].id, placed[0].id);
    }

    #[tokio::test]
    async fn test_status_changes_are_unconstrained() {
        let (backend, placed) = seeded().await;
        let service = OrderService::new(&backend);
        let manager = user("m", Role::Manager);

        let order = service
            .set_status(&manager, &placed[1].id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);

        let order = service
            .set_status(&manager, &placed[1].id, OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let order = service
            .set_payment_status(&manager, &placed[1].id, PaymentStatus::Paid)
            .await
            .unwrap();
        assert!(order.is_paid());
    }

    #[tokio::test]
    async fn test_customers_cannot_manage_orders() {
        let (backend, placed) = seeded().await;
        let service = OrderService::new(&backend);
        let err = service
            .set_status(&user("c1", Role::Customer), &placed[0].id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(err.is_permission_error());
    }

    #[tokio::test]
    async fn test_missing_order() {
        let backend = MemoryBackend::new();
        let err = OrderService::new(&backend)
            .set_status(&user("a", Role::Admin), &OrderId::new("nope"), OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotFound { .. }));
    }
}
