//! Orders Manager
//!
//! Owns the order state machine. Every mutation persists first, then
//! emits on the message bus; emission is fire-and-forget and a lost
//! event is never an error.

use std::sync::Arc;

use chrono::Utc;
use surrealdb::RecordId;

use super::lifecycle;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::message::MessageBus;
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

pub struct OrdersManager {
    repo: OrderRepository,
    bus: Arc<MessageBus>,
}

impl OrdersManager {
    pub fn new(repo: OrderRepository, bus: Arc<MessageBus>) -> Self {
        Self { repo, bus }
    }

    /// Create a new order owned by `user`
    ///
    /// The order starts in `Processing`, unpaid and undelivered, with a
    /// fresh "ORD-" code. Item snapshots and the price breakdown are
    /// taken as given; totals are not recomputed here.
    pub async fn create_order(&self, user: RecordId, data: OrderCreate) -> AppResult<Order> {
        if data.order_items.is_empty() {
            return Err(AppError::validation("No order items"));
        }
        if data.order_items.iter().any(|item| item.qty < 1) {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
        validate_required_text(&data.shipping_address.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&data.shipping_address.city, "city", MAX_ADDRESS_LEN)?;
        if data.items_price < 0
            || data.tax_price < 0
            || data.shipping_price < 0
            || data.total_price < 0
        {
            return Err(AppError::validation("Prices must not be negative"));
        }

        let now = Utc::now();
        let order = Order {
            id: None,
            order_code: Order::generate_code(),
            user,
            order_items: data.order_items,
            shipping_address: data.shipping_address,
            payment_method: data.payment_method,
            items_price: data.items_price,
            tax_price: data.tax_price,
            shipping_price: data.shipping_price,
            total_price: data.total_price,
            order_status: OrderStatus::Processing,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(order).await?;
        self.bus
            .publish(crate::message::BusMessage::order_created(&created));
        self.bus
            .publish(crate::message::BusMessage::order_updated(&created));
        Ok(created)
    }

    /// Set an order's status (admin operation)
    ///
    /// Permissive by design, except that terminal orders are frozen.
    /// Moving to `Delivered` also stamps the delivery fields.
    pub async fn set_status(&self, order_id: &str, new_status: OrderStatus) -> AppResult<Order> {
        let order = self.require(order_id).await?;

        if !lifecycle::allowed_next_statuses(order.order_status).contains(&new_status) {
            return Err(AppError::invalid_state(format!(
                "Cannot change status of a {} order",
                order.order_status
            )));
        }

        let mut order = order;
        order.order_status = new_status;
        if new_status == OrderStatus::Delivered {
            order.is_delivered = true;
            order.delivered_at = Some(Utc::now());
        }
        order.updated_at = Utc::now();

        let updated = self.repo.update(order_id, order).await?;
        self.bus
            .publish(crate::message::BusMessage::order_updated(&updated));
        Ok(updated)
    }

    /// Cancel an order on behalf of its owner
    pub async fn cancel(&self, order_id: &str, requester: &RecordId) -> AppResult<Order> {
        let order = self.require(order_id).await?;
        ensure_owner(&order, requester)?;

        if !lifecycle::can_cancel(order.order_status) {
            return Err(AppError::invalid_state(format!(
                "Cannot cancel a {} order",
                order.order_status
            )));
        }

        self.finish_transition(order_id, order, OrderStatus::Cancelled)
            .await
    }

    /// Return a delivered order on behalf of its owner
    pub async fn return_order(&self, order_id: &str, requester: &RecordId) -> AppResult<Order> {
        let order = self.require(order_id).await?;
        ensure_owner(&order, requester)?;

        if !lifecycle::can_return(order.order_status) {
            return Err(AppError::invalid_state(
                "Only delivered orders can be returned",
            ));
        }

        self.finish_transition(order_id, order, OrderStatus::Returned)
            .await
    }

    /// One user's orders, newest first
    pub async fn list_for_user(&self, user: &RecordId) -> AppResult<Vec<Order>> {
        Ok(self.repo.find_by_user(user).await?)
    }

    /// Every order, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_by_id(&self, order_id: &str) -> AppResult<Order> {
        self.require(order_id).await
    }

    async fn require(&self, order_id: &str) -> AppResult<Order> {
        self.repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))
    }

    async fn finish_transition(
        &self,
        order_id: &str,
        mut order: Order,
        status: OrderStatus,
    ) -> AppResult<Order> {
        order.order_status = status;
        order.updated_at = Utc::now();
        let updated = self.repo.update(order_id, order).await?;
        self.bus
            .publish(crate::message::BusMessage::order_updated(&updated));
        Ok(updated)
    }
}

fn ensure_owner(order: &Order, requester: &RecordId) -> AppResult<()> {
    if &order.user != requester {
        return Err(AppError::not_authorized("Not authorized"));
    }
    Ok(())
}
