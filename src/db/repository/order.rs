//! Order Repository
//!
//! Listings are sorted newest-first in Rust rather than in the query;
//! timestamps are stored as serialized chrono values and compared here.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Order;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.base.db().select(TABLE).await?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Find one user's orders, newest first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user")
            .bind(("user", user.to_string()))
            .await?;
        let mut orders: Vec<Order> = result.take(0)?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<Order> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Overwrite an existing order document
    pub async fn update(&self, id: &str, mut order: Order) -> RepoResult<Order> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        order.id = None;
        let updated: Option<Order> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .content(order)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
