//! Order Model
//!
//! Item snapshots freeze name/image/price at purchase time and are never
//! re-read from the live product. `total_price` is fixed at creation;
//! status transitions never recompute it.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type OrderId = RecordId;

/// Order lifecycle states
///
/// `Processing` is the initial state. `Delivered`, `Cancelled` and
/// `Returned` are terminal under a corrected transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Accepted,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        };
        f.write_str(s)
    }
}

/// Snapshot of a purchased product line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub qty: i64,
    #[serde(default)]
    pub image: String,
    /// Unit price at purchase time
    pub price: i64,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    /// Human-readable order code, "ORD-" + 6 digits
    pub order_code: String,
    /// Owning user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: i64,
    pub tax_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
    pub order_status: OrderStatus,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Generate a human-readable order code: "ORD-" + 6 random digits
    ///
    /// Not guaranteed unique; the storage id is the real identity and the
    /// code exists for support conversations only.
    pub fn generate_code() -> String {
        let n: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
        format!("ORD-{n}")
    }
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: i64,
    pub tax_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_code_format() {
        for _ in 0..50 {
            let code = Order::generate_code();
            assert!(code.starts_with("ORD-"));
            let digits = &code[4..];
            assert_eq!(digits.len(), 6);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn status_serializes_as_plain_name() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
        let back: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(back, OrderStatus::Delivered);
    }
}
