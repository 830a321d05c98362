//! Featured view computation
//!
//! Derived analytics over the full catalog and order history:
//! best sellers ranked by units sold across all orders, and a
//! recommended shelf ranked by review rating. Recomputed on every
//! request; nothing is cached or persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::models::{Order, Product};

const SHELF_SIZE: usize = 8;

/// A product annotated with its lifetime units sold
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    #[serde(flatten)]
    pub product: Product,
    pub sold_qty: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedView {
    pub best_sellers: Vec<BestSeller>,
    pub recommended: Vec<Product>,
    pub last_updated: DateTime<Utc>,
}

/// Compute the featured view from the catalog and the full order history
///
/// Best sellers: every order item counts toward its product's sold
/// quantity, regardless of order status. Ties keep catalog order (the
/// sort is stable), so an all-zero history yields the catalog as-is.
///
/// Recommended: products that have at least one review, ranked by
/// rating, review count breaking ties.
pub fn compute_featured_view(products: &[Product], orders: &[Order]) -> FeaturedView {
    let mut sold: HashMap<String, i64> = HashMap::new();
    for order in orders {
        for item in &order.order_items {
            *sold.entry(item.product.to_string()).or_insert(0) += item.qty;
        }
    }

    let mut best_sellers: Vec<BestSeller> = products
        .iter()
        .map(|p| {
            let qty = p
                .id
                .as_ref()
                .and_then(|id| sold.get(&id.to_string()))
                .copied()
                .unwrap_or(0);
            BestSeller {
                product: p.clone(),
                sold_qty: qty,
            }
        })
        .collect();
    best_sellers.sort_by(|a, b| b.sold_qty.cmp(&a.sold_qty));
    best_sellers.truncate(SHELF_SIZE);

    let mut recommended: Vec<Product> = products
        .iter()
        .filter(|p| p.num_reviews > 0)
        .cloned()
        .collect();
    recommended.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then(b.num_reviews.cmp(&a.num_reviews))
    });
    recommended.truncate(SHELF_SIZE);

    FeaturedView {
        best_sellers,
        recommended,
        last_updated: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderItem, OrderStatus, ShippingAddress};
    use surrealdb::RecordId;

    fn product(key: &str, rating: f64, num_reviews: i64) -> Product {
        Product {
            id: Some(RecordId::from_table_key("product", key)),
            user: "user:admin".parse().unwrap(),
            name: format!("Product {key}"),
            image: String::new(),
            images: vec![],
            description: String::new(),
            brand: "S.D. Jewels".into(),
            category: vec![],
            material: String::new(),
            size: String::new(),
            weight: String::new(),
            carat: String::new(),
            price: 100,
            count_in_stock: 10,
            rating,
            num_reviews,
            reviews: vec![],
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn order(lines: &[(&str, i64)]) -> Order {
        Order {
            id: None,
            order_code: Order::generate_code(),
            user: "user:buyer".parse().unwrap(),
            order_items: lines
                .iter()
                .map(|(key, qty)| OrderItem {
                    name: format!("Product {key}"),
                    qty: *qty,
                    image: String::new(),
                    price: 100,
                    product: RecordId::from_table_key("product", *key),
                })
                .collect(),
            shipping_address: ShippingAddress {
                address: "1 Main St".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "US".into(),
                phone: String::new(),
            },
            payment_method: "PayPal".into(),
            items_price: 100,
            tax_price: 0,
            shipping_price: 0,
            total_price: 100,
            order_status: OrderStatus::Processing,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_keeps_catalog_order_with_zero_sold() {
        let products = vec![product("a", 0.0, 0), product("b", 0.0, 0), product("c", 0.0, 0)];
        let view = compute_featured_view(&products, &[]);

        assert_eq!(view.best_sellers.len(), 3);
        for (bs, p) in view.best_sellers.iter().zip(&products) {
            assert_eq!(bs.sold_qty, 0);
            assert_eq!(bs.product.name, p.name);
        }
        assert!(view.recommended.is_empty());
    }

    #[test]
    fn sold_quantities_sum_across_orders() {
        let products = vec![product("a", 0.0, 0), product("b", 0.0, 0)];
        let orders = vec![order(&[("a", 2), ("b", 1)]), order(&[("a", 3)])];
        let view = compute_featured_view(&products, &orders);

        assert_eq!(view.best_sellers[0].product.name, "Product a");
        assert_eq!(view.best_sellers[0].sold_qty, 5);
        assert_eq!(view.best_sellers[1].sold_qty, 1);
    }

    #[test]
    fn shelves_are_capped_at_eight() {
        let products: Vec<Product> = (0..12)
            .map(|i| product(&format!("p{i}"), 4.0, 1))
            .collect();
        let view = compute_featured_view(&products, &[]);
        assert_eq!(view.best_sellers.len(), 8);
        assert_eq!(view.recommended.len(), 8);
    }

    #[test]
    fn recommended_excludes_unreviewed_and_ranks_by_rating() {
        let products = vec![
            product("low", 2.0, 4),
            product("none", 0.0, 0),
            product("high", 4.5, 2),
            product("tied", 4.5, 9),
        ];
        let view = compute_featured_view(&products, &[]);

        let names: Vec<&str> = view.recommended.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Product tied", "Product high", "Product low"]
        );
    }
}
