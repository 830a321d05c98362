//! Product Model
//!
//! Reviews are embedded in their product: a review has no independent
//! lifecycle, and `rating` / `num_reviews` are derived from the embedded
//! list on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ProductId = RecordId;

/// A customer review, owned exclusively by one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Authoring user (non-owning reference)
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Author display name, snapshotted at submission time
    pub name: String,
    /// Integer 1-5
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    /// Admin user that created the product
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_brand")]
    pub brand: String,
    /// Category names, e.g. ["Rings", "Jewelry"]
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub material: String,
    /// Ring size etc.
    #[serde(default)]
    pub size: String,
    /// Free-form, e.g. "5.5g"
    #[serde(default)]
    pub weight: String,
    /// Free-form, e.g. "18k"
    #[serde(default)]
    pub carat: String,
    pub price: i64,
    pub count_in_stock: i64,
    /// Derived: mean of review ratings, 0.0 when there are none
    #[serde(default)]
    pub rating: f64,
    /// Derived: reviews.len()
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_brand() -> String {
    "S.D. Jewels".to_string()
}

impl Product {
    /// Whether the given user already reviewed this product
    pub fn has_review_by(&self, user: &RecordId) -> bool {
        self.reviews.iter().any(|r| &r.user == user)
    }

    /// Append a review and recompute the derived fields
    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.recalculate_rating();
    }

    /// Recompute `num_reviews` and `rating` from the embedded review list
    ///
    /// Plain arithmetic mean over f64 division; no rounding applied here.
    pub fn recalculate_rating(&mut self) {
        self.num_reviews = self.reviews.len() as i64;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            let sum: i64 = self.reviews.iter().map(|r| r.rating as i64).sum();
            sum as f64 / self.reviews.len() as f64
        };
    }
}

/// Create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub brand: Option<String>,
    pub category: Option<Vec<String>>,
    pub count_in_stock: Option<i64>,
    pub material: Option<String>,
    pub size: Option<String>,
    pub weight: Option<String>,
    pub carat: Option<String>,
    pub featured: Option<bool>,
}

/// Update payload - `None` fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub brand: Option<String>,
    pub category: Option<Vec<String>>,
    pub count_in_stock: Option<i64>,
    pub material: Option<String>,
    pub size: Option<String>,
    pub weight: Option<String>,
    pub carat: Option<String>,
    pub featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: None,
            user: "user:admin".parse().unwrap(),
            name: "Gold Ring".into(),
            image: String::new(),
            images: vec![],
            description: String::new(),
            brand: default_brand(),
            category: vec!["Rings".into()],
            material: String::new(),
            size: String::new(),
            weight: String::new(),
            carat: String::new(),
            price: 1500,
            count_in_stock: 5,
            rating: 0.0,
            num_reviews: 0,
            reviews: vec![],
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(user: &str, rating: i32) -> Review {
        Review {
            user: format!("user:{user}").parse().unwrap(),
            name: user.to_string(),
            rating,
            comment: "nice".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rating_is_exact_arithmetic_mean() {
        let mut p = product();
        for (user, rating) in [("a", 5), ("b", 4), ("c", 4)] {
            p.push_review(review(user, rating));
        }
        assert_eq!(p.num_reviews, 3);
        assert_eq!(p.rating, 13.0 / 3.0);
    }

    #[test]
    fn running_recompute_matches_full_recompute() {
        let ratings = [3, 5, 1, 4, 2, 5, 5];
        let mut incremental = product();
        for (i, r) in ratings.iter().enumerate() {
            incremental.push_review(review(&format!("u{i}"), *r));
        }

        let mut direct = product();
        direct.reviews = incremental.reviews.clone();
        direct.recalculate_rating();

        assert_eq!(incremental.rating, direct.rating);
        assert_eq!(incremental.num_reviews, ratings.len() as i64);
    }

    #[test]
    fn empty_reviews_yield_zero_rating() {
        let mut p = product();
        p.recalculate_rating();
        assert_eq!(p.rating, 0.0);
        assert_eq!(p.num_reviews, 0);
    }

    #[test]
    fn detects_existing_review_author() {
        let mut p = product();
        p.push_review(review("alice", 5));

        let alice: RecordId = "user:alice".parse().unwrap();
        let bob: RecordId = "user:bob".parse().unwrap();
        assert!(p.has_review_by(&alice));
        assert!(!p.has_review_by(&bob));
    }
}
