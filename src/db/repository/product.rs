//! Product Repository
//!
//! Reviews live inside their product document, so adding one is a
//! read-modify-write of a single record and the derived rating fields
//! are recomputed before the write.

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Product, ProductCreate, ProductUpdate, Review};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, optionally filtered by a case-insensitive
    /// name keyword
    pub async fn find_all(&self, keyword: Option<&str>) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = match keyword {
            Some(kw) if !kw.trim().is_empty() => {
                self.base
                    .db()
                    .query("SELECT * FROM product WHERE string::lowercase(name) CONTAINS string::lowercase($kw)")
                    .bind(("kw", kw.trim().to_string()))
                    .await?
                    .take(0)?
            }
            _ => self.base.db().select(TABLE).await?,
        };
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, user: RecordId, data: ProductCreate) -> RepoResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: None,
            user,
            name: data.name,
            image: data.image.unwrap_or_default(),
            images: data.images.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            brand: data.brand.unwrap_or_else(|| "S.D. Jewels".to_string()),
            category: data.category.unwrap_or_default(),
            material: data.material.unwrap_or_default(),
            size: data.size.unwrap_or_default(),
            weight: data.weight.unwrap_or_default(),
            carat: data.carat.unwrap_or_default(),
            price: data.price,
            count_in_stock: data.count_in_stock.unwrap_or(0),
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
            featured: data.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; `None` fields are left untouched
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(v) = data.name {
            product.name = v;
        }
        if let Some(v) = data.price {
            product.price = v;
        }
        if let Some(v) = data.description {
            product.description = v;
        }
        if let Some(v) = data.image {
            product.image = v;
        }
        if let Some(v) = data.images {
            product.images = v;
        }
        if let Some(v) = data.brand {
            product.brand = v;
        }
        if let Some(v) = data.category {
            product.category = v;
        }
        if let Some(v) = data.count_in_stock {
            product.count_in_stock = v;
        }
        if let Some(v) = data.material {
            product.material = v;
        }
        if let Some(v) = data.size {
            product.size = v;
        }
        if let Some(v) = data.weight {
            product.weight = v;
        }
        if let Some(v) = data.carat {
            product.carat = v;
        }
        if let Some(v) = data.featured {
            product.featured = v;
        }
        product.updated_at = Utc::now();

        self.persist(id, product).await
    }

    /// Append a review for the given user
    ///
    /// One review per user per product; a second submission is rejected
    /// regardless of its content.
    pub async fn add_review(
        &self,
        id: &str,
        user: RecordId,
        user_name: String,
        rating: i32,
        comment: String,
    ) -> RepoResult<Product> {
        if !(1..=5).contains(&rating) {
            return Err(RepoError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let mut product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if product.has_review_by(&user) {
            return Err(RepoError::Duplicate(
                "Product already reviewed".to_string(),
            ));
        }

        product.push_review(Review {
            user,
            name: user_name,
            rating,
            comment,
            created_at: Utc::now(),
        });
        product.updated_at = Utc::now();

        self.persist(id, product).await
    }

    /// Delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);
        let result: Option<Product> = self.base.db().delete((TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    async fn persist(&self, id: &str, mut product: Product) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        product.id = None;
        let updated: Option<Product> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .content(product)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
