//! Catalog Aggregation Engine
//!
//! Review-driven rating maintenance lives on the product model; this
//! module owns the cross-collection analytics.

pub mod featured;

pub use featured::{BestSeller, FeaturedView, compute_featured_view};
