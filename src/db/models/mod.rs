//! Database models
//!
//! One file per table, plus shared serde helpers for record ids.

pub mod serde_helpers;

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryId};
pub use order::{Order, OrderCreate, OrderId, OrderItem, OrderStatus, ShippingAddress};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate, Review};
pub use user::{ROLE_ADMIN, ROLE_USER, User, UserId, UserInfo, UserUpdate};
