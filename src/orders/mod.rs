//! Order Lifecycle Engine
//!
//! State machine over orders: creation, status progression,
//! cancellation and return, with ownership checks.

pub mod lifecycle;
pub mod manager;

pub use manager::OrdersManager;
