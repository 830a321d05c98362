//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list_all))
        .route("/myorders", get(handler::my_orders))
        .route("/user/{id}", get(handler::list_for_user))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/cancel", put(handler::cancel))
        .route("/{id}/return", put(handler::return_order))
}
