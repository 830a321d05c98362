//! Order lifecycle integration tests
//!
//! Runs against an in-memory database through the same manager the
//! HTTP handlers use.

use shop_server::db::models::{
    Order, OrderCreate, OrderItem, OrderStatus, ShippingAddress, User,
};
use shop_server::utils::AppError;
use shop_server::{Config, ServerState};
use surrealdb::RecordId;

async fn test_state() -> ServerState {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    ServerState::initialize_memory(&config)
        .await
        .expect("state should initialize")
}

async fn create_user(state: &ServerState, name: &str) -> RecordId {
    let hash = User::hash_password("password123").unwrap();
    let user = state
        .users()
        .create(User::new(
            name.to_string(),
            format!("{name}@example.com"),
            hash,
        ))
        .await
        .expect("user should be created");
    user.id.expect("created user has an id")
}

fn order_payload() -> OrderCreate {
    OrderCreate {
        order_items: vec![OrderItem {
            name: "Gold Ring".into(),
            qty: 2,
            image: String::new(),
            price: 100,
            product: RecordId::from_table_key("product", "ring"),
        }],
        shipping_address: ShippingAddress {
            address: "1 Main St".into(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            country: "US".into(),
            phone: String::new(),
        },
        payment_method: "PayPal".into(),
        items_price: 200,
        tax_price: 0,
        shipping_price: 0,
        total_price: 200,
    }
}

async fn place_order(state: &ServerState, owner: &RecordId) -> Order {
    state
        .orders()
        .create_order(owner.clone(), order_payload())
        .await
        .expect("order should be created")
}

fn order_id(order: &Order) -> String {
    order.id.as_ref().unwrap().to_string()
}

#[tokio::test]
async fn new_order_starts_processing_and_unpaid() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    let order = place_order(&state, &owner).await;

    assert_eq!(order.order_status, OrderStatus::Processing);
    assert!(!order.is_paid);
    assert!(!order.is_delivered);
    assert!(order.delivered_at.is_none());
    assert_eq!(order.total_price, 200);
    assert!(order.order_code.starts_with("ORD-"));
}

#[tokio::test]
async fn create_order_rejects_empty_items() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    let mut payload = order_payload();
    payload.order_items.clear();

    let err = state.orders().create_order(owner, payload).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn create_order_rejects_zero_quantity() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    let mut payload = order_payload();
    payload.order_items[0].qty = 0;

    let err = state.orders().create_order(owner, payload).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn delivering_stamps_delivery_fields() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;
    let order = place_order(&state, &owner).await;

    let delivered = state
        .orders()
        .set_status(&order_id(&order), OrderStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(delivered.order_status, OrderStatus::Delivered);
    assert!(delivered.is_delivered);
    assert!(delivered.delivered_at.is_some());
}

#[tokio::test]
async fn delivery_stamp_survives_later_status_changes() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;
    let order = place_order(&state, &owner).await;
    let id = order_id(&order);

    let delivered = state
        .orders()
        .set_status(&id, OrderStatus::Delivered)
        .await
        .unwrap();
    let stamped_at = delivered.delivered_at;
    assert!(stamped_at.is_some());

    // Moving the order back does not clear the delivery stamp
    let reverted = state
        .orders()
        .set_status(&id, OrderStatus::Accepted)
        .await
        .unwrap();

    assert_eq!(reverted.order_status, OrderStatus::Accepted);
    assert!(reverted.is_delivered);
    assert_eq!(reverted.delivered_at, stamped_at);
}

#[tokio::test]
async fn owner_can_cancel_before_shipment() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    for intermediate in [None, Some(OrderStatus::Accepted)] {
        let order = place_order(&state, &owner).await;
        let id = order_id(&order);

        if let Some(status) = intermediate {
            state.orders().set_status(&id, status).await.unwrap();
        }

        let cancelled = state.orders().cancel(&id, &owner).await.unwrap();
        assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    }
}

#[tokio::test]
async fn cancel_fails_after_shipment() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    for status in [OrderStatus::Shipped, OrderStatus::Delivered] {
        let order = place_order(&state, &owner).await;
        let id = order_id(&order);
        state.orders().set_status(&id, status).await.unwrap();

        let err = state.orders().cancel(&id, &owner).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
}

#[tokio::test]
async fn only_owner_may_cancel_or_return() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;
    let stranger = create_user(&state, "bob").await;

    let order = place_order(&state, &owner).await;
    let id = order_id(&order);

    let err = state.orders().cancel(&id, &stranger).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    state
        .orders()
        .set_status(&id, OrderStatus::Delivered)
        .await
        .unwrap();

    let err = state.orders().return_order(&id, &stranger).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
}

#[tokio::test]
async fn return_requires_delivered_status() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    let order = place_order(&state, &owner).await;
    let id = order_id(&order);

    let err = state.orders().return_order(&id, &owner).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    state
        .orders()
        .set_status(&id, OrderStatus::Delivered)
        .await
        .unwrap();

    let returned = state.orders().return_order(&id, &owner).await.unwrap();
    assert_eq!(returned.order_status, OrderStatus::Returned);
}

#[tokio::test]
async fn terminal_orders_reject_status_changes() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;

    let order = place_order(&state, &owner).await;
    let id = order_id(&order);
    state.orders().cancel(&id, &owner).await.unwrap();

    let err = state
        .orders()
        .set_status(&id, OrderStatus::Processing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn set_status_unknown_order_is_not_found() {
    let state = test_state().await;

    let err = state
        .orders()
        .set_status("order:missing", OrderStatus::Accepted)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn user_listing_is_newest_first_and_scoped() {
    let state = test_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;

    let first = place_order(&state, &alice).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = place_order(&state, &alice).await;
    place_order(&state, &bob).await;

    let orders = state.orders().list_for_user(&alice).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(order_id(&orders[0]), order_id(&second));
    assert_eq!(order_id(&orders[1]), order_id(&first));

    let all = state.orders().list_all().await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn order_events_reach_bus_subscribers() {
    let state = test_state().await;
    let owner = create_user(&state, "alice").await;
    let mut rx = state.bus.subscribe();

    place_order(&state, &owner).await;

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.event, shop_server::EventType::OrderCreated);
    assert_eq!(second.event, shop_server::EventType::OrderUpdated);
    assert!(first.payload.is_some());
}
