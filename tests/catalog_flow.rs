//! Catalog integration tests: reviews and the featured view

use shop_server::catalog::compute_featured_view;
use shop_server::db::models::{
    OrderCreate, OrderItem, Product, ProductCreate, ShippingAddress, User,
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
        .unwrap();
    user.id.unwrap()
}

fn product_payload(name: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        price: 1500,
        description: None,
        image: None,
        images: None,
        brand: None,
        category: Some(vec!["Rings".into()]),
        count_in_stock: Some(5),
        material: None,
        size: None,
        weight: None,
        carat: None,
        featured: None,
    }
}

async fn create_product(state: &ServerState, admin: &RecordId, name: &str) -> Product {
    state
        .products()
        .create(admin.clone(), product_payload(name))
        .await
        .unwrap()
}

#[tokio::test]
async fn reviews_update_mean_rating() {
    let state = test_state().await;
    let admin = create_user(&state, "admin").await;
    let product = create_product(&state, &admin, "Gold Ring").await;
    let id = product.id.as_ref().unwrap().to_string();

    for (name, rating) in [("alice", 5), ("bob", 4), ("carol", 4)] {
        let user = create_user(&state, name).await;
        state
            .products()
            .add_review(&id, user, name.to_string(), rating, "nice".into())
            .await
            .unwrap();
    }

    let product = state.products().find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(product.num_reviews, 3);
    assert_eq!(product.rating, 13.0 / 3.0);
}

#[tokio::test]
async fn second_review_by_same_user_is_rejected() {
    let state = test_state().await;
    let admin = create_user(&state, "admin").await;
    let product = create_product(&state, &admin, "Gold Ring").await;
    let id = product.id.as_ref().unwrap().to_string();

    let alice = create_user(&state, "alice").await;
    state
        .products()
        .add_review(&id, alice.clone(), "alice".into(), 5, "love it".into())
        .await
        .unwrap();

    // Different rating and comment make no difference
    let err: AppError = state
        .products()
        .add_review(&id, alice, "alice".into(), 1, "changed my mind".into())
        .await
        .unwrap_err()
        .into();
    assert!(matches!(err, AppError::Duplicate(_)));

    let product = state.products().find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(product.num_reviews, 1);
    assert_eq!(product.rating, 5.0);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let state = test_state().await;
    let admin = create_user(&state, "admin").await;
    let product = create_product(&state, &admin, "Gold Ring").await;
    let id = product.id.as_ref().unwrap().to_string();
    let alice = create_user(&state, "alice").await;

    for rating in [0, 6] {
        let err: AppError = state
            .products()
            .add_review(&id, alice.clone(), "alice".into(), rating, "hm".into())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

#[tokio::test]
async fn review_on_unknown_product_is_not_found() {
    let state = test_state().await;
    let alice = create_user(&state, "alice").await;

    let err: AppError = state
        .products()
        .add_review("product:missing", alice, "alice".into(), 5, "hi".into())
        .await
        .unwrap_err()
        .into();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn keyword_filter_matches_case_insensitively() {
    let state = test_state().await;
    let admin = create_user(&state, "admin").await;
    create_product(&state, &admin, "Gold Ring").await;
    create_product(&state, &admin, "Silver Necklace").await;

    let hits = state.products().find_all(Some("gold")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Gold Ring");

    let all = state.products().find_all(None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn featured_view_aggregates_sold_quantities() {
    let state = test_state().await;
    let admin = create_user(&state, "admin").await;
    let ring = create_product(&state, &admin, "Gold Ring").await;
    let necklace = create_product(&state, &admin, "Silver Necklace").await;

    let buyer = create_user(&state, "buyer").await;
    let line = |product: &Product, qty: i64| OrderItem {
        name: product.name.clone(),
        qty,
        image: String::new(),
        price: product.price,
        product: product.id.clone().unwrap(),
    };

    for items in [
        vec![line(&ring, 2), line(&necklace, 1)],
        vec![line(&ring, 3)],
    ] {
        state
            .orders()
            .create_order(
                buyer.clone(),
                OrderCreate {
                    order_items: items,
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
                },
            )
            .await
            .unwrap();
    }

    let products = state.products().find_all(None).await.unwrap();
    let orders = state.order_repo().find_all().await.unwrap();
    let view = compute_featured_view(&products, &orders);

    assert_eq!(view.best_sellers[0].product.name, "Gold Ring");
    assert_eq!(view.best_sellers[0].sold_qty, 5);
    let necklace_entry = view
        .best_sellers
        .iter()
        .find(|b| b.product.id == necklace.id)
        .unwrap();
    assert_eq!(necklace_entry.sold_qty, 1);
}
