use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use spg_common::Vnd;
use storefront_engine::{
    db_types::{Cart, LineItem},
    CartApi,
    StorefrontApiError,
};

use super::{
    helpers::{get_request, post_request},
    mocks::MockBackend,
};
use crate::routes::{AddCartItemRoute, CartRoute};

fn cart_with_items(items: Vec<LineItem>) -> Cart {
    Cart {
        id: 1,
        user_id: "alice".to_string(),
        items,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    }
}

fn sticker_line() -> LineItem {
    LineItem {
        product_id: 7,
        name: "Sticker".to_string(),
        price: Vnd::from(100),
        quantity: 2,
        image: "sticker.jpg".to_string(),
    }
}

#[actix_web::test]
async fn fetching_a_cart_returns_its_line_items() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) = get_request("/api/users/alice/cart", configure_cart_fetch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"[{"product_id":7,"name":"Sticker","price":100,"quantity":2,"image":"sticker.jpg"}]"#);
}

#[actix_web::test]
async fn adding_an_unknown_product_is_a_404() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"product_id": 42, "quantity": 1});
    let (status, _, body) = post_request("/api/users/alice/cart", payload, configure_missing_product).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The requested product (id 42) does not exist"}"#);
}

fn configure_cart_fetch(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_fetch_or_create_cart()
        .withf(|user_id| user_id == "alice")
        .returning(|_| Ok(cart_with_items(vec![sticker_line()])));
    cfg.service(CartRoute::<MockBackend>::new()).app_data(web::Data::new(CartApi::new(db)));
}

fn configure_missing_product(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_add_cart_item()
        .withf(|user_id, product_id, quantity| user_id == "alice" && *product_id == 42 && *quantity == 1)
        .returning(|_, product_id, _| Err(StorefrontApiError::ProductNotFound(product_id)));
    cfg.service(AddCartItemRoute::<MockBackend>::new()).app_data(web::Data::new(CartApi::new(db)));
}
