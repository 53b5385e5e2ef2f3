//! Return-leg behaviour: signature gating, success and failure reconciliation, and the distinct unknown-order
//! outcome. Everything runs against a mocked backend; what is being tested is the handler's decision-making.
use std::collections::HashMap;

use actix_web::{
    http::{header, StatusCode},
    web,
    web::ServiceConfig,
};
use chrono::{TimeZone, Utc};
use spg_common::{Secret, Vnd};
use storefront_engine::{
    db_types::{Cart, CustomerInfo, Order, OrderReference, OrderStatus, PaymentMethod, PaymentStatus},
    OrderFlowApi,
    StorefrontApiError,
};
use vnpay::{
    signature::{canonicalize, sign, SECURE_HASH_FIELD},
    VnPayConfig,
};

use super::{helpers::get_request, mocks::MockBackend};
use crate::routes::VnpayReturnRoute;

const TEST_SECRET: &[u8] = b"endpoint-test-secret";
const REFERENCE: &str = "1A2B3C4D5E6F";

fn test_vnpay_config() -> VnPayConfig {
    VnPayConfig {
        tmn_code: "DEMO01".to_string(),
        hash_secret: Secret::new("endpoint-test-secret".to_string()),
        base_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
        return_url: "http://localhost:8360/payments/vnpay/return".to_string(),
    }
}

fn sample_order(payment_status: PaymentStatus, order_status: OrderStatus) -> Order {
    Order {
        id: 1,
        reference: OrderReference(REFERENCE.to_string()),
        user_id: "alice".to_string(),
        items: vec![],
        total: Vnd::from(250_000),
        customer_info: CustomerInfo {
            name: "Nguyễn Văn An".to_string(),
            email: "an@example.com".to_string(),
            phone: "0901234567".to_string(),
            address: "1 Lê Lợi, Quận 1".to_string(),
        },
        payment_method: PaymentMethod::VnPay,
        payment_status,
        order_status,
        transaction_id: Some("14422574".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 0).unwrap(),
    }
}

fn empty_cart() -> Cart {
    Cart {
        id: 1,
        user_id: "alice".to_string(),
        items: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 0).unwrap(),
    }
}

/// A callback parameter set signed with the test secret, rendered as a query string. All values are URL-safe so
/// no additional escaping is needed.
fn signed_callback_query(response_code: &str) -> String {
    let mut params: HashMap<String, String> = [
        ("vnp_TxnRef", REFERENCE),
        ("vnp_ResponseCode", response_code),
        ("vnp_TransactionNo", "14422574"),
        ("vnp_Amount", "25000000"),
        ("vnp_BankCode", "NCB"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let signature = sign(&canonicalize(&params, &[]), TEST_SECRET);
    params.insert(SECURE_HASH_FIELD.to_string(), signature);
    params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
}

#[actix_web::test]
async fn authentic_success_callback_confirms_and_redirects() {
    let _ = env_logger::try_init().ok();
    let path = format!("/payments/vnpay/return?{}", signed_callback_query("00"));
    let (status, headers, _) = get_request(&path, configure_success).await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/payment-return?status=success&reference=1A2B3C4D5E6F");
}

#[actix_web::test]
async fn tampered_callback_is_ignored_and_touches_nothing() {
    let _ = env_logger::try_init().ok();
    let mut query = signed_callback_query("00");
    // Bump the reported amount after signing.
    query = query.replace("vnp_Amount=25000000", "vnp_Amount=1");
    let path = format!("/payments/vnpay/return?{query}");
    let (status, headers, _) = get_request(&path, configure_untouched).await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/payment-return?status=failed&reason=invalid_checksum");
}

#[actix_web::test]
async fn missing_signature_is_ignored_and_touches_nothing() {
    let _ = env_logger::try_init().ok();
    let path = format!("/payments/vnpay/return?vnp_TxnRef={REFERENCE}&vnp_ResponseCode=00");
    let (status, headers, _) = get_request(&path, configure_untouched).await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/payment-return?status=failed&reason=invalid_checksum");
}

#[actix_web::test]
async fn authentic_failure_callback_fails_the_payment_only() {
    let _ = env_logger::try_init().ok();
    let path = format!("/payments/vnpay/return?{}", signed_callback_query("24"));
    let (status, headers, _) = get_request(&path, configure_failure).await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/payment-return?status=failed&code=24");
}

#[actix_web::test]
async fn unknown_order_is_reported_distinctly_from_a_bad_signature() {
    let _ = env_logger::try_init().ok();
    let path = format!("/payments/vnpay/return?{}", signed_callback_query("00"));
    let (status, headers, _) = get_request(&path, configure_unknown_order).await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/payment-return?status=failed&reason=order_error");
}

fn configure_success(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_update_payment_status()
        .withf(|reference, status, transaction_id| {
            reference.as_str() == REFERENCE
                && *status == PaymentStatus::Completed
                && *transaction_id == Some("14422574")
        })
        .times(1)
        .returning(|_, _, _| Ok(sample_order(PaymentStatus::Completed, OrderStatus::Processing)));
    db.expect_clear_cart().withf(|user_id| user_id == "alice").times(1).returning(|_| Ok(empty_cart()));
    register(cfg, db);
}

/// The backend must not be touched at all: no status write, no cart clear.
fn configure_untouched(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_update_payment_status().never();
    db.expect_clear_cart().never();
    register(cfg, db);
}

fn configure_failure(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_update_payment_status()
        .withf(|reference, status, _| reference.as_str() == REFERENCE && *status == PaymentStatus::Failed)
        .times(1)
        .returning(|_, _, _| Ok(sample_order(PaymentStatus::Failed, OrderStatus::Pending)));
    // A declined payment never clears the customer's cart.
    db.expect_clear_cart().never();
    register(cfg, db);
}

fn configure_unknown_order(cfg: &mut ServiceConfig) {
    let mut db = MockBackend::new();
    db.expect_update_payment_status()
        .times(1)
        .returning(|reference, _, _| Err(StorefrontApiError::OrderNotFound(reference.clone())));
    db.expect_clear_cart().never();
    register(cfg, db);
}

fn register(cfg: &mut ServiceConfig, db: MockBackend) {
    cfg.service(VnpayReturnRoute::<MockBackend>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(test_vnpay_config()));
}
