//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will
//! cause the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation
//! (e.g. I/O, database operations, etc.) should be expressed as futures or asynchronous functions, which is why
//! every handler here immediately awaits the engine APIs.
use std::collections::HashMap;

use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use storefront_engine::{
    db_types::{NewCategory, NewProduct, OrderReference, PaymentMethod},
    CartApi,
    CartManagement,
    CatalogApi,
    CatalogManagement,
    OrderFlowApi,
    StatisticsApi,
    StatisticsQueries,
    StorefrontApiError,
    StorefrontDatabase,
    TimeRange,
    UpdateProduct,
};
use vnpay::{build_payment_url, CallbackParams, PaymentRequest, VnPayConfig};

use crate::{
    config::ProxyOptions,
    data_objects::{
        AddCartItemRequest,
        CheckoutRequest,
        CodCheckoutRequest,
        JsonResponse,
        OrderCreatedResponse,
        PaymentUrlResponse,
        RevenueQuery,
        UpdateOrderStatusRequest,
        UpdatePaymentStatusRequest,
        UpdateQuantityRequest,
    },
    errors::ServerError,
    helpers::get_remote_ip,
};

// Actix-web cannot handle generics in handlers, so registration is implemented manually via the `route!` macro.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  -----------------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Catalog  ----------------------------------------------------------
route!(products => Get "/api/products" impl CatalogManagement);
pub async fn products<B>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + 'static {
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/api/products/{id}" impl CatalogManagement);
pub async fn product_by_id<B>(path: web::Path<i64>, api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + 'static {
    let product = api.product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(products_in_category => Get "/api/products/category/{category_id}" impl CatalogManagement);
pub async fn products_in_category<B>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + 'static,
{
    let products = api.products_in_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(create_product => Post "/api/products" impl CatalogManagement);
pub async fn create_product<B>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + 'static,
{
    let product = api.create_product(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Put "/api/products/{id}" impl CatalogManagement);
pub async fn update_product<B>(
    path: web::Path<i64>,
    body: web::Json<UpdateProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + 'static,
{
    let product = api.update_product(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/api/products/{id}" impl CatalogManagement);
pub async fn delete_product<B>(path: web::Path<i64>, api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + 'static {
    api.delete_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product deleted")))
}

route!(categories => Get "/api/categories" impl CatalogManagement);
pub async fn categories<B>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + 'static {
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(create_category => Post "/api/categories" impl CatalogManagement);
pub async fn create_category<B>(
    body: web::Json<NewCategory>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + 'static,
{
    let category = api.create_category(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

// ----------------------------------------------    Carts  -----------------------------------------------------------
route!(cart => Get "/api/users/{user_id}/cart" impl CartManagement);
pub async fn cart<B>(path: web::Path<String>, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CartManagement + 'static {
    let cart = api.cart(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cart.items))
}

route!(add_cart_item => Post "/api/users/{user_id}/cart" impl CartManagement);
pub async fn add_cart_item<B>(
    path: web::Path<String>,
    body: web::Json<AddCartItemRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CartManagement + 'static,
{
    let user_id = path.into_inner();
    let cart = api.add_item(&user_id, body.product_id, body.quantity).await?;
    Ok(HttpResponse::Ok().json(cart.items))
}

route!(update_cart_item => Put "/api/users/{user_id}/cart/{product_id}" impl CartManagement);
pub async fn update_cart_item<B>(
    path: web::Path<(String, i64)>,
    body: web::Json<UpdateQuantityRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CartManagement + 'static,
{
    let (user_id, product_id) = path.into_inner();
    let cart = api.set_quantity(&user_id, product_id, body.quantity).await?;
    Ok(HttpResponse::Ok().json(cart.items))
}

route!(remove_cart_item => Delete "/api/users/{user_id}/cart/{product_id}" impl CartManagement);
pub async fn remove_cart_item<B>(
    path: web::Path<(String, i64)>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CartManagement + 'static,
{
    let (user_id, product_id) = path.into_inner();
    let cart = api.remove_item(&user_id, product_id).await?;
    Ok(HttpResponse::Ok().json(cart.items))
}

route!(clear_cart => Delete "/api/users/{user_id}/cart" impl CartManagement);
pub async fn clear_cart<B>(path: web::Path<String>, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CartManagement + 'static {
    api.clear(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Cart cleared successfully")))
}

// ----------------------------------------------   Orders  -----------------------------------------------------------
route!(my_orders => Get "/api/users/{user_id}/orders" impl StorefrontDatabase);
pub async fn my_orders<B>(path: web::Path<String>, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: StorefrontDatabase + 'static {
    let orders = api.orders_for_user(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/api/orders" impl StorefrontDatabase);
pub async fn all_orders<B>(api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: StorefrontDatabase + 'static {
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/api/orders/{id}" impl StorefrontDatabase);
pub async fn order_by_id<B>(path: web::Path<i64>, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: StorefrontDatabase + 'static {
    let order = api.order_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Put "/api/orders/{id}/status" impl StorefrontDatabase);
pub async fn update_order_status<B>(
    path: web::Path<i64>,
    body: web::Json<UpdateOrderStatusRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + 'static,
{
    let order = api.set_order_status(path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_payment_status => Put "/api/orders/{id}/payment-status" impl StorefrontDatabase);
pub async fn update_payment_status<B>(
    path: web::Path<i64>,
    body: web::Json<UpdatePaymentStatusRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + 'static,
{
    let order = api.order_by_id(path.into_inner()).await?;
    let order = api.set_payment_status(&order.reference, body.status, body.transaction_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(order))
}

// ----------------------------------------------  Payments  ----------------------------------------------------------
route!(create_vnpay_payment => Post "/api/users/{user_id}/payments/vnpay" impl StorefrontDatabase);
/// Freeze the user's cart into an order and hand back the signed redirect URL for the gateway. The cart is left
/// intact; it is only cleared once the gateway confirms payment via the return callback.
pub async fn create_vnpay_payment<B>(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<VnPayConfig>,
    options: web::Data<ProxyOptions>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + 'static,
{
    let user_id = path.into_inner();
    let CheckoutRequest { amount, customer_info, order_description } = body.into_inner();
    let order = api.checkout(&user_id, customer_info, PaymentMethod::VnPay, amount).await?;
    let client_ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded)
        .unwrap_or_else(|| "127.0.0.1".parse().expect("loopback is a valid IP"));
    let request = PaymentRequest {
        reference: order.reference.as_str().to_string(),
        amount: order.total,
        order_info: order_description.unwrap_or_else(|| format!("Payment for order {}", order.reference.as_str())),
        client_ip,
        created_at: Utc::now(),
    };
    let payment_url =
        build_payment_url(&request, &config).map_err(|e| ServerError::PaymentUrlError(e.to_string()))?;
    info!("💻️ Created payment URL for order {}", order.reference);
    Ok(HttpResponse::Ok().json(PaymentUrlResponse { payment_url }))
}

route!(create_cod_order => Post "/api/users/{user_id}/payments/cod" impl StorefrontDatabase);
pub async fn create_cod_order<B>(
    path: web::Path<String>,
    body: web::Json<CodCheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + 'static,
{
    let user_id = path.into_inner();
    let order = api.checkout(&user_id, body.into_inner().customer_info, PaymentMethod::Cod, None).await?;
    Ok(HttpResponse::Created().json(OrderCreatedResponse { id: order.id, reference: order.reference, total: order.total }))
}

route!(vnpay_return => Get "/payments/vnpay/return" impl StorefrontDatabase);
/// The gateway's return leg. The browser lands here after payment; nothing in the query string is trusted until
/// the signature verifies.
///
/// Outcomes are communicated to the storefront UI purely through the redirect target. An inauthentic callback is
/// a potential tampering signal and is logged as such, distinctly from the benign "order not found" case, but
/// neither case leaks anything beyond "payment not confirmed".
pub async fn vnpay_return<B>(
    query: web::Query<HashMap<String, String>>,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<VnPayConfig>,
) -> HttpResponse
where
    B: StorefrontDatabase + 'static,
{
    let params = CallbackParams::from(query.into_inner());
    if !params.is_authentic(config.hash_secret.reveal().as_bytes()) {
        warn!("🚨️ Payment callback failed signature verification. Possible tampering; ignoring the callback.");
        return redirect_to("/payment-return?status=failed&reason=invalid_checksum");
    }
    let reference = match params.txn_ref() {
        Ok(reference) => OrderReference::from(reference.to_string()),
        Err(e) => {
            warn!("💻️ Authentic payment callback without an order reference. {e}");
            return redirect_to("/payment-return?status=failed&reason=order_error");
        },
    };
    if params.is_success() {
        match api.confirm_gateway_payment(&reference, params.transaction_no()).await {
            Ok(order) => {
                redirect_to(&format!("/payment-return?status=success&reference={}", order.reference.as_str()))
            },
            Err(StorefrontApiError::OrderNotFound(_)) => {
                info!("💻️ Authentic payment callback for unknown order {reference}. Ignoring.");
                redirect_to("/payment-return?status=failed&reason=order_error")
            },
            Err(e) => {
                error!("💻️ Could not reconcile payment for order {reference}. {e}");
                redirect_to("/payment-return?status=failed&reason=server_error")
            },
        }
    } else {
        let code = params.response_code().to_string();
        match api.fail_gateway_payment(&reference, params.transaction_no()).await {
            Ok(_) => redirect_to(&format!("/payment-return?status=failed&code={code}")),
            Err(StorefrontApiError::OrderNotFound(_)) => {
                info!("💻️ Authentic failure callback for unknown order {reference}. Ignoring.");
                redirect_to("/payment-return?status=failed&reason=order_error")
            },
            Err(e) => {
                error!("💻️ Could not record failed payment for order {reference}. {e}");
                redirect_to("/payment-return?status=failed&reason=server_error")
            },
        }
    }
}

fn redirect_to(target: &str) -> HttpResponse {
    HttpResponse::Found().insert_header((header::LOCATION, target.to_string())).finish()
}

// ----------------------------------------------    Stats  -----------------------------------------------------------
route!(dashboard => Get "/api/admin/dashboard" impl StatisticsQueries);
pub async fn dashboard<B>(api: web::Data<StatisticsApi<B>>) -> Result<HttpResponse, ServerError>
where B: StatisticsQueries + 'static {
    let summary = api.dashboard_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(revenue => Get "/api/admin/revenue" impl StatisticsQueries);
pub async fn revenue<B>(
    query: web::Query<RevenueQuery>,
    api: web::Data<StatisticsApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StatisticsQueries + 'static,
{
    let range = match query.into_inner().range {
        Some(s) => s
            .parse::<TimeRange>()
            .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?,
        None => TimeRange::Week,
    };
    let report = api.revenue_for(range).await?;
    Ok(HttpResponse::Ok().json(report))
}
