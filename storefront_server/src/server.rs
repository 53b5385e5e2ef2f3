use std::time::Duration;

use actix_web::{http::KeepAlive, middleware::Logger, web, App, HttpServer};
use actix_web::dev::Server;
use log::*;
use storefront_engine::{CartApi, CatalogApi, OrderFlowApi, SqliteDatabase, StatisticsApi};

use crate::{
    config::{ProxyOptions, ServerConfig},
    errors::ServerError,
    routes::{
        health,
        AddCartItemRoute,
        AllOrdersRoute,
        CartRoute,
        CategoriesRoute,
        ClearCartRoute,
        CreateCategoryRoute,
        CreateCodOrderRoute,
        CreateProductRoute,
        CreateVnpayPaymentRoute,
        DashboardRoute,
        DeleteProductRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        ProductByIdRoute,
        ProductsInCategoryRoute,
        ProductsRoute,
        RemoveCartItemRoute,
        RevenueRoute,
        UpdateCartItemRoute,
        UpdateOrderStatusRoute,
        UpdatePaymentStatusRoute,
        UpdateProductRoute,
        VnpayReturnRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    info!("🚀️ Server configured for {host}:{port}");
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let carts_api = CartApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let statistics_api = StatisticsApi::new(db.clone());
        let proxy_options = ProxyOptions::from_config(&config);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("spg::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(carts_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(statistics_api))
            .app_data(web::Data::new(config.vnpay.clone()))
            .app_data(web::Data::new(proxy_options))
            .service(health)
            // The category listing must register before the `{id}` catch-all.
            .service(ProductsInCategoryRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(CategoriesRoute::<SqliteDatabase>::new())
            .service(CreateCategoryRoute::<SqliteDatabase>::new())
            .service(CartRoute::<SqliteDatabase>::new())
            .service(AddCartItemRoute::<SqliteDatabase>::new())
            .service(UpdateCartItemRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(ClearCartRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(UpdatePaymentStatusRoute::<SqliteDatabase>::new())
            .service(CreateVnpayPaymentRoute::<SqliteDatabase>::new())
            .service(CreateCodOrderRoute::<SqliteDatabase>::new())
            .service(VnpayReturnRoute::<SqliteDatabase>::new())
            .service(DashboardRoute::<SqliteDatabase>::new())
            .service(RevenueRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
