use actix_web::{
    body::MessageBody,
    http::{header::HeaderMap, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};

/// Drive a GET through a test app and hand back everything the assertions need.
pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, HeaderMap, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri(path).to_request();
    let res = test::call_service(&service, req).await;
    let (_, res) = res.into_parts();
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().ok().expect("body was not buffered")).into_owned();
    (status, headers, body)
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, HeaderMap, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let res = test::call_service(&service, req).await;
    let (_, res) = res.into_parts();
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().ok().expect("body was not buffered")).into_owned();
    (status, headers, body)
}
