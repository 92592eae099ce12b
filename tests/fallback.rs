use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use actix_web::web::Data;
use actix_web::App;
use campaign_tracker::config::{Config, Environment};
use campaign_tracker::{configure, error_handlers, ErrorDetails};
use campaign_tracker::database::{Database, MySqlDatabase};
use serde_json::{json, Value};

/// Points at a local port nothing listens on, so every connect is refused.
fn unreachable_db(environment: Environment) -> Data<Box<dyn Database>> {
    let config = Config {
        db_host: "127.0.0.1".into(),
        db_port: 1,
        db_acquire_timeout_ms: 250,
        environment,
        ..Config::default()
    };
    let db = MySqlDatabase::connect_lazy(&config).unwrap();

    Data::new(Box::new(db) as Box<dyn Database>)
}

#[actix_web::test]
async fn unreachable_database_serves_from_memory() {
    let app = init_service(
        App::new()
            .app_data(unreachable_db(Environment::Development))
            .configure(configure),
    )
    .await;

    let req = TestRequest::post()
        .uri("/api/campaigns")
        .set_json(json!({
            "campaign_name": "Offline Launch",
            "client_name": "Initech",
            "start_date": "2024-05-20",
        }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["data"]["id"], json!(1));
    assert_eq!(body["data"]["status"], json!("active"));

    let req = TestRequest::get().uri("/api/campaigns").to_request();
    let body: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["campaign_name"], json!("Offline Launch"));

    let req = TestRequest::put()
        .uri("/api/campaigns/1/status")
        .set_json(json!({ "status": "paused" }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["data"]["status"], json!("paused"));

    let req = TestRequest::delete().uri("/api/campaigns/1").to_request();
    assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::delete().uri("/api/campaigns/1").to_request();
    assert_eq!(call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri("/api/campaigns").to_request();
    let body: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(body["data"], json!([]));

    let req = TestRequest::get().uri("/health").to_request();
    let body: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(body["data"]["database"], json!("in-memory"));
}

#[actix_web::test]
async fn unreachable_database_in_production_is_an_error() {
    let app = init_service(
        App::new()
            .app_data(unreachable_db(Environment::Production))
            .app_data(ErrorDetails(false))
            .wrap(error_handlers())
            .configure(configure),
    )
    .await;

    let req = TestRequest::get().uri("/api/campaigns").to_request();
    let resp = call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("An error occurred when communicating with the database")
    );
    assert!(body.get("error").is_none());

    let req = TestRequest::get().uri("/health").to_request();
    let body: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(body["data"]["database"], json!("unreachable"));
}

#[actix_web::test]
async fn internal_errors_carry_details_when_enabled() {
    let app = init_service(
        App::new()
            .app_data(unreachable_db(Environment::Production))
            .app_data(ErrorDetails(true))
            .wrap(error_handlers())
            .configure(configure),
    )
    .await;

    let req = TestRequest::delete().uri("/api/campaigns/3").to_request();
    let resp = call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("An error occurred when communicating with the database")
    );
    assert!(body["error"].is_string());

    // client errors are left as they are
    let req = TestRequest::put()
        .uri("/api/campaigns/3/status")
        .set_json(json!({ "status": "archived" }))
        .to_request();
    let resp = call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert!(body.get("error").is_none());
}
