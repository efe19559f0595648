mod common;

use axum_test::TestServer;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["lifecycle"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("lifecycle").is_some());
    assert!(json["checks"].get("store").is_some());
}

#[tokio::test]
async fn test_health_reports_draining() {
    let app = common::create_test_app().await;
    let server = TestServer::new(app.router()).unwrap();

    app.lifecycle.begin_drain();
    let response = server.get("/health").await;

    response.assert_status_service_unavailable();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "draining");
    assert_eq!(json["checks"]["lifecycle"]["status"], "unavailable");
}

#[tokio::test]
async fn test_health_reports_store_counts() {
    use link_status::domain::entities::LinkStatuses;
    use link_status::domain::repositories::LinkSetRepository;

    let app = common::create_test_app().await;
    app.store.save(LinkStatuses::new()).await;
    let server = TestServer::new(app.router()).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert_eq!(json["checks"]["store"]["link_sets"], 1);
    assert_eq!(json["checks"]["store"]["next_id"], 2);
    assert_eq!(json["checks"]["lifecycle"]["phase"], "accepting");
    assert_eq!(json["checks"]["lifecycle"]["in_flight"], 0);
}

#[tokio::test]
async fn test_production_router_trims_trailing_slash() {
    use axum::ServiceExt;
    use axum::extract::Request;
    use link_status::routes::app_router;

    let app = common::create_test_app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = ServiceExt::<Request>::into_make_service(app_router(app.state.clone()));
    tokio::spawn(async move {
        axum::serve(listener, service).await.unwrap();
    });

    let response = reqwest::get(format!("http://{addr}/health/")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
}
