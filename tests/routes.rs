use axum::routing::{get, post};
use axum::Router;
use axum_test::TestServer;
use helpy::routes::flows::Login;
use helpy::routes::{index_get, not_found};
use helpy::util::extract::Form;
use serde_json::{json, Value};

fn test_app() -> Router {
    Router::new()
        .route("/", get(index_get))
        .route("/login-echo", post(login_echo))
        .fallback(not_found)
}

async fn login_echo(Form(login): Form<Login>) -> String {
    login.email
}

#[tokio::test]
async fn index_reports_service_info() {
    let server = TestServer::new(test_app()).unwrap();

    let response = server.get("/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], "helpy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let server = TestServer::new(test_app()).unwrap();

    let response = server.get("/api/does-not-exist").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn form_routes_accept_urlencoded_bodies() {
    let server = TestServer::new(test_app()).unwrap();

    let response = server
        .post("/login-echo")
        .form(&[("email", "user@example.com"), ("password", "hunter2hunter2")])
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "user@example.com");
}

#[tokio::test]
async fn malformed_forms_surface_the_shared_error_shape() {
    let server = TestServer::new(test_app()).unwrap();

    // wrong content type lands in the extractor rejection funnel
    let response = server
        .post("/login-echo")
        .json(&json!({ "email": "user@example.com" }))
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_input");
}
