//! Authentication plumbing tests over real actix routing.
//!
//! Handlers here are stand-ins that echo the verified identity, so the
//! tests exercise header parsing, token validation, and extension
//! propagation without a database.

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use uuid::Uuid;

use blog_api::middleware::{AuthenticatedUser, JwtAuthMiddleware};
use blog_api::security::jwt;

const TEST_SECRET: &str = "integration-test-secret";

fn init_keys() {
    jwt::initialize_keys(TEST_SECRET).unwrap();
}

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "user_id": user.0 }))
}

async fn public_ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "pong": true }))
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn extractor_rejects_missing_token() {
    init_keys();
    let app = test::init_service(
        App::new().route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn extractor_rejects_malformed_header() {
    init_keys();
    let app = test::init_service(
        App::new().route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", "Token abc123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn extractor_rejects_expired_token() {
    init_keys();
    let token = jwt::generate_token(Uuid::new_v4(), "a@example.com", "alice", -3600).unwrap();

    let app = test::init_service(
        App::new().route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn extractor_accepts_valid_token() {
    init_keys();
    let user_id = Uuid::new_v4();
    let token = jwt::generate_token(user_id, "a@example.com", "alice", 3600).unwrap();

    let app = test::init_service(
        App::new().route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], user_id.to_string());
}

#[actix_web::test]
async fn middleware_guards_whole_scope() {
    init_keys();
    let user_id = Uuid::new_v4();
    let token = jwt::generate_token(user_id, "a@example.com", "alice", 3600).unwrap();

    let app = test::init_service(
        App::new().service(
            web::scope("/protected")
                .wrap(JwtAuthMiddleware)
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    // No token: the middleware blocks before the handler runs
    let req = test::TestRequest::get().uri("/protected/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Valid token: identity flows through extensions to the extractor
    let req = test::TestRequest::get()
        .uri("/protected/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], user_id.to_string());
}

#[actix_web::test]
async fn public_routes_skip_authentication() {
    init_keys();
    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .route("/ping", web::get().to(public_ping))
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    // Public route works without credentials even next to a protected one
    let req = test::TestRequest::get().uri("/api/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
