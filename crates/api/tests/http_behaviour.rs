//! Router-level behaviour that needs no database: routing, request ids,
//! CORS and token handling.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_offline_app, get, get_auth, FRONTEND_URL};
use tower::ServiceExt;

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_offline_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let response = get(build_offline_app(), "/api/v1/auth/me").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/plans")
        .header("Origin", FRONTEND_URL)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = build_offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        FRONTEND_URL
    );
}

#[tokio::test]
async fn cross_origin_responses_expose_request_id() {
    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header("Origin", FRONTEND_URL)
        .body(Body::empty())
        .unwrap();
    let response = build_offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(exposed.contains("x-request-id"));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = get(build_offline_app(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = get_auth(build_offline_app(), "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = build_offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
