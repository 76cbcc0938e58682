//! Role, tenant and navigation-gate checks. Every request here is decided
//! before the database is touched.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_offline_app, get_auth, post_json, post_json_auth, put_json_auth, send,
    token_for,
};
use serde_json::json;
use tiendas_core::roles::Role;

// ---------------------------------------------------------------------------
// Navigation gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/access/check",
        json!({ "path": "/admin/productos" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["decision"], "redirect_to");
    assert_eq!(json["redirect_to"], "/login?returnUrl=%2Fadmin%2Fproductos");
}

#[tokio::test]
async fn public_path_is_allowed_without_session() {
    let response = post_json(
        build_offline_app(),
        "/api/v1/access/check",
        json!({ "path": "/tienda/la-esquina" }),
    )
    .await;
    assert_eq!(body_json(response).await, json!({ "decision": "allow" }));
}

#[tokio::test]
async fn merchant_without_store_is_sent_to_onboarding() {
    let token = token_for(10, Role::Admin, None, true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/access/check",
        json!({ "path": "/admin/productos" }),
        &token,
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["redirect_to"], "/onboarding");
}

#[tokio::test]
async fn merchant_with_store_is_allowed() {
    let token = token_for(10, Role::Admin, Some(3), true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/access/check",
        json!({ "path": "/admin/productos" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["decision"], "allow");
}

#[tokio::test]
async fn customer_is_sent_home_from_operator_area() {
    let token = token_for(11, Role::Cliente, None, true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/access/check",
        json!({ "path": "/superadmin/tiendas" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["redirect_to"], "/");
}

#[tokio::test]
async fn explicit_requirement_overrides_route_table() {
    let token = token_for(12, Role::Deposito, None, true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/access/check",
        json!({
            "path": "/cualquier-cosa",
            "requirement": { "roles": ["Deposito"], "require_store": true }
        }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["redirect_to"], "/");
}

// ---------------------------------------------------------------------------
// Role checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_operator_lists_stores() {
    let token = token_for(11, Role::Cliente, None, true);
    let response = get_auth(build_offline_app(), "/api/v1/stores", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn merchant_cannot_create_plans() {
    let token = token_for(10, Role::Admin, Some(3), true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/plans",
        json!({ "name": "Gratis", "max_products": 10, "monthly_price": "0" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn warehouse_cannot_manage_catalog() {
    let token = token_for(12, Role::Deposito, Some(3), true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/stores/3/products",
        json!({ "name": "Yerba", "price": "10.00", "stock": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_cannot_view_user_list() {
    let token = token_for(11, Role::Cliente, None, true);
    let response = get_auth(build_offline_app(), "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn operator_cannot_demote_themselves() {
    let token = token_for(1, Role::SuperAdmin, None, true);
    let response = put_json_auth(
        build_offline_app(),
        "/api/v1/admin/users/1",
        json!({ "role": "Cliente" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn operator_cannot_deactivate_themselves_through_update() {
    let token = token_for(1, Role::SuperAdmin, None, true);
    let response = put_json_auth(
        build_offline_app(),
        "/api/v1/admin/users/1",
        json!({ "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "You cannot deactivate your own account"
    );
}

#[tokio::test]
async fn operator_cannot_delete_themselves() {
    let token = token_for(1, Role::SuperAdmin, None, true);
    let response = send(
        build_offline_app(),
        Method::DELETE,
        "/api/v1/admin/users/1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Tenant isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn merchant_cannot_read_another_stores_catalog() {
    let token = token_for(10, Role::Admin, Some(1), true);
    let response = get_auth(build_offline_app(), "/api/v1/stores/2/products", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "You do not have access to this store");
}

#[tokio::test]
async fn warehouse_cannot_read_another_stores_orders() {
    let token = token_for(12, Role::Deposito, Some(1), true);
    let response = get_auth(build_offline_app(), "/api/v1/stores/5/orders", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn merchant_cannot_switch_another_stores_plan() {
    let token = token_for(10, Role::Admin, Some(1), true);
    let response = put_json_auth(
        build_offline_app(),
        "/api/v1/stores/2/plan",
        json!({ "plan_id": 1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Input validation ahead of persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_price_is_rejected() {
    let token = token_for(10, Role::Admin, Some(3), true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/stores/3/products",
        json!({ "name": "Yerba", "price": "-1.00", "stock": 5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn negative_shipping_cost_is_rejected() {
    let token = token_for(10, Role::Admin, Some(3), true);
    let response = put_json_auth(
        build_offline_app(),
        "/api/v1/stores/3",
        json!({ "shipping_cost": "-5" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unverified_customer_cannot_check_out() {
    let token = token_for(11, Role::Cliente, None, false);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/orders",
        json!({
            "store_id": 3,
            "shipping": { "name": "Ana", "address": "Calle 1", "city": "Rosario", "zip": "2000" }
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn checkout_requires_every_shipping_field() {
    let token = token_for(11, Role::Cliente, None, true);
    let response = post_json_auth(
        build_offline_app(),
        "/api/v1/orders",
        json!({
            "store_id": 3,
            "shipping": { "name": "Ana", "address": "", "city": "Rosario", "zip": "2000" }
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Shipping address must not be empty"
    );
}

#[tokio::test]
async fn unknown_order_status_filter_is_rejected() {
    let token = token_for(11, Role::Cliente, None, true);
    let response = get_auth(build_offline_app(), "/api/v1/orders?status=Perdido", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
