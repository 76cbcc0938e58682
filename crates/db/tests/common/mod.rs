//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use tiendas_core::roles::Role;
use tiendas_core::status::StoreStatus;
use tiendas_core::store::StatusActor;
use tiendas_db::models::plan::CreatePlan;
use tiendas_db::models::product::{CreateProduct, Product, UpdateProduct};
use tiendas_db::models::store::{CreateStore, Store};
use tiendas_db::models::user::{CreateUser, User};
use tiendas_db::repositories::{PlanRepo, ProductRepo, StoreRepo, UserRepo};

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub async fn create_user(pool: &PgPool, email: &str, role: Role) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: role.id(),
            store_id: None,
        },
    )
    .await
    .unwrap()
}

pub async fn create_plan(pool: &PgPool, name: &str, max_products: i32) -> i64 {
    PlanRepo::create(
        pool,
        &CreatePlan {
            name: name.to_string(),
            description: None,
            max_products,
            monthly_price: dec("1.00"),
        },
    )
    .await
    .unwrap()
    .id
}

/// An active store with a plan allowing `max_products`, owned by a fresh admin.
pub async fn open_store(pool: &PgPool, subdomain: &str, max_products: i32) -> Store {
    let owner = create_user(pool, &format!("owner@{subdomain}.test"), Role::Admin).await;
    let store = StoreRepo::create_for_owner(
        pool,
        owner.id,
        &CreateStore {
            name: format!("Store {subdomain}"),
            subdomain: subdomain.to_string(),
            description: None,
            shipping_cost: Some(dec("5.00")),
        },
    )
    .await
    .unwrap();
    let plan_id = create_plan(pool, &format!("Plan {subdomain}"), max_products).await;
    StoreRepo::change_plan(pool, store.id, plan_id).await.unwrap();
    StoreRepo::transition_status(pool, store.id, StoreStatus::Active, StatusActor::Owner)
        .await
        .unwrap()
}

pub fn new_product(name: &str, price: &str, stock: i32) -> CreateProduct {
    CreateProduct {
        category_id: None,
        name: name.to_string(),
        description: None,
        price: dec(price),
        stock,
        image_url: None,
    }
}

pub async fn create_product(pool: &PgPool, store_id: i64, name: &str, price: &str, stock: i32) -> Product {
    ProductRepo::create(pool, store_id, &new_product(name, price, stock))
        .await
        .unwrap()
}

pub async fn deactivate_product(pool: &PgPool, store_id: i64, product_id: i64) {
    let input = UpdateProduct {
        category_id: None,
        name: None,
        description: None,
        price: None,
        stock: None,
        image_url: None,
        is_active: Some(false),
    };
    ProductRepo::update(pool, store_id, product_id, &input)
        .await
        .unwrap()
        .unwrap();
}
