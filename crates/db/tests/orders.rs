//! Integration tests for cart, checkout, order transitions and payment
//! notifications.
//!
//! Each test gets a fresh database from `DATABASE_URL` with the migrations applied.

mod common;

use assert_matches::assert_matches;
use common::{create_product, create_user, deactivate_product, dec, open_store};
use sqlx::PgPool;
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::status::OrderStatus;
use tiendas_db::models::order::ShippingDetails;
use tiendas_db::repositories::{
    CartRepo, NotificationOutcome, OrderFilter, OrderRepo, PaymentRepo, ProductRepo,
};
use tiendas_db::RepoError;

fn shipping() -> ShippingDetails {
    ShippingDetails {
        name: "Ana Gómez".to_string(),
        address: "Av. Siempre Viva 742".to_string(),
        city: "Rosario".to_string(),
        zip: "2000".to_string(),
    }
}

async fn stock_of(pool: &PgPool, product_id: i64) -> i32 {
    ProductRepo::find_by_id(pool, product_id)
        .await
        .unwrap()
        .unwrap()
        .stock
}

#[sqlx::test(migrations = "./migrations")]
async fn adding_the_same_product_merges_lines(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;

    CartRepo::add_item(&pool, buyer.id, yerba.id, 2).await.unwrap();
    let line = CartRepo::add_item(&pool, buyer.id, yerba.id, 3).await.unwrap();
    assert_eq!(line.quantity, 5);
    assert_eq!(line.subtotal, dec("17.50"));

    let lines = CartRepo::list_for_user(&pool, buyer.id, store.id).await.unwrap();
    assert_eq!(lines.len(), 1);

    let over = CartRepo::add_item(&pool, buyer.id, yerba.id, 6).await;
    assert_matches!(over, Err(RepoError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn non_positive_add_leaves_the_line_alone(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 5).await.unwrap();

    let negative = CartRepo::add_item(&pool, buyer.id, yerba.id, -3).await;
    assert_matches!(negative, Err(RepoError::Core(CoreError::Validation(_))));
    let zero = CartRepo::add_item(&pool, buyer.id, yerba.id, 0).await;
    assert_matches!(zero, Err(RepoError::Core(CoreError::Validation(_))));

    let lines = CartRepo::list_for_user(&pool, buyer.id, store.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn deactivated_product_stays_listed_until_removed(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    let mate = create_product(&pool, store.id, "Mate", "12.00", 4).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 2).await.unwrap();
    CartRepo::add_item(&pool, buyer.id, mate.id, 1).await.unwrap();
    deactivate_product(&pool, store.id, mate.id).await;

    let lines = CartRepo::list_for_user(&pool, buyer.id, store.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    let stale = lines.iter().find(|l| l.product_id == mate.id).unwrap();
    assert!(!stale.is_available);
    assert!(lines.iter().any(|l| l.product_id == yerba.id && l.is_available));

    let blocked = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping()).await;
    assert_matches!(
        blocked,
        Err(RepoError::Core(CoreError::Conflict(msg))) if msg.contains("Mate")
    );

    assert!(CartRepo::remove_item(&pool, buyer.id, stale.id).await.unwrap());
    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.order.subtotal, dec("7.00"));
}

#[sqlx::test(migrations = "./migrations")]
async fn checkout_creates_order_and_reserves_stock(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    let mate = create_product(&pool, store.id, "Mate", "12.00", 4).await;

    CartRepo::add_item(&pool, buyer.id, yerba.id, 2).await.unwrap();
    CartRepo::add_item(&pool, buyer.id, mate.id, 1).await.unwrap();

    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();
    assert_eq!(placed.order.status().unwrap(), OrderStatus::Pending);
    assert_eq!(placed.order.item_count, 3);
    assert_eq!(placed.order.subtotal, dec("19.00"));
    assert_eq!(placed.order.total, dec("24.00"));
    assert_eq!(placed.items.len(), 2);

    assert_eq!(stock_of(&pool, yerba.id).await, 8);
    assert_eq!(stock_of(&pool, mate.id).await, 3);
    assert!(CartRepo::list_for_user(&pool, buyer.id, store.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_cart_cannot_check_out(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;

    let result = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping()).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn cancelling_restores_stock(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 4).await.unwrap();
    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, yerba.id).await, 6);

    let order = OrderRepo::transition(&pool, placed.order.id, Role::Cliente, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(order.status().unwrap(), OrderStatus::Cancelled);
    assert_eq!(stock_of(&pool, yerba.id).await, 10);

    let again = OrderRepo::transition(&pool, order.id, Role::Admin, OrderStatus::Processing).await;
    assert_matches!(again, Err(RepoError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn warehouse_cannot_cancel(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 1).await.unwrap();
    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();

    let result =
        OrderRepo::transition(&pool, placed.order.id, Role::Deposito, OrderStatus::Cancelled).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Forbidden(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn approved_notification_marks_order_paid_once(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 1).await.unwrap();
    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();

    let first =
        PaymentRepo::record_notification(&pool, "evt-1", placed.order.id, "approved", Some("pay-99"))
            .await
            .unwrap();
    assert_eq!(first, NotificationOutcome::Applied);

    let replay =
        PaymentRepo::record_notification(&pool, "evt-1", placed.order.id, "approved", Some("pay-99"))
            .await
            .unwrap();
    assert_eq!(replay, NotificationOutcome::Duplicate);

    let order = OrderRepo::find_by_id(&pool, placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status().unwrap(), OrderStatus::Paid);
    assert_eq!(order.payment_reference.as_deref(), Some("pay-99"));
}

#[sqlx::test(migrations = "./migrations")]
async fn rejected_notification_is_only_recorded(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;
    CartRepo::add_item(&pool, buyer.id, yerba.id, 1).await.unwrap();
    let placed = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
        .await
        .unwrap();

    let outcome =
        PaymentRepo::record_notification(&pool, "evt-2", placed.order.id, "rejected", None)
            .await
            .unwrap();
    assert_eq!(outcome, NotificationOutcome::Recorded);
    let order = OrderRepo::find_by_id(&pool, placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status().unwrap(), OrderStatus::Pending);
}

#[sqlx::test(migrations = "./migrations")]
async fn store_orders_filter_by_status_in_pages(pool: PgPool) {
    let store = open_store(&pool, "esquina", 10).await;
    let buyer = create_user(&pool, "buyer@test.test", Role::Cliente).await;
    let yerba = create_product(&pool, store.id, "Yerba", "3.50", 10).await;

    let mut placed = Vec::new();
    for _ in 0..3 {
        CartRepo::add_item(&pool, buyer.id, yerba.id, 1).await.unwrap();
        let order = OrderRepo::checkout(&pool, buyer.id, store.id, &shipping())
            .await
            .unwrap();
        placed.push(order.order.id);
    }
    OrderRepo::transition(&pool, placed[0], Role::Cliente, OrderStatus::Cancelled)
        .await
        .unwrap();

    let pending = OrderFilter {
        status: Some(OrderStatus::Pending),
        limit: 50,
        offset: 0,
    };
    let orders = OrderRepo::list_by_store(&pool, store.id, &pending).await.unwrap();
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![placed[2], placed[1]]);

    let cancelled = OrderFilter {
        status: Some(OrderStatus::Cancelled),
        ..pending.clone()
    };
    let orders = OrderRepo::list_by_store(&pool, store.id, &cancelled).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, placed[0]);

    let first_page = OrderFilter {
        status: None,
        limit: 2,
        offset: 0,
    };
    let page = OrderRepo::list_by_store(&pool, store.id, &first_page).await.unwrap();
    assert_eq!(page.len(), 2);
    let rest = OrderFilter {
        offset: 2,
        ..first_page
    };
    let page = OrderRepo::list_by_store(&pool, store.id, &rest).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, placed[0]);
}
