//! Integration tests for users, sessions and e-mail verification codes.
//!
//! Each test gets a fresh database from `DATABASE_URL` with the migrations applied.

mod common;

use chrono::{Duration, Utc};
use common::create_user;
use sqlx::PgPool;
use tiendas_core::roles::Role;
use tiendas_core::verification::hash_code;
use tiendas_db::models::session::CreateSession;
use tiendas_db::repositories::{SessionRepo, UserRepo, VerificationRepo};

#[sqlx::test(migrations = "./migrations")]
async fn email_lookup_is_case_insensitive(pool: PgPool) {
    let user = create_user(&pool, "Ana@Example.COM", Role::Cliente).await;
    assert_eq!(user.email, "ana@example.com");

    let found = UserRepo::find_by_email(&pool, "ANA@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn consuming_a_code_verifies_the_user(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com", Role::Cliente).await;
    let expires = Utc::now() + Duration::minutes(15);
    VerificationRepo::create(&pool, user.id, &hash_code("111111"), expires)
        .await
        .unwrap();
    VerificationRepo::create(&pool, user.id, &hash_code("222222"), expires)
        .await
        .unwrap();

    assert!(!VerificationRepo::consume(&pool, user.id, &hash_code("999999")).await.unwrap());
    assert!(VerificationRepo::consume(&pool, user.id, &hash_code("222222")).await.unwrap());

    // The older code was invalidated along with the one used.
    assert!(!VerificationRepo::consume(&pool, user.id, &hash_code("111111")).await.unwrap());

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(user.email_verified);
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_code_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com", Role::Cliente).await;
    let expired = Utc::now() - Duration::minutes(1);
    VerificationRepo::create(&pool, user.id, &hash_code("123456"), expired)
        .await
        .unwrap();

    assert!(!VerificationRepo::consume(&pool, user.id, &hash_code("123456")).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn refresh_token_can_be_redeemed_once(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com", Role::Cliente).await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: Some("test-agent".to_string()),
        },
    )
    .await
    .unwrap();

    let active = SessionRepo::list_active_for_user(&pool, user.id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].user_agent.as_deref(), Some("test-agent"));

    assert_eq!(SessionRepo::redeem(&pool, "abc").await.unwrap(), Some(user.id));
    assert_eq!(SessionRepo::redeem(&pool, "abc").await.unwrap(), None);
    assert!(SessionRepo::list_active_for_user(&pool, user.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_refresh_token_is_not_redeemed(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com", Role::Cliente).await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "old".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
            user_agent: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(SessionRepo::redeem(&pool, "old").await.unwrap(), None);
    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn fifth_failed_login_locks_the_account(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com", Role::Cliente).await;
    let until = Utc::now() + Duration::minutes(15);

    for _ in 0..4 {
        let locked = UserRepo::record_failed_login(&pool, user.id, 5, until).await.unwrap();
        assert!(locked.is_none());
    }
    let locked = UserRepo::record_failed_login(&pool, user.id, 5, until).await.unwrap();
    assert!(locked.is_some());

    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(row.failed_login_count, 5);
    assert!(row.locked_until.is_some());

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(row.failed_login_count, 0);
    assert!(row.locked_until.is_none());
}
