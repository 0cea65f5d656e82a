//! Account and user repositories against a live PostgreSQL instance

mod common;

use simplebank::account::{AccountRepository, CreateAccountParams};
use simplebank::user::UserRepository;

use common::*;

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_create_and_get_account() {
    let pool = test_pool().await;
    let owner = create_random_user(&pool).await;

    let params = CreateAccountParams {
        owner: owner.username.clone(),
        balance: 250,
        currency: "EUR".to_string(),
    };
    let account = AccountRepository::create(&pool, &params).await.unwrap();
    assert!(account.id > 0);
    assert_eq!(account.owner, owner.username);
    assert_eq!(account.balance, 250);
    assert_eq!(account.currency, "EUR");

    let fetched = AccountRepository::get(&pool, account.id).await.unwrap();
    assert_eq!(fetched, Some(account));
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_get_missing_account() {
    let pool = test_pool().await;
    assert!(AccountRepository::get(&pool, i64::MAX - 3).await.unwrap().is_none());
    assert!(
        AccountRepository::add_balance(&pool, i64::MAX - 3, 10)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_one_account_per_owner_and_currency() {
    let pool = test_pool().await;
    let owner = create_random_user(&pool).await;
    let params = CreateAccountParams {
        owner: owner.username.clone(),
        balance: 0,
        currency: "CAD".to_string(),
    };
    AccountRepository::create(&pool, &params).await.unwrap();

    let err = AccountRepository::create(&pool, &params).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_account_requires_existing_owner() {
    let pool = test_pool().await;
    let params = CreateAccountParams {
        owner: format!("ghost_{}", random_string(10)),
        balance: 0,
        currency: "USD".to_string(),
    };
    let err = AccountRepository::create(&pool, &params).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_foreign_key_violation());
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_balance_mutations() {
    let pool = test_pool().await;
    let account = create_account_with_balance(&pool, 100).await;

    let credited = AccountRepository::add_balance(&pool, account.id, 25)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credited.balance, 125);

    let debited = AccountRepository::debit(&pool, account.id, 125)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(debited.balance, 0);

    // Floor predicate rejects the overdraft without touching the row
    assert!(AccountRepository::debit(&pool, account.id, 1).await.unwrap().is_none());
    assert_eq!(balance_of(&pool, account.id).await, 0);

    let updated = AccountRepository::update_balance(&pool, account.id, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.balance, 42);
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_get_for_update_inside_transaction() {
    let pool = test_pool().await;
    let account = create_account_with_balance(&pool, 10).await;

    let mut tx = pool.begin().await.unwrap();
    let locked = AccountRepository::get_for_update(&mut *tx, account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(locked.balance, 10);
    AccountRepository::add_balance(&mut *tx, account.id, 5).await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(balance_of(&pool, account.id).await, 10);
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_delete_account() {
    let pool = test_pool().await;
    let account = create_random_account(&pool).await;

    assert!(AccountRepository::delete(&pool, account.id).await.unwrap());
    assert!(!AccountRepository::delete(&pool, account.id).await.unwrap());
    assert!(AccountRepository::get(&pool, account.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_list_accounts_by_owner() {
    let pool = test_pool().await;
    let owner = create_random_user(&pool).await;
    for currency in ["USD", "EUR", "CAD"] {
        let params = CreateAccountParams {
            owner: owner.username.clone(),
            balance: 0,
            currency: currency.to_string(),
        };
        AccountRepository::create(&pool, &params).await.unwrap();
    }
    // Someone else's account must not show up
    create_random_account(&pool).await;

    let first_page = AccountRepository::list_by_owner(&pool, &owner.username, 2, 0)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 2);
    assert!(first_page[0].id < first_page[1].id);

    let second_page = AccountRepository::list_by_owner(&pool, &owner.username, 2, 2)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert!(
        first_page
            .iter()
            .chain(second_page.iter())
            .all(|a| a.owner == owner.username)
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn test_create_and_get_user() {
    let pool = test_pool().await;
    let user = create_random_user(&pool).await;

    let fetched = UserRepository::get(&pool, &user.username)
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(fetched, user);

    let missing = UserRepository::get(&pool, "nobody_at_all_here").await.unwrap();
    assert!(missing.is_none());
}
