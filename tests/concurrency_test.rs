//! Concurrency tests for Portier.
//!
//! These tests run against a file database with a real connection pool so
//! that concurrent writers contend on SQLite's locks.

use std::sync::Arc;

use tempfile::TempDir;

use portier::auth::{authenticate, register, Credentials, RegistrationError, RegistrationRequest};
use portier::{CredentialStore, Database, UserRepository};

/// Open a fresh file database in a temporary directory.
async fn setup_file_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path().join("users.db")).await.unwrap();
    (dir, db)
}

/// Racing registrations for one email: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_same_email() {
    let (_dir, db) = setup_file_db().await;
    let repo = Arc::new(UserRepository::new(db.pool().clone()));

    const NUM_ATTEMPTS: usize = 8;

    let mut handles = Vec::new();
    for i in 0..NUM_ATTEMPTS {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let request =
                RegistrationRequest::new(format!("Racer {i}"), "race@x.com", format!("pw{i}"));
            register(repo.as_ref(), request).await
        }));
    }

    let mut successes = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(RegistrationError::DuplicateIdentity) => duplicates += 1,
            Err(e) => panic!("Unexpected registration error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, NUM_ATTEMPTS - 1);
    assert_eq!(repo.count().await.unwrap(), 1);

    // The stored password belongs to the winner
    let winner = repo.find_by_identity("race@x.com").await.unwrap();
    let index = winner.fullname.trim_start_matches("Racer ");
    let account = authenticate(
        repo.as_ref(),
        Credentials::new("race@x.com", format!("pw{index}")),
    )
    .await
    .unwrap();
    assert_eq!(account.id, winner.id);

    db.close().await;
}

/// Distinct emails registered concurrently all succeed.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_distinct_emails() {
    let (_dir, db) = setup_file_db().await;
    let repo = Arc::new(UserRepository::new(db.pool().clone()));

    const NUM_USERS: usize = 8;

    let mut handles = Vec::new();
    for i in 0..NUM_USERS {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let request =
                RegistrationRequest::new(format!("User {i}"), format!("user{i}@x.com"), "pw123");
            register(repo.as_ref(), request).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), NUM_USERS);
    assert_eq!(repo.count().await.unwrap(), NUM_USERS as i64);

    db.close().await;
}

/// Concurrent logins for the same account all succeed.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins() {
    let (_dir, db) = setup_file_db().await;
    let repo = Arc::new(UserRepository::new(db.pool().clone()));

    let id = register(
        repo.as_ref(),
        RegistrationRequest::new("Alice", "alice@x.com", "pw123"),
    )
    .await
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            authenticate(repo.as_ref(), Credentials::new("alice@x.com", "pw123")).await
        }));
    }

    for handle in handles {
        let account = handle.await.unwrap().unwrap();
        assert_eq!(account.id, id);
    }

    db.close().await;
}
