// Database-backed tests for lazy profile provisioning and duplicate-user
// handling. They run against DATABASE_URL when a Postgres instance is
// reachable and skip quietly otherwise, so the suite stays green without
// infrastructure.

use std::time::Duration;

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use urbantree_api::auth::hash_password;
use urbantree_api::database::bootstrap;
use urbantree_api::database::manager::DatabaseError;
use urbantree_api::database::profiles::ProfileRepository;
use urbantree_api::database::users::{NewUser, UserRepository};

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect(&url)
        .await
        .ok()?;
    bootstrap::ensure_schema(&pool).await.ok()?;
    Some(pool)
}

fn unique_user(prefix: &str) -> NewUser {
    let suffix = Uuid::new_v4().simple().to_string();
    NewUser {
        username: format!("{}_{}", prefix, suffix),
        email: format!("{}_{}@example.test", prefix, suffix),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: hash_password("integration-pw"),
    }
}

#[tokio::test]
async fn first_login_of_profile_less_user_creates_exactly_one_profile() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not reachable; skipping");
        return Ok(());
    };

    let users = UserRepository::new(pool.clone());
    let profiles = ProfileRepository::new(pool.clone());

    // A user row with no profile, as if provisioned out of band
    let user = users.create(unique_user("lazy_profile")).await?;
    assert!(profiles.find_by_user(user.id).await?.is_none());

    let first = profiles.get_or_create(user.id).await?;
    assert_eq!(first.user_id, user.id);
    assert_eq!(first.role, "viewer");

    // A second call finds the existing row instead of creating another
    let second = profiles.get_or_create(user.id).await?;
    assert_eq!(second.id, first.id);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM user_profiles WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(count, 1);

    users.delete(user.id).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_username_insert_surfaces_as_unique_violation() -> Result<()> {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not reachable; skipping");
        return Ok(());
    };

    let users = UserRepository::new(pool.clone());

    let original = unique_user("dup_check");
    let user = users.create(NewUser {
        username: original.username.clone(),
        email: original.email.clone(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: hash_password("integration-pw"),
    })
    .await?;

    // Same username, different email: the constraint fires even though a
    // pre-check would have passed moments earlier
    let err = users
        .create(NewUser {
            username: original.username,
            email: format!("other_{}", original.email),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: hash_password("integration-pw"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation(_)), "{:?}", err);

    users.delete(user.id).await?;
    Ok(())
}
