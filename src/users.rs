use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::NewUser;
use crate::domain::UserId;
use crate::domain::UserRecord;

/// Read access to registered users
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `None` if no user has this id
    async fn get_userdata(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, anyhow::Error>;
}

/// Backed by the `users` table
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[tracing::instrument(name = "Looking up user", skip(self))]
    async fn get_userdata(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, anyhow::Error> {
        let user = sqlx::query_as!(
            UserRecord,
            r#"
            SELECT id, email, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
            user_id.0,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to query users table")?;
        Ok(user)
    }
}

/// Fixed set of users, keyed by id
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: HashMap<UserId, UserRecord>,
}

impl MemoryUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.user_id(), u)).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get_userdata(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, anyhow::Error> {
        Ok(self.users.get(&user_id).cloned())
    }
}

/// INSERT a registration, returning the new user's id. Fails on a duplicate
/// email (`users.email` is UNIQUE).
#[tracing::instrument(name = "INSERTing new user into db", skip(new_user, pool))]
pub async fn insert_user(
    new_user: &NewUser,
    pool: &PgPool,
) -> Result<UserId, sqlx::Error> {
    let email: &str = new_user.email.as_ref();
    let first_name: &str = new_user.first_name.as_ref();
    let last_name: &str = new_user.last_name.as_ref();
    let row = sqlx::query!(
        r#"
        INSERT INTO users (email, first_name, last_name, registered_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
        email,
        first_name,
        last_name,
        Utc::now(),
    )
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("bad query: {e:?}");
        e
    })?;
    Ok(UserId(row.id))
}
