// only one kind of client is authenticated here: a human admin in a browser,
// via login form + server-side session

mod middleware;

use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
pub use middleware::reject_anonymous_users;
pub use middleware::AdminId;
use secrecy::ExposeSecret;
use secrecy::Secret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::telemetry::spawn_blocking_with_tracing;

pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[tracing::instrument(name = "Getting stored credentials", skip(username, pool))]
async fn get_stored_credentials(
    username: &str,
    pool: &PgPool,
) -> Result<Option<(Uuid, Secret<String>)>, anyhow::Error> {
    let row = sqlx::query!(
        r#"
        SELECT admin_id, password_hash
        FROM admins
        WHERE username = $1
        "#,
        username,
    )
    .fetch_optional(pool)
    .await
    .context("Failed to query admins table")?;
    Ok(row.map(|r| (r.admin_id, Secret::new(r.password_hash))))
}

/// CPU-bound and slow (up to 0.5 s); run via `spawn_blocking_with_tracing`
#[tracing::instrument(name = "Verifying password hash", skip_all)]
fn verify_password(
    supplied_password: Secret<String>,
    stored_password: Secret<String>,
) -> Result<(), AuthError> {
    let stored_password = PasswordHash::new(stored_password.expose_secret())
        .context("Failed to read stored PHC string")?;
    Argon2::default()
        .verify_password(
            supplied_password.expose_secret().as_bytes(),
            &stored_password,
        )
        .context("Invalid password")
        .map_err(AuthError::InvalidCredentials)
}

/// Check `creds` against the `admins` table, returning the admin's id.
#[tracing::instrument(name = "Validating credentials", skip(creds, pool))]
pub async fn validate_credentials(
    creds: Credentials,
    pool: &PgPool,
) -> Result<Uuid, AuthError> {
    // an unknown username still pays for a full hash verification (against this
    // dummy PHC string, same params as `compute_password_hash`), so response
    // time doesn't reveal which usernames exist
    let mut admin_id = None;
    let mut stored_password = Secret::new(
        "$argon2id$v=19$m=15000,t=2,p=1$\
        gZiV/M1gPc22ElAH/Jh1Hw$\
        CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno"
            .to_string(),
    );

    if let Some((stored_id, stored_hash)) = get_stored_credentials(&creds.username, pool).await? {
        admin_id = Some(stored_id);
        stored_password = stored_hash;
    }

    spawn_blocking_with_tracing(move || verify_password(creds.password, stored_password))
        .await
        .context("Failed to spawn blocking thread")??;

    admin_id
        .ok_or_else(|| anyhow::anyhow!("Unknown username"))
        .map_err(AuthError::InvalidCredentials)
}

/// argon2id PHC string with a fresh random salt
pub fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).context("Invalid argon2 params")?,
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)
    .context("Failed to hash password")?
    .to_string();
    Ok(Secret::new(hash))
}

/// Create the configured admin account unless one with that username exists.
/// An existing admin's password is left untouched.
#[tracing::instrument(name = "Ensuring admin account exists", skip(password, pool))]
pub async fn ensure_admin(
    username: &str,
    password: Secret<String>,
    pool: &PgPool,
) -> Result<(), anyhow::Error> {
    if get_stored_credentials(username, pool).await?.is_some() {
        return Ok(());
    }

    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking thread")??;

    sqlx::query!(
        r#"
        INSERT INTO admins (admin_id, username, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO NOTHING
        "#,
        Uuid::new_v4(),
        username,
        password_hash.expose_secret(),
    )
    .execute(pool)
    .await
    .context("Failed to create admin account")?;
    tracing::info!("Created admin account {username}");
    Ok(())
}
