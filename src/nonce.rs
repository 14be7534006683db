//! Form nonces: short-lived tokens proving that a form submission came from a
//! page we rendered for the same admin.
//!
//! A nonce is `hex(HMAC-SHA256(secret, "{action}|{admin_id}|{tick}"))`, where
//! `tick` counts 12-hour windows. Nonces from the current and the previous
//! window are accepted, so a nonce lives between 12 and 24 hours.

use anyhow::Context;
use chrono::DateTime;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use secrecy::ExposeSecret;
use sha2::Sha256;
use uuid::Uuid;

use crate::startup::HmacSecret;

const TICK_SECONDS: i64 = 12 * 60 * 60;

fn tick(now: DateTime<Utc>) -> i64 { now.timestamp().div_euclid(TICK_SECONDS) }

fn mac(
    secret: &HmacSecret,
    action: &str,
    admin_id: Uuid,
    tick: i64,
) -> Result<Hmac<Sha256>, anyhow::Error> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.0.expose_secret().as_bytes())?;
    mac.update(format!("{action}|{admin_id}|{tick}").as_bytes());
    Ok(mac)
}

pub fn create_nonce(
    secret: &HmacSecret,
    action: &str,
    admin_id: Uuid,
) -> Result<String, anyhow::Error> {
    create_nonce_at(secret, action, admin_id, Utc::now())
}

pub fn verify_nonce(
    secret: &HmacSecret,
    action: &str,
    admin_id: Uuid,
    nonce: &str,
) -> Result<(), anyhow::Error> {
    verify_nonce_at(secret, action, admin_id, nonce, Utc::now())
}

fn create_nonce_at(
    secret: &HmacSecret,
    action: &str,
    admin_id: Uuid,
    now: DateTime<Utc>,
) -> Result<String, anyhow::Error> {
    let tag = mac(secret, action, admin_id, tick(now))?
        .finalize()
        .into_bytes();
    Ok(hex::encode(tag))
}

fn verify_nonce_at(
    secret: &HmacSecret,
    action: &str,
    admin_id: Uuid,
    nonce: &str,
    now: DateTime<Utc>,
) -> Result<(), anyhow::Error> {
    let tag = hex::decode(nonce).context("Nonce is not valid hex")?;
    let current = tick(now);
    for t in [current, current - 1] {
        // `verify_slice` compares in constant time
        if mac(secret, action, admin_id, t)?.verify_slice(&tag).is_ok() {
            return Ok(());
        }
    }
    Err(anyhow::anyhow!("Nonce does not match, or has expired"))
}
