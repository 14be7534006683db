use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Context;
use async_trait::async_trait;
use secrecy::Secret;
use sqlx::PgPool;

use crate::domain::OptionKey;
use crate::domain::SanitizedText;
use crate::domain::SyncSettings;

/// Generic key-value settings storage. Reads of a key that was never written
/// return an empty string.
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(
        &self,
        key: OptionKey,
    ) -> Result<String, anyhow::Error>;

    /// Last write wins
    async fn update_option(
        &self,
        key: OptionKey,
        value: &SanitizedText,
    ) -> Result<(), anyhow::Error>;
}

/// Backed by the `options` table
pub struct PgOptionStore {
    pool: PgPool,
}

impl PgOptionStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl OptionStore for PgOptionStore {
    #[tracing::instrument(name = "Reading option", skip(self))]
    async fn get_option(
        &self,
        key: OptionKey,
    ) -> Result<String, anyhow::Error> {
        let row = sqlx::query!(
            r#"
            SELECT option_value FROM options
            WHERE option_name = $1
            "#,
            key.as_str(),
        )
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read option {key}"))?;
        Ok(row.map(|r| r.option_value).unwrap_or_default())
    }

    #[tracing::instrument(name = "Writing option", skip(self, value))]
    async fn update_option(
        &self,
        key: OptionKey,
        value: &SanitizedText,
    ) -> Result<(), anyhow::Error> {
        let value: &str = value.as_ref();
        sqlx::query!(
            r#"
            INSERT INTO options (option_name, option_value)
            VALUES ($1, $2)
            ON CONFLICT (option_name) DO UPDATE
            SET option_value = EXCLUDED.option_value
            "#,
            key.as_str(),
            value,
        )
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write option {key}"))?;
        Ok(())
    }
}

/// In-process store, for tests and for running the sync without a database
#[derive(Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<OptionKey, String>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get_option(
        &self,
        key: OptionKey,
    ) -> Result<String, anyhow::Error> {
        let options = self
            .options
            .read()
            .map_err(|_| anyhow::anyhow!("option store lock poisoned"))?;
        Ok(options.get(&key).cloned().unwrap_or_default())
    }

    async fn update_option(
        &self,
        key: OptionKey,
        value: &SanitizedText,
    ) -> Result<(), anyhow::Error> {
        let mut options = self
            .options
            .write()
            .map_err(|_| anyhow::anyhow!("option store lock poisoned"))?;
        options.insert(key, value.as_ref().to_string());
        Ok(())
    }
}

/// Read all Mailchimp settings at once
pub async fn get_sync_settings(store: &dyn OptionStore) -> Result<SyncSettings, anyhow::Error> {
    Ok(SyncSettings {
        api_key: Secret::new(store.get_option(OptionKey::ApiKey).await?),
        list_id: store.get_option(OptionKey::ListId).await?,
        server_prefix: store.get_option(OptionKey::ServerPrefix).await?,
    })
}

/// Sanitize and store all Mailchimp settings, as submitted on the settings
/// page. Returns the values that were actually stored.
pub async fn update_sync_settings(
    store: &dyn OptionStore,
    api_key: &str,
    list_id: &str,
    server_prefix: &str,
) -> Result<[SanitizedText; 3], anyhow::Error> {
    let values = [
        SanitizedText::parse(api_key),
        SanitizedText::parse(list_id),
        SanitizedText::parse(server_prefix),
    ];
    for (key, value) in OptionKey::ALL.into_iter().zip(values.iter()) {
        store.update_option(key, value).await?;
    }
    Ok(values)
}
