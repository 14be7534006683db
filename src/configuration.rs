use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;

use crate::mailchimp_client::MailchimpClient;

/// Global configuration, loaded from `configuration/*.yaml`. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub mailchimp: MailchimpSettings,
    pub redis_uri: Secret<String>,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Signs session cookies, flash messages and settings form nonces
    pub hmac_secret: Secret<String>,

    /// Admin account created on startup, if missing
    pub admin_username: String,
    pub admin_password: Secret<String>,
}

/// Database configuration
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,

    /// Should be `true` in production.
    pub require_ssl: bool,
}

impl DatabaseSettings {
    /// Connection to the named database
    pub fn connection(&self) -> PgConnectOptions {
        self.connection_without_db().database(&self.database_name)
    }

    /// Connection to the Postgres instance itself, i.e. `database_name` is
    /// unset. Used by tests to create a randomised db.
    pub fn connection_without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .ssl_mode(match self.require_ssl {
                true => sqlx::postgres::PgSslMode::Require,
                false => sqlx::postgres::PgSslMode::Prefer,
            })
    }
}

/// Outbound Mailchimp API configuration. The credentials themselves (api key,
/// list id, server prefix) are -not- here; they are entered by an admin and
/// kept in the `options` table.
#[derive(Deserialize, Clone)]
pub struct MailchimpSettings {
    /// Root of the API, where `{server_prefix}` is replaced by the stored
    /// server prefix. In production this is
    /// `https://{server_prefix}.api.mailchimp.com`; tests point it at a mock
    /// server.
    pub api_base_url: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl MailchimpSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    pub fn client(&self) -> Result<MailchimpClient, reqwest::Error> {
        MailchimpClient::new(self.api_base_url.clone(), self.timeout())
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("{e} is not a supported environment; use `local` or `production`")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`:
/// `base.yaml`, then `{APP_ENVIRONMENT}.yaml` (default `local`), then `APP_*`
/// env vars.
///
/// All fields must be present, otherwise the server will not start.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, hence `serde-aux`.
            //
            // `APP_APPLICATION__PORT=5001` -> `Settings.application.port`
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
