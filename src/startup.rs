use std::net::TcpListener;
use std::sync::Arc;

use actix_session::storage::RedisSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_lab::middleware::from_fn;
use anyhow::Context;
use secrecy::ExposeSecret;
use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

use crate::authentication::ensure_admin;
use crate::authentication::reject_anonymous_users;
use crate::configuration::DatabaseSettings;
use crate::configuration::Settings;
use crate::notifier::Event;
use crate::notifier::HookContext;
use crate::notifier::Notifier;
use crate::option_store::OptionStore;
use crate::option_store::PgOptionStore;
use crate::routes::health_check;
use crate::routes::login;
use crate::routes::login_form;
use crate::routes::logout;
use crate::routes::register;
use crate::routes::save_sync_settings;
use crate::routes::sync_settings_form;
use crate::sync::sync_registered_user;
use crate::users::PgUserDirectory;

/// Wrapper for actix's `Server` with access to the bound port
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind, migrate, make sure the configured admin exists, wire the
    /// `user_registered` hooks, then hand everything to `run`
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        // port 0 in tests; the OS picks one
        let port = listener.local_addr()?.port();

        let pool = get_connection_pool(&cfg.database);
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to migrate the database")?;
        ensure_admin(
            &cfg.application.admin_username,
            cfg.application.admin_password.clone(),
            &pool,
        )
        .await?;

        let options: Arc<dyn OptionStore> = Arc::new(PgOptionStore::new(pool.clone()));
        let context = HookContext {
            options: options.clone(),
            users: Arc::new(PgUserDirectory::new(pool.clone())),
            mailchimp: cfg
                .mailchimp
                .client()
                .context("Failed to build the Mailchimp http client")?,
        };
        let mut notifier = Notifier::new(context);
        notifier.on(Event::UserRegistered, sync_registered_user);

        let server = run(
            listener,
            pool,
            options,
            notifier,
            cfg.application.hmac_secret,
            cfg.redis_uri,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Consumes `self`; the last call in `main` (or passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// Lazy: nothing connects until the first query, so `/health_check` works
/// without Postgres
pub fn get_connection_pool(db_cfg: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(db_cfg.connection())
}

/// Key for session cookies, flash messages and form nonces
#[derive(Clone)]
pub struct HmacSecret(pub Secret<String>);

/// Declares all endpoints. The listener is already bound.
pub async fn run(
    listener: TcpListener,
    pool: PgPool,
    options: Arc<dyn OptionStore>,
    notifier: Notifier,
    hmac_secret: Secret<String>,
    redis_uri: Secret<String>,
) -> Result<Server, anyhow::Error> {
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());

    // client side cookies
    let cookie_store = CookieMessageStore::builder(secret_key.clone()).build();
    let msg_framework = FlashMessagesFramework::builder(cookie_store).build();

    // server side sessions; only the admin pages need them
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret()).await?;

    let pool = Data::new(pool);
    let options: Data<dyn OptionStore> = Data::from(options);
    let notifier = Data::new(notifier);
    let hmac_secret = Data::new(HmacSecret(hmac_secret));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(msg_framework.clone())
            .wrap(SessionMiddleware::new(
                redis_store.clone(),
                secret_key.clone(),
            ))
            .route("/health_check", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::get().to(login_form))
            .route("/login", web::post().to(login))
            .service(
                web::scope("/admin")
                    .wrap(from_fn(reject_anonymous_users))
                    // keep in sync with `SETTINGS_PATH`
                    .route("/mailchimp-user-sync", web::get().to(sync_settings_form))
                    .route("/mailchimp-user-sync", web::post().to(save_sync_settings))
                    .route("/logout", web::post().to(logout)),
            )
            .app_data(pool.clone())
            .app_data(options.clone())
            .app_data(notifier.clone())
            .app_data(hmac_secret.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

