use mailchimp_user_sync::configuration::get_configuration;
use mailchimp_user_sync::configuration::DatabaseSettings;
use mailchimp_user_sync::startup::get_connection_pool;
use mailchimp_user_sync::startup::Application;
use mailchimp_user_sync::telemetry::get_subscriber;
use mailchimp_user_sync::telemetry::init_subscriber;
use once_cell::sync::Lazy;
use secrecy::ExposeSecret;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;
use wiremock::MockServer;

/// Subscriber is initialised once for the whole test binary. Logs are
/// discarded unless `TEST_LOG` is set:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // `stdout` and `sink` are different types, hence the two arms
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber).unwrap();
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber).unwrap();
        }
    };
});

/// The admin created at startup from `configuration/base.yaml`
pub struct TestAdmin {
    pub username: String,
    pub password: String,
}

pub struct TestApp {
    pub addr: String,
    pub pool: PgPool,
    /// Stands in for `https://{server_prefix}.api.mailchimp.com`; requests
    /// land on `/{server_prefix}/3.0/...`
    pub mailchimp_server: MockServer,
    pub test_admin: TestAdmin,
    /// Keeps the session cookie between requests
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_register(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/register", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_login(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/login", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn login_as_admin(&self) {
        let body = serde_json::json!({
            "username": self.test_admin.username,
            "password": self.test_admin.password,
        });
        let resp = self.post_login(&body).await;
        check_redirect(&resp, "/admin/mailchimp-user-sync");
    }

    pub async fn get_login_html(&self) -> String {
        self.api_client
            .get(format!("{}/login", self.addr))
            .send()
            .await
            .expect("execute request")
            .text()
            .await
            .unwrap()
    }

    pub async fn get_sync_settings(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/admin/mailchimp-user-sync", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_sync_settings_html(&self) -> String {
        self.get_sync_settings().await.text().await.unwrap()
    }

    pub async fn post_sync_settings(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/admin/mailchimp-user-sync", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/admin/logout", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    /// Read the nonce out of a freshly rendered settings page
    pub async fn settings_nonce(&self) -> String {
        let html = self.get_sync_settings_html().await;
        let marker = r#"name="_nonce" value=""#;
        let start = html.find(marker).expect("nonce field") + marker.len();
        let len = html[start..].find('"').unwrap();
        html[start..start + len].to_string()
    }

    /// Log in and store the three settings through the settings page
    pub async fn configure_mailchimp(
        &self,
        api_key: &str,
        list_id: &str,
        server_prefix: &str,
    ) {
        self.login_as_admin().await;
        let body = serde_json::json!({
            "mailchimp_api_key": api_key,
            "mailchimp_list_id": list_id,
            "mailchimp_server_prefix": server_prefix,
            "mailchimp_user_sync_save": "1",
            "_nonce": self.settings_nonce().await,
        });
        let resp = self.post_sync_settings(&body).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    pub async fn stored_option(
        &self,
        name: &str,
    ) -> Option<String> {
        sqlx::query_scalar("SELECT option_value FROM options WHERE option_name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .unwrap()
    }
}

pub fn check_redirect(
    resp: &reqwest::Response,
    location: &str,
) {
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), location);
}

/// Create a db with a random name and run the migrations on it
async fn configure_database(cfg: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&cfg.connection_without_db())
        .await
        .expect("postgres must be running");
    conn.execute(format!(r#"CREATE DATABASE "{}";"#, cfg.database_name).as_str())
        .await
        .unwrap();

    let pool = PgPool::connect_with(cfg.connection()).await.unwrap();
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("failed to migrate");
    pool
}

/// Spawn the app on a random port, with its own db and a mock Mailchimp
pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let mailchimp_server = MockServer::start().await;

    let cfg = {
        let mut rand_cfg = get_configuration().unwrap();
        rand_cfg.database.database_name = Uuid::new_v4().to_string();
        rand_cfg.application.port = 0;
        rand_cfg.mailchimp.api_base_url = format!("{}/{{server_prefix}}", mailchimp_server.uri());
        rand_cfg
    };

    configure_database(&cfg.database).await;

    let app = Application::build(cfg.clone()).await.unwrap();
    let addr = format!("http://localhost:{}", app.get_port());
    let pool = get_connection_pool(&cfg.database);
    tokio::spawn(app.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        mailchimp_server,
        test_admin: TestAdmin {
            username: cfg.application.admin_username.clone(),
            password: cfg.application.admin_password.expose_secret().clone(),
        },
        api_client,
    }
}
