use mailchimp_user_sync::configuration::get_configuration;
use mailchimp_user_sync::startup::Application;
use mailchimp_user_sync::telemetry::get_subscriber;
use mailchimp_user_sync::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // one bunyan JSON object per line on stdout; filter with RUST_LOG
    let subscriber = get_subscriber("mailchimp-user-sync", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    let app = Application::build(cfg).await?;
    tracing::info!("Listening on port {}", app.get_port());
    app.run_until_stopped().await?;
    Ok(())
}
