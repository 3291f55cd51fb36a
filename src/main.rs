use std::net::TcpListener;

use anyhow::Context;

use email_receiver::app;
use email_receiver::settings::Settings;
use email_receiver::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    let subscriber = telemetry::create_subscriber(settings.app.log_filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let pool = settings.database.pool();
    if settings.database.migrate() {
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Failed to migrate database")?;
    }

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(
        listener,
        pool,
        settings.throttling.gatekeeper(),
        settings.app.landing_page(),
    )?
    .await
    .context("Failed to run app")
}
