use anyhow::Context;
use shelfline_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelfline settings")?;
    shelfline_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        data_file = %settings.store.data_file.display(),
        "shelfline bootstrap starting"
    );

    shelfline_app::run(settings).await
}
