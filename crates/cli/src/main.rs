use anyhow::Context;
use clap::{Parser, Subcommand};
use shelfline_kernel::settings::Settings;
use shelfline_store::{BookStore, JsonStore};

#[derive(Parser)]
#[command(name = "shelfline", version, about = "Reading-list tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway
    Serve,
    /// Print summary statistics for the configured data file
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelfline settings")?;
    shelfline_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Serve => shelfline_app::run(settings).await,
        Command::Summary => {
            let store = JsonStore::open(&settings.store.data_file)
                .await
                .context("failed to open book store")?;
            let books = store.list().await?;
            let summary = shelfline_app::modules::analytics::compute_summary(&books);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
