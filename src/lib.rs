//! Shelfline application library.
//!
//! Wires the book store, the reading-list modules, and the HTTP gateway
//! together on top of the shelfline kernel.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use shelfline_kernel::settings::Settings;
use shelfline_kernel::{InitCtx, ModuleRegistry};
use shelfline_store::JsonStore;

/// Run the HTTP gateway until the server exits.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = Arc::new(
        JsonStore::open(&settings.store.data_file)
            .await
            .context("failed to open book store")?,
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    shelfline_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
