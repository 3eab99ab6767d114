mod modules;
mod utils;

use anyhow::Context;
use axum_login::AuthManagerLayerBuilder;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use modules::accounts::Backend;
use shelfmark_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = shelfmark_kernel::settings::Settings::load()
        .with_context(|| "failed to load Shelfmark settings")?;

    shelfmark_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "shelfmark-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let pool = shelfmark_db::connect(&settings.database).await?;
    shelfmark_db::apply_migrations(&pool, &registry.collect_migrations()).await?;

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };
    registry.init_modules(&ctx).await?;

    // Session/auth layer wraps the whole router; the books module adds its
    // own login gate on top of it.
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    let auth_layer = AuthManagerLayerBuilder::new(Backend::new(pool.clone()), session_layer).build();

    let app = shelfmark_http::build_router(&registry, &ctx).layer(auth_layer);

    tracing::info!("shelfmark-app bootstrap complete");

    shelfmark_http::serve(app, &settings.server).await
}
