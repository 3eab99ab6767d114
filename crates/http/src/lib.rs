//! HTTP server facade for Shelfmark with Axum routing and error handling.

use anyhow::Context;
use axum::{routing::get, Router};

use shelfmark_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Build the main HTTP router with all module routes merged at the root
pub fn build_router(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    let mut router_builder = RouterBuilder::new();

    // Global middlewares
    router_builder = router_builder
        .with_tracing()
        .with_request_id()
        .with_timeout(ctx.settings.server.request_timeout_ms);

    router_builder = router_builder.route("/healthz", get(health_check));

    for module in registry.modules() {
        router_builder = router_builder.merge_module(module.name(), module.routes(ctx));
    }

    router_builder.build()
}

/// Bind the configured listener and serve the given application router
pub async fn serve(
    app: Router,
    settings: &shelfmark_kernel::settings::ServerSettings,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", settings.host, settings.port))
        .await
        .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.host,
        settings.port
    );

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_kernel::settings::Settings;

    #[tokio::test]
    async fn empty_registry_builds_a_router() {
        let registry = ModuleRegistry::new();
        let settings = Settings::default();
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };

        let _router = build_router(&registry, &ctx);
    }
}
