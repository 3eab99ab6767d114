pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::{routing::get, Router};
use axum_login::login_required;
use shelfmark_kernel::{InitCtx, Migration, Module};

use crate::modules::accounts::Backend;

/// Books module: the user-scoped entry listing and its mutations
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id   INTEGER NOT NULL REFERENCES users(id),
                    title     TEXT NOT NULL,
                    completed BOOLEAN NOT NULL DEFAULT FALSE
                );
                "#,
        }]
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        // The original accepts both GET and POST on toggle/delete; keep that.
        Router::new()
            .route("/", get(routes::list_books).post(routes::create_book))
            .route(
                "/toggle/{id}",
                get(routes::toggle_book).post(routes::toggle_book),
            )
            .route(
                "/delete/{id}",
                get(routes::delete_book).post(routes::delete_book),
            )
            .route_layer(login_required!(Backend, login_url = "/login"))
            .with_state(ctx.db.clone())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
