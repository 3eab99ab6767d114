pub mod backend;
pub mod models;
pub mod routes;

pub use backend::{AuthSession, Backend};
pub use models::User;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use shelfmark_kernel::{InitCtx, Migration, Module};

/// Accounts module: registration, login/logout, and the auth backend
pub struct AccountsModule;

impl AccountsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for AccountsModule {
    fn name(&self) -> &'static str {
        "accounts"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "accounts module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS users (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    username      TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                );
                "#,
        }]
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        Router::new()
            .route("/register", get(routes::register_form).post(routes::register))
            .route("/login", get(routes::login_form).post(routes::login))
            .route("/logout", post(routes::logout).get(routes::logout))
            .with_state(ctx.db.clone())
    }
}

/// Create a new instance of the accounts module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AccountsModule::new())
}
