//! Project-specific utilities live here.

use askama::Template;
use axum::response::Html;

use shelfmark_http::error::AppError;

/// Render an askama template into an HTML response.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("template render failed: {e}")))
}
