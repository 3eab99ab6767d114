use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use shelfmark_http::error::AppError;

use super::models::{self, Book};
use crate::modules::accounts::{AuthSession, User};
use crate::utils;

#[derive(Template)]
#[template(path = "books/list.html")]
struct ListTemplate {
    username: String,
    books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookForm {
    #[serde(default)]
    title: String,
}

// The login gate redirects unauthenticated callers before these handlers
// run; this covers the window where a session expires mid-flight.
fn current_user(auth_session: &AuthSession) -> Result<User, AppError> {
    auth_session
        .user
        .clone()
        .ok_or_else(|| AppError::unauthorized("no authenticated user"))
}

/// List the caller's entries
pub async fn list_books(
    auth_session: AuthSession,
    State(db): State<SqlitePool>,
) -> Result<Html<String>, AppError> {
    let user = current_user(&auth_session)?;

    let books = models::list_for_owner(&db, user.id)
        .await
        .map_err(anyhow::Error::from)?;

    utils::render(&ListTemplate {
        username: user.username,
        books,
    })
}

/// Create an entry from the submitted title, then redirect to the listing
pub async fn create_book(
    auth_session: AuthSession,
    State(db): State<SqlitePool>,
    Form(form): Form<CreateBookForm>,
) -> Result<Redirect, AppError> {
    let user = current_user(&auth_session)?;

    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::validation(
            vec!["title: must not be empty".to_string()],
            "invalid book submission",
        ));
    }

    let id = models::create(&db, user.id, title)
        .await
        .map_err(anyhow::Error::from)?;

    tracing::info!(book = id, owner = user.id, "book created");

    Ok(Redirect::to("/"))
}

/// Flip `completed` on an owned entry, then redirect to the listing
pub async fn toggle_book(
    auth_session: AuthSession,
    State(db): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let user = current_user(&auth_session)?;

    match models::toggle(&db, id, user.id)
        .await
        .map_err(anyhow::Error::from)?
    {
        Some(completed) => {
            tracing::info!(book = id, owner = user.id, completed, "book toggled");
            Ok(Redirect::to("/"))
        }
        None => Err(AppError::not_found(format!("no book with id {id}"))),
    }
}

/// Permanently remove an owned entry, then redirect to the listing
pub async fn delete_book(
    auth_session: AuthSession,
    State(db): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let user = current_user(&auth_session)?;

    if models::delete(&db, id, user.id)
        .await
        .map_err(anyhow::Error::from)?
    {
        tracing::info!(book = id, owner = user.id, "book deleted");
        Ok(Redirect::to("/"))
    } else {
        Err(AppError::not_found(format!("no book with id {id}")))
    }
}
