use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use sqlx::SqlitePool;

use shelfmark_http::error::AppError;

use super::backend::{self, AuthSession, RegisterOutcome};
use super::models::{Credentials, RegistrationForm};
use crate::utils;

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    errors: Vec<String>,
    username: String,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
    username: String,
}

/// Show the registration form
pub async fn register_form() -> Result<Html<String>, AppError> {
    utils::render(&RegisterTemplate {
        errors: Vec::new(),
        username: String::new(),
    })
}

/// Process a registration submission
///
/// Invalid or conflicting submissions re-render the form with messages and
/// create nothing; a valid one creates the account and redirects to login.
pub async fn register(
    State(db): State<SqlitePool>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(utils::render(&RegisterTemplate {
                errors,
                username: form.username.clone(),
            })?
            .into_response());
        }
    };

    match backend::register_user(&db, valid.username.clone(), valid.password).await? {
        RegisterOutcome::Created => {
            tracing::info!(username = %valid.username, "account created");
            Ok(Redirect::to("/login").into_response())
        }
        RegisterOutcome::UsernameTaken => Ok(utils::render(&RegisterTemplate {
            errors: vec!["username: already taken".to_string()],
            username: valid.username,
        })?
        .into_response()),
    }
}

/// Show the login form
pub async fn login_form() -> Result<Html<String>, AppError> {
    utils::render(&LoginTemplate {
        error: None,
        username: String::new(),
    })
}

/// Process a credential submission and establish the session
pub async fn login(
    mut auth_session: AuthSession,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    let user = match auth_session.authenticate(creds.clone()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(utils::render(&LoginTemplate {
                error: Some("invalid username or password".to_string()),
                username: creds.username,
            })?
            .into_response());
        }
        Err(e) => return Err(AppError::Internal(anyhow::anyhow!(e))),
    };

    auth_session
        .login(&user)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    tracing::info!(username = %user.username, "user logged in");

    Ok(Redirect::to("/").into_response())
}

/// Destroy the session and return to the login page
pub async fn logout(mut auth_session: AuthSession) -> Result<Redirect, AppError> {
    auth_session
        .logout()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(Redirect::to("/login"))
}
