use axum_login::AuthUser;
use serde::Deserialize;
use sqlx::FromRow;

/// A registered account backed by the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl AuthUser for User {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    // When the user changes their password, existing sessions become invalid.
    fn session_auth_hash(&self) -> &[u8] {
        self.password_hash.as_bytes()
    }
}

/// Credential submission for the login form.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Raw registration submission as posted by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

/// Registration fields that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    /// Structural validation of the submission.
    ///
    /// Uniqueness of the username is not checked here; it is enforced by the
    /// database index at persist time so validation and persistence stay
    /// separate steps.
    pub fn validate(&self) -> Result<ValidRegistration, Vec<String>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push("username: must not be empty".to_string());
        }
        if self.password.is_empty() {
            errors.push("password: must not be empty".to_string());
        }
        if self.password != self.password_confirm {
            errors.push("password_confirm: passwords do not match".to_string());
        }

        if errors.is_empty() {
            Ok(ValidRegistration {
                username: username.to_string(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        let valid = form("alice", "hunter2", "hunter2").validate().unwrap();
        assert_eq!(valid.username, "alice");
        assert_eq!(valid.password, "hunter2");
    }

    #[test]
    fn username_is_trimmed() {
        let valid = form("  alice  ", "hunter2", "hunter2").validate().unwrap();
        assert_eq!(valid.username, "alice");
    }

    #[test]
    fn empty_username_is_rejected() {
        let errors = form("   ", "hunter2", "hunter2").validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("username:")));
    }

    #[test]
    fn empty_password_is_rejected() {
        let errors = form("alice", "", "").validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("password:")));
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let errors = form("alice", "hunter2", "hunter3").validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("password_confirm:")));
    }
}
