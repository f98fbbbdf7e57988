use std::fmt;

use super::errors::DomainError;

pub const MAX_USERNAME_LEN: usize = 30;
pub const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A user row ready for insertion; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Email and plaintext password presented with an order request.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Rejects blank fields only; a malformed email is left to the lookup,
    /// which reports it as invalid credentials.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::Validation(
                "email and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if valid && trimmed.chars().count() <= MAX_EMAIL_LEN {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}
