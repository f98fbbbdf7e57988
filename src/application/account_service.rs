use crate::domain::account::{validate_email, NewUser, User, MAX_USERNAME_LEN};
use crate::domain::errors::DomainError;
use crate::domain::ports::AccountRepository;

use super::credentials::hash_password;

pub struct AccountService<R> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user, storing only the Argon2 hash of `password`.
    pub fn signup(&self, username: &str, email: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::Validation(format!(
                "username must be between 1 and {MAX_USERNAME_LEN} characters"
            )));
        }
        validate_email(email)?;
        if password.is_empty() {
            return Err(DomainError::Validation(
                "password may not be blank".to_string(),
            ));
        }

        let user = self.repo.create(NewUser {
            username: username.to_string(),
            email: email.trim().to_string(),
            password_hash: hash_password(password)?,
        })?;
        log::info!("registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repo.find_by_email(email)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::application::credentials::verify_password;

    #[derive(Default)]
    struct FakeAccounts {
        users: Mutex<Vec<User>>,
    }

    impl AccountRepository for FakeAccounts {
        fn create(&self, user: NewUser) -> Result<User, DomainError> {
            let mut users = self.users.lock().expect("poisoned");
            if users.iter().any(|u| u.email == user.email) {
                return Err(DomainError::Conflict(format!(
                    "user with email {} already exists",
                    user.email
                )));
            }
            let created = User {
                id: users.len() as i32 + 1,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
            };
            users.push(created.clone());
            Ok(created)
        }

        fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            let users = self.users.lock().expect("poisoned");
            Ok(users.iter().find(|u| u.email == email).cloned())
        }
    }

    #[test]
    fn signup_stores_hash_not_plaintext() {
        let svc = AccountService::new(FakeAccounts::default());
        let user = svc.signup("alice", "a@b.com", "pw").expect("signup failed");

        assert_ne!(user.password_hash, "pw");
        assert!(verify_password("pw", &user.password_hash));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let svc = AccountService::new(FakeAccounts::default());
        svc.signup("alice", "a@b.com", "pw").expect("signup failed");
        let err = svc.signup("alice2", "a@b.com", "pw").expect_err("should conflict");
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn rejects_invalid_input() {
        let svc = AccountService::new(FakeAccounts::default());
        assert!(svc.signup("", "a@b.com", "pw").is_err());
        assert!(svc.signup(&"x".repeat(31), "a@b.com", "pw").is_err());
        assert!(svc.signup("alice", "not-an-email", "pw").is_err());
        assert!(svc.signup("alice", "a@b.com", "").is_err());
        assert!(svc.find_by_email("a@b.com").expect("lookup failed").is_none());
    }
}
