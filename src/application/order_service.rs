use crate::domain::account::{Credentials, User};
use crate::domain::errors::DomainError;
use crate::domain::order::{validate_lines, LineItem, OrderView};
use crate::domain::ports::{AccountRepository, OrderRepository};

use subtle::ConstantTimeEq;

use super::credentials::verify_password;

/// Capability required to read every user's orders.
///
/// Only obtainable through [`AdminAccess::check`].
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess {
    _private: (),
}

impl AdminAccess {
    /// With no configured token the capability is granted to anyone; otherwise
    /// the presented token must match.
    pub fn check(configured: Option<&str>, presented: Option<&str>) -> Result<Self, DomainError> {
        match configured {
            None => Ok(Self { _private: () }),
            Some(expected) => {
                let granted = presented
                    .is_some_and(|token| bool::from(expected.as_bytes().ct_eq(token.as_bytes())));
                if granted {
                    Ok(Self { _private: () })
                } else {
                    Err(DomainError::AdminAccessDenied)
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum ListScope {
    Owner(Credentials),
    All(AdminAccess),
}

pub struct OrderService<O, A> {
    orders: O,
    accounts: A,
}

impl<O: OrderRepository, A: AccountRepository> OrderService<O, A> {
    pub fn new(orders: O, accounts: A) -> Self {
        Self { orders, accounts }
    }

    /// Returns `None` for an unknown email or a wrong password.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, DomainError> {
        let Some(user) = self.accounts.find_by_email(email)? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    fn require_user(&self, credentials: &Credentials) -> Result<User, DomainError> {
        self.authenticate(&credentials.email, &credentials.password)?
            .ok_or_else(|| {
                log::warn!("credential check failed for {}", credentials.email);
                DomainError::InvalidCredentials
            })
    }

    pub fn place_order(
        &self,
        credentials: &Credentials,
        lines: &[LineItem],
    ) -> Result<OrderView, DomainError> {
        let user = self.require_user(credentials)?;
        validate_lines(lines)?;

        let order = self.orders.place(user.id, lines)?;
        log::info!(
            "placed order {} for user {} ({} line(s))",
            order.id,
            user.id,
            lines.len()
        );
        Ok(order)
    }

    pub fn update_order(
        &self,
        credentials: &Credentials,
        order_id: i32,
        lines: &[LineItem],
    ) -> Result<OrderView, DomainError> {
        let user = self.require_user(credentials)?;
        validate_lines(lines)?;

        let order = self.orders.replace_items(order_id, user.id, lines)?;
        log::info!("updated order {} for user {}", order.id, user.id);
        Ok(order)
    }

    pub fn cancel_order(&self, credentials: &Credentials, order_id: i32) -> Result<(), DomainError> {
        let user = self.require_user(credentials)?;
        self.orders.delete(order_id, user.id)?;
        log::info!("cancelled order {} for user {}", order_id, user.id);
        Ok(())
    }

    pub fn list_orders(&self, scope: &ListScope) -> Result<Vec<OrderView>, DomainError> {
        match scope {
            ListScope::Owner(credentials) => {
                let user = self.require_user(credentials)?;
                self.orders.list_for_user(user.id)
            }
            ListScope::All(_) => {
                log::warn!("listing orders of all users");
                self.orders.list_all()
            }
        }
    }
}
