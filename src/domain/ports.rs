use super::account::{NewUser, User};
use super::catalog::{Book, NewBook};
use super::errors::DomainError;
use super::order::{LineItem, OrderView};

pub trait AccountRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    fn create(&self, book: NewBook) -> Result<Book, DomainError>;
    fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;
    fn list(&self) -> Result<Vec<Book>, DomainError>;
}

/// Order persistence. Every write method is a single transaction: when it
/// returns an error, nothing it touched has changed.
pub trait OrderRepository: Send + Sync + 'static {
    /// Creates the order, its items and its invoice.
    fn place(&self, user_id: i32, lines: &[LineItem]) -> Result<OrderView, DomainError>;
    /// Replaces the items and invoice of an order owned by `user_id`.
    fn replace_items(
        &self,
        order_id: i32,
        user_id: i32,
        lines: &[LineItem],
    ) -> Result<OrderView, DomainError>;
    /// Deletes an order owned by `user_id` together with its dependents.
    fn delete(&self, order_id: i32, user_id: i32) -> Result<(), DomainError>;
    fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, DomainError>;
    fn list_all(&self) -> Result<Vec<OrderView>, DomainError>;
}
