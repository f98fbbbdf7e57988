use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Book with ISBN {0} does not exist.")]
    BookNotFound(String),
    #[error("Book with ISBN {0} has no price set.")]
    BookUnpriced(String),
    #[error("Order not found for this user")]
    OrderNotFound,
    #[error("Admin access is required to list all orders")]
    AdminAccessDenied,
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
