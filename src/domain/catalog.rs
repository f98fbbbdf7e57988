use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;

pub const MAX_ISBN_LEN: usize = 13;
pub const MAX_TITLE_LEN: usize = 255;

/// Largest price a `NUMERIC(6, 2)` column holds.
pub const MAX_PRICE: &str = "9999.99";

#[derive(Debug, Clone)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub price: Option<BigDecimal>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub price: Option<BigDecimal>,
    pub stock: i32,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title may not be blank".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title may not exceed {MAX_TITLE_LEN} characters"
            )));
        }
        let isbn = self.isbn.trim();
        if isbn.is_empty() || isbn.chars().count() > MAX_ISBN_LEN {
            return Err(DomainError::Validation(format!(
                "isbn must be between 1 and {MAX_ISBN_LEN} characters"
            )));
        }
        if self.price.as_ref().is_some_and(|p| *p < BigDecimal::zero()) {
            return Err(DomainError::Validation("price may not be negative".to_string()));
        }
        if let Some(price) = &self.price {
            let max = BigDecimal::from_str(MAX_PRICE)
                .map_err(|e| DomainError::Internal(e.to_string()))?;
            if *price > max {
                return Err(DomainError::Validation(format!(
                    "price may not exceed {MAX_PRICE}"
                )));
            }
        }
        if self.stock < 0 {
            return Err(DomainError::Validation("stock may not be negative".to_string()));
        }
        Ok(())
    }
}
