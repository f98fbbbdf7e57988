use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::catalog::Book;
use super::errors::DomainError;

pub const MAX_QUANTITY: i32 = 10_000;

/// Exclusive upper bound of an invoice total (`NUMERIC(10, 2)`).
pub const MAX_ORDER_TOTAL: i64 = 100_000_000;

/// One requested (ISBN, quantity) pair.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub isbn: String,
    pub quantity: i32,
}

impl LineItem {
    pub fn new(isbn: impl Into<String>, quantity: i32) -> Self {
        Self {
            isbn: isbn.into(),
            quantity,
        }
    }
}

/// Rejects an empty order and quantities outside `1..=MAX_QUANTITY`.
pub fn validate_lines(lines: &[LineItem]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::Validation(
            "at least one book is required".to_string(),
        ));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
        return Err(DomainError::Validation(format!(
            "quantity for ISBN {} must be at least 1",
            line.isbn
        )));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity > MAX_QUANTITY) {
        return Err(DomainError::Validation(format!(
            "quantity for ISBN {} may not exceed {MAX_QUANTITY}",
            line.isbn
        )));
    }
    Ok(())
}

/// A line resolved against the catalog, carrying the unit price snapshot.
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub book_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl PricedItem {
    pub fn subtotal(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub total_amount: BigDecimal,
}

/// Resolves every line through `lookup` and totals the priced items.
///
/// Stops at the first ISBN the lookup cannot find. Callers run this inside the
/// transaction that writes the items, so an early return leaves nothing behind.
pub fn price_lines<F>(lines: &[LineItem], mut lookup: F) -> Result<PricedOrder, DomainError>
where
    F: FnMut(&str) -> Result<Option<Book>, DomainError>,
{
    let mut items = Vec::with_capacity(lines.len());
    let mut total_amount = BigDecimal::zero();

    for line in lines {
        let book = lookup(&line.isbn)?
            .ok_or_else(|| DomainError::BookNotFound(line.isbn.clone()))?;
        let price = book
            .price
            .ok_or_else(|| DomainError::BookUnpriced(line.isbn.clone()))?;
        let item = PricedItem {
            book_id: book.id,
            quantity: line.quantity,
            price,
        };
        total_amount += item.subtotal();
        items.push(item);
    }

    if total_amount >= BigDecimal::from(MAX_ORDER_TOTAL) {
        return Err(DomainError::Validation(format!(
            "order total may not reach {MAX_ORDER_TOTAL}"
        )));
    }

    Ok(PricedOrder {
        items,
        total_amount,
    })
}

pub fn invoice_number(order_id: i32) -> String {
    format!("INV{order_id}")
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub book_title: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct InvoiceView {
    pub invoice_number: String,
    pub billing_date: DateTime<Utc>,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub username: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub invoice: Option<InvoiceView>,
}
