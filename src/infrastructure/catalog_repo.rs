use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::catalog::{Book, NewBook};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::books;

use super::models::{BookRow, NewBookRow};

/// Point lookup on the unique ISBN index, usable inside a caller's transaction.
pub(crate) fn find_book(conn: &mut PgConnection, isbn: &str) -> Result<Option<Book>, DomainError> {
    log::debug!("resolving ISBN {isbn}");
    let row = books::table
        .filter(books::isbn.eq(isbn))
        .select(BookRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Book::from))
}

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(books::table)
            .values(&NewBookRow {
                title: &book.title,
                isbn: &book.isbn,
                price: book.price.as_ref(),
                stock: book.stock,
            })
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::Conflict(format!("book with ISBN {} already exists", book.isbn))
                }
                other => other.into(),
            })?;
        Ok(row.into())
    }

    fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let mut conn = self.pool.get()?;
        find_book(&mut conn, isbn)
    }

    fn list(&self) -> Result<Vec<Book>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = books::table
            .select(BookRow::as_select())
            .order(books::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }
}
