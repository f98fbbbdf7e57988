use crate::domain::catalog::{Book, NewBook};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_book(&self, book: NewBook) -> Result<Book, DomainError> {
        book.validate()?;
        let book = self.repo.create(NewBook {
            title: book.title.trim().to_string(),
            isbn: book.isbn.trim().to_string(),
            ..book
        })?;
        log::info!("added book {} (ISBN {})", book.id, book.isbn);
        Ok(book)
    }

    pub fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        log::debug!("looking up book by ISBN {isbn}");
        self.repo.find_by_isbn(isbn)
    }

    pub fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        self.repo.list()
    }
}
