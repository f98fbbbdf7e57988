use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{Book, NewBook};
use crate::errors::{AppError, ErrorResponse};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub isbn: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: Option<String>,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub price: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        BookResponse {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            price: book.price.map(|p| p.with_scale(2).to_string()),
            stock: book.stock,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// POST /books
#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "ISBN already exists", body = ErrorResponse),
    ),
    tag = "books"
)]
pub async fn create_book(
    state: web::Data<AppState>,
    body: web::Json<CreateBookRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = body
        .price
        .as_deref()
        .map(BigDecimal::from_str)
        .transpose()
        .map_err(|e| AppError::BadRequest(format!("Invalid price: {e}")))?;
    let new_book = NewBook {
        title: body.title,
        isbn: body.isbn,
        price,
        stock: body.stock,
    };

    let book = web::block(move || state.catalog.add_book(new_book))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(BookResponse::from(book)))
}

/// GET /books
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = Vec<BookResponse>),
    ),
    tag = "books"
)]
pub async fn list_books(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let books = web::block(move || state.catalog.list_books())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /books/{isbn}
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    params(
        ("isbn" = String, Path, description = "Book ISBN"),
    ),
    responses(
        (status = 200, description = "Book found", body = BookResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
    ),
    tag = "books"
)]
pub async fn get_book(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let isbn = path.into_inner();

    let book = {
        let isbn = isbn.clone();
        web::block(move || state.catalog.find_by_isbn(&isbn))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??
    };

    match book {
        Some(book) => Ok(HttpResponse::Ok().json(BookResponse::from(book))),
        None => Err(AppError::NotFound(format!("Book with ISBN {isbn} not found."))),
    }
}
