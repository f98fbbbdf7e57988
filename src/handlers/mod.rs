pub mod books;
pub mod orders;
pub mod users;

use actix_web::{error, web, HttpRequest};
use utoipa::OpenApi;

use crate::errors::{AppError, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::place_order,
        orders::list_orders,
        orders::update_order,
        orders::cancel_order,
        users::signup,
        books::create_book,
        books::list_books,
        books::get_book,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "orders", description = "Order placement, update and cancellation"),
        (name = "users", description = "Account signup"),
        (name = "books", description = "Catalog"),
    )
)]
pub struct ApiDoc;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Registers every route plus extractor configs that turn malformed input into
/// `{"error": ...}` 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::place_order))
                .route("", web::get().to(orders::list_orders))
                .route("", web::put().to(orders::update_order))
                .route("", web::delete().to(orders::cancel_order)),
        )
        .service(web::scope("/users").route("", web::post().to(users::signup)))
        .service(
            web::scope("/books")
                .route("", web::post().to(books::create_book))
                .route("", web::get().to(books::list_books))
                .route("/{isbn}", web::get().to(books::get_book)),
        );
}
