use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::order_service::{AdminAccess, ListScope};
use crate::domain::account::Credentials;
use crate::domain::order::{LineItem, OrderView};
use crate::errors::{AppError, ErrorResponse};
use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookOrderRequest {
    pub isbn: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub email: String,
    pub password: String,
    pub books: Vec<BookOrderRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub email: String,
    pub password: String,
    /// Required; kept optional so a missing value gets a readable error.
    pub order_id: Option<i32>,
    pub books: Vec<BookOrderRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub order_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub book_name: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub invoice_number: String,
    pub billing_date: DateTime<Utc>,
    /// Decimal amount as a string with two decimal places, e.g. "20.00"
    pub total_amount: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_name: String,
    pub order_date: DateTime<Utc>,
    pub order_items: Vec<OrderItemResponse>,
    pub invoice: Option<InvoiceResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            id: view.id,
            user_name: view.username,
            order_date: view.order_date,
            order_items: view
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    book_name: item.book_title,
                    quantity: item.quantity,
                })
                .collect(),
            invoice: view.invoice.map(|inv| InvoiceResponse {
                invoice_number: inv.invoice_number,
                billing_date: inv.billing_date,
                total_amount: inv.total_amount.with_scale(2).to_string(),
            }),
        }
    }
}

fn to_lines(books: Vec<BookOrderRequest>) -> Vec<LineItem> {
    books
        .into_iter()
        .map(|b| LineItem::new(b.isbn, b.quantity))
        .collect()
}

fn credentials(email: String, password: String) -> Result<Credentials, AppError> {
    let credentials = Credentials::new(email, password);
    credentials.validate()?;
    Ok(credentials)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order for the authenticated user. The order, its items and its
/// invoice are written in one transaction; an unknown ISBN writes nothing.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid input, credentials or ISBN", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let credentials = credentials(body.email, body.password)?;
    let lines = to_lines(body.books);

    let order = web::block(move || state.orders.place_order(&credentials, &lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// With `email` and `password` returns that user's orders. Without them
/// returns every order, which requires admin access when a token is configured.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("email" = Option<String>, Query, description = "Owner email"),
        ("password" = Option<String>, Query, description = "Owner password"),
        ("X-Admin-Token" = Option<String>, Header, description = "Admin token for listing all orders"),
    ),
    responses(
        (status = 200, description = "Orders", body = Vec<OrderResponse>),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let scope = match (params.email, params.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            ListScope::Owner(Credentials::new(email, password))
        }
        _ => {
            let presented = req
                .headers()
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok());
            ListScope::All(AdminAccess::check(state.admin_token.as_deref(), presented)?)
        }
    };

    let orders = web::block(move || state.orders.list_orders(&scope))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /orders
///
/// Replaces every item and the invoice of an order owned by the caller. The
/// order id and date are kept; a failure leaves the previous items in place.
#[utoipa::path(
    put,
    path = "/orders",
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid input, credentials or ISBN", body = ErrorResponse),
        (status = 404, description = "Order not found for this user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order_id = body
        .order_id
        .ok_or_else(|| AppError::BadRequest("order_id is required for update".to_string()))?;
    let credentials = credentials(body.email, body.password)?;
    let lines = to_lines(body.books);

    let order = web::block(move || state.orders.update_order(&credentials, order_id, &lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders
///
/// Cancels an order owned by the caller, removing its items and invoice.
#[utoipa::path(
    delete,
    path = "/orders",
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = ErrorResponse),
        (status = 404, description = "Order not found for this user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    body: web::Json<CancelOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let (Some(email), Some(password), Some(order_id)) = (body.email, body.password, body.order_id)
    else {
        return Err(AppError::BadRequest(
            "email, password and order_id are required".to_string(),
        ));
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "email, password and order_id are required".to_string(),
        ));
    }
    let credentials = Credentials::new(email, password);

    web::block(move || state.orders.cancel_order(&credentials, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::order::{InvoiceView, OrderItemView};

    #[test]
    fn order_response_uses_wire_keys_and_two_decimal_total() {
        let now = Utc::now();
        let view = OrderView {
            id: 7,
            username: "alice".to_string(),
            order_date: now,
            items: vec![OrderItemView {
                book_title: "Dune".to_string(),
                quantity: 2,
            }],
            invoice: Some(InvoiceView {
                invoice_number: "INV7".to_string(),
                billing_date: now,
                total_amount: BigDecimal::from_str("20").expect("valid decimal"),
            }),
        };

        let json = serde_json::to_value(OrderResponse::from(view)).expect("serialize");

        assert_eq!(json["id"], 7);
        assert_eq!(json["user_name"], "alice");
        assert_eq!(json["order_items"][0]["book_name"], "Dune");
        assert_eq!(json["order_items"][0]["quantity"], 2);
        assert_eq!(json["invoice"]["invoice_number"], "INV7");
        assert_eq!(json["invoice"]["total_amount"], "20.00");
    }

    #[test]
    fn missing_invoice_serializes_as_null() {
        let view = OrderView {
            id: 1,
            username: "bob".to_string(),
            order_date: Utc::now(),
            items: vec![],
            invoice: None,
        };
        let json = serde_json::to_value(OrderResponse::from(view)).expect("serialize");
        assert!(json["invoice"].is_null());
    }
}
