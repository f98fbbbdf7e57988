use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_)
            | DomainError::InvalidCredentials
            | DomainError::BookNotFound(_)
            | DomainError::BookUnpriced(_) => AppError::BadRequest(e.to_string()),
            DomainError::OrderNotFound => AppError::NotFound(e.to_string()),
            DomainError::AdminAccessDenied => AppError::Forbidden(e.to_string()),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
            }),
            AppError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: self.to_string(),
            }),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(ErrorResponse {
                error: self.to_string(),
            }),
            AppError::Conflict(_) => HttpResponse::Conflict().json(ErrorResponse {
                error: self.to_string(),
            }),
            AppError::Internal(msg) => {
                log::error!("request failed: {msg}");
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Internal server error".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("gone".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn internal_error_body_hides_details() {
        let resp = AppError::Internal("connection refused".to_string()).error_response();
        let body = to_bytes(resp.into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn bad_request_body_carries_message() {
        let resp = AppError::from(DomainError::BookNotFound("999".to_string())).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "Book with ISBN 999 does not exist.");
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn credential_and_validation_errors_map_to_bad_request() {
        for err in [
            DomainError::InvalidCredentials,
            DomainError::Validation("order_id is required for update".to_string()),
            DomainError::BookUnpriced("111".to_string()),
        ] {
            let app_err: AppError = err.into();
            assert_eq!(app_err.error_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn invalid_credentials_message_matches_wire_format() {
        let app_err: AppError = DomainError::InvalidCredentials.into();
        assert_eq!(app_err.to_string(), "Invalid email or password");
    }

    #[test]
    fn domain_order_not_found_maps_to_404() {
        let app_err: AppError = DomainError::OrderNotFound.into();
        assert!(matches!(app_err, AppError::NotFound(ref m) if m == "Order not found for this user"));
    }

    #[test]
    fn domain_admin_denied_maps_to_403() {
        let app_err: AppError = DomainError::AdminAccessDenied.into();
        assert_eq!(app_err.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn domain_conflict_maps_to_409() {
        let app_err: AppError = DomainError::Conflict("dup".to_string()).into();
        assert_eq!(app_err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
