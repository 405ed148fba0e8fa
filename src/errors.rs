use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    #[error("Only {available} left in stock")]
    InsufficientStock { product_id: Uuid, available: i32 },

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::InsufficientStock {
                product_id,
                available,
            } => AppError::InsufficientStock {
                product_id,
                available,
            },
            e @ (DomainError::InvalidInput(_) | DomainError::EmptyCart) => {
                AppError::BadRequest(e.to_string())
            }
            e @ DomainError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            DomainError::IntegrityFault(msg) => {
                AppError::Internal(format!("inventory integrity fault: {msg}"))
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InsufficientStock {
                product_id,
                available,
            } => json!({
                "error": self.to_string(),
                "productId": product_id,
                "available": available,
            }),
            AppError::Internal(detail) => {
                log::error!("Request failed: {}", detail);
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;
    use actix_web::ResponseError;

    #[test]
    fn unauthorized_returns_401() {
        assert_eq!(
            AppError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("order").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound("order").to_string(), "order not found");
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound("cart line").into();
        assert!(matches!(app_err, AppError::NotFound("cart line")));
    }

    #[test]
    fn domain_forbidden_maps_to_403() {
        let app_err: AppError = DomainError::Forbidden.into();
        assert_eq!(app_err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn business_rejections_map_to_400() {
        for e in [
            DomainError::EmptyCart,
            DomainError::InvalidInput("quantity must be at least 1".to_string()),
            DomainError::InsufficientStock {
                product_id: Uuid::new_v4(),
                available: 2,
            },
        ] {
            let app_err: AppError = e.into();
            assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let app_err: AppError = DomainError::InvalidTransition {
            from: OrderStatus::Canceled,
            to: OrderStatus::Canceled,
        }
        .into();
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn integrity_fault_is_a_server_error() {
        let app_err: AppError = DomainError::IntegrityFault("sold < 0".to_string()).into();
        assert!(
            matches!(&app_err, AppError::Internal(detail) if detail.starts_with("inventory integrity fault"))
        );
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
