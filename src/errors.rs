use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Order placement failed: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            // 409: correctable by the user, retryable after a short delay in
            // the CheckoutInProgress case.
            DomainError::DuplicateEntry | DomainError::CheckoutInProgress => {
                AppError::Conflict(e.to_string())
            }
            DomainError::EmptyCart => AppError::UnprocessableEntity(e.to_string()),
            DomainError::ProductNotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::OrderCreationFailed => AppError::BadGateway(e.to_string()),
            DomainError::StorageUnavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::UnprocessableEntity(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadGateway(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": self.to_string()
            })),
            // Storage details stay in the logs.
            AppError::ServiceUnavailable(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Service temporarily unavailable"
                }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn duplicate_entry_maps_to_conflict() {
        let err: AppError = DomainError::DuplicateEntry.into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn checkout_in_progress_maps_to_conflict() {
        let err: AppError = DomainError::CheckoutInProgress.into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn empty_cart_maps_to_unprocessable_entity() {
        let err: AppError = DomainError::EmptyCart.into();
        assert_eq!(
            err.error_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn product_not_found_maps_to_not_found() {
        let err: AppError = DomainError::ProductNotFound.into();
        assert_eq!(err.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err: AppError = DomainError::InvalidInput("quantity".to_string()).into();
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn order_creation_failed_maps_to_bad_gateway() {
        let err: AppError = DomainError::OrderCreationFailed.into();
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn storage_unavailable_maps_to_service_unavailable_and_hides_details() {
        let err: AppError = DomainError::StorageUnavailable("connection refused".to_string()).into();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
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
    fn conflict_message_reaches_the_caller() {
        let err: AppError = DomainError::DuplicateEntry.into();
        assert_eq!(err.to_string(), "Item is already in the cart");
    }
}
