use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppCheckout;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    /// Order total as a decimal string, fixed at checkout time.
    pub total: String,
    /// False when the order was placed but the cart rows are still awaiting
    /// cleanup; the purchase itself went through.
    pub cart_cleared: bool,
}

/// POST /checkout
///
/// Turns the user's cart into an order. The order is priced at the moment
/// of checkout; once placed, later catalog changes cannot touch it.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 409, description = "Another checkout for this user is already in flight"),
        (status = 422, description = "Cart is empty"),
        (status = 502, description = "Order could not be created; the cart was left unchanged"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    orchestrator: web::Data<AppCheckout>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = body.into_inner().user_id;

    let receipt = web::block(move || orchestrator.checkout(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        order_id: receipt.order_id,
        total: receipt.total.to_string(),
        cart_cleared: receipt.cart_cleared,
    }))
}
