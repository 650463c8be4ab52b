use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppCartService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Defaults to 1. Adding a product that is already in the cart is a
    /// conflict, never a quantity bump.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Current catalog price as a decimal string, e.g. "9.99". Display
    /// only; checkout snapshots its own prices.
    pub price: String,
    pub quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cart/items
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Product added to the cart"),
        (status = 400, description = "Quantity is not a positive integer"),
        (status = 404, description = "Product does not exist"),
        (status = 409, description = "Product is already in the cart, or a checkout is in flight"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    service: web::Data<AppCartService>,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    web::block(move || service.add(body.user_id, body.product_id, body.quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().finish())
}

/// DELETE /cart/{user_id}/items/{product_id}
#[utoipa::path(
    delete,
    path = "/cart/{user_id}/items/{product_id}",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner"),
        ("product_id" = Uuid, Path, description = "Product to remove"),
    ),
    responses(
        (status = 204, description = "Removed, or was not there to begin with"),
        (status = 409, description = "A checkout is in flight"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "cart"
)]
pub async fn remove_from_cart(
    service: web::Data<AppCartService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, product_id) = path.into_inner();

    web::block(move || service.remove(user_id, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /cart/{user_id}
///
/// The cart joined with live product data. Lines whose product has been
/// taken off the catalog are not shown.
#[utoipa::path(
    get,
    path = "/cart/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner"),
    ),
    responses(
        (status = 200, description = "Cart contents at current prices", body = CartResponse),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "cart"
)]
pub async fn list_cart(
    service: web::Data<AppCartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let lines = web::block(move || service.list(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut total = BigDecimal::from(0);
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let line_total = &line.product.price * BigDecimal::from(line.quantity);
        total += &line_total;
        items.push(CartLineResponse {
            product_id: line.product.id,
            title: line.product.title,
            description: line.product.description,
            image_url: line.product.image_url,
            price: line.product.price.to_string(),
            quantity: line.quantity,
            line_total: line_total.to_string(),
        });
    }

    Ok(HttpResponse::Ok().json(CartResponse {
        items,
        total: total.to_string(),
    }))
}
