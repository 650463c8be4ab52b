use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::NewListing;
use crate::domain::ports::ProductCatalog;
use crate::errors::AppError;
use crate::infrastructure::product_repo::DieselProductCatalog;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub image_url: String,
    pub seller_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub seller_id: Uuid,
    pub created_at: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// All catalog products, newest first.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Product catalog", body = [ProductResponse]),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "products"
)]
pub async fn list_products(
    catalog: web::Data<DieselProductCatalog>,
) -> Result<HttpResponse, AppError> {
    let all = web::block(move || catalog.list())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductResponse> = all
        .into_iter()
        .map(|p| ProductResponse {
            id: p.id,
            title: p.title,
            description: p.description,
            price: p.price.to_string(),
            image_url: p.image_url,
            seller_id: p.seller_id,
            created_at: p.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Product listed", body = ListingCreatedResponse),
        (status = 400, description = "Price is not a valid non-negative decimal"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "products"
)]
pub async fn create_listing(
    catalog: web::Data<DieselProductCatalog>,
    body: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", body.price, e)))?;
    if price < BigDecimal::from(0) {
        return Err(AppError::BadRequest(format!(
            "Price must not be negative, got {price}"
        )));
    }

    let id = web::block(move || {
        catalog.create(NewListing {
            title: body.title,
            description: body.description,
            price,
            image_url: body.image_url,
            seller_id: body.seller_id,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}
