use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A catalog product as seen by the cart/checkout core. The catalog owns
/// these rows; this core only ever reads them. `price` is the live catalog
/// price, not a snapshot.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for listing a new product for sale.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub seller_id: Uuid,
}
