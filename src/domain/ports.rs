//! Storage ports.
//!
//! Each method is one independently-failable, network-visible storage
//! operation; no cross-call atomicity is assumed anywhere. The checkout
//! saga owns recovery when a sequence of these calls fails partway.

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::{CartEntry, CartLine};
use super::catalog::{NewListing, Product};
use super::errors::DomainError;
use super::order::{OrderStatus, PricedLine};

pub trait CartRepository: Send + Sync + 'static {
    /// Insert one cart row. A row for this (user, product) already existing
    /// is `DuplicateEntry` — quantities are never silently bumped.
    fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<(), DomainError>;

    /// Delete the matching row. Absent row is a no-op, not an error.
    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<(), DomainError>;

    /// Raw rows for the user, without the product join. What checkout reads:
    /// rows whose product has vanished still show up here.
    fn entries(&self, user_id: Uuid) -> Result<Vec<CartEntry>, DomainError>;

    /// Rows joined with live product data, in insertion order. For display.
    fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError>;

    /// Delete all of the user's rows. Idempotent; safe to retry blindly.
    fn clear(&self, user_id: Uuid) -> Result<(), DomainError>;
}

pub trait ProductCatalog: Send + Sync + 'static {
    fn get(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// All products, newest first.
    fn list(&self) -> Result<Vec<Product>, DomainError>;

    fn create(&self, listing: NewListing) -> Result<Uuid, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Insert the order row in `Pending` status with its fixed total.
    fn create_pending(&self, user_id: Uuid, total: BigDecimal) -> Result<Uuid, DomainError>;

    /// Insert the order's items. One storage call; may fail after the order
    /// row exists, which is the saga's main compensation case.
    fn append_items(&self, order_id: Uuid, lines: &[PricedLine]) -> Result<(), DomainError>;

    /// Set the order status. A primary-key update to a constant, so
    /// idempotent and safe to retry.
    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), DomainError>;

    /// Delete the order and, via cascade, any items already written.
    /// Compensation only.
    fn delete(&self, order_id: Uuid) -> Result<(), DomainError>;
}
