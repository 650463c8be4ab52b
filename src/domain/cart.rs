use uuid::Uuid;

use super::catalog::Product;

/// A raw cart row. At most one exists per (user_id, product_id); the
/// storage layer's uniqueness constraint enforces it.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A cart entry joined with its live product, for display. The embedded
/// price is the *current* catalog price; checkout snapshots its own.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}
