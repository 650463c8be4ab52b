use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartEntry, CartLine};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, products};

use super::models::{CartItemRow, NewCartItemRow, ProductRow};

/// Cart rows in Postgres. The `UNIQUE (user_id, product_id)` constraint is
/// the only guard against concurrent adds of the same product; there is no
/// application lock here.
pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // A unique violation here becomes DuplicateEntry via the shared
        // error conversion.
        diesel::insert_into(cart_items::table)
            .values(&NewCartItemRow {
                id: Uuid::new_v4(),
                user_id,
                product_id,
                quantity,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Deleting nothing is fine; the row count is deliberately ignored.
        diesel::delete(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id))
                .filter(cart_items::product_id.eq(product_id)),
        )
        .execute(&mut conn)?;
        Ok(())
    }

    fn entries(&self, user_id: Uuid) -> Result<Vec<CartEntry>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .order(cart_items::created_at.asc())
            .select(CartItemRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|r| CartEntry {
                user_id: r.user_id,
                product_id: r.product_id,
                quantity: r.quantity,
            })
            .collect())
    }

    fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(CartItemRow, ProductRow)> = cart_items::table
            .inner_join(products::table)
            .filter(cart_items::user_id.eq(user_id))
            .order(cart_items::created_at.asc())
            .select((CartItemRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(item, product)| CartLine {
                product: product.into(),
                quantity: item.quantity,
            })
            .collect())
    }

    fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id)))
            .execute(&mut conn)?;
        Ok(())
    }
}
