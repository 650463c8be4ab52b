use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, PricedLine};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow};

/// Order rows in Postgres. Every method is one statement on its own
/// connection; the checkout saga sequences them and compensates, so no
/// transaction spans them here.
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create_pending(&self, user_id: Uuid, total: BigDecimal) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let order_id = Uuid::new_v4();
        diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order_id,
                user_id,
                total_amount: total,
                status: OrderStatus::Pending.as_str().to_string(),
            })
            .execute(&mut conn)?;
        Ok(order_id)
    }

    fn append_items(&self, order_id: Uuid, lines: &[PricedLine]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<NewOrderItemRow> = lines
            .iter()
            .map(|l| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id,
                product_id: l.product_id,
                quantity: l.quantity,
                price_at_time: l.price_at_time.clone(),
            })
            .collect();
        diesel::insert_into(order_items::table)
            .values(&rows)
            .execute(&mut conn)?;
        Ok(())
    }

    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(orders::table.find(order_id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    fn delete(&self, order_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Items go with it via ON DELETE CASCADE.
        diesel::delete(orders::table.find(order_id)).execute(&mut conn)?;
        Ok(())
    }
}
