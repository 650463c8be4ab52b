use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{NewListing, Product};
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::schema::products;

use super::models::{NewProductRow, ProductRow};

pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductCatalog for DieselProductCatalog {
    fn get(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .order(products::created_at.desc())
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn create(&self, listing: NewListing) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProductRow {
                id,
                title: listing.title,
                description: listing.description,
                price: listing.price,
                image_url: listing.image_url,
                seller_id: listing.seller_id,
            })
            .execute(&mut conn)?;
        Ok(id)
    }
}
