use std::sync::Arc;

use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, ProductCatalog};

use super::single_flight::SingleFlight;

/// Cart operations for browsing users. Mutations take a per-user flight
/// permit so they cannot interleave with an in-flight checkout.
pub struct CartService<C, P> {
    cart: C,
    catalog: P,
    flights: Arc<SingleFlight>,
}

impl<C: CartRepository, P: ProductCatalog> CartService<C, P> {
    pub fn new(cart: C, catalog: P, flights: Arc<SingleFlight>) -> Self {
        Self {
            cart,
            catalog,
            flights,
        }
    }

    /// Put a product in the user's cart. One row per (user, product):
    /// adding the same product twice yields `DuplicateEntry`, never a
    /// quantity bump.
    pub fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "quantity must be a positive integer, got {quantity}"
            )));
        }

        let _flight = self.flights.begin_mutation(user_id)?;

        if self.catalog.get(product_id)?.is_none() {
            return Err(DomainError::ProductNotFound);
        }
        self.cart.add(user_id, product_id, quantity)
    }

    /// Remove a product from the cart. Removing something that is not there
    /// succeeds quietly.
    pub fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
        let _flight = self.flights.begin_mutation(user_id)?;
        self.cart.remove(user_id, product_id)
    }

    /// The cart joined with live product data. Read-only and restartable;
    /// takes no flight permit.
    pub fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        self.cart.list(user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use crate::domain::cart::CartEntry;
    use crate::domain::catalog::{NewListing, Product};

    use super::*;

    #[derive(Default)]
    struct FakeCart {
        rows: Mutex<Vec<CartEntry>>,
    }

    impl CartRepository for Arc<FakeCart> {
        fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|r| r.user_id == user_id && r.product_id == product_id)
            {
                return Err(DomainError::DuplicateEntry);
            }
            rows.push(CartEntry {
                user_id,
                product_id,
                quantity,
            });
            Ok(())
        }

        fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
            self.rows
                .lock()
                .unwrap()
                .retain(|r| !(r.user_id == user_id && r.product_id == product_id));
            Ok(())
        }

        fn entries(&self, user_id: Uuid) -> Result<Vec<CartEntry>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        fn list(&self, _user_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
            Ok(vec![])
        }

        fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
            self.rows.lock().unwrap().retain(|r| r.user_id != user_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeCatalog {
        products: Mutex<HashMap<Uuid, Product>>,
    }

    impl FakeCatalog {
        fn insert(&self, price: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.products.lock().unwrap().insert(
                id,
                Product {
                    id,
                    title: "Mountain Bike".to_string(),
                    description: "Trek Marlin 5".to_string(),
                    price: BigDecimal::from_str(price).unwrap(),
                    image_url: String::new(),
                    seller_id: Uuid::new_v4(),
                    created_at: Utc::now(),
                },
            );
            id
        }
    }

    impl ProductCatalog for Arc<FakeCatalog> {
        fn get(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
            Ok(self.products.lock().unwrap().get(&id).cloned())
        }

        fn list(&self) -> Result<Vec<Product>, DomainError> {
            Ok(self.products.lock().unwrap().values().cloned().collect())
        }

        fn create(&self, _listing: NewListing) -> Result<Uuid, DomainError> {
            unimplemented!("not needed by these tests")
        }
    }

    fn service() -> (CartService<Arc<FakeCart>, Arc<FakeCatalog>>, Arc<FakeCatalog>, Arc<SingleFlight>) {
        let cart = Arc::new(FakeCart::default());
        let catalog = Arc::new(FakeCatalog::default());
        let flights = Arc::new(SingleFlight::new());
        (
            CartService::new(cart, Arc::clone(&catalog), Arc::clone(&flights)),
            catalog,
            flights,
        )
    }

    #[test]
    fn add_rejects_non_positive_quantity() {
        let (svc, catalog, _) = service();
        let product = catalog.insert("10.00");

        assert!(matches!(
            svc.add(Uuid::new_v4(), product, 0),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.add(Uuid::new_v4(), product, -3),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn add_rejects_unknown_product() {
        let (svc, _, _) = service();

        assert!(matches!(
            svc.add(Uuid::new_v4(), Uuid::new_v4(), 1),
            Err(DomainError::ProductNotFound)
        ));
    }

    #[test]
    fn second_add_of_same_product_is_a_duplicate() {
        let (svc, catalog, _) = service();
        let user = Uuid::new_v4();
        let product = catalog.insert("10.00");

        svc.add(user, product, 1).expect("first add");
        assert!(matches!(
            svc.add(user, product, 1),
            Err(DomainError::DuplicateEntry)
        ));
    }

    #[test]
    fn remove_of_absent_row_is_a_noop() {
        let (svc, _, _) = service();

        assert!(svc.remove(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn mutations_fail_fast_during_checkout() {
        let (svc, catalog, flights) = service();
        let user = Uuid::new_v4();
        let product = catalog.insert("10.00");

        let _checkout = flights.begin_checkout(user).expect("claim checkout");

        assert!(matches!(
            svc.add(user, product, 1),
            Err(DomainError::CheckoutInProgress)
        ));
        assert!(matches!(
            svc.remove(user, product),
            Err(DomainError::CheckoutInProgress)
        ));
    }
}
