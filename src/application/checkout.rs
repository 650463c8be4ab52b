//! Checkout orchestration.
//!
//! A checkout turns the user's mutable cart into an immutable order record
//! through a sequence of independently-failable storage writes: create the
//! pending order, write its priced items, clear the cart, confirm the
//! order. There is no multi-record transaction underneath, so this module
//! owns recovery when the sequence fails partway.
//!
//! The compensation policy is asymmetric. Failures before or during the
//! item write roll the order back and leave the cart untouched, so the user
//! can simply retry. Failures *after* the items are durable never roll the
//! order back: a purchase is not undone because cart cleanup hiccupped.
//! Cleanup steps are idempotent and retried; when retries run out the
//! condition is logged as `reconciliation required:` for an out-of-band
//! sweep, and the checkout still reports success.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::cart::CartEntry;
use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutReceipt, OrderStatus, PricedLine};
use crate::domain::ports::{CartRepository, OrderRepository, ProductCatalog};
use crate::domain::pricing;

use super::single_flight::SingleFlight;

/// Attempts at the idempotent cleanup writes (cart clear, confirm update)
/// before giving up and flagging reconciliation.
const CLEANUP_ATTEMPTS: u32 = 3;
const CLEANUP_BACKOFF: Duration = Duration::from_millis(50);

/// Progress of one checkout attempt. `Failed` absorbs from `Start`,
/// `OrderCreated` and `ItemsWritten`; once the items are durable the only
/// way forward is `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    OrderCreated,
    ItemsWritten,
    CartCleared,
    Confirmed,
    Failed,
}

pub struct CheckoutOrchestrator<C, O, P> {
    cart: C,
    orders: O,
    catalog: P,
    flights: Arc<SingleFlight>,
}

impl<C, O, P> CheckoutOrchestrator<C, O, P>
where
    C: CartRepository,
    O: OrderRepository,
    P: ProductCatalog,
{
    pub fn new(cart: C, orders: O, catalog: P, flights: Arc<SingleFlight>) -> Self {
        Self {
            cart,
            orders,
            catalog,
            flights,
        }
    }

    /// Run one checkout for the user. At most one may be in flight per user;
    /// a concurrent attempt gets `CheckoutInProgress` immediately.
    pub fn checkout(&self, user_id: Uuid) -> Result<CheckoutReceipt, DomainError> {
        let _flight = self.flights.begin_checkout(user_id)?;
        let mut phase = Phase::Start;

        let entries = self.cart.entries(user_id)?;
        if entries.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        // Snapshot prices now; the totals are fixed for the rest of the
        // attempt no matter what the catalog does in the meantime.
        let lines = self.price_entries(&entries)?;
        if lines.is_empty() {
            // Every product vanished since it was added. Nothing has been
            // written yet, so this is just an empty cart.
            return Err(DomainError::EmptyCart);
        }
        let total = pricing::order_total(&lines);

        let order_id = self
            .orders
            .create_pending(user_id, total.clone())?;
        self.advance(&mut phase, Phase::OrderCreated, user_id, order_id);

        if let Err(e) = self.orders.append_items(order_id, &lines) {
            log::warn!(
                "checkout for user {user_id}: writing items of order {order_id} failed, rolling the order back: {e}"
            );
            self.advance(&mut phase, Phase::Failed, user_id, order_id);
            self.abandon_order(order_id);
            return Err(DomainError::OrderCreationFailed);
        }
        self.advance(&mut phase, Phase::ItemsWritten, user_id, order_id);

        // From here on the purchase is durable. Clear and confirm are both
        // idempotent, so blind bounded retries are safe; their failure is
        // reconciliation work, not checkout failure.
        let cart_cleared = self.clear_cart(user_id, order_id);
        if cart_cleared {
            self.advance(&mut phase, Phase::CartCleared, user_id, order_id);
        }

        self.confirm_order(user_id, order_id);
        self.advance(&mut phase, Phase::Confirmed, user_id, order_id);

        Ok(CheckoutReceipt {
            order_id,
            total,
            cart_cleared,
        })
    }

    /// Price every cart entry against the live catalog. An entry whose
    /// product no longer exists is dropped with a warning rather than
    /// failing the whole checkout.
    fn price_entries(&self, entries: &[CartEntry]) -> Result<Vec<PricedLine>, DomainError> {
        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.catalog.get(entry.product_id)? {
                Some(product) => lines.push(pricing::price_line(&product, entry.quantity)),
                None => log::warn!(
                    "dropping cart line of user {}: product {} no longer exists",
                    entry.user_id,
                    entry.product_id
                ),
            }
        }
        Ok(lines)
    }

    /// Best-effort rollback of an order whose items could not be written.
    /// Delete cascades away any partially written items; if even the delete
    /// fails, try to at least park the order in `Failed` so it never shows
    /// up as pending.
    fn abandon_order(&self, order_id: Uuid) {
        if let Err(delete_err) = self.orders.delete(order_id) {
            log::warn!("could not delete abandoned order {order_id}: {delete_err}");
            if let Err(status_err) = self.orders.update_status(order_id, OrderStatus::Failed) {
                log::error!(
                    "reconciliation required: abandoned order {order_id} could not be deleted or marked failed: {status_err}"
                );
            }
        }
    }

    fn clear_cart(&self, user_id: Uuid, order_id: Uuid) -> bool {
        for attempt in 1..=CLEANUP_ATTEMPTS {
            match self.cart.clear(user_id) {
                Ok(()) => return true,
                Err(e) => {
                    log::warn!(
                        "checkout for user {user_id}: cart clear attempt {attempt}/{CLEANUP_ATTEMPTS} failed: {e}"
                    );
                    if attempt < CLEANUP_ATTEMPTS {
                        thread::sleep(CLEANUP_BACKOFF);
                    }
                }
            }
        }
        log::error!(
            "reconciliation required: order {order_id} is placed but the cart of user {user_id} was not cleared"
        );
        false
    }

    fn confirm_order(&self, user_id: Uuid, order_id: Uuid) {
        for attempt in 1..=CLEANUP_ATTEMPTS {
            match self.orders.update_status(order_id, OrderStatus::Confirmed) {
                Ok(()) => return,
                Err(e) => {
                    log::warn!(
                        "checkout for user {user_id}: confirm attempt {attempt}/{CLEANUP_ATTEMPTS} failed: {e}"
                    );
                    if attempt < CLEANUP_ATTEMPTS {
                        thread::sleep(CLEANUP_BACKOFF);
                    }
                }
            }
        }
        log::error!(
            "reconciliation required: order {order_id} is placed but still reads as pending"
        );
    }

    fn advance(&self, phase: &mut Phase, next: Phase, user_id: Uuid, order_id: Uuid) {
        log::debug!("checkout for user {user_id}, order {order_id}: {phase:?} -> {next:?}");
        *phase = next;
    }
}
