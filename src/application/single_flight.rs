//! Per-user advisory lock for cart and checkout work.
//!
//! At most one checkout may be in flight per user, and cart mutations may
//! not overlap an in-flight checkout (its read-then-clear sequence assumes
//! the cart holds still). Mutations do not exclude each other: concurrent
//! adds are meant to race, and the cart table's uniqueness constraint is
//! what decides the winner.
//!
//! Acquisition never blocks. Whoever loses gets `CheckoutInProgress` and
//! can retry after a short delay.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Default)]
struct FlightState {
    checkout: bool,
    mutations: u32,
}

impl FlightState {
    fn is_idle(&self) -> bool {
        !self.checkout && self.mutations == 0
    }
}

/// Registry of in-flight checkouts and cart mutations, keyed by user id.
/// One instance is shared by the cart service and the checkout
/// orchestrator.
#[derive(Default)]
pub struct SingleFlight {
    flights: Mutex<HashMap<Uuid, FlightState>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the user's checkout slot. Fails fast if a checkout or any cart
    /// mutation is already in flight.
    pub fn begin_checkout(&self, user_id: Uuid) -> Result<CheckoutFlight<'_>, DomainError> {
        let mut flights = self.flights.lock().expect("flight registry lock poisoned");
        let state = flights.entry(user_id).or_default();
        if state.checkout || state.mutations > 0 {
            return Err(DomainError::CheckoutInProgress);
        }
        state.checkout = true;
        Ok(CheckoutFlight {
            registry: self,
            user_id,
        })
    }

    /// Claim a mutation slot. Fails fast only while a checkout is in
    /// flight; other mutations may run concurrently.
    pub fn begin_mutation(&self, user_id: Uuid) -> Result<MutationFlight<'_>, DomainError> {
        let mut flights = self.flights.lock().expect("flight registry lock poisoned");
        let state = flights.entry(user_id).or_default();
        if state.checkout {
            return Err(DomainError::CheckoutInProgress);
        }
        state.mutations += 1;
        Ok(MutationFlight {
            registry: self,
            user_id,
        })
    }

    fn end_checkout(&self, user_id: Uuid) {
        let mut flights = self.flights.lock().expect("flight registry lock poisoned");
        if let Some(state) = flights.get_mut(&user_id) {
            state.checkout = false;
            if state.is_idle() {
                flights.remove(&user_id);
            }
        }
    }

    fn end_mutation(&self, user_id: Uuid) {
        let mut flights = self.flights.lock().expect("flight registry lock poisoned");
        if let Some(state) = flights.get_mut(&user_id) {
            state.mutations = state.mutations.saturating_sub(1);
            if state.is_idle() {
                flights.remove(&user_id);
            }
        }
    }
}

/// RAII permit for an in-flight checkout; released on drop, on every exit
/// path.
pub struct CheckoutFlight<'a> {
    registry: &'a SingleFlight,
    user_id: Uuid,
}

impl Drop for CheckoutFlight<'_> {
    fn drop(&mut self) {
        self.registry.end_checkout(self.user_id);
    }
}

/// RAII permit for an in-flight cart mutation.
pub struct MutationFlight<'a> {
    registry: &'a SingleFlight,
    user_id: Uuid,
}

impl Drop for MutationFlight<'_> {
    fn drop(&mut self) {
        self.registry.end_mutation(self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_checkout_for_same_user_is_rejected() {
        let flights = SingleFlight::new();
        let user = Uuid::new_v4();

        let _held = flights.begin_checkout(user).expect("first claim");
        assert!(matches!(
            flights.begin_checkout(user),
            Err(DomainError::CheckoutInProgress)
        ));
    }

    #[test]
    fn checkout_slot_is_free_again_after_drop() {
        let flights = SingleFlight::new();
        let user = Uuid::new_v4();

        drop(flights.begin_checkout(user).expect("first claim"));
        assert!(flights.begin_checkout(user).is_ok());
    }

    #[test]
    fn different_users_do_not_contend() {
        let flights = SingleFlight::new();

        let _a = flights.begin_checkout(Uuid::new_v4()).expect("user a");
        assert!(flights.begin_checkout(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn mutation_is_rejected_while_checkout_is_in_flight() {
        let flights = SingleFlight::new();
        let user = Uuid::new_v4();

        let _checkout = flights.begin_checkout(user).expect("claim");
        assert!(matches!(
            flights.begin_mutation(user),
            Err(DomainError::CheckoutInProgress)
        ));
    }

    #[test]
    fn checkout_is_rejected_while_mutation_is_in_flight() {
        let flights = SingleFlight::new();
        let user = Uuid::new_v4();

        let _mutation = flights.begin_mutation(user).expect("claim");
        assert!(matches!(
            flights.begin_checkout(user),
            Err(DomainError::CheckoutInProgress)
        ));
    }

    #[test]
    fn mutations_may_overlap_each_other() {
        let flights = SingleFlight::new();
        let user = Uuid::new_v4();

        let _first = flights.begin_mutation(user).expect("first");
        let second = flights.begin_mutation(user);
        assert!(second.is_ok());

        // Checkout becomes possible only once both are done.
        drop(second);
        assert!(matches!(
            flights.begin_checkout(user),
            Err(DomainError::CheckoutInProgress)
        ));
    }
}
