use thiserror::Error;

/// Error taxonomy for the cart and checkout core.
///
/// `DuplicateEntry`, `EmptyCart` and `CheckoutInProgress` are
/// user-correctable conditions and are surfaced verbatim; the caller decides
/// whether to retry. `StorageUnavailable` is transient infrastructure.
/// `OrderCreationFailed` means the checkout was rolled back and the cart is
/// intact.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Item is already in the cart")]
    DuplicateEntry,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("A checkout is already in progress for this user")]
    CheckoutInProgress,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Order could not be created; the cart was left unchanged")]
    OrderCreationFailed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}
