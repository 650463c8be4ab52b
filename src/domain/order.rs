use bigdecimal::BigDecimal;
use uuid::Uuid;

/// Order lifecycle status. An order is created `Pending` by the checkout
/// saga and only ever moves to one of the terminal states `Confirmed` or
/// `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Failed => "failed",
        }
    }
}

/// One order line with its price frozen at checkout time. Immutable once
/// written; later catalog price changes never touch it.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_at_time: BigDecimal,
}

/// What a successful checkout hands back to the caller.
///
/// `cart_cleared` is false in the one tolerated partial outcome: the order
/// is confirmed and durable but the cart rows could not be deleted and are
/// left for a later clear.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub total: BigDecimal,
    pub cart_cleared: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_match_storage_codes() {
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
        assert_eq!(OrderStatus::Confirmed.as_str(), "confirmed");
        assert_eq!(OrderStatus::Failed.as_str(), "failed");
    }
}
