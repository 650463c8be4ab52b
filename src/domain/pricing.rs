//! Price snapshotting.
//!
//! Pure functions, no I/O. A snapshot taken here is what gets written into
//! an order item as `price_at_time`; whatever happens to the catalog price
//! afterwards, the snapshot stands.

use bigdecimal::BigDecimal;

use super::catalog::Product;
use super::order::PricedLine;

/// Freeze the product's current catalog price.
pub fn snapshot_price(product: &Product) -> BigDecimal {
    product.price.clone()
}

/// Build an order line from a product and a quantity, snapshotting the
/// price in the process.
pub fn price_line(product: &Product, quantity: i32) -> PricedLine {
    PricedLine {
        product_id: product.id,
        quantity,
        price_at_time: snapshot_price(product),
    }
}

pub fn line_total(line: &PricedLine) -> BigDecimal {
    &line.price_at_time * BigDecimal::from(line.quantity)
}

/// Total over a set of priced lines: Σ(price_at_time × quantity).
pub fn order_total(lines: &[PricedLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |sum, line| sum + line_total(line))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn product(price: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Acoustic Guitar".to_string(),
            description: "Yamaha FG800 with case".to_string(),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            image_url: String::new(),
            seller_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_equals_catalog_price_at_snapshot_time() {
        let p = product("150.00");
        assert_eq!(
            snapshot_price(&p),
            BigDecimal::from_str("150.00").unwrap()
        );
    }

    #[test]
    fn snapshot_survives_later_catalog_price_change() {
        let mut p = product("10.00");
        let line = price_line(&p, 2);

        p.price = BigDecimal::from_str("99.99").unwrap();

        assert_eq!(line.price_at_time, BigDecimal::from_str("10.00").unwrap());
        assert_eq!(line_total(&line), BigDecimal::from_str("20.00").unwrap());
    }

    #[test]
    fn order_total_sums_price_times_quantity() {
        // (P1, qty 2, 10.00) + (P2, qty 1, 5.00) = 25.00
        let lines = vec![
            price_line(&product("10.00"), 2),
            price_line(&product("5.00"), 1),
        ];
        assert_eq!(
            order_total(&lines),
            BigDecimal::from_str("25.00").unwrap()
        );
    }

    #[test]
    fn order_total_of_no_lines_is_zero() {
        assert_eq!(order_total(&[]), BigDecimal::from(0));
    }
}
