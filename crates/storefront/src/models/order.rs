//! Orders.

use multivendor_core::{OrderStatus, Price};
use serde::Serialize;
use thiserror::Error;

use super::{CartEntry, CartItem};

/// Reasons a cart cannot be turned into an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("the cart holds no items")]
    EmptyCart,
    /// A line total or the order amount does not fit in a price.
    #[error("the order total is out of range")]
    AmountOutOfRange,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub items: Vec<CartItem>,
    pub amount: Price,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a pending order for everything in `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart holds no items or its total cannot be
    /// represented.
    pub fn from_cart(cart: &[CartEntry]) -> Result<Self, OrderError> {
        let items: Vec<CartItem> = cart.iter().flat_map(|entry| entry.items.iter().cloned()).collect();
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let lines = items
            .iter()
            .map(CartItem::line_total)
            .collect::<Option<Vec<_>>>()
            .ok_or(OrderError::AmountOutOfRange)?;
        let amount = Price::checked_sum(lines).ok_or(OrderError::AmountOutOfRange)?;
        Ok(Self {
            items,
            amount,
            status: OrderStatus::Pending,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cart(value: serde_json::Value) -> Vec<CartEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_cart_sums_price_times_unit() {
        let cart = cart(json!([{
            "_id": "c1",
            "items": [
                {"product": {"_id": "p1", "price": 3}, "unit": 2},
                {"product": {"_id": "p2", "price": 1.25}, "unit": 4}
            ]
        }]));

        let order = NewOrder::from_cart(&cart).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.amount, Price::from_cents(1100));
        assert_eq!(order.status, OrderStatus::Pending);

        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body["status"], "Pending");
        assert_eq!(body["amount"], json!(11.0));
    }

    #[test]
    fn test_from_empty_cart() {
        assert_eq!(NewOrder::from_cart(&[]), Err(OrderError::EmptyCart));
        assert_eq!(
            NewOrder::from_cart(&cart(json!([{"_id": "c1", "items": []}]))),
            Err(OrderError::EmptyCart)
        );
    }

    #[test]
    fn test_from_cart_with_out_of_range_amount() {
        let overflowing_line = cart(json!([{
            "_id": "c1",
            "items": [{"product": {"_id": "p1", "price": 5e28}, "unit": 2}]
        }]));
        assert_eq!(
            NewOrder::from_cart(&overflowing_line),
            Err(OrderError::AmountOutOfRange)
        );

        let overflowing_sum = cart(json!([
            {"_id": "c1", "items": [{"product": {"_id": "p1", "price": 5e28}, "unit": 1}]},
            {"_id": "c2", "items": [{"product": {"_id": "p2", "price": 5e28}, "unit": 1}]}
        ]));
        assert_eq!(
            NewOrder::from_cart(&overflowing_sum),
            Err(OrderError::AmountOutOfRange)
        );
    }
}
