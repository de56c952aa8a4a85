//! Shopping cart entries.

use multivendor_core::{CartId, CartItemId, Price, ProductId};
use serde::{Deserialize, Serialize};

use super::{Product, ProductRef};

/// One cart document from the shopping service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "_id")]
    pub id: CartId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartEntry {
    /// Sum of the line totals, or `None` if it is out of range.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, item| total.checked_add(item.line_total()?))
    }
}

/// A product and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CartItemId>,
    pub product: Product,
    #[serde(default)]
    pub unit: u32,
}

impl CartItem {
    /// Unit price times quantity, or `None` if it is out of range.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.price.checked_times(self.unit)
    }
}

/// Body of `PUT /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCart {
    pub product: ProductRef,
    pub amount: u32,
}

impl AddToCart {
    #[must_use]
    pub fn new(product: ProductId, amount: u32) -> Self {
        Self {
            product: product.into(),
            amount,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cart_total() {
        let entries: Vec<CartEntry> = serde_json::from_value(json!([{
            "_id": "c1",
            "items": [
                {"_id": "i1", "product": {"_id": "p1", "price": 2.5}, "unit": 2},
                {"product": {"_id": "p2", "price": 10}, "unit": 1}
            ]
        }]))
        .unwrap();

        let cart = &entries[0];
        assert_eq!(cart.items[0].line_total(), Some(Price::from_cents(500)));
        assert_eq!(cart.total(), Some(Price::from_cents(1500)));
        assert_eq!(cart.items[1].id, None);
    }

    #[test]
    fn test_out_of_range_total() {
        let entries: Vec<CartEntry> = serde_json::from_value(json!([{
            "_id": "c1",
            "items": [
                {"product": {"_id": "p1", "price": 5e28}, "unit": 2},
                {"product": {"_id": "p2", "price": 4e28}, "unit": 1},
                {"product": {"_id": "p3", "price": 4e28}, "unit": 1}
            ]
        }]))
        .unwrap();

        let cart = &entries[0];
        assert_eq!(cart.items[0].line_total(), None);
        assert!(cart.items[1].line_total().is_some());
        assert_eq!(cart.total(), None);

        let lines_only = CartEntry {
            items: cart.items[1..].to_vec(),
            ..cart.clone()
        };
        assert_eq!(lines_only.total(), None);
    }

    #[test]
    fn test_add_to_cart_wire_shape() {
        let body = serde_json::to_value(AddToCart::new(ProductId::new("p1"), 3)).unwrap();
        assert_eq!(body, json!({"product": {"_id": "p1"}, "amount": 3}));
    }
}
