//! Cart and order placement.

use multivendor_core::{Price, ProductId};

use super::{View, ViewContext, ViewState};
use crate::models::{CartEntry, NewOrder, OrderError};

/// Shown when an order is attempted with nothing in the cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Please add items to the cart.";

/// Shown when the cart's prices add up to more than a price can hold.
pub const CART_TOTAL_MESSAGE: &str = "The cart total could not be calculated.";

/// Cart contents and the order button.
pub struct OrderFormView {
    ctx: ViewContext,
    pub cart: ViewState<Vec<CartEntry>>,
    /// Outcome of the last remove or order.
    pub order: ViewState<String>,
}

impl OrderFormView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            cart: ViewState::Idle,
            order: ViewState::Idle,
        }
    }

    pub async fn load(&mut self) {
        self.cart = ViewState::Loading;
        let token = self.ctx.token();
        self.cart = match self.ctx.api().fetch_cart(token.as_ref()).await {
            Ok(cart) if cart_total(&cart).is_none() => {
                tracing::warn!(entries = cart.len(), "Cart total is out of range");
                ViewState::Error(CART_TOTAL_MESSAGE.to_string())
            }
            Ok(cart) => ViewState::Success(cart),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to fetch cart")),
        };
    }

    /// Whether the loaded cart holds no items. A cart that failed to load
    /// counts as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart
            .value()
            .is_none_or(|cart| cart.iter().all(|entry| entry.items.is_empty()))
    }

    /// Total of every line in the cart. An unloaded cart totals zero;
    /// `None` means the total is out of range.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.cart.value().map_or(Some(Price::ZERO), |cart| cart_total(cart))
    }

    /// Take a product out of the cart, then reload it.
    pub async fn remove_item(&mut self, id: &ProductId) {
        self.order = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().remove_from_cart(token.as_ref(), id).await {
            Ok(_) => {
                self.ctx.sync_snapshot(&self.ctx.cart_snapshot(), |s| s.remove(id));
                self.order = ViewState::Success("Item removed from cart".to_string());
                self.load().await;
            }
            Err(e) => {
                self.order = ViewState::Error(self.ctx.failure(&e, "Error removing product from cart"));
            }
        }
    }

    /// Order everything in the loaded cart as a pending order.
    ///
    /// Nothing is sent when the cart failed to load, is empty, or has a
    /// total out of range. After a successful order the cart is fetched
    /// again.
    pub async fn place_order(&mut self) {
        if self.cart.error().is_some() {
            return;
        }

        let cart = self.cart.value().map(Vec::as_slice).unwrap_or_default();
        let order = match NewOrder::from_cart(cart) {
            Ok(order) => order,
            Err(OrderError::EmptyCart) => {
                self.order = ViewState::Error(EMPTY_CART_MESSAGE.to_string());
                return;
            }
            Err(OrderError::AmountOutOfRange) => {
                self.order = ViewState::Error(CART_TOTAL_MESSAGE.to_string());
                return;
            }
        };

        self.order = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().place_order(token.as_ref(), &order).await {
            Ok(_) => {
                tracing::info!(items = order.items.len(), amount = %order.amount, "Order placed");
                self.ctx.sync_snapshot(&self.ctx.cart_snapshot(), |s| s.replace(&[]));
                self.order = ViewState::Success("Order placed successfully!".to_string());
                self.load().await;
            }
            Err(e) => {
                self.order = ViewState::Error(self.ctx.failure(&e, "Failed to place order"));
            }
        }
    }
}

fn cart_total(cart: &[CartEntry]) -> Option<Price> {
    cart.iter()
        .try_fold(Price::ZERO, |total, entry| total.checked_add(entry.total()?))
}

impl View for OrderFormView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::views::testing::Harness;

    #[tokio::test]
    async fn test_empty_cart_is_refused_without_request() {
        let harness = Harness::signed_in("buyer");
        let mut view = OrderFormView::new(harness.context());
        view.cart = ViewState::Success(Vec::new());

        view.place_order().await;

        assert_eq!(view.order.error(), Some(EMPTY_CART_MESSAGE));
        assert!(view.is_empty());
        assert_eq!(view.total(), Some(Price::ZERO));
    }

    #[tokio::test]
    async fn test_unloaded_cart_counts_as_empty() {
        let harness = Harness::signed_in("buyer");
        let mut view = OrderFormView::new(harness.context());

        view.place_order().await;

        assert_eq!(view.order.error(), Some(EMPTY_CART_MESSAGE));
    }

    #[tokio::test]
    async fn test_out_of_range_total_is_refused_without_request() {
        let harness = Harness::signed_in("buyer");
        let mut view = OrderFormView::new(harness.context());
        view.cart = ViewState::Success(
            serde_json::from_value(json!([{
                "_id": "c1",
                "items": [{"product": {"_id": "p1", "price": 5e28}, "unit": 2}]
            }]))
            .unwrap(),
        );

        assert_eq!(view.total(), None);
        view.place_order().await;

        assert_eq!(view.order.error(), Some(CART_TOTAL_MESSAGE));
        assert!(!view.context().auth_failed());
    }

    #[tokio::test]
    async fn test_failed_cart_load_skips_the_order() {
        let harness = Harness::signed_in("buyer");
        let mut view = OrderFormView::new(harness.context());
        view.load().await;
        assert!(view.cart.error().is_some());

        view.place_order().await;

        assert!(view.order.is_idle());
    }
}
