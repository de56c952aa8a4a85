//! Wishlist page.

use multivendor_core::ProductId;

use super::{View, ViewContext, ViewState};
use crate::models::Product;

/// The signed-in shopper's wishlist.
///
/// Every successful call returns the whole wishlist, which replaces both the
/// shown list and the local snapshot.
pub struct WishlistView {
    ctx: ViewContext,
    pub items: ViewState<Vec<Product>>,
    /// Outcome of the last add/remove.
    pub action: ViewState<String>,
}

impl WishlistView {
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            items: ViewState::Idle,
            action: ViewState::Idle,
        }
    }

    pub async fn load(&mut self) {
        self.items = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().fetch_wishlist(token.as_ref()).await {
            Ok(items) => self.show(items),
            Err(e) => self.items = ViewState::Error(self.ctx.failure(&e, "Failed to fetch wishlist")),
        }
    }

    pub async fn add(&mut self, id: &ProductId) {
        self.action = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().add_to_wishlist(token.as_ref(), id).await {
            Ok(items) => {
                self.show(items);
                self.action = ViewState::Success("Added to wishlist".to_string());
            }
            Err(e) => {
                self.action = ViewState::Error(self.ctx.failure(&e, "Error adding product to wishlist"));
            }
        }
    }

    pub async fn remove(&mut self, id: &ProductId) {
        self.action = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().remove_from_wishlist(token.as_ref(), id).await {
            Ok(items) => {
                self.show(items);
                self.action = ViewState::Success("Removed from wishlist".to_string());
            }
            Err(e) => {
                self.action =
                    ViewState::Error(self.ctx.failure(&e, "Error removing product from wishlist"));
            }
        }
    }

    fn show(&mut self, items: Vec<Product>) {
        let ids: Vec<ProductId> = items.iter().map(|p| p.id.clone()).collect();
        self.ctx.sync_snapshot(&self.ctx.wishlist_snapshot(), |s| s.replace(&ids));
        self.items = ViewState::Success(items);
    }
}

impl View for WishlistView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SIGN_IN_MESSAGE;
    use crate::views::testing::Harness;

    #[tokio::test]
    async fn test_signed_out_wishlist_is_unauthorized() {
        let harness = Harness::signed_out();
        let mut view = WishlistView::new(harness.context());
        view.load().await;

        assert_eq!(view.items.error(), Some(SIGN_IN_MESSAGE));
        assert!(view.context().auth_failed());
    }
}
