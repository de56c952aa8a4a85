//! Product listings and product detail.

use multivendor_core::ProductId;

use super::roles::{self, Capability};
use super::{View, ViewContext, ViewState};
use crate::models::Product;

/// Every product, with wishlist and cart actions.
pub struct ProductListView {
    ctx: ViewContext,
    pub products: ViewState<Vec<Product>>,
    /// Outcome of the last wishlist/cart action.
    pub action: ViewState<String>,
    pub can_shop: bool,
}

impl ProductListView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        let can_shop = roles::allows(ctx.session().role(), Capability::Shop);
        Self {
            ctx,
            products: ViewState::Idle,
            action: ViewState::Idle,
            can_shop,
        }
    }

    pub async fn load(&mut self) {
        self.products = ViewState::Loading;
        let token = self.ctx.token();
        self.products = match self.ctx.api().fetch_products(token.as_ref()).await {
            Ok(products) => ViewState::Success(products),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to fetch products")),
        };
    }

    /// Save a product to the wishlist and refresh the local snapshot.
    pub async fn add_to_wishlist(&mut self, id: &ProductId) {
        self.action = ViewState::Loading;
        let token = self.ctx.token();
        self.action = match self.ctx.api().add_to_wishlist(token.as_ref(), id).await {
            Ok(wishlist) => {
                let ids: Vec<ProductId> = wishlist.into_iter().map(|p| p.id).collect();
                self.ctx
                    .sync_snapshot(&self.ctx.wishlist_snapshot(), |s| s.replace(&ids));
                ViewState::Success("Added to wishlist".to_string())
            }
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Error adding product to wishlist")),
        };
    }

    /// Put `amount` units of a product in the cart and note it locally.
    pub async fn add_to_cart(&mut self, id: &ProductId, amount: u32) {
        if amount == 0 {
            self.action = ViewState::Error("Quantity must be at least 1.".to_string());
            return;
        }

        self.action = ViewState::Loading;
        let token = self.ctx.token();
        self.action = match self.ctx.api().add_to_cart(token.as_ref(), id, amount).await {
            Ok(_) => {
                self.ctx.sync_snapshot(&self.ctx.cart_snapshot(), |s| s.insert(id));
                ViewState::Success("Added to cart".to_string())
            }
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Error adding product to cart")),
        };
    }
}

impl View for ProductListView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

/// Products of one category.
pub struct CategoryProductsView {
    ctx: ViewContext,
    pub category: String,
    pub products: ViewState<Vec<Product>>,
}

impl CategoryProductsView {
    #[must_use]
    pub fn new(ctx: ViewContext, category: impl Into<String>) -> Self {
        Self {
            ctx,
            category: category.into(),
            products: ViewState::Idle,
        }
    }

    pub async fn load(&mut self) {
        self.products = ViewState::Loading;
        let token = self.ctx.token();
        self.products = match self
            .ctx
            .api()
            .fetch_products_by_category(token.as_ref(), &self.category)
            .await
        {
            Ok(products) => ViewState::Success(products),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to fetch products by category")),
        };
    }
}

impl View for CategoryProductsView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

/// One product.
pub struct ProductDetailView {
    ctx: ViewContext,
    pub id: ProductId,
    pub product: ViewState<Product>,
    /// Whether to offer the edit link.
    pub can_edit: bool,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(ctx: ViewContext, id: ProductId) -> Self {
        let can_edit = roles::allows(ctx.session().role(), Capability::ManageProducts);
        Self {
            ctx,
            id,
            product: ViewState::Idle,
            can_edit,
        }
    }

    pub async fn load(&mut self) {
        self.product = ViewState::Loading;
        let token = self.ctx.token();
        self.product = match self.ctx.api().fetch_product(token.as_ref(), &self.id).await {
            Ok(product) => ViewState::Success(product),
            Err(e) => ViewState::Error(self.ctx.failure(&e, "Failed to fetch product details")),
        };
    }
}

impl View for ProductDetailView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NETWORK_ERROR_MESSAGE;
    use crate::views::testing::Harness;

    #[test]
    fn test_edit_link_follows_role() {
        let seller = Harness::signed_in("seller");
        assert!(ProductDetailView::new(seller.context(), ProductId::new("p1")).can_edit);

        let buyer = Harness::signed_in("buyer");
        assert!(!ProductDetailView::new(buyer.context(), ProductId::new("p1")).can_edit);
        assert!(ProductListView::new(buyer.context()).can_shop);
    }

    #[tokio::test]
    async fn test_wishlist_action_needs_session() {
        let harness = Harness::signed_out();
        let mut view = ProductListView::new(harness.context());

        view.add_to_wishlist(&ProductId::new("p1")).await;

        assert!(view.action.error().is_some());
        assert!(view.context().auth_failed());
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_locally() {
        let harness = Harness::signed_in("buyer");
        let mut view = ProductListView::new(harness.context());

        view.add_to_cart(&ProductId::new("p1"), 0).await;

        assert_eq!(view.action.error(), Some("Quantity must be at least 1."));
        assert!(!view.context().auth_failed());
    }

    #[tokio::test]
    async fn test_unreachable_catalog() {
        let harness = Harness::signed_out();
        let mut view = CategoryProductsView::new(harness.context(), "Music");
        view.load().await;
        assert_eq!(view.products.error(), Some(NETWORK_ERROR_MESSAGE));
    }
}
