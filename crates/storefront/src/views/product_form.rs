//! Create/edit product form.
//!
//! Without a product id the form creates a product from blank fields; with
//! one it loads that product and edits it. Only roles that may manage
//! products get past the permission check, and the check happens before any
//! request.

use multivendor_core::{Category, Price, ProductId};
use serde::Deserialize;

use super::roles::{self, Capability};
use super::{View, ViewContext, ViewState};
use crate::models::ProductDraft;

/// Shown to shoppers who may not manage products.
pub const PERMISSION_MESSAGE: &str = "You do not have permission to create or edit a product.";

/// Raw form fields as posted by the browser.
///
/// The form is rendered from these too, so a rejected submission shows
/// exactly what was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img: String,
    #[serde(default, rename = "type")]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub price: String,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub available: Option<String>,
    #[serde(default)]
    pub seller: String,
}

impl ProductFormInput {
    /// Validate the fields into a draft.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first field that is missing or invalid.
    pub fn parse(&self) -> Result<ProductDraft, String> {
        let required = |value: &str, label: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(format!("{label} is required."))
            } else {
                Ok(value.to_string())
            }
        };

        let name = required(&self.name, "Product name")?;
        let desc = required(&self.desc, "Description")?;
        let img = required(&self.img, "Image URL")?;
        let category = required(&self.category, "Type")?
            .parse::<Category>()
            .map_err(|e| format!("Type: {e}."))?;
        let stock = required(&self.stock, "Stock")?
            .parse::<u32>()
            .map_err(|_| "Stock must be a whole number.".to_string())?;
        let price = Price::parse(&required(&self.price, "Price")?).map_err(|e| format!("Price: {e}."))?;
        let seller = required(&self.seller, "Seller")?;

        Ok(ProductDraft {
            name,
            desc,
            img,
            category: Some(category),
            stock,
            price,
            available: self.available.is_some(),
            seller,
        })
    }
}

impl From<&ProductDraft> for ProductFormInput {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            desc: draft.desc.clone(),
            img: draft.img.clone(),
            category: draft.category.map(|c| c.name().to_string()).unwrap_or_default(),
            stock: draft.stock.to_string(),
            price: draft.price.to_string(),
            available: draft.available.then(|| "on".to_string()),
            seller: draft.seller.clone(),
        }
    }
}

/// Product create/edit form.
pub struct ProductFormView {
    ctx: ViewContext,
    pub id: Option<ProductId>,
    /// Current field values, as shown in the form.
    pub fields: ProductFormInput,
    pub state: ViewState<String>,
    pub allowed: bool,
}

impl ProductFormView {
    #[must_use]
    pub fn new(ctx: ViewContext, id: Option<ProductId>) -> Self {
        let allowed = roles::allows(ctx.session().role(), Capability::ManageProducts);
        Self {
            ctx,
            id,
            fields: ProductFormInput::from(&ProductDraft::default()),
            state: ViewState::Idle,
            allowed,
        }
    }

    /// Editing an existing product rather than creating one.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Categories offered by the type selector.
    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Whether the type field holds the category named `name`.
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.fields
            .category
            .trim()
            .parse::<Category>()
            .is_ok_and(|c| c.name() == name)
    }

    /// Whether the available box is ticked.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.fields.available.is_some()
    }

    /// In edit mode, fill the fields from the stored product.
    pub async fn load(&mut self) {
        if !self.allowed {
            self.state = ViewState::Error(PERMISSION_MESSAGE.to_string());
            return;
        }
        let Some(id) = self.id.clone() else {
            return;
        };

        self.state = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().fetch_product(token.as_ref(), &id).await {
            Ok(product) => {
                self.fields = ProductFormInput::from(&ProductDraft::from(&product));
                self.state = ViewState::Idle;
            }
            Err(e) => {
                self.state =
                    ViewState::Error(self.ctx.failure(&e, "Failed to fetch product details"));
            }
        }
    }

    /// Validate and save the posted fields. Rejected fields stay in the
    /// form as typed.
    pub async fn submit(&mut self, input: ProductFormInput) {
        if !self.allowed {
            self.state = ViewState::Error(PERMISSION_MESSAGE.to_string());
            return;
        }

        match input.parse() {
            Ok(draft) => self.save(draft).await,
            Err(message) => {
                self.fields = input;
                self.state = ViewState::Error(message);
            }
        }
    }

    /// Send `draft` to the catalog. A successful create resets the form.
    pub async fn save(&mut self, draft: ProductDraft) {
        if !self.allowed {
            self.state = ViewState::Error(PERMISSION_MESSAGE.to_string());
            return;
        }

        self.state = ViewState::Loading;
        let token = self.ctx.token();
        let result = match &self.id {
            Some(id) => self.ctx.api().update_product(token.as_ref(), id, &draft).await,
            None => self.ctx.api().create_product(token.as_ref(), &draft).await,
        };

        match (result, self.id.is_some()) {
            (Ok(product), true) => {
                tracing::info!(product_id = %product.id, "Product updated");
                self.fields = ProductFormInput::from(&draft);
                self.state = ViewState::Success("Product updated successfully!".to_string());
            }
            (Ok(product), false) => {
                tracing::info!(product_id = %product.id, "Product created");
                self.fields = ProductFormInput::from(&ProductDraft::default());
                self.state = ViewState::Success("Product created successfully!".to_string());
            }
            (Err(e), is_edit) => {
                let fallback = if is_edit {
                    "Failed to update product"
                } else {
                    "Failed to create product"
                };
                self.fields = ProductFormInput::from(&draft);
                self.state = ViewState::Error(self.ctx.failure(&e, fallback));
            }
        }
    }
}

impl View for ProductFormView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    fn input() -> ProductFormInput {
        ProductFormInput {
            name: "Lamp".into(),
            desc: "Bright".into(),
            img: "https://img.example/lamp.png".into(),
            category: "furniture".into(),
            stock: "3".into(),
            price: "19.99".into(),
            available: Some("on".into()),
            seller: "Lumen".into(),
        }
    }

    #[test]
    fn test_parse_input() {
        let draft = input().parse().unwrap();
        assert_eq!(draft.category, Some(Category::Furniture));
        assert_eq!(draft.price, Price::from_cents(1999));
        assert!(draft.available);

        let unticked = ProductFormInput {
            available: None,
            ..input()
        };
        assert!(!unticked.parse().unwrap().available);

        let no_name = ProductFormInput {
            name: "  ".into(),
            ..input()
        };
        assert_eq!(no_name.parse().unwrap_err(), "Product name is required.");

        let bad_stock = ProductFormInput {
            stock: "-1".into(),
            ..input()
        };
        assert!(bad_stock.parse().is_err());
    }

    #[tokio::test]
    async fn test_create_mode_starts_from_defaults() {
        let harness = Harness::signed_in("seller");
        let mut view = ProductFormView::new(harness.context(), None);
        view.load().await;

        assert!(!view.is_edit());
        assert_eq!(view.fields.name, "");
        assert_eq!(view.fields.stock, "0");
        assert_eq!(view.fields.price, "0.00");
        assert!(view.is_available());
        assert!(view.state.is_idle());
    }

    #[tokio::test]
    async fn test_buyer_is_blocked_before_any_request() {
        let harness = Harness::signed_in("buyer");
        let mut view = ProductFormView::new(harness.context(), Some(ProductId::new("p1")));

        view.load().await;
        assert_eq!(view.state.error(), Some(PERMISSION_MESSAGE));

        view.submit(input()).await;
        assert_eq!(view.state.error(), Some(PERMISSION_MESSAGE));
        assert!(!view.context().auth_failed());
    }

    #[tokio::test]
    async fn test_invalid_input_keeps_form_without_request() {
        let harness = Harness::signed_in("seller");
        let mut view = ProductFormView::new(harness.context(), None);

        view.submit(ProductFormInput::default()).await;
        assert_eq!(view.state.error(), Some("Product name is required."));
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_typed_fields() {
        let harness = Harness::signed_in("seller");
        let mut view = ProductFormView::new(harness.context(), Some(ProductId::new("p1")));
        let typed = ProductFormInput {
            stock: "three".into(),
            ..input()
        };

        view.submit(typed.clone()).await;

        assert_eq!(view.state.error(), Some("Stock must be a whole number."));
        assert_eq!(view.fields, typed);
        assert_eq!(view.fields.name, "Lamp");
        assert_eq!(view.fields.seller, "Lumen");
        assert!(view.is_selected("Furniture"));
        assert!(view.is_edit());
    }

    #[test]
    fn test_fields_from_draft() {
        let draft = input().parse().unwrap();
        let fields = ProductFormInput::from(&draft);
        assert_eq!(fields.category, "Furniture");
        assert_eq!(fields.price, "19.99");
        assert_eq!(fields.parse().unwrap(), draft);
    }
}
