//! Address form.

use super::{View, ViewContext, ViewState};
use crate::models::Address;

/// Form adding a postal address to the shopper's account.
pub struct AddressFormView {
    ctx: ViewContext,
    /// Current field values.
    pub address: Address,
    pub state: ViewState<String>,
}

impl AddressFormView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            address: Address::default(),
            state: ViewState::Idle,
        }
    }

    /// Check that every field is filled in, then send the address. The form
    /// is cleared on success.
    pub async fn submit(&mut self, address: Address) {
        let address = match address.clone().normalized() {
            Ok(address) => address,
            Err(field) => {
                self.address = address;
                self.state = ViewState::Error(format!("{field} is required."));
                return;
            }
        };

        self.state = ViewState::Loading;
        let token = self.ctx.token();
        match self.ctx.api().add_address(token.as_ref(), &address).await {
            Ok(_) => {
                self.address = Address::default();
                self.state = ViewState::Success("Address added successfully!".to_string());
            }
            Err(e) => {
                self.address = address;
                self.state = ViewState::Error(self.ctx.failure(&e, "Failed to add address"));
            }
        }
    }
}

impl View for AddressFormView {
    fn context(&self) -> &ViewContext {
        &self.ctx
    }
}
