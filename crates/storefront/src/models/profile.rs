//! Shopper profile and addresses.

use serde::{Deserialize, Serialize};

/// Profile held by the auth service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub gender: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

/// A postal address (`POST /address`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl Address {
    /// Trim every field and check none is blank.
    ///
    /// # Errors
    ///
    /// Returns the label of the first empty field.
    pub fn normalized(self) -> Result<Self, &'static str> {
        let field = |value: String, label: &'static str| {
            let value = value.trim().to_string();
            if value.is_empty() { Err(label) } else { Ok(value) }
        };

        Ok(Self {
            street: field(self.street, "Street")?,
            postal_code: field(self.postal_code, "Postal code")?,
            city: field(self.city, "City")?,
            country: field(self.country, "Country")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_profile_decodes_partial_body() {
        let profile: Profile =
            serde_json::from_value(json!({"name": "Ada", "postalCode": "1010", "_id": "u1"})).unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.postal_code, "1010");
        assert_eq!(profile.city, "");
    }

    #[test]
    fn test_address_wire_shape_and_validation() {
        let address = Address {
            street: " 1 Main St ".into(),
            postal_code: "1010".into(),
            city: "Vienna".into(),
            country: "Austria".into(),
        }
        .normalized()
        .unwrap();

        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!({"street": "1 Main St", "postalCode": "1010", "city": "Vienna", "country": "Austria"})
        );

        let missing_city = Address {
            city: "   ".into(),
            ..address
        };
        assert_eq!(missing_city.normalized(), Err("City"));
    }
}
