//! Marketplace roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// The kind of account a shopper signed in with.
///
/// The auth service is inconsistent about casing (`"Buyer"` in some tokens,
/// `"buyer"` in others), so parsing ignores case. Serialization always
/// produces the lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Role {
    /// Shops: cart, wishlist, orders.
    Buyer,
    /// Lists and edits products.
    Seller,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 2] = [Self::Buyer, Self::Seller];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        }
    }

    /// Human-readable label for forms.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Seller => "Seller",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            _ => Err(RoleError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for &'static str {
    fn from(role: Role) -> Self {
        role.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("Buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!("seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!(" SELLER ".parse::<Role>().unwrap(), Role::Seller);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), "\"seller\"");
        let role: Role = serde_json::from_str("\"Buyer\"").unwrap();
        assert_eq!(role, Role::Buyer);
    }
}
