//! What each role may do and what its home page offers.
//!
//! Views ask this table instead of comparing roles themselves.

use multivendor_core::Role;

/// Something a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create and edit products.
    ManageProducts,
    /// Use the cart, wishlist and order pages.
    Shop,
}

/// A link card on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    pub link_text: &'static str,
}

/// Table entry for one role.
#[derive(Debug)]
pub struct RoleEntry {
    pub role: Role,
    pub capabilities: &'static [Capability],
    pub tagline: &'static str,
    pub features: &'static [FeatureCard],
}

/// The role table.
pub const ROLE_TABLE: [RoleEntry; 2] = [
    RoleEntry {
        role: Role::Buyer,
        capabilities: &[Capability::Shop],
        tagline: "Discover and shop from multiple vendors",
        features: &[
            FeatureCard {
                title: "Shopping Cart",
                description: "Manage your selected products and proceed to checkout.",
                link: "/cart",
                link_text: "View Cart",
            },
            FeatureCard {
                title: "Wishlist",
                description: "Save and track your favorite products.",
                link: "/wishlist",
                link_text: "My Wishlist",
            },
            FeatureCard {
                title: "Order Products",
                description: "Browse and order from a wide range of products.",
                link: "/all-products",
                link_text: "Shop Now",
            },
        ],
    },
    RoleEntry {
        role: Role::Seller,
        capabilities: &[Capability::ManageProducts],
        tagline: "Manage your seller dashboard",
        features: &[FeatureCard {
            title: "Product Listing",
            description: "Add and manage your product offerings.",
            link: "/add-product",
            link_text: "Add Product",
        }],
    },
];

/// Cards every signed-in shopper gets, after the role's own.
pub const COMMON_FEATURES: &[FeatureCard] = &[FeatureCard {
    title: "Profile Management",
    description: "Update your personal information and settings.",
    link: "/profile",
    link_text: "Edit Profile",
}];

/// Tagline for a signed-in shopper whose role is unknown.
const DEFAULT_TAGLINE: &str = "Explore a seamless multi-vendor shopping experience";

/// Look up a role's entry.
#[must_use]
pub fn entry(role: Role) -> Option<&'static RoleEntry> {
    ROLE_TABLE.iter().find(|entry| entry.role == role)
}

/// Whether `role` (if known) has `capability`.
#[must_use]
pub fn allows(role: Option<Role>, capability: Capability) -> bool {
    role.and_then(entry)
        .is_some_and(|entry| entry.capabilities.contains(&capability))
}

/// Home page cards for `role`: the role's own, then the common ones.
#[must_use]
pub fn home_features(role: Option<Role>) -> Vec<FeatureCard> {
    role.and_then(entry)
        .map(|entry| entry.features)
        .unwrap_or_default()
        .iter()
        .chain(COMMON_FEATURES)
        .copied()
        .collect()
}

/// Home page tagline for `role`.
#[must_use]
pub fn tagline(role: Option<Role>) -> &'static str {
    role.and_then(entry).map_or(DEFAULT_TAGLINE, |entry| entry.tagline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_an_entry() {
        for role in Role::ALL {
            assert!(entry(role).is_some(), "{role} missing from table");
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(allows(Some(Role::Seller), Capability::ManageProducts));
        assert!(!allows(Some(Role::Buyer), Capability::ManageProducts));
        assert!(allows(Some(Role::Buyer), Capability::Shop));
        assert!(!allows(None, Capability::Shop));
    }

    #[test]
    fn test_home_features() {
        let buyer: Vec<_> = home_features(Some(Role::Buyer)).iter().map(|c| c.link).collect();
        assert_eq!(buyer, ["/cart", "/wishlist", "/all-products", "/profile"]);

        let seller: Vec<_> = home_features(Some(Role::Seller)).iter().map(|c| c.link).collect();
        assert_eq!(seller, ["/add-product", "/profile"]);

        assert_eq!(home_features(None).len(), COMMON_FEATURES.len());
    }
}
