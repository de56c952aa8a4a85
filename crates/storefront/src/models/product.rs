//! Catalog products.

use multivendor_core::{Category, Price, ProductId};
use serde::{Deserialize, Serialize};

/// A product as the catalog service returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Image URL.
    #[serde(default)]
    pub img: String,
    /// Free-text category; see [`Product::known_category`].
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub seller: String,
}

impl Product {
    /// The category, if it is one the product form offers.
    #[must_use]
    pub fn known_category(&self) -> Option<Category> {
        self.category.parse().ok()
    }
}

/// Product fields a seller submits when creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub desc: String,
    pub img: String,
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub stock: u32,
    pub price: Price,
    pub available: bool,
    pub seller: String,
}

impl Default for ProductDraft {
    /// Blank form: new products start out available.
    fn default() -> Self {
        Self {
            name: String::new(),
            desc: String::new(),
            img: String::new(),
            category: None,
            stock: 0,
            price: Price::ZERO,
            available: true,
            seller: String::new(),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            desc: product.desc.clone(),
            img: product.img.clone(),
            category: product.known_category(),
            stock: product.stock,
            price: product.price,
            available: product.available,
            seller: product.seller.clone(),
        }
    }
}

/// Reference to a product by id (`{ "_id": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(rename = "_id")]
    pub id: ProductId,
}

impl From<ProductId> for ProductRef {
    fn from(id: ProductId) -> Self {
        Self { id }
    }
}
