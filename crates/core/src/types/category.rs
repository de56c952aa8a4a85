//! Product categories.
//!
//! The catalog service stores a product's category as free text in its
//! `type` field, but the product form only offers this fixed list, and the
//! category pages are addressed by these names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a category name is not in the list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A product category offered by the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Category {
    Electronics,
    Fashion,
    HomeAndKitchen,
    HealthAndPersonalCare,
    BooksAndStationery,
    SportsAndOutdoors,
    ToysAndGames,
    BeautyAndCosmetics,
    Automotive,
    JewelryAndAccessories,
    GroceriesAndFood,
    BabyProducts,
    PetSupplies,
    ToolsAndHardware,
    OfficeSupplies,
    MusicalInstruments,
    Furniture,
    ArtAndCraft,
    IndustrialAndScientific,
    VideoGamesAndConsoles,
    Music,
}

impl Category {
    /// Every category, in the order the form lists them.
    pub const ALL: [Self; 21] = [
        Self::Electronics,
        Self::Fashion,
        Self::HomeAndKitchen,
        Self::HealthAndPersonalCare,
        Self::BooksAndStationery,
        Self::SportsAndOutdoors,
        Self::ToysAndGames,
        Self::BeautyAndCosmetics,
        Self::Automotive,
        Self::JewelryAndAccessories,
        Self::GroceriesAndFood,
        Self::BabyProducts,
        Self::PetSupplies,
        Self::ToolsAndHardware,
        Self::OfficeSupplies,
        Self::MusicalInstruments,
        Self::Furniture,
        Self::ArtAndCraft,
        Self::IndustrialAndScientific,
        Self::VideoGamesAndConsoles,
        Self::Music,
    ];

    /// The name stored in the catalog's `type` field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::HomeAndKitchen => "Home and Kitchen",
            Self::HealthAndPersonalCare => "Health and Personal Care",
            Self::BooksAndStationery => "Books and Stationery",
            Self::SportsAndOutdoors => "Sports and Outdoors",
            Self::ToysAndGames => "Toys and Games",
            Self::BeautyAndCosmetics => "Beauty and Cosmetics",
            Self::Automotive => "Automotive",
            Self::JewelryAndAccessories => "Jewelry and Accessories",
            Self::GroceriesAndFood => "Groceries and Food",
            Self::BabyProducts => "Baby Products",
            Self::PetSupplies => "Pet Supplies",
            Self::ToolsAndHardware => "Tools and Hardware",
            Self::OfficeSupplies => "Office Supplies",
            Self::MusicalInstruments => "Musical Instruments",
            Self::Furniture => "Furniture",
            Self::ArtAndCraft => "Art and Craft",
            Self::IndustrialAndScientific => "Industrial and Scientific",
            Self::VideoGamesAndConsoles => "Video Games and Consoles",
            Self::Music => "Music",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.name()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "home and kitchen".parse::<Category>().unwrap(),
            Category::HomeAndKitchen
        );
        assert!("Gadgets".parse::<Category>().is_err());
    }
}
