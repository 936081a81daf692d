use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Fixed catalog groupings. The set is closed; free text is mapped onto it
/// by the agent's category matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptops,
    Smartphones,
    Audio,
    Wearables,
    Tablets,
    Cameras,
    Accessories,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Laptops,
        Category::Smartphones,
        Category::Audio,
        Category::Wearables,
        Category::Tablets,
        Category::Cameras,
        Category::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Laptops => "laptops",
            Self::Smartphones => "smartphones",
            Self::Audio => "audio",
            Self::Wearables => "wearables",
            Self::Tablets => "tablets",
            Self::Cameras => "cameras",
            Self::Accessories => "accessories",
        }
    }

    /// Human-facing label used in reply summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Laptops => "Laptops",
            Self::Smartphones => "Smartphones",
            Self::Audio => "Audio",
            Self::Wearables => "Wearables",
            Self::Tablets => "Tablets",
            Self::Cameras => "Cameras",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "laptops" => Ok(Self::Laptops),
            "smartphones" => Ok(Self::Smartphones),
            "audio" => Ok(Self::Audio),
            "wearables" => Ok(Self::Wearables),
            "tablets" => Ok(Self::Tablets),
            "cameras" => Ok(Self::Cameras),
            "accessories" => Ok(Self::Accessories),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog category `{0}`")]
pub struct UnknownCategory(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSort {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub image_url: String,
}

impl Product {
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category,
            image_url: self.image_url.clone(),
        }
    }
}

/// Display-safe projection handed to the chat surface. Carries only fields
/// the storefront UI may render; storage row ids never leave the db crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::{Category, Product, ProductId};

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::from_str("Audio").expect("parse"), Category::Audio);
        assert_eq!(Category::from_str(" LAPTOPS ").expect("parse"), Category::Laptops);
    }

    #[test]
    fn category_parse_rejects_unknown_grouping() {
        let error = Category::from_str("furniture").expect_err("furniture is not a category");
        assert!(error.to_string().contains("furniture"));
    }

    #[test]
    fn category_round_trips_through_as_str() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()).expect("round trip"), *category);
        }
    }

    #[test]
    fn summary_preserves_display_fields() {
        let product = Product {
            id: ProductId("aurora-buds".to_string()),
            name: "Aurora Buds".to_string(),
            description: "Wireless earbuds with noise cancellation".to_string(),
            price: Decimal::new(7999, 2),
            category: Category::Audio,
            image_url: "/images/aurora-buds.jpg".to_string(),
        };

        let summary = product.summary();
        assert_eq!(summary.id, product.id);
        assert_eq!(summary.price, product.price);
        assert_eq!(summary.category, Category::Audio);
    }
}
