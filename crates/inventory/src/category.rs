use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pantry category (closed set).
///
/// Serialized as its display label so stored records and the wire format
/// carry the same text the user picked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Canned goods")]
    CannedGoods,
    #[serde(rename = "Spices")]
    Spices,
    #[serde(rename = "Snacks")]
    Snacks,
    #[serde(rename = "Bread and Bakery")]
    BreadAndBakery,
    #[serde(rename = "Dairy")]
    Dairy,
    #[serde(rename = "Produce")]
    Produce,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::CannedGoods,
        Category::Spices,
        Category::Snacks,
        Category::BreadAndBakery,
        Category::Dairy,
        Category::Produce,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::CannedGoods => "Canned goods",
            Category::Spices => "Spices",
            Category::Snacks => "Snacks",
            Category::BreadAndBakery => "Bread and Bakery",
            Category::Dairy => "Dairy",
            Category::Produce => "Produce",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
